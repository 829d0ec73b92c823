//! Vireo Account Service Library
//!
//! 模块化架构：
//! - `domain`: 领域层（User 实体、值对象、仓储 trait、领域服务）
//! - `api`: HTTP 层（axum 路由、处理器、认证中间件）
//! - `infrastructure`: 基础设施层（PostgreSQL 仓储实现）

pub mod api;
pub mod domain;
pub mod infrastructure;
