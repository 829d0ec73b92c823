pub mod repositories;
pub mod services;
pub mod subscription;
pub mod user;
pub mod value_objects;
