//! Password 值对象
//!
//! 明文密码只在验证与哈希的瞬间存在，
//! 存储与比对一律通过 Argon2 哈希进行

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use vireo_errors::AppError;

/// 密码最大长度（限制 Argon2 输入规模）
const MAX_PASSWORD_LENGTH: usize = 128;

/// 哈希后的密码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(pub String);

impl HashedPassword {
    /// 从明文密码创建哈希密码
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        Password::validate(plain_password)?;

        // 使用 Argon2 哈希密码
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(password_hash))
    }

    /// 验证明文密码是否匹配
    pub fn verify(&self, plain_password: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// 明文密码（仅用于验证）
pub struct Password(String);

impl Password {
    /// 创建新的 Password（验证后）
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordError> {
        let password = password.into();
        Self::validate(&password)?;
        Ok(Self(password))
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 验证密码
    pub fn validate(password: &str) -> Result<(), PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong(MAX_PASSWORD_LENGTH));
        }

        Ok(())
    }
}

/// Password 错误
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password is required")]
    Empty,

    #[error("Password is too long (maximum {0} characters)")]
    TooLong(usize),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Empty | PasswordError::TooLong(_) => {
                AppError::validation(err.to_string())
            }
            PasswordError::HashingFailed(_) | PasswordError::InvalidHash(_) => {
                AppError::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = HashedPassword::from_plain("p1").unwrap();

        assert!(hashed.verify("p1").unwrap());
        assert!(!hashed.verify("wrong").unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let first = HashedPassword::from_plain("p1").unwrap();
        let second = HashedPassword::from_plain("p1").unwrap();

        assert_ne!(first.0, second.0);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(HashedPassword::from_plain("").is_err());
        assert!(Password::new("").is_err());
    }

    #[test]
    fn test_overlong_password_rejected() {
        let long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(Password::new(long).is_err());
    }

    #[test]
    fn test_display_redacts_hash() {
        let hashed = HashedPassword::from_hash("$argon2id$fake".to_string());
        assert_eq!(format!("{}", hashed), "[REDACTED]");
    }

    #[test]
    fn test_verify_with_invalid_hash_errors() {
        let hashed = HashedPassword::from_hash("not-a-phc-string".to_string());
        assert!(hashed.verify("p1").is_err());
    }
}
