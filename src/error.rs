//! Defines the error type for the `seal-rsa` crate.

use crate::key::KeyType;
use thiserror::Error;

/// RSA 密钥管理操作可能遇到的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 格式标签不是 jwk / pkcs8 / spki 之一
    #[error("unsupported key format: {0}")]
    UnsupportedFormat(String),

    /// 算法名或哈希名不受支持，或缺少必要参数
    #[error("unrecognized algorithm: {0}")]
    UnrecognizedAlgorithm(String),

    #[error("unrecognized key usage: {0}")]
    UnrecognizedUsage(String),

    /// DER / PEM / JWK 数据无法解析为期望的结构
    #[error("malformed key data: {0}")]
    MalformedKeyData(String),

    /// 底层密码学原语拒绝了本次操作
    #[error("cryptographic provider failure: {0}")]
    ProviderFailure(String),

    #[error("invalid key type: expected {expected} key, got {actual} key")]
    InvalidKeyType { expected: KeyType, actual: KeyType },

    #[error("invalid access: {0}")]
    InvalidAccess(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    TaskJoin(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// 手动实现一些无法使用 #[from] 的转换
impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::MalformedKeyData(format!("invalid base64url field: {}", err))
    }
}

impl From<rsa::pkcs8::der::Error> for Error {
    fn from(err: rsa::pkcs8::der::Error) -> Self {
        Error::MalformedKeyData(format!("DER error: {}", err))
    }
}

impl From<rsa::pkcs8::der::pem::Error> for Error {
    fn from(err: rsa::pkcs8::der::pem::Error) -> Self {
        Error::MalformedKeyData(format!("PEM error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_source_message() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "seal-rsa.json"));
        assert_eq!(io.to_string(), "I/O error: seal-rsa.json");

        let json = Error::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        let message = json.to_string();
        assert!(message.starts_with("serialization error (JSON): "));
        assert!(message.len() > "serialization error (JSON): ".len());
    }
}
