use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// 自动清零的字节向量，用于私钥等敏感数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ZeroizingVec(#[serde(with = "serde_bytes")] pub Vec<u8>);

impl std::ops::Deref for ZeroizingVec {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for ZeroizingVec {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 去掉大端无符号整数的前导零字节；全零时保留一个 `0x00`
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b != 0) {
        Some(idx) => &bytes[idx..],
        None if bytes.is_empty() => bytes,
        None => &bytes[bytes.len() - 1..],
    }
}

/// 将大端无符号整数编码为 JWK 字段（base64url，无填充，最短长度）
pub fn encode_uint_b64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(strip_leading_zeros(bytes))
}

/// 解码 JWK 整数字段，返回最短长度的大端字节
pub fn decode_uint_b64url(field: &str) -> Result<Vec<u8>> {
    let raw = URL_SAFE_NO_PAD.decode(field)?;
    Ok(strip_leading_zeros(&raw).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_zeros() {
        assert_eq!(strip_leading_zeros(&[0, 0, 1, 0, 1]), &[1, 0, 1]);
        assert_eq!(strip_leading_zeros(&[1, 0, 1]), &[1, 0, 1]);
        assert_eq!(strip_leading_zeros(&[0, 0, 0]), &[0]);
        assert_eq!(strip_leading_zeros(&[]), &[] as &[u8]);
    }

    #[test]
    fn test_b64url_exponent() {
        // 65537 的标准 JWK 表示
        assert_eq!(encode_uint_b64url(&[0x01, 0x00, 0x01]), "AQAB");
        assert_eq!(encode_uint_b64url(&[0x00, 0x01, 0x00, 0x01]), "AQAB");
        assert_eq!(decode_uint_b64url("AQAB").unwrap(), vec![0x01, 0x00, 0x01]);
        // 带前导零的非规范输入会被规范化
        assert_eq!(decode_uint_b64url("AAEAAQ").unwrap(), vec![0x01, 0x00, 0x01]);
    }

    #[test]
    fn test_b64url_rejects_padding_and_std_alphabet() {
        assert!(decode_uint_b64url("AQAB==").is_err());
        assert!(decode_uint_b64url("a+b/").is_err());
    }
}
