//! # 算法描述与解析
//!
//! 调用方以字符串形式提供算法名、哈希名与填充参数（与 WebCrypto 字典一致）。
//! 这些字符串在边界处一次性解析为封闭的枚举，之后的分派全部基于 `match`。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RSA 算法族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmName {
    #[serde(rename = "RSASSA-PKCS1-v1_5")]
    RsassaPkcs1v15,
    #[serde(rename = "RSA-PSS")]
    RsaPss,
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
}

impl AlgorithmName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmName::RsassaPkcs1v15 => "RSASSA-PKCS1-v1_5",
            AlgorithmName::RsaPss => "RSA-PSS",
            AlgorithmName::RsaOaep => "RSA-OAEP",
        }
    }

    /// 是否为签名算法
    pub fn is_signature(&self) -> bool {
        !matches!(self, AlgorithmName::RsaOaep)
    }
}

impl fmt::Display for AlgorithmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RSASSA-PKCS1-V1_5" => Ok(AlgorithmName::RsassaPkcs1v15),
            "RSA-PSS" => Ok(AlgorithmName::RsaPss),
            "RSA-OAEP" => Ok(AlgorithmName::RsaOaep),
            _ => Err(Error::UnrecognizedAlgorithm(s.to_string())),
        }
    }
}

/// 支持的摘要算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
    #[serde(rename = "SHA3-256")]
    Sha3_256,
    #[serde(rename = "SHA3-384")]
    Sha3_384,
    #[serde(rename = "SHA3-512")]
    Sha3_512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 7] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_384 => "SHA3-384",
            HashAlgorithm::Sha3_512 => "SHA3-512",
        }
    }

    /// 摘要输出长度（字节）
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha3_384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SHA-1" => Ok(HashAlgorithm::Sha1),
            "SHA-256" => Ok(HashAlgorithm::Sha256),
            "SHA-384" => Ok(HashAlgorithm::Sha384),
            "SHA-512" => Ok(HashAlgorithm::Sha512),
            "SHA3-256" => Ok(HashAlgorithm::Sha3_256),
            "SHA3-384" => Ok(HashAlgorithm::Sha3_384),
            "SHA3-512" => Ok(HashAlgorithm::Sha3_512),
            _ => Err(Error::UnrecognizedAlgorithm(format!("hash {}", s))),
        }
    }
}

/// 密钥编码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    Jwk,
    Pkcs8,
    Spki,
}

impl KeyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyFormat::Jwk => "jwk",
            KeyFormat::Pkcs8 => "pkcs8",
            KeyFormat::Spki => "spki",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jwk" => Ok(KeyFormat::Jwk),
            "pkcs8" => Ok(KeyFormat::Pkcs8),
            "spki" => Ok(KeyFormat::Spki),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// 调用方提供的算法描述（WebCrypto 算法字典）
///
/// 每次调用临时构造；`salt_length` 仅用于 RSA-PSS，`label` 仅用于 RSA-OAEP，
/// `modulus_length` 与 `public_exponent` 仅用于密钥生成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_bytes")]
    pub label: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_bytes")]
    pub public_exponent: Option<Vec<u8>>,
}

impl AlgorithmDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = Some(salt_length);
        self
    }

    pub fn with_label(mut self, label: impl Into<Vec<u8>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_modulus_length(mut self, bits: u32) -> Self {
        self.modulus_length = Some(bits);
        self
    }

    pub fn with_public_exponent(mut self, exponent: impl Into<Vec<u8>>) -> Self {
        self.public_exponent = Some(exponent.into());
        self
    }

    pub fn algorithm_name(&self) -> Result<AlgorithmName> {
        self.name.parse()
    }

    /// 解析哈希名；描述中未给出时返回 `None`
    pub fn hash_algorithm(&self) -> Result<Option<HashAlgorithm>> {
        self.hash.as_deref().map(str::parse).transpose()
    }

    /// 解析哈希名，缺失即报错（生成与导入时哈希是必需的）
    pub fn require_hash(&self) -> Result<HashAlgorithm> {
        self.hash_algorithm()?.ok_or_else(|| {
            Error::UnrecognizedAlgorithm(format!("{} requires a hash", self.name))
        })
    }
}

/// 签名填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePadding {
    Pkcs1v15,
    Pss { salt_length: usize },
}

/// 解析完成的操作参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsaParams {
    Pkcs1v15 {
        hash: HashAlgorithm,
    },
    Pss {
        hash: HashAlgorithm,
        salt_length: usize,
    },
    Oaep {
        hash: HashAlgorithm,
        label: Option<Vec<u8>>,
    },
}

impl RsaParams {
    /// 为签名 / 验签解析描述；`key_hash` 在描述未给出哈希时作为回退
    pub fn for_signature(descriptor: &AlgorithmDescriptor, key_hash: HashAlgorithm) -> Result<Self> {
        let hash = descriptor.hash_algorithm()?.unwrap_or(key_hash);
        match descriptor.algorithm_name()? {
            AlgorithmName::RsassaPkcs1v15 => Ok(RsaParams::Pkcs1v15 { hash }),
            AlgorithmName::RsaPss => {
                let salt_length = descriptor.salt_length.ok_or_else(|| {
                    Error::UnrecognizedAlgorithm("RSA-PSS requires saltLength".to_string())
                })?;
                Ok(RsaParams::Pss { hash, salt_length })
            }
            AlgorithmName::RsaOaep => Err(Error::UnrecognizedAlgorithm(format!(
                "{} cannot sign or verify",
                descriptor.name
            ))),
        }
    }

    /// 为加密 / 解密解析描述
    pub fn for_encryption(descriptor: &AlgorithmDescriptor, key_hash: HashAlgorithm) -> Result<Self> {
        let hash = descriptor.hash_algorithm()?.unwrap_or(key_hash);
        match descriptor.algorithm_name()? {
            AlgorithmName::RsaOaep => Ok(RsaParams::Oaep {
                hash,
                label: descriptor.label.clone(),
            }),
            _ => Err(Error::UnrecognizedAlgorithm(format!(
                "{} cannot encrypt or decrypt",
                descriptor.name
            ))),
        }
    }

    pub fn hash(&self) -> HashAlgorithm {
        match self {
            RsaParams::Pkcs1v15 { hash }
            | RsaParams::Pss { hash, .. }
            | RsaParams::Oaep { hash, .. } => *hash,
        }
    }

    /// 签名参数对应的填充方式；OAEP 返回 `None`
    pub fn signature_padding(&self) -> Option<SignaturePadding> {
        match self {
            RsaParams::Pkcs1v15 { .. } => Some(SignaturePadding::Pkcs1v15),
            RsaParams::Pss { salt_length, .. } => Some(SignaturePadding::Pss {
                salt_length: *salt_length,
            }),
            RsaParams::Oaep { .. } => None,
        }
    }
}
