//!
//! 集成测试的通用辅助函数
//!
#![allow(dead_code)]

use std::sync::OnceLock;

use seal_rsa::{AlgorithmDescriptor, KeyPair, KeyUsage, SubtleRsa};

pub const ALL_USAGES: [KeyUsage; 6] = [
    KeyUsage::Sign,
    KeyUsage::Verify,
    KeyUsage::Encrypt,
    KeyUsage::Decrypt,
    KeyUsage::WrapKey,
    KeyUsage::UnwrapKey,
];

pub fn signing_descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new("RSASSA-PKCS1-v1_5").with_hash("SHA-256")
}

pub fn oaep_descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new("RSA-OAEP").with_hash("SHA-256")
}

/// 1024 位 RSASSA-PKCS1-v1_5 / SHA-256 密钥对，整个测试二进制共享
pub fn signing_pair() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| {
        let descriptor = signing_descriptor().with_modulus_length(1024);
        SubtleRsa::new()
            .generate_key_pair(&descriptor, true, &ALL_USAGES)
            .unwrap()
    })
}

/// 2048 位 RSA-OAEP / SHA-256 密钥对；较长的哈希需要更大的模数
pub fn oaep_pair() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| {
        let descriptor = oaep_descriptor().with_modulus_length(2048);
        SubtleRsa::new()
            .generate_key_pair(&descriptor, true, &ALL_USAGES)
            .unwrap()
    })
}
