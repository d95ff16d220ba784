//! # 密码学原语提供者
//!
//! 模幂运算、PSS/OAEP 填充与素数生成都委托给提供者完成。
//! 本 crate 只负责密钥表示、格式转换与参数分派；`RustCryptoProvider`
//! 是基于 RustCrypto `rsa` crate 的默认实现。

pub mod rust_crypto;

pub use rust_crypto::RustCryptoProvider;

use crate::algorithm::{HashAlgorithm, SignaturePadding};
use crate::error::Result;
use crate::utils::ZeroizingVec;

/// `RsaProvider` 定义了 RSA 原语提供者必须实现的核心功能。
///
/// 签名与加解密接收 PEM 文本形式的密钥，密钥生成直接返回
/// SubjectPublicKeyInfo 与 PKCS#8 DER 编码。
pub trait RsaProvider: Send + Sync {
    /// 生成密钥对，返回 `(spki_der, pkcs8_der)`
    fn generate_key_pair(&self, modulus_bits: usize, exponent: u32) -> Result<(Vec<u8>, ZeroizingVec)>;

    fn sign(
        &self,
        hash: HashAlgorithm,
        padding: SignaturePadding,
        private_pem: &str,
        message: &[u8],
    ) -> Result<Vec<u8>>;

    /// 签名不匹配返回 `Ok(false)` 而不是错误
    fn verify(
        &self,
        hash: HashAlgorithm,
        padding: SignaturePadding,
        public_pem: &str,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool>;

    fn encrypt_oaep(&self, hash: HashAlgorithm, public_pem: &str, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn decrypt_oaep(&self, hash: HashAlgorithm, private_pem: &str, ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// 确认提供者接受该公钥材料
    fn validate_public(&self, spki_der: &[u8]) -> Result<()>;

    /// 确认提供者接受该私钥材料
    fn validate_private(&self, pkcs8_der: &[u8]) -> Result<()>;
}
