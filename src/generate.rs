//! 密钥对生成

use crate::algorithm::AlgorithmDescriptor;
use crate::codec::der;
use crate::config::RsaConfig;
use crate::error::{Error, Result};
use crate::key::{KeyPair, KeyUsage, PrivateKey, PublicKey, RsaHashedKeyAlgorithm};
use crate::provider::RsaProvider;

/// 将大端指数规范化为 32 位整数
///
/// 不足 4 字节时左侧补零；更长的序列去掉前导零后仍必须能放进 32 位。
pub fn normalize_exponent(exponent: &[u8]) -> Result<u32> {
    let significant = crate::utils::strip_leading_zeros(exponent);
    if significant.len() > 4 {
        return Err(Error::ProviderFailure(format!(
            "public exponent of {} bytes does not fit in 32 bits",
            significant.len()
        )));
    }
    let mut buf = [0u8; 4];
    buf[4 - significant.len()..].copy_from_slice(significant);
    Ok(u32::from_be_bytes(buf))
}

/// 按描述生成一对新密钥
///
/// 公钥总是可导出；私钥的可导出性由 `extractable` 决定。
/// 提供者的失败直接返回，不在这一层重试。
pub fn generate_key_pair<P: RsaProvider + ?Sized>(
    provider: &P,
    config: &RsaConfig,
    descriptor: &AlgorithmDescriptor,
    extractable: bool,
    usages: &[KeyUsage],
) -> Result<KeyPair> {
    let name = descriptor.algorithm_name()?;
    let hash = descriptor.require_hash()?;

    let modulus_length = descriptor
        .modulus_length
        .unwrap_or(config.default_modulus_length);
    if modulus_length == 0 || modulus_length % 8 != 0 {
        return Err(Error::ProviderFailure(format!(
            "modulus length {} is not a positive multiple of 8",
            modulus_length
        )));
    }
    if modulus_length < config.min_modulus_length || modulus_length > config.max_modulus_length {
        return Err(Error::ProviderFailure(format!(
            "modulus length {} is outside [{}, {}]",
            modulus_length, config.min_modulus_length, config.max_modulus_length
        )));
    }

    let exponent_bytes = descriptor
        .public_exponent
        .as_deref()
        .unwrap_or(&config.default_public_exponent);
    let exponent = normalize_exponent(exponent_bytes)?;
    // 偶数或过小的指数永远找不到与 φ(n) 互素的素数
    if exponent < 3 || exponent % 2 == 0 {
        return Err(Error::ProviderFailure(format!(
            "public exponent {} must be odd and at least 3",
            exponent
        )));
    }

    tracing::debug!(algorithm = %name, %hash, modulus_length, exponent, "generating RSA key pair");
    let (spki, pkcs8) = provider.generate_key_pair(modulus_length as usize, exponent)?;

    let components = der::decode_spki(&spki)?;
    let algorithm = RsaHashedKeyAlgorithm {
        name,
        hash,
        modulus_length: (components.n.len() << 3) as u32,
        public_exponent: components.e,
    };

    Ok(KeyPair {
        public_key: PublicKey::new(algorithm.clone(), spki, usages),
        private_key: PrivateKey::new(algorithm, pkcs8, extractable, usages),
    })
}
