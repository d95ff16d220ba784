//! # 格式编解码
//!
//! 在三种编码与密钥对象之间双向转换：
//!
//! - `spki` / `pkcs8`：规范 DER 编码（也接受同内容的 PEM 文本导入）
//! - `jwk`：RSA JSON Web Key
//!
//! 导入时总是经由 PKCS#1 字段重新编码为规范 DER，JWK 本身从不作为密钥的存储形式。

pub mod der;
pub mod jwk;

use rsa::pkcs8::der::pem;

use crate::algorithm::{AlgorithmDescriptor, KeyFormat};
use crate::codec::der::{PrivateComponents, PublicComponents};
use crate::codec::jwk::{JsonWebKey, JwkComponents, jwk_alg};
use crate::error::{Error, Result};
use crate::key::{CryptoKey, KeyType, KeyUsage, PrivateKey, PublicKey, RsaHashedKeyAlgorithm};
use crate::provider::RsaProvider;

/// 导出结果
#[derive(Debug, Clone, PartialEq)]
pub enum ExportedKey {
    Der(Vec<u8>),
    Jwk(JsonWebKey),
}

impl ExportedKey {
    pub fn as_der(&self) -> Option<&[u8]> {
        match self {
            ExportedKey::Der(der) => Some(der),
            ExportedKey::Jwk(_) => None,
        }
    }

    pub fn into_jwk(self) -> Option<JsonWebKey> {
        match self {
            ExportedKey::Jwk(jwk) => Some(jwk),
            ExportedKey::Der(_) => None,
        }
    }
}

/// 导入时的密钥数据
#[derive(Debug, Clone, Copy)]
pub enum KeyData<'a> {
    /// DER、PEM 文本，或 `jwk` 格式下的 JSON 文本
    Bytes(&'a [u8]),
    Jwk(&'a JsonWebKey),
}

impl<'a> From<&'a [u8]> for KeyData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        KeyData::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for KeyData<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        KeyData::Bytes(bytes)
    }
}

impl<'a> From<&'a JsonWebKey> for KeyData<'a> {
    fn from(jwk: &'a JsonWebKey) -> Self {
        KeyData::Jwk(jwk)
    }
}

/// 由解析得到的字段构造密钥元数据；模数位数与指数总是取自密钥本身
fn key_algorithm(descriptor: &AlgorithmDescriptor, n: &[u8], e: &[u8]) -> Result<RsaHashedKeyAlgorithm> {
    let modulus_length = u32::try_from(n.len() << 3)
        .map_err(|_| Error::MalformedKeyData("modulus is too large".to_string()))?;
    Ok(RsaHashedKeyAlgorithm {
        name: descriptor.algorithm_name()?,
        hash: descriptor.require_hash()?,
        modulus_length,
        public_exponent: e.to_vec(),
    })
}

/// 导出密钥
pub fn export_key(format: KeyFormat, key: &CryptoKey) -> Result<ExportedKey> {
    if !key.extractable() {
        return Err(Error::InvalidAccess("key is not extractable".to_string()));
    }
    let exported = match (format, key) {
        (KeyFormat::Spki, CryptoKey::Public(public_key)) => {
            ExportedKey::Der(public_key.der().to_vec())
        }
        (KeyFormat::Pkcs8, CryptoKey::Private(private_key)) => {
            ExportedKey::Der(private_key.der().to_vec())
        }
        (KeyFormat::Spki, CryptoKey::Private(_)) => {
            return Err(Error::InvalidKeyType {
                expected: KeyType::Public,
                actual: KeyType::Private,
            });
        }
        (KeyFormat::Pkcs8, CryptoKey::Public(_)) => {
            return Err(Error::InvalidKeyType {
                expected: KeyType::Private,
                actual: KeyType::Public,
            });
        }
        (KeyFormat::Jwk, key) => ExportedKey::Jwk(export_jwk(key)?),
    };
    tracing::debug!(%format, key_type = %key.key_type(), "exported RSA key");
    Ok(exported)
}

fn export_jwk(key: &CryptoKey) -> Result<JsonWebKey> {
    let mut jwk = match key {
        CryptoKey::Public(public_key) => JsonWebKey::from_public(&der::decode_spki(public_key.der())?),
        CryptoKey::Private(private_key) => {
            JsonWebKey::from_private(&der::decode_pkcs8(private_key.der())?)
        }
    };
    let algorithm = key.algorithm();
    jwk.alg = jwk_alg(algorithm.name, algorithm.hash).map(str::to_string);
    jwk.ext = Some(key.extractable());
    jwk.key_ops = Some(key.usages().iter().map(|usage| usage.to_string()).collect());
    Ok(jwk)
}

/// 若数据是 PEM 文本则解码，并检查标签
fn unwrap_pem(data: &[u8], expected_label: &str) -> Result<Option<Vec<u8>>> {
    if !data.starts_with(b"-----BEGIN") {
        return Ok(None);
    }
    let (label, der) = pem::decode_vec(data)?;
    if label != expected_label {
        return Err(Error::MalformedKeyData(format!(
            "expected PEM label \"{}\", got \"{}\"",
            expected_label, label
        )));
    }
    Ok(Some(der))
}

fn build_public<P: RsaProvider + ?Sized>(
    provider: &P,
    components: &PublicComponents,
    descriptor: &AlgorithmDescriptor,
    usages: &[KeyUsage],
) -> Result<PublicKey> {
    let spki = der::encode_spki(components)?;
    provider.validate_public(&spki)?;
    let algorithm = key_algorithm(descriptor, &components.n, &components.e)?;
    Ok(PublicKey::new(algorithm, spki, usages))
}

fn build_private<P: RsaProvider + ?Sized>(
    provider: &P,
    components: &PrivateComponents,
    descriptor: &AlgorithmDescriptor,
    extractable: bool,
    usages: &[KeyUsage],
) -> Result<PrivateKey> {
    let pkcs8 = der::encode_pkcs8(components)?;
    provider.validate_private(&pkcs8)?;
    let algorithm = key_algorithm(descriptor, &components.n, &components.e)?;
    Ok(PrivateKey::new(algorithm, pkcs8, extractable, usages))
}

/// 导入密钥
///
/// 描述中的 `modulus_length` 与 `public_exponent` 会被解析结果覆盖。
pub fn import_key<P: RsaProvider + ?Sized>(
    provider: &P,
    format: KeyFormat,
    data: KeyData<'_>,
    descriptor: &AlgorithmDescriptor,
    extractable: bool,
    usages: &[KeyUsage],
) -> Result<CryptoKey> {
    let key = match (format, data) {
        (KeyFormat::Jwk, KeyData::Jwk(jwk)) => {
            import_jwk(provider, jwk, descriptor, extractable, usages)?
        }
        (KeyFormat::Jwk, KeyData::Bytes(bytes)) => {
            let jwk: JsonWebKey = serde_json::from_slice(bytes)
                .map_err(|e| Error::MalformedKeyData(format!("invalid JWK JSON: {}", e)))?;
            import_jwk(provider, &jwk, descriptor, extractable, usages)?
        }
        (KeyFormat::Spki, KeyData::Bytes(bytes)) => {
            let pem_der = unwrap_pem(bytes, "PUBLIC KEY")?;
            let components = der::decode_spki(pem_der.as_deref().unwrap_or(bytes))?;
            build_public(provider, &components, descriptor, usages)?.into()
        }
        (KeyFormat::Pkcs8, KeyData::Bytes(bytes)) => {
            let pem_der = unwrap_pem(bytes, "PRIVATE KEY")?.map(crate::utils::ZeroizingVec);
            let components = der::decode_pkcs8(pem_der.as_deref().unwrap_or(bytes))?;
            build_private(provider, &components, descriptor, extractable, usages)?.into()
        }
        (KeyFormat::Spki | KeyFormat::Pkcs8, KeyData::Jwk(_)) => {
            return Err(Error::MalformedKeyData(format!(
                "{} import expects binary key data, got a JWK",
                format
            )));
        }
    };
    tracing::debug!(
        %format,
        key_type = %key.key_type(),
        algorithm = %key.algorithm().name,
        modulus_length = key.algorithm().modulus_length,
        "imported RSA key"
    );
    Ok(key)
}

fn import_jwk<P: RsaProvider + ?Sized>(
    provider: &P,
    jwk: &JsonWebKey,
    descriptor: &AlgorithmDescriptor,
    extractable: bool,
    usages: &[KeyUsage],
) -> Result<CryptoKey> {
    jwk.check_consistency(descriptor.algorithm_name()?, descriptor.require_hash()?, extractable)?;
    match jwk.to_components()? {
        JwkComponents::Public(components) => {
            Ok(build_public(provider, &components, descriptor, usages)?.into())
        }
        JwkComponents::Private(components) => {
            Ok(build_private(provider, &components, descriptor, extractable, usages)?.into())
        }
    }
}
