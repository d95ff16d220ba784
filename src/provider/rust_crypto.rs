//! `RustCryptoProvider` 基于 RustCrypto `rsa` crate 实现 `RsaProvider`。

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::rand_core::OsRng as RsaOsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::traits::PrivateKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey, pkcs1v15, pss};

use crate::algorithm::{HashAlgorithm, SignaturePadding};
use crate::codec::der;
use crate::error::{Error, Result};
use crate::provider::RsaProvider;
use crate::utils::ZeroizingVec;

/// 将运行时的哈希选择映射为具体的摘要类型 `$D`，然后求值 `$body`
macro_rules! with_digest {
    ($hash:expr, $D:ident => $body:expr) => {
        match $hash {
            HashAlgorithm::Sha1 => {
                type $D = sha1::Sha1;
                $body
            }
            HashAlgorithm::Sha256 => {
                type $D = sha2::Sha256;
                $body
            }
            HashAlgorithm::Sha384 => {
                type $D = sha2::Sha384;
                $body
            }
            HashAlgorithm::Sha512 => {
                type $D = sha2::Sha512;
                $body
            }
            HashAlgorithm::Sha3_256 => {
                type $D = sha3::Sha3_256;
                $body
            }
            HashAlgorithm::Sha3_384 => {
                type $D = sha3::Sha3_384;
                $body
            }
            HashAlgorithm::Sha3_512 => {
                type $D = sha3::Sha3_512;
                $body
            }
        }
    };
}

fn provider_failure(context: &str, err: impl std::fmt::Display) -> Error {
    tracing::debug!(error = %err, context, "rsa provider rejected operation");
    Error::ProviderFailure(format!("{}: {}", context, err))
}

fn load_private(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| provider_failure("解析RSA私钥失败", e))
}

fn load_public(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem).map_err(|e| provider_failure("解析RSA公钥失败", e))
}

/// RustCrypto RSA 提供者，随机数取自操作系统
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RsaProvider for RustCryptoProvider {
    fn generate_key_pair(&self, modulus_bits: usize, exponent: u32) -> Result<(Vec<u8>, ZeroizingVec)> {
        let mut rsa_rng = RsaOsRng;
        let private_key =
            RsaPrivateKey::new_with_exp(&mut rsa_rng, modulus_bits, &BigUint::from(exponent))
                .map_err(|e| provider_failure("生成RSA密钥失败", e))?;
        let public_key = RsaPublicKey::from(&private_key);

        let public_der = public_key
            .to_public_key_der()
            .map_err(|e| provider_failure("导出RSA公钥DER失败", e))?;
        let private_der = private_key
            .to_pkcs8_der()
            .map_err(|e| provider_failure("导出RSA私钥DER失败", e))?;

        Ok((
            public_der.as_bytes().to_vec(),
            ZeroizingVec(private_der.as_bytes().to_vec()),
        ))
    }

    fn sign(
        &self,
        hash: HashAlgorithm,
        padding: SignaturePadding,
        private_pem: &str,
        message: &[u8],
    ) -> Result<Vec<u8>> {
        let private_key = load_private(private_pem)?;
        let signature = match padding {
            SignaturePadding::Pkcs1v15 => with_digest!(hash, D => {
                pkcs1v15::SigningKey::<D>::new(private_key)
                    .try_sign(message)
                    .map(|signature| signature.to_vec())
            }),
            SignaturePadding::Pss { salt_length } => with_digest!(hash, D => {
                let mut rng = RsaOsRng;
                pss::SigningKey::<D>::new_with_salt_len(private_key, salt_length)
                    .try_sign_with_rng(&mut rng, message)
                    .map(|signature| signature.to_vec())
            }),
        };
        signature.map_err(|e| provider_failure("RSA签名失败", e))
    }

    fn verify(
        &self,
        hash: HashAlgorithm,
        padding: SignaturePadding,
        public_pem: &str,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        let public_key = load_public(public_pem)?;
        let valid = match padding {
            SignaturePadding::Pkcs1v15 => {
                let Ok(signature) = pkcs1v15::Signature::try_from(signature) else {
                    return Ok(false);
                };
                with_digest!(hash, D => {
                    pkcs1v15::VerifyingKey::<D>::new(public_key)
                        .verify(message, &signature)
                        .is_ok()
                })
            }
            SignaturePadding::Pss { salt_length } => {
                let Ok(signature) = pss::Signature::try_from(signature) else {
                    return Ok(false);
                };
                with_digest!(hash, D => {
                    pss::VerifyingKey::<D>::new_with_salt_len(public_key, salt_length)
                        .verify(message, &signature)
                        .is_ok()
                })
            }
        };
        Ok(valid)
    }

    fn encrypt_oaep(&self, hash: HashAlgorithm, public_pem: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let public_key = load_public(public_pem)?;
        let mut rng = RsaOsRng;
        let ciphertext =
            with_digest!(hash, D => public_key.encrypt(&mut rng, Oaep::new::<D>(), plaintext));
        ciphertext.map_err(|e| provider_failure("RSA加密失败", e))
    }

    fn decrypt_oaep(&self, hash: HashAlgorithm, private_pem: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let private_key = load_private(private_pem)?;
        let plaintext = with_digest!(hash, D => private_key.decrypt(Oaep::new::<D>(), ciphertext));
        plaintext.map_err(|e| provider_failure("RSA解密失败", e))
    }

    fn validate_public(&self, spki_der: &[u8]) -> Result<()> {
        RsaPublicKey::from_public_key_der(spki_der)
            .map(|_| ())
            .map_err(|e| Error::MalformedKeyData(format!("RSA公钥无效: {}", e)))
    }

    fn validate_private(&self, pkcs8_der: &[u8]) -> Result<()> {
        let mut private_key = RsaPrivateKey::from_pkcs8_der(pkcs8_der)
            .map_err(|e| Error::MalformedKeyData(format!("RSA私钥无效: {}", e)))?;
        private_key
            .validate()
            .map_err(|e| Error::MalformedKeyData(format!("RSA私钥无效: {}", e)))?;
        private_key
            .precompute()
            .map_err(|e| Error::MalformedKeyData(format!("RSA私钥无效: {}", e)))?;

        // rsa 只用 n、e、d、p、q 重建密钥，编码中的 CRT 字段需要单独核对
        let components = der::decode_pkcs8(pkcs8_der)?;
        let expected = [
            ("dp", private_key.dp().cloned()),
            ("dq", private_key.dq().cloned()),
            ("qi", private_key.crt_coefficient()),
        ];
        let supplied = [&components.dp, &components.dq, &components.qi];
        for ((field, expected), supplied) in expected.into_iter().zip(supplied) {
            if expected != Some(BigUint::from_bytes_be(supplied)) {
                return Err(Error::MalformedKeyData(format!(
                    "RSA私钥的 CRT 字段 {} 与素数不一致",
                    field
                )));
            }
        }
        Ok(())
    }
}
