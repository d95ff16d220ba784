//! RSA JSON Web Key (RFC 7517 / RFC 7518 §6.3) 表示。

use serde::{Deserialize, Serialize};

use crate::algorithm::{AlgorithmName, HashAlgorithm};
use crate::codec::der::{PrivateComponents, PublicComponents};
use crate::error::{Error, Result};
use crate::utils::{decode_uint_b64url, encode_uint_b64url};

/// RSA JWK；所有整数字段均为 base64url（无填充）编码的最短大端整数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    #[serde(default)]
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "use")]
    pub use_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

/// JWK 解码结果：`d` 存在即为私钥
#[derive(Debug)]
pub enum JwkComponents {
    Public(PublicComponents),
    Private(PrivateComponents),
}

/// 算法与哈希组合对应的 JWA `alg` 值；没有登记值的组合返回 `None`
pub fn jwk_alg(name: AlgorithmName, hash: HashAlgorithm) -> Option<&'static str> {
    match (name, hash) {
        (AlgorithmName::RsassaPkcs1v15, HashAlgorithm::Sha1) => Some("RS1"),
        (AlgorithmName::RsassaPkcs1v15, HashAlgorithm::Sha256) => Some("RS256"),
        (AlgorithmName::RsassaPkcs1v15, HashAlgorithm::Sha384) => Some("RS384"),
        (AlgorithmName::RsassaPkcs1v15, HashAlgorithm::Sha512) => Some("RS512"),
        (AlgorithmName::RsaPss, HashAlgorithm::Sha256) => Some("PS256"),
        (AlgorithmName::RsaPss, HashAlgorithm::Sha384) => Some("PS384"),
        (AlgorithmName::RsaPss, HashAlgorithm::Sha512) => Some("PS512"),
        (AlgorithmName::RsaOaep, HashAlgorithm::Sha1) => Some("RSA-OAEP"),
        (AlgorithmName::RsaOaep, HashAlgorithm::Sha256) => Some("RSA-OAEP-256"),
        (AlgorithmName::RsaOaep, HashAlgorithm::Sha384) => Some("RSA-OAEP-384"),
        (AlgorithmName::RsaOaep, HashAlgorithm::Sha512) => Some("RSA-OAEP-512"),
        _ => None,
    }
}

fn required(field: &Option<String>, name: &str) -> Result<Vec<u8>> {
    let value = field
        .as_deref()
        .ok_or_else(|| Error::MalformedKeyData(format!("JWK is missing field \"{}\"", name)))?;
    decode_uint_b64url(value)
}

impl JsonWebKey {
    pub fn from_public(components: &PublicComponents) -> Self {
        Self {
            kty: "RSA".to_string(),
            n: Some(encode_uint_b64url(&components.n)),
            e: Some(encode_uint_b64url(&components.e)),
            ..Default::default()
        }
    }

    pub fn from_private(components: &PrivateComponents) -> Self {
        Self {
            kty: "RSA".to_string(),
            n: Some(encode_uint_b64url(&components.n)),
            e: Some(encode_uint_b64url(&components.e)),
            d: Some(encode_uint_b64url(&components.d)),
            p: Some(encode_uint_b64url(&components.p)),
            q: Some(encode_uint_b64url(&components.q)),
            dp: Some(encode_uint_b64url(&components.dp)),
            dq: Some(encode_uint_b64url(&components.dq)),
            qi: Some(encode_uint_b64url(&components.qi)),
            ..Default::default()
        }
    }

    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// 解码为内部字段结构
    pub fn to_components(&self) -> Result<JwkComponents> {
        if self.kty != "RSA" {
            return Err(Error::MalformedKeyData(format!(
                "JWK kty must be \"RSA\", got \"{}\"",
                self.kty
            )));
        }
        let n = required(&self.n, "n")?;
        let e = required(&self.e, "e")?;
        if !self.is_private() {
            return Ok(JwkComponents::Public(PublicComponents { n, e }));
        }
        Ok(JwkComponents::Private(PrivateComponents {
            n,
            e,
            d: required(&self.d, "d")?,
            p: required(&self.p, "p")?,
            q: required(&self.q, "q")?,
            dp: required(&self.dp, "dp")?,
            dq: required(&self.dq, "dq")?,
            qi: required(&self.qi, "qi")?,
        }))
    }

    /// 检查 JWK 自带的 `alg` / `ext` 与导入请求是否一致
    pub fn check_consistency(
        &self,
        name: AlgorithmName,
        hash: HashAlgorithm,
        extractable: bool,
    ) -> Result<()> {
        if let Some(alg) = self.alg.as_deref() {
            if jwk_alg(name, hash) != Some(alg) {
                return Err(Error::MalformedKeyData(format!(
                    "JWK alg \"{}\" does not match {} with {}",
                    alg, name, hash
                )));
            }
        }
        if self.ext == Some(false) && extractable {
            return Err(Error::MalformedKeyData(
                "JWK is marked non-extractable".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwk_serialization_field_names() {
        let jwk = JsonWebKey {
            alg: Some("RS256".to_string()),
            use_: Some("sig".to_string()),
            ext: Some(true),
            key_ops: Some(vec!["verify".to_string()]),
            ..JsonWebKey::from_public(&PublicComponents {
                n: vec![0xc5, 0x01],
                e: vec![0x01, 0x00, 0x01],
            })
        };
        let value = serde_json::to_value(&jwk).unwrap();
        assert_eq!(value["kty"], "RSA");
        assert_eq!(value["e"], "AQAB");
        assert_eq!(value["n"], "xQE");
        assert_eq!(value["use"], "sig");
        assert!(value.get("d").is_none());
    }

    #[test]
    fn test_private_detection_and_missing_fields() {
        let mut jwk: JsonWebKey =
            serde_json::from_str(r#"{"kty":"RSA","n":"xQE","e":"AQAB","d":"AQ"}"#).unwrap();
        assert!(jwk.is_private());
        match jwk.to_components() {
            Err(Error::MalformedKeyData(msg)) => assert!(msg.contains("\"p\"")),
            other => panic!("unexpected result: {:?}", other),
        }

        jwk.d = None;
        assert!(matches!(
            jwk.to_components().unwrap(),
            JwkComponents::Public(_)
        ));
    }

    #[test]
    fn test_kty_must_be_rsa() {
        let jwk: JsonWebKey = serde_json::from_str(r#"{"kty":"EC","n":"xQE","e":"AQAB"}"#).unwrap();
        assert!(matches!(jwk.to_components(), Err(Error::MalformedKeyData(_))));
        let jwk: JsonWebKey = serde_json::from_str(r#"{"n":"xQE","e":"AQAB"}"#).unwrap();
        assert!(jwk.to_components().is_err());
    }

    #[test]
    fn test_invalid_base64url_is_malformed() {
        let jwk: JsonWebKey =
            serde_json::from_str(r#"{"kty":"RSA","n":"x+Q/E=","e":"AQAB"}"#).unwrap();
        assert!(matches!(jwk.to_components(), Err(Error::MalformedKeyData(_))));
    }

    #[test]
    fn test_alg_mapping() {
        assert_eq!(
            jwk_alg(AlgorithmName::RsaOaep, HashAlgorithm::Sha256),
            Some("RSA-OAEP-256")
        );
        assert_eq!(jwk_alg(AlgorithmName::RsaPss, HashAlgorithm::Sha1), None);
        assert_eq!(jwk_alg(AlgorithmName::RsassaPkcs1v15, HashAlgorithm::Sha3_256), None);
    }

    #[test]
    fn test_consistency_checks() {
        let jwk = JsonWebKey {
            alg: Some("PS256".to_string()),
            ext: Some(false),
            ..Default::default()
        };
        assert!(
            jwk.check_consistency(AlgorithmName::RsaPss, HashAlgorithm::Sha256, false)
                .is_ok()
        );
        assert!(
            jwk.check_consistency(AlgorithmName::RsaPss, HashAlgorithm::Sha384, false)
                .is_err()
        );
        assert!(
            jwk.check_consistency(AlgorithmName::RsaPss, HashAlgorithm::Sha256, true)
                .is_err()
        );
    }
}
