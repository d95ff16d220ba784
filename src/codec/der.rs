//! SubjectPublicKeyInfo / PKCS#8 与 PKCS#1 结构之间的转换。
//!
//! 所有编码都重新序列化为规范 DER：算法标识固定为 rsaEncryption
//! (`1.2.840.113549.1.1.1`) 加 NULL 参数，整数为最短大端编码。

use rsa::pkcs1::{self, UintRef};
use rsa::pkcs8::der::asn1::BitStringRef;
use rsa::pkcs8::der::{Decode, Encode};
use rsa::pkcs8::{PrivateKeyInfo, SubjectPublicKeyInfoRef};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::utils::ZeroizingVec;

/// RSA 公钥字段（最短大端编码）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicComponents {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
}

/// RSA 私钥字段（最短大端编码），释放时清零
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateComponents {
    pub n: Vec<u8>,
    pub e: Vec<u8>,
    pub d: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub dp: Vec<u8>,
    pub dq: Vec<u8>,
    pub qi: Vec<u8>,
}

impl PrivateComponents {
    pub fn public(&self) -> PublicComponents {
        PublicComponents {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }
}

fn uint<'a>(bytes: &'a [u8], field: &str) -> Result<UintRef<'a>> {
    UintRef::new(bytes)
        .map_err(|e| Error::MalformedKeyData(format!("invalid integer field {}: {}", field, e)))
}

fn check_oid(oid: &pkcs1::ObjectIdentifier) -> Result<()> {
    if *oid != pkcs1::ALGORITHM_OID {
        return Err(Error::MalformedKeyData(format!(
            "algorithm identifier {} is not rsaEncryption",
            oid
        )));
    }
    Ok(())
}

/// 将公钥字段编码为规范 SubjectPublicKeyInfo
pub fn encode_spki(components: &PublicComponents) -> Result<Vec<u8>> {
    let rsa_public_key = pkcs1::RsaPublicKey {
        modulus: uint(&components.n, "n")?,
        public_exponent: uint(&components.e, "e")?,
    };
    let pkcs1_der = rsa_public_key.to_der()?;
    let spki = SubjectPublicKeyInfoRef {
        algorithm: pkcs1::ALGORITHM_ID,
        subject_public_key: BitStringRef::from_bytes(&pkcs1_der)?,
    };
    Ok(spki.to_der()?)
}

/// 解析 SubjectPublicKeyInfo 并取出内层 RSAPublicKey 字段
pub fn decode_spki(der: &[u8]) -> Result<PublicComponents> {
    let spki = SubjectPublicKeyInfoRef::from_der(der)
        .map_err(|e| Error::MalformedKeyData(format!("invalid SubjectPublicKeyInfo: {}", e)))?;
    check_oid(&spki.algorithm.oid)?;

    let pkcs1_der = spki.subject_public_key.as_bytes().ok_or_else(|| {
        Error::MalformedKeyData("subjectPublicKey has unused bits".to_string())
    })?;
    let rsa_public_key = pkcs1::RsaPublicKey::from_der(pkcs1_der)
        .map_err(|e| Error::MalformedKeyData(format!("invalid RSAPublicKey: {}", e)))?;

    Ok(PublicComponents {
        n: rsa_public_key.modulus.as_bytes().to_vec(),
        e: rsa_public_key.public_exponent.as_bytes().to_vec(),
    })
}

/// 将私钥字段编码为规范 PKCS#8 PrivateKeyInfo
pub fn encode_pkcs8(components: &PrivateComponents) -> Result<ZeroizingVec> {
    let rsa_private_key = pkcs1::RsaPrivateKey {
        modulus: uint(&components.n, "n")?,
        public_exponent: uint(&components.e, "e")?,
        private_exponent: uint(&components.d, "d")?,
        prime1: uint(&components.p, "p")?,
        prime2: uint(&components.q, "q")?,
        exponent1: uint(&components.dp, "dp")?,
        exponent2: uint(&components.dq, "dq")?,
        coefficient: uint(&components.qi, "qi")?,
        other_prime_infos: None,
    };
    let pkcs1_der = ZeroizingVec(rsa_private_key.to_der()?);
    let private_key_info = PrivateKeyInfo::new(pkcs1::ALGORITHM_ID, &pkcs1_der);
    Ok(ZeroizingVec(private_key_info.to_der()?))
}

/// 解析 PKCS#8 PrivateKeyInfo 并取出内层 RSAPrivateKey 字段
pub fn decode_pkcs8(der: &[u8]) -> Result<PrivateComponents> {
    let private_key_info = PrivateKeyInfo::from_der(der)
        .map_err(|e| Error::MalformedKeyData(format!("invalid PrivateKeyInfo: {}", e)))?;
    check_oid(&private_key_info.algorithm.oid)?;

    let key = pkcs1::RsaPrivateKey::from_der(private_key_info.private_key)
        .map_err(|e| Error::MalformedKeyData(format!("invalid RSAPrivateKey: {}", e)))?;
    if key.other_prime_infos.is_some() {
        return Err(Error::MalformedKeyData(
            "multi-prime RSA keys are not supported".to_string(),
        ));
    }

    Ok(PrivateComponents {
        n: key.modulus.as_bytes().to_vec(),
        e: key.public_exponent.as_bytes().to_vec(),
        d: key.private_exponent.as_bytes().to_vec(),
        p: key.prime1.as_bytes().to_vec(),
        q: key.prime2.as_bytes().to_vec(),
        dp: key.exponent1.as_bytes().to_vec(),
        dq: key.exponent2.as_bytes().to_vec(),
        qi: key.coefficient.as_bytes().to_vec(),
    })
}

/// 由 PKCS#8 私钥派生对应的 SubjectPublicKeyInfo
pub fn public_from_private(pkcs8: &[u8]) -> Result<Vec<u8>> {
    let components = decode_pkcs8(pkcs8)?;
    encode_spki(&components.public())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_private() -> PrivateComponents {
        // 教科书 RSA 参数：p = 61, q = 53, n = 3233, e = 17, d = 2753
        PrivateComponents {
            n: vec![0x0c, 0xa1],
            e: vec![0x11],
            d: vec![0x0a, 0xc1],
            p: vec![0x3d],
            q: vec![0x35],
            dp: vec![0x35],
            dq: vec![0x31],
            qi: vec![0x26],
        }
    }

    #[test]
    fn test_spki_structure() {
        let components = PublicComponents {
            n: vec![0xc5, 0x01],
            e: vec![0x01, 0x00, 0x01],
        };
        let der = encode_spki(&components).unwrap();
        // SEQUENCE { SEQUENCE { OID rsaEncryption, NULL }, BIT STRING { ... } }
        let algorithm_id = [
            0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05,
            0x00,
        ];
        assert_eq!(der[0], 0x30);
        assert_eq!(&der[2..2 + algorithm_id.len()], &algorithm_id);
        assert_eq!(decode_spki(&der).unwrap(), components);
    }

    #[test]
    fn test_pkcs8_fields_survive_reencoding() {
        let components = toy_private();
        let der = encode_pkcs8(&components).unwrap();
        let decoded = decode_pkcs8(&der).unwrap();
        assert_eq!(decoded, components);
        assert_eq!(encode_pkcs8(&decoded).unwrap(), der);
    }

    #[test]
    fn test_public_from_private() {
        let der = encode_pkcs8(&toy_private()).unwrap();
        let spki = public_from_private(&der).unwrap();
        assert_eq!(
            decode_spki(&spki).unwrap(),
            PublicComponents {
                n: vec![0x0c, 0xa1],
                e: vec![0x11]
            }
        );
    }

    #[test]
    fn test_decode_rejects_garbage_and_truncation() {
        assert!(matches!(
            decode_spki(b"not der"),
            Err(Error::MalformedKeyData(_))
        ));
        let der = encode_pkcs8(&toy_private()).unwrap();
        assert!(matches!(
            decode_pkcs8(&der[..der.len() - 1]),
            Err(Error::MalformedKeyData(_))
        ));
        // 公钥记录不能当作私钥解析
        let spki = public_from_private(&der).unwrap();
        assert!(decode_pkcs8(&spki).is_err());
    }
}
