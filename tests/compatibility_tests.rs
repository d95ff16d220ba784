//!
//! 兼容性测试
//!
//! 验证同一把密钥经由不同格式（DER、PEM、JWK）导入后行为一致，
//! 以及对外部生成的非规范编码的容忍度。
//!

mod common;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rstest::rstest;
use seal_rsa::{AlgorithmDescriptor, CryptoKey, Error, JsonWebKey, KeyUsage, SubtleRsa};

use common::{ALL_USAGES, signing_descriptor, signing_pair};

fn export_jwk(key: CryptoKey) -> JsonWebKey {
    SubtleRsa::new()
        .export_key("jwk", &key)
        .unwrap()
        .into_jwk()
        .unwrap()
}

#[test]
fn test_keys_imported_from_different_formats_interoperate() {
    let subtle = SubtleRsa::new();
    let pair = signing_pair();
    let descriptor = signing_descriptor();

    let private_jwk = export_jwk(pair.private_key.clone().into());
    let from_jwk = subtle
        .import_key("jwk", &private_jwk, &descriptor, true, &[KeyUsage::Sign])
        .unwrap()
        .into_private()
        .unwrap();

    let spki = pair.public_key.der().to_vec();
    let from_spki = subtle
        .import_key("spki", &spki, &descriptor, true, &[KeyUsage::Verify])
        .unwrap()
        .into_public()
        .unwrap();

    let signature = subtle.sign(&descriptor, &from_jwk, b"interop").unwrap();
    assert!(subtle.verify(&descriptor, &from_spki, &signature, b"interop").unwrap());
    assert!(subtle.verify(&descriptor, &pair.public_key, &signature, b"interop").unwrap());
}

#[rstest]
#[case("spki")]
#[case("pkcs8")]
fn test_pem_text_import_matches_der(#[case] format: &str) {
    let subtle = SubtleRsa::new();
    let pair = signing_pair();
    let key: CryptoKey = if format == "spki" {
        pair.public_key.clone().into()
    } else {
        pair.private_key.clone().into()
    };

    let pem = key.to_pem().unwrap().to_string();
    let imported = subtle
        .import_key(format, pem.as_bytes(), &signing_descriptor(), true, &ALL_USAGES)
        .unwrap();
    assert_eq!(imported.der(), key.der());
    assert_eq!(imported.to_pem().unwrap(), pem);
}

#[test]
fn test_pem_label_must_match_format() {
    let subtle = SubtleRsa::new();
    let pem = signing_pair().private_key.pem().unwrap().to_string();
    assert!(matches!(
        subtle.import_key("spki", pem.as_bytes(), &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));
}

#[test]
fn test_pem_wraps_at_64_columns() {
    let pem = signing_pair().public_key.pem().unwrap();
    let mut lines = pem.lines();
    assert_eq!(lines.next(), Some("-----BEGIN PUBLIC KEY-----"));
    let body: Vec<&str> = lines.take_while(|line| !line.starts_with("-----END")).collect();
    assert!(body.iter().all(|line| line.len() <= 64));
    assert!(body[..body.len() - 1].iter().all(|line| line.len() == 64));
}

#[test]
fn test_derived_public_key_matches_generated() {
    let pair = signing_pair();
    let derived = pair.private_key.to_public_key(&[KeyUsage::Verify]).unwrap();
    assert_eq!(derived.der(), pair.public_key.der());
    assert_eq!(derived.algorithm(), pair.public_key.algorithm());
    assert_eq!(derived.usages(), &[KeyUsage::Verify]);
}

#[test]
fn test_non_canonical_jwk_is_normalized() {
    let subtle = SubtleRsa::new();
    let pair = signing_pair();
    let mut jwk = export_jwk(pair.public_key.clone().into());

    // 外部实现可能给整数字段补上前导零
    let mut n = URL_SAFE_NO_PAD.decode(jwk.n.as_deref().unwrap()).unwrap();
    n.insert(0, 0x00);
    jwk.n = Some(URL_SAFE_NO_PAD.encode(&n));
    jwk.e = Some(URL_SAFE_NO_PAD.encode([0x00, 0x01, 0x00, 0x01]));
    jwk.alg = None;
    jwk.key_ops = None;
    jwk.ext = None;

    let imported = subtle
        .import_key("jwk", &jwk, &signing_descriptor(), true, &[KeyUsage::Verify])
        .unwrap();
    assert_eq!(imported.der(), pair.public_key.der());
    assert_eq!(imported.algorithm().modulus_length, 1024);
    assert_eq!(imported.algorithm().public_exponent, vec![0x01, 0x00, 0x01]);

    let reexported = export_jwk(imported);
    assert_eq!(
        reexported.n,
        export_jwk(pair.public_key.clone().into()).n
    );
    assert_eq!(reexported.e.as_deref(), Some("AQAB"));
}

#[test]
fn test_jwk_json_text_import() {
    let subtle = SubtleRsa::new();
    let pair = signing_pair();
    let json = serde_json::to_vec(&export_jwk(pair.public_key.clone().into())).unwrap();
    let imported = subtle
        .import_key("JWK", &json, &signing_descriptor(), true, &[KeyUsage::Verify])
        .unwrap();
    assert_eq!(imported.der(), pair.public_key.der());
}

#[test]
fn test_jwk_consistency_checks() {
    let subtle = SubtleRsa::new();
    let pair = signing_pair();
    let jwk = export_jwk(pair.public_key.clone().into());

    // alg 是 RS256，与 RSA-PSS 不符
    let pss = AlgorithmDescriptor::new("RSA-PSS").with_hash("SHA-256");
    assert!(matches!(
        subtle.import_key("jwk", &jwk, &pss, true, &[]),
        Err(Error::MalformedKeyData(_))
    ));

    let mut locked = jwk.clone();
    locked.ext = Some(false);
    assert!(matches!(
        subtle.import_key("jwk", &locked, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));
    assert!(
        subtle
            .import_key("jwk", &locked, &signing_descriptor(), false, &[])
            .is_ok()
    );

    let mut wrong_kty = jwk.clone();
    wrong_kty.kty = "EC".to_string();
    assert!(matches!(
        subtle.import_key("jwk", &wrong_kty, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));

    let mut missing_e = jwk;
    missing_e.e = None;
    assert!(matches!(
        subtle.import_key("jwk", &missing_e, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(message)) if message.contains("\"e\"")
    ));
}

#[test]
fn test_private_jwk_missing_crt_field() {
    let subtle = SubtleRsa::new();
    let mut jwk = export_jwk(signing_pair().private_key.clone().into());
    jwk.qi = None;
    assert!(matches!(
        subtle.import_key("jwk", &jwk, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(message)) if message.contains("\"qi\"")
    ));
}

#[test]
fn test_inconsistent_private_key_is_rejected() {
    let subtle = SubtleRsa::new();
    let mut jwk = export_jwk(signing_pair().private_key.clone().into());
    let mut d = URL_SAFE_NO_PAD.decode(jwk.d.as_deref().unwrap()).unwrap();
    let last = d.len() - 1;
    d[last] ^= 0x02;
    jwk.d = Some(URL_SAFE_NO_PAD.encode(&d));
    assert!(matches!(
        subtle.import_key("jwk", &jwk, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));
}

#[rstest]
#[case("dp")]
#[case("dq")]
#[case("qi")]
fn test_inconsistent_crt_field_is_rejected(#[case] field: &str) {
    let subtle = SubtleRsa::new();
    let mut jwk = export_jwk(signing_pair().private_key.clone().into());
    let slot = match field {
        "dp" => &mut jwk.dp,
        "dq" => &mut jwk.dq,
        _ => &mut jwk.qi,
    };
    let mut value = URL_SAFE_NO_PAD.decode(slot.as_deref().unwrap()).unwrap();
    let last = value.len() - 1;
    value[last] ^= 0x01;
    *slot = Some(URL_SAFE_NO_PAD.encode(&value));

    assert!(matches!(
        subtle.import_key("jwk", &jwk, &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));

    // 同样的篡改经由 pkcs8 导入也会被拒绝
    let der = seal_rsa::codec::der::encode_pkcs8(&match jwk.to_components().unwrap() {
        seal_rsa::codec::jwk::JwkComponents::Private(components) => components,
        seal_rsa::codec::jwk::JwkComponents::Public(_) => unreachable!(),
    })
    .unwrap();
    assert!(matches!(
        subtle.import_key("pkcs8", der.as_ref(), &signing_descriptor(), true, &[]),
        Err(Error::MalformedKeyData(_))
    ));
}
