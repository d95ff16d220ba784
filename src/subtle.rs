//! # 算法分派
//!
//! `SubtleRsa` 是面向调用方的统一入口，对应 WebCrypto `SubtleCrypto` 中与 RSA 相关的部分。
//! 算法描述在这里被解析为 `RsaParams`，然后连同密钥的 PEM 视图一起交给提供者。

use std::str::FromStr;

use crate::algorithm::{AlgorithmDescriptor, KeyFormat, RsaParams};
use crate::codec::{self, ExportedKey, KeyData};
use crate::config::RsaConfig;
use crate::error::{Error, Result};
use crate::generate;
use crate::key::{CryptoKey, KeyPair, KeyUsage, PrivateKey, PublicKey};
use crate::provider::{RsaProvider, RustCryptoProvider};

/// RSA 密钥管理与运算入口
#[derive(Debug, Clone, Default)]
pub struct SubtleRsa<P = RustCryptoProvider> {
    provider: P,
    config: RsaConfig,
}

impl SubtleRsa<RustCryptoProvider> {
    /// 使用 RustCrypto 提供者和默认配置
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: RsaProvider> SubtleRsa<P> {
    pub fn with_provider(provider: P, config: RsaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 生成密钥对
    pub fn generate_key_pair(
        &self,
        descriptor: &AlgorithmDescriptor,
        extractable: bool,
        usages: &[KeyUsage],
    ) -> Result<KeyPair> {
        generate::generate_key_pair(&self.provider, &self.config, descriptor, extractable, usages)
    }

    /// 导入密钥；`format` 不区分大小写
    pub fn import_key<'a>(
        &self,
        format: &str,
        data: impl Into<KeyData<'a>>,
        descriptor: &AlgorithmDescriptor,
        extractable: bool,
        usages: &[KeyUsage],
    ) -> Result<CryptoKey> {
        let format = KeyFormat::from_str(format)?;
        codec::import_key(&self.provider, format, data.into(), descriptor, extractable, usages)
    }

    /// 导出密钥；`format` 不区分大小写
    pub fn export_key(&self, format: &str, key: &CryptoKey) -> Result<ExportedKey> {
        let format = KeyFormat::from_str(format)?;
        codec::export_key(format, key)
    }

    /// 使用 RSASSA-PKCS1-v1_5 或 RSA-PSS 签名
    pub fn sign(
        &self,
        descriptor: &AlgorithmDescriptor,
        key: &PrivateKey,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let params = RsaParams::for_signature(descriptor, key.algorithm().hash)?;
        let padding = signature_padding(&params)?;
        let pem = key.pem()?;
        self.provider.sign(params.hash(), padding, pem, data)
    }

    /// 验签；签名不匹配返回 `Ok(false)`
    pub fn verify(
        &self,
        descriptor: &AlgorithmDescriptor,
        key: &PublicKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool> {
        let params = RsaParams::for_signature(descriptor, key.algorithm().hash)?;
        let padding = signature_padding(&params)?;
        let pem = key.pem()?;
        self.provider.verify(params.hash(), padding, pem, data, signature)
    }

    /// 使用 RSA-OAEP 加密
    pub fn encrypt(
        &self,
        descriptor: &AlgorithmDescriptor,
        key: &PublicKey,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let params = RsaParams::for_encryption(descriptor, key.algorithm().hash)?;
        self.check_label(&params)?;
        let pem = key.pem()?;
        self.provider.encrypt_oaep(params.hash(), pem, data)
    }

    /// 使用 RSA-OAEP 解密
    pub fn decrypt(
        &self,
        descriptor: &AlgorithmDescriptor,
        key: &PrivateKey,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let params = RsaParams::for_encryption(descriptor, key.algorithm().hash)?;
        self.check_label(&params)?;
        let pem = key.pem()?;
        self.provider.decrypt_oaep(params.hash(), pem, data)
    }

    /// 提供者只支持空 label
    fn check_label(&self, params: &RsaParams) -> Result<()> {
        let RsaParams::Oaep {
            label: Some(label), ..
        } = params
        else {
            return Ok(());
        };
        if label.is_empty() {
            return Ok(());
        }
        if self.config.strict_oaep_label {
            return Err(Error::NotSupported(
                "RSA-OAEP label is not supported by the provider".to_string(),
            ));
        }
        tracing::warn!(label_len = label.len(), "ignoring non-empty RSA-OAEP label");
        Ok(())
    }
}

fn signature_padding(params: &RsaParams) -> Result<crate::algorithm::SignaturePadding> {
    params
        .signature_padding()
        .ok_or_else(|| Error::UnrecognizedAlgorithm("not a signature algorithm".to_string()))
}
