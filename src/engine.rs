#![cfg(feature = "async-engine")]
//! # 异步引擎
//!
//! RSA 运算是纯 CPU 计算，`AsyncSubtleRsa` 把每次调用放到 tokio 的阻塞线程池上执行，
//! 避免占用异步运行时的工作线程。密钥通过 `Arc` 共享，PEM 缓存可被多个任务并发填充。

use std::sync::Arc;

use crate::algorithm::AlgorithmDescriptor;
use crate::codec::ExportedKey;
use crate::config::RsaConfig;
use crate::error::{Error, Result};
use crate::key::{CryptoKey, KeyPair, KeyUsage, PrivateKey, PublicKey};
use crate::provider::{RsaProvider, RustCryptoProvider};
use crate::subtle::SubtleRsa;

/// 并发版 RSA 入口，可被多个任务同时调用
pub struct AsyncSubtleRsa<P = RustCryptoProvider> {
    inner: Arc<SubtleRsa<P>>,
}

impl<P> Clone for AsyncSubtleRsa<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AsyncSubtleRsa<RustCryptoProvider> {
    pub fn new() -> Self {
        Self::from_subtle(SubtleRsa::new())
    }
}

impl Default for AsyncSubtleRsa<RustCryptoProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RsaProvider + 'static> AsyncSubtleRsa<P> {
    pub fn with_provider(provider: P, config: RsaConfig) -> Result<Self> {
        Ok(Self::from_subtle(SubtleRsa::with_provider(provider, config)?))
    }

    pub fn from_subtle(subtle: SubtleRsa<P>) -> Self {
        Self {
            inner: Arc::new(subtle),
        }
    }

    /// 同步入口
    pub fn subtle(&self) -> &SubtleRsa<P> {
        &self.inner
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SubtleRsa<P>) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(inner.as_ref()))
            .await
            .map_err(|e| Error::TaskJoin(e.to_string()))?
    }

    pub async fn generate_key_pair(
        &self,
        descriptor: AlgorithmDescriptor,
        extractable: bool,
        usages: Vec<KeyUsage>,
    ) -> Result<KeyPair> {
        self.run(move |subtle| subtle.generate_key_pair(&descriptor, extractable, &usages))
            .await
    }

    pub async fn import_key(
        &self,
        format: String,
        data: Vec<u8>,
        descriptor: AlgorithmDescriptor,
        extractable: bool,
        usages: Vec<KeyUsage>,
    ) -> Result<CryptoKey> {
        self.run(move |subtle| {
            subtle.import_key(&format, &data, &descriptor, extractable, &usages)
        })
        .await
    }

    pub async fn export_key(&self, format: String, key: Arc<CryptoKey>) -> Result<ExportedKey> {
        self.run(move |subtle| subtle.export_key(&format, &key)).await
    }

    pub async fn sign(
        &self,
        descriptor: AlgorithmDescriptor,
        key: Arc<PrivateKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run(move |subtle| subtle.sign(&descriptor, &key, &data))
            .await
    }

    pub async fn verify(
        &self,
        descriptor: AlgorithmDescriptor,
        key: Arc<PublicKey>,
        signature: Vec<u8>,
        data: Vec<u8>,
    ) -> Result<bool> {
        self.run(move |subtle| subtle.verify(&descriptor, &key, &signature, &data))
            .await
    }

    pub async fn encrypt(
        &self,
        descriptor: AlgorithmDescriptor,
        key: Arc<PublicKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run(move |subtle| subtle.encrypt(&descriptor, &key, &data))
            .await
    }

    pub async fn decrypt(
        &self,
        descriptor: AlgorithmDescriptor,
        key: Arc<PrivateKey>,
        data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        self.run(move |subtle| subtle.decrypt(&descriptor, &key, &data))
            .await
    }
}
