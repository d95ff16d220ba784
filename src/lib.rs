//! # Seal-RSA: WebCrypto 风格的 RSA 密钥管理
//!
//! `seal-rsa` 实现 RSA 家族（RSASSA-PKCS1-v1_5、RSA-PSS、RSA-OAEP）的密钥对象模型、
//! 格式编解码（`jwk` / `pkcs8` / `spki`，以及 PEM 文本）、算法分派与密钥对生成。
//! 底层的模幂运算、填充与素数生成交给 `RsaProvider`，默认使用 RustCrypto `rsa` crate。
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seal_rsa::prelude::*;
//!
//! fn main() -> seal_rsa::Result<()> {
//!     let subtle = SubtleRsa::new();
//!     let descriptor = AlgorithmDescriptor::new("RSA-PSS")
//!         .with_hash("SHA-256")
//!         .with_modulus_length(2048);
//!     let pair = subtle.generate_key_pair(&descriptor, true, &[KeyUsage::Sign, KeyUsage::Verify])?;
//!
//!     let params = AlgorithmDescriptor::new("RSA-PSS").with_salt_length(32);
//!     let signature = subtle.sign(&params, &pair.private_key, b"Hello, Seal-RSA!")?;
//!     assert!(subtle.verify(&params, &pair.public_key, &signature, b"Hello, Seal-RSA!")?);
//!
//!     let jwk = subtle.export_key("jwk", &CryptoKey::from(pair.public_key))?;
//!     println!("{}", serde_json::to_string(&jwk.into_jwk())?);
//!     Ok(())
//! }
//! ```

pub mod algorithm;
pub mod codec;
pub mod config;
#[cfg(feature = "async-engine")]
pub mod engine;
pub mod error;
pub mod generate;
pub mod key;
pub mod provider;
pub mod subtle;
pub mod utils;

pub use algorithm::{
    AlgorithmDescriptor, AlgorithmName, HashAlgorithm, KeyFormat, RsaParams, SignaturePadding,
};
pub use codec::jwk::JsonWebKey;
pub use codec::{ExportedKey, KeyData};
pub use config::RsaConfig;
#[cfg(feature = "async-engine")]
pub use engine::AsyncSubtleRsa;
pub use error::{Error, Result};
pub use key::{CryptoKey, KeyPair, KeyType, KeyUsage, PrivateKey, PublicKey, RsaHashedKeyAlgorithm};
pub use provider::{RsaProvider, RustCryptoProvider};
pub use subtle::SubtleRsa;
pub use utils::ZeroizingVec;

/// 常用类型
pub mod prelude {
    pub use crate::algorithm::{AlgorithmDescriptor, HashAlgorithm};
    pub use crate::codec::ExportedKey;
    pub use crate::key::{CryptoKey, KeyPair, KeyUsage, PrivateKey, PublicKey};
    pub use crate::subtle::SubtleRsa;
}

/// The version of the `seal-rsa` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
