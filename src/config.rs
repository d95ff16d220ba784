//!
//! # 配置模块
//!
//! `RsaConfig` 控制密钥生成的默认参数与上下限，以及 OAEP label 的处理策略。
//! 可以从 JSON 文件加载，也可以用 `SEAL_RSA_*` 环境变量覆盖。
//!
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RSA 配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RsaConfig {
    /// 生成描述未给出 `modulusLength` 时使用的位数
    pub default_modulus_length: u32,
    /// 生成描述未给出 `publicExponent` 时使用的指数（大端）
    #[serde(with = "serde_bytes")]
    pub default_public_exponent: Vec<u8>,
    /// 允许生成的最小模数位数
    pub min_modulus_length: u32,
    /// 允许生成的最大模数位数
    pub max_modulus_length: u32,
    /// 为 true 时，非空 OAEP label 直接报 `NotSupported`；否则记录警告后忽略
    pub strict_oaep_label: bool,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            default_modulus_length: 2048,
            default_public_exponent: vec![0x01, 0x00, 0x01],
            min_modulus_length: 512,
            max_modulus_length: 4096,
            strict_oaep_label: false,
        }
    }
}

fn env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Configuration(format!("invalid value for {}: {}", name, value))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Configuration(format!("{}: {}", name, e))),
    }
}

impl RsaConfig {
    /// 从 JSON 文件加载配置，缺失的字段取默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: RsaConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// 在默认配置上叠加环境变量
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// 使用 `SEAL_RSA_*` 环境变量覆盖当前值
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(bits) = env_var("SEAL_RSA_DEFAULT_MODULUS_LENGTH")? {
            self.default_modulus_length = bits;
        }
        if let Some(exponent) = env_var::<u32>("SEAL_RSA_DEFAULT_PUBLIC_EXPONENT")? {
            self.default_public_exponent =
                crate::utils::strip_leading_zeros(&exponent.to_be_bytes()).to_vec();
        }
        if let Some(bits) = env_var("SEAL_RSA_MIN_MODULUS_LENGTH")? {
            self.min_modulus_length = bits;
        }
        if let Some(bits) = env_var("SEAL_RSA_MAX_MODULUS_LENGTH")? {
            self.max_modulus_length = bits;
        }
        if let Some(strict) = env_var("SEAL_RSA_STRICT_OAEP_LABEL")? {
            self.strict_oaep_label = strict;
        }
        self.validate()?;
        Ok(self)
    }

    /// 检查各项取值是否自洽
    pub fn validate(&self) -> Result<()> {
        if self.min_modulus_length == 0 || self.min_modulus_length > self.max_modulus_length {
            return Err(Error::Configuration(format!(
                "invalid modulus length bounds [{}, {}]",
                self.min_modulus_length, self.max_modulus_length
            )));
        }
        if self.default_modulus_length % 8 != 0
            || self.default_modulus_length < self.min_modulus_length
            || self.default_modulus_length > self.max_modulus_length
        {
            return Err(Error::Configuration(format!(
                "default modulus length {} is not a multiple of 8 within bounds",
                self.default_modulus_length
            )));
        }
        if self.default_public_exponent.is_empty() {
            return Err(Error::Configuration(
                "default public exponent is empty".to_string(),
            ));
        }
        Ok(())
    }
}
