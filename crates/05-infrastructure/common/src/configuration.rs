//! 组件管理器配置

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "COMPONENT_MANAGER";

/// 组件管理器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// 是否启用循环依赖检测
    pub detect_cycles: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 是否安装默认的生命周期处理器（可初始化组件处理器）
    pub install_default_lifecycle_handlers: bool,
    /// 是否记录缓存命中
    pub log_cache_hits: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_resolution_depth: 64,
            install_default_lifecycle_handlers: true,
            log_cache_hits: false,
        }
    }
}

impl ManagerConfig {
    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置：配置文件 + `COMPONENT_MANAGER_` 前缀的环境变量
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;
        config.validate()?;

        tracing::debug!("加载组件管理器配置: {}", path.display());
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 转换为 JSON 值（用于诊断输出）
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
