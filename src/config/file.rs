use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML 覆寫檔。所有欄位皆為選填，只覆蓋有給的值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub detail: Option<DetailOverrides>,
    pub search: Option<SearchOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailOverrides {
    pub endpoint: Option<String>,
    pub platform: Option<String>,
    pub product_url_base: Option<String>,
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub flush_every: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOverrides {
    pub endpoint: Option<String>,
    pub engine: Option<String>,
    pub page_size: Option<usize>,
    pub max_pages: Option<usize>,
    pub request_delay_ms: Option<u64>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}
