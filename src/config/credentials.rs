use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub const DETAIL_KEY: &str = "unwrangle.apikey";
pub const SEARCH_KEY: &str = "homedepot.apikey";

/// 載入 .env（若存在）後讀取產品詳情 API 金鑰。缺少時在任何請求之前中止。
pub fn detail_api_key() -> Result<String> {
    dotenvy::dotenv().ok();
    read_env(DETAIL_KEY).ok_or_else(|| EtlError::MissingCredentialError {
        key: DETAIL_KEY.to_string(),
    })
}

/// 搜尋金鑰：環境變數優先，讀不到時逐行掃描 env 檔找 `homedepot.apikey=` 前綴。
pub fn search_api_key(env_file: &Path) -> Result<String> {
    dotenvy::dotenv().ok();
    if let Some(key) = read_env(SEARCH_KEY) {
        return Ok(key);
    }
    scan_env_file(env_file, SEARCH_KEY)
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn scan_env_file(path: &Path, key: &str) -> Result<String> {
    let missing = || EtlError::MissingCredentialError {
        key: key.to_string(),
    };
    let content = std::fs::read_to_string(path).map_err(|_| missing())?;
    let prefix = format!("{}=", key);

    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(missing)
}
