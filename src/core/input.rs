use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// 整份檔案以空白切分。ASIN 清單可以用空白或換行分隔。
pub fn read_tokens(path: &Path, limit: usize) -> Result<Vec<String>> {
    let content = read_input(path)?;
    let keys = content.split_whitespace().map(str::to_string).collect();
    Ok(apply_limit(keys, limit))
}

/// 一行一個關鍵字，修剪前後空白並略過空行。關鍵字本身可含空格。
pub fn read_lines(path: &Path, limit: usize) -> Result<Vec<String>> {
    let content = read_input(path)?;
    let keys = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    Ok(apply_limit(keys, limit))
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| EtlError::InputFileError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// limit 為 0 表示全部處理
fn apply_limit(mut keys: Vec<String>, limit: usize) -> Vec<String> {
    if limit > 0 && keys.len() > limit {
        keys.truncate(limit);
    }
    keys
}
