use crate::utils::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// CSV 輸出端。表頭狀態由 writer 自己持有：第一次寫入時輸出一次表頭，
/// 之後同一個 sink 的所有寫入都只追加資料列。
///
/// `flush_every` 大於 0 時每寫滿該列數沖寫一次緩衝；中途中止時
/// 已沖寫的部分輸出仍然完整可用。
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
    flush_every: usize,
}

impl CsvSink<File> {
    /// 建立（必要時覆蓋）輸出檔
    pub fn create(path: &Path, flush_every: usize) -> Result<Self> {
        let writer = csv::WriterBuilder::new().has_headers(true).from_path(path)?;
        Ok(Self {
            writer,
            rows_written: 0,
            flush_every,
        })
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W, flush_every: usize) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(true).from_writer(inner),
            rows_written: 0,
            flush_every,
        }
    }

    pub fn write<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        if self.flush_every > 0 && self.rows_written % self.flush_every == 0 {
            self.writer.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// 收尾：沖寫緩衝並釋放檔案。csv writer 在 drop 時也會沖寫,
    /// 但這裡把錯誤回報給呼叫端。
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
