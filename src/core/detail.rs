use crate::config::DetailConfig;
use crate::core::normalize;
use crate::core::retry::RetryPolicy;
use crate::core::sink::CsvSink;
use crate::core::{input, Pipeline, ProductRow, Result, RunSummary};
use crate::utils::error::EtlError;
use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// 產品詳情 API 的回應外殼：成功帶 `detail`，失敗帶 `message`，
/// 兩種情況都可能附上剩餘配額。
#[derive(Debug, Deserialize)]
struct DetailResponse {
    detail: Option<Value>,
    message: Option<String>,
    remaining_credits: Option<i64>,
}

pub struct DetailPipeline {
    config: DetailConfig,
    api_key: String,
    client: Client,
}

impl DetailPipeline {
    pub fn new(config: DetailConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            client: Client::new(),
        }
    }

    fn request_url(&self, asin: &str) -> Result<Url> {
        let product_url = format!("{}{}/", self.config.product_url_base, asin);
        Url::parse_with_params(
            &self.config.endpoint,
            [
                ("platform", self.config.platform.as_str()),
                ("url", product_url.as_str()),
                ("api_key", self.api_key.as_str()),
            ],
        )
        .map_err(|e| EtlError::ConfigError {
            message: format!("invalid detail endpoint: {}", e),
        })
    }

    /// 一個 ASIN 一次請求。回應沒有 `detail` 時視為抓取失敗。
    async fn fetch_product(&self, asin: &str) -> Result<(ProductRow, Option<i64>)> {
        let url = self.request_url(asin)?;
        let response: DetailResponse = self.client.get(url).send().await?.json().await?;
        tracing::debug!(
            "ASIN {}: detail={}, remaining_credits={:?}",
            asin,
            response.detail.is_some(),
            response.remaining_credits
        );

        match response.detail {
            Some(detail) => {
                let row = normalize::product_row(asin, &detail)?;
                Ok((row, response.remaining_credits))
            }
            None => Err(EtlError::ApiBodyError {
                message: response
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
        }
    }

    fn output_path(&self) -> std::path::PathBuf {
        self.config.output_dir.join(format!(
            "amazon_product_details_{}.csv",
            Local::now().format("%Y%m%d_%H%M")
        ))
    }
}

#[async_trait]
impl Pipeline for DetailPipeline {
    fn name(&self) -> &str {
        "detail"
    }

    async fn run(&self) -> Result<RunSummary> {
        let asins = input::read_tokens(&self.config.input_file, self.config.limit)?;
        tracing::info!(
            "Read {} ASINs from {}",
            asins.len(),
            self.config.input_file.display()
        );
        if self.config.limit > 0 {
            println!("Test mode: processing at most {} ASINs", self.config.limit);
        }

        let output_path = self.output_path();
        let mut sink = CsvSink::create(&output_path, self.config.flush_every)?;

        let retry = RetryPolicy::new(self.config.max_attempts, self.config.base_delay);
        let mut summary = RunSummary {
            attempted: asins.len(),
            output_path: output_path.display().to_string(),
            ..RunSummary::default()
        };

        for (i, asin) in asins.iter().enumerate() {
            println!("Processing {}/{}: ASIN {}", i + 1, asins.len(), asin);

            let fetched = retry
                .run(|_| self.fetch_product(asin), |d| tokio::time::sleep(d))
                .await;

            match fetched {
                Ok((row, credits)) => {
                    if credits.is_some() {
                        summary.remaining_credits = credits;
                    }
                    sink.write(&row)?;
                    summary.succeeded += 1;
                    println!("✓ Fetched data for ASIN {}", asin);
                }
                Err(e) => {
                    tracing::warn!("ASIN {} failed: {}", asin, e);
                    summary.failed_keys.push(asin.clone());
                    println!("✗ No data for ASIN {}", asin);
                }
            }

            if (i + 1) % 10 == 0 {
                println!("Progress: {}/{} ASINs processed", i + 1, asins.len());
            }

            // 固定請求間隔，成功失敗都等，避免觸發 API 限流
            tokio::time::sleep(self.config.request_delay).await;
        }

        summary.rows_written = sink.rows_written();
        sink.finish()?;

        Ok(summary)
    }
}
