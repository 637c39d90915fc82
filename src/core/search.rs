use crate::config::SearchConfig;
use crate::core::normalize;
use crate::core::sink::CsvSink;
use crate::core::{input, Pipeline, Result, RunSummary};
use crate::utils::error::EtlError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Value>,
    serpapi_pagination: Option<SerpApiPagination>,
}

#[derive(Debug, Deserialize)]
struct SerpApiPagination {
    next: Option<String>,
}

impl SearchResponse {
    fn has_next(&self) -> bool {
        self.serpapi_pagination
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .is_some()
    }
}

pub struct SearchPipeline {
    config: SearchConfig,
    api_key: String,
    client: Client,
}

impl SearchPipeline {
    pub fn new(config: SearchConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            client: Client::new(),
        }
    }

    fn request_url(&self, keyword: &str, page: usize) -> Result<Url> {
        // 第 N 頁的位移是 (N-1) × page_size，第一頁為 0
        let nao = ((page - 1) * self.config.page_size).to_string();
        let page_size = self.config.page_size.to_string();

        Url::parse_with_params(
            &self.config.endpoint,
            [
                ("engine", self.config.engine.as_str()),
                ("q", keyword),
                ("api_key", self.api_key.as_str()),
                ("nao", nao.as_str()),
                ("page_size", page_size.as_str()),
            ],
        )
        .map_err(|e| EtlError::ConfigError {
            message: format!("invalid search endpoint: {}", e),
        })
    }

    async fn fetch_page(&self, keyword: &str, page: usize) -> Result<SearchResponse> {
        let url = self.request_url(keyword, page)?;
        let response: SearchResponse = self.client.get(url).send().await?.json().await?;
        Ok(response)
    }
}

#[async_trait]
impl Pipeline for SearchPipeline {
    fn name(&self) -> &str {
        "search"
    }

    async fn run(&self) -> Result<RunSummary> {
        let keywords = input::read_lines(&self.config.keywords_file, self.config.limit)?;
        tracing::info!(
            "Read {} keywords from {}",
            keywords.len(),
            self.config.keywords_file.display()
        );

        // 整個執行共用同一個 sink：開檔時覆蓋舊結果，表頭只寫一次，
        // 之後每一頁、每個關鍵字都是追加
        let mut sink = CsvSink::create(&self.config.output_file, 0)?;
        let mut summary = RunSummary {
            attempted: keywords.len(),
            output_path: self.config.output_file.display().to_string(),
            ..RunSummary::default()
        };

        for keyword in &keywords {
            println!("Searching: {}", keyword);
            let mut keyword_rows = 0usize;
            let mut page_failed = false;

            for page in 1..=self.config.max_pages {
                println!("  Fetching page {}...", page);

                let response = match self.fetch_page(keyword, page).await {
                    Ok(response) => response,
                    Err(e) => {
                        // 失敗的頁面直接結束這個關鍵字的分頁，不重試
                        tracing::warn!("Keyword '{}' page {} failed: {}", keyword, page, e);
                        page_failed = true;
                        tokio::time::sleep(self.config.request_delay).await;
                        break;
                    }
                };

                let rows = normalize::search_rows(keyword, &response.products);
                if rows.is_empty() {
                    println!("  No products found for '{}'", keyword);
                }
                for row in &rows {
                    sink.write(row)?;
                }
                sink.flush()?;
                keyword_rows += rows.len();

                let stop = rows.is_empty() || !response.has_next();
                tokio::time::sleep(self.config.request_delay).await;
                if stop {
                    break;
                }
            }

            summary.rows_written += keyword_rows;
            if page_failed {
                summary.failed_keys.push(keyword.clone());
            } else {
                summary.succeeded += 1;
            }
            println!(
                "Saved {} results for '{}' to {}",
                keyword_rows,
                keyword,
                self.config.output_file.display()
            );
        }

        sink.finish()?;
        Ok(summary)
    }
}
