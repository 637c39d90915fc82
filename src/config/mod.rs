pub mod credentials;
pub mod file;

use crate::config::file::{DetailOverrides, SearchOverrides};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "retail-etl")]
#[command(about = "Fetch e-commerce product data from aggregation APIs into CSV files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Optional TOML overrides file")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 依 ASIN 清單抓取產品詳情
    Detail(DetailArgs),
    /// 依關鍵字清單抓取搜尋結果
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    #[arg(long, default_value = "cable_asin_list.txt")]
    pub input: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = "0", help = "Process only the first N keys (0 = all)")]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, default_value = "homedepo_search_keywords.txt")]
    pub keywords: PathBuf,

    #[arg(long, default_value = "homedepo_search_results.csv")]
    pub output: PathBuf,

    #[arg(long, default_value = "0", help = "Process only the first N keywords (0 = all)")]
    pub limit: usize,

    #[arg(long, default_value = ".env", help = "Env file scanned for the API key fallback")]
    pub env_file: PathBuf,
}

/// 產品詳情管道的完整配置，以值傳入管道，測試時可任意替換
#[derive(Debug, Clone)]
pub struct DetailConfig {
    pub endpoint: String,
    pub platform: String,
    pub product_url_base: String,
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub limit: usize,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub request_delay: Duration,
    pub flush_every: usize,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://data.unwrangle.com/api/getter/".to_string(),
            platform: "amazon_detail".to_string(),
            product_url_base: "https://www.amazon.com/dp/".to_string(),
            input_file: PathBuf::from("cable_asin_list.txt"),
            output_dir: PathBuf::from("."),
            limit: 0,
            // 名為重試上限，但一次嘗試即放棄；維持原行為
            max_attempts: 1,
            base_delay: Duration::from_secs(1),
            request_delay: Duration::from_secs(1),
            flush_every: 10,
        }
    }
}

impl DetailConfig {
    pub fn resolve(args: &DetailArgs, overrides: Option<&DetailOverrides>) -> Self {
        let mut config = Self {
            input_file: args.input.clone(),
            output_dir: args.output_dir.clone(),
            limit: args.limit,
            ..Self::default()
        };

        if let Some(o) = overrides {
            if let Some(endpoint) = &o.endpoint {
                config.endpoint = endpoint.clone();
            }
            if let Some(platform) = &o.platform {
                config.platform = platform.clone();
            }
            if let Some(base) = &o.product_url_base {
                config.product_url_base = base.clone();
            }
            if let Some(max_attempts) = o.max_attempts {
                config.max_attempts = max_attempts;
            }
            if let Some(ms) = o.base_delay_ms {
                config.base_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = o.request_delay_ms {
                config.request_delay = Duration::from_millis(ms);
            }
            if let Some(flush_every) = o.flush_every {
                config.flush_every = flush_every;
            }
        }

        config
    }
}

impl Validate for DetailConfig {
    fn validate(&self) -> Result<()> {
        validate_url("detail.endpoint", &self.endpoint)?;
        validate_url("detail.product_url_base", &self.product_url_base)?;
        validate_non_empty_string("detail.platform", &self.platform)?;
        validate_positive_number("detail.max_attempts", self.max_attempts as usize, 1)?;
        validate_positive_number("detail.flush_every", self.flush_every, 1)?;
        Ok(())
    }
}

/// 關鍵字搜尋管道的完整配置
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub engine: String,
    pub keywords_file: PathBuf,
    pub output_file: PathBuf,
    pub limit: usize,
    pub page_size: usize,
    pub max_pages: usize,
    pub request_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search.json".to_string(),
            engine: "home_depot".to_string(),
            keywords_file: PathBuf::from("homedepo_search_keywords.txt"),
            output_file: PathBuf::from("homedepo_search_results.csv"),
            limit: 0,
            page_size: 24,
            max_pages: 3,
            request_delay: Duration::from_secs(1),
        }
    }
}

impl SearchConfig {
    pub fn resolve(args: &SearchArgs, overrides: Option<&SearchOverrides>) -> Self {
        let mut config = Self {
            keywords_file: args.keywords.clone(),
            output_file: args.output.clone(),
            limit: args.limit,
            ..Self::default()
        };

        if let Some(o) = overrides {
            if let Some(endpoint) = &o.endpoint {
                config.endpoint = endpoint.clone();
            }
            if let Some(engine) = &o.engine {
                config.engine = engine.clone();
            }
            if let Some(page_size) = o.page_size {
                config.page_size = page_size;
            }
            if let Some(max_pages) = o.max_pages {
                config.max_pages = max_pages;
            }
            if let Some(ms) = o.request_delay_ms {
                config.request_delay = Duration::from_millis(ms);
            }
        }

        config
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> Result<()> {
        validate_url("search.endpoint", &self.endpoint)?;
        validate_non_empty_string("search.engine", &self.engine)?;
        validate_positive_number("search.page_size", self.page_size, 1)?;
        validate_positive_number("search.max_pages", self.max_pages, 1)?;
        Ok(())
    }
}
