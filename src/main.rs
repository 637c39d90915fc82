use clap::Parser;
use retail_etl::config::{credentials, file::FileConfig};
use retail_etl::domain::ports::Pipeline;
use retail_etl::utils::{logger, validation::Validate};
use retail_etl::{Cli, Command, DetailConfig, DetailPipeline, Engine, SearchConfig, SearchPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting retail-etl CLI");

    // 選填的 TOML 覆寫檔
    let overrides = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("❌ Failed to load config file: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    match &cli.command {
        Command::Detail(args) => {
            let config = DetailConfig::resolve(args, overrides.detail.as_ref());
            validate_or_exit(&config);
            if cli.verbose {
                tracing::debug!("Detail config: {:?}", config);
            }

            // 缺金鑰就在任何請求之前中止
            let api_key = match credentials::detail_api_key() {
                Ok(key) => key,
                Err(e) => {
                    tracing::error!("❌ {}", e);
                    eprintln!("❌ {}", e);
                    eprintln!("💡 Set {} in the .env file", credentials::DETAIL_KEY);
                    std::process::exit(1);
                }
            };

            run_pipeline(DetailPipeline::new(config, api_key)).await;
        }
        Command::Search(args) => {
            let config = SearchConfig::resolve(args, overrides.search.as_ref());
            validate_or_exit(&config);
            if cli.verbose {
                tracing::debug!("Search config: {:?}", config);
            }

            let api_key = match credentials::search_api_key(&args.env_file) {
                Ok(key) => key,
                Err(e) => {
                    tracing::error!("❌ {}", e);
                    eprintln!("❌ {}", e);
                    eprintln!(
                        "💡 Set {} in the environment or in {}",
                        credentials::SEARCH_KEY,
                        args.env_file.display()
                    );
                    std::process::exit(1);
                }
            };

            run_pipeline(SearchPipeline::new(config, api_key)).await;
        }
    }

    Ok(())
}

fn validate_or_exit<C: Validate>(config: &C) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run_pipeline<P: Pipeline>(pipeline: P) {
    let engine = Engine::new(pipeline);

    match engine.run().await {
        Ok(_) => {
            tracing::info!("✅ Run completed");
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {}", e);
            eprintln!("❌ {}", e);

            // 配置階段的錯誤以非零碼離開；個別項目的失敗
            // 只透過輸出文字與 CSV 內容呈現
            if e.is_fatal() {
                std::process::exit(1);
            }
        }
    }
}
