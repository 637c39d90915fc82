use httpmock::prelude::*;
use retail_etl::config::SearchConfig;
use retail_etl::{Engine, SearchPipeline};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn test_config(server: &MockServer, keywords: &Path, output: &Path) -> SearchConfig {
    SearchConfig {
        endpoint: server.url("/search.json"),
        keywords_file: keywords.to_path_buf(),
        output_file: output.to_path_buf(),
        request_delay: Duration::ZERO,
        ..SearchConfig::default()
    }
}

fn products(count: usize, label: &str) -> serde_json::Value {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "title": format!("{} {}", label, i),
                "price": 9.99,
                "delivery": {"free": true},
                "pickup": {"store_name": "Midtown", "quantity": 3}
            })
        })
        .collect();
    serde_json::json!(items)
}

#[tokio::test]
async fn test_keyword_pages_walk_the_offset_window() {
    let temp_dir = TempDir::new().unwrap();
    let keywords = temp_dir.path().join("kw.txt");
    std::fs::write(&keywords, "hammer\n").unwrap();
    let output = temp_dir.path().join("results.csv");

    let server = MockServer::start();
    let next = serde_json::json!({"next": "https://serpapi.com/search.json?nao=next"});

    // 第 1、2 頁都還有下一頁，第 3 頁觸及頁數上限
    let page1 = server.mock(|when, then| {
        when.method(GET).path("/search.json").query_param("nao", "0");
        then.status(200).json_body(serde_json::json!({
            "products": products(24, "p1"), "serpapi_pagination": next.clone()
        }));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/search.json").query_param("nao", "24");
        then.status(200).json_body(serde_json::json!({
            "products": products(24, "p2"), "serpapi_pagination": next.clone()
        }));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path("/search.json").query_param("nao", "48");
        then.status(200).json_body(serde_json::json!({
            "products": products(10, "p3"), "serpapi_pagination": next.clone()
        }));
    });

    let config = test_config(&server, &keywords, &output);
    let engine = Engine::new(SearchPipeline::new(config, "k".to_string()));

    let summary = engine.run().await.unwrap();

    page1.assert();
    page2.assert();
    page3.assert();
    assert_eq!(summary.rows_written, 58);
    assert_eq!(summary.succeeded, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 59); // header + 58 rows
}

#[tokio::test]
async fn test_two_keywords_share_one_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let keywords = temp_dir.path().join("kw.txt");
    std::fs::write(&keywords, "hammer\ncircular saw\n").unwrap();
    let output = temp_dir.path().join("results.csv");

    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/search.json")
            .query_param("engine", "home_depot")
            .query_param("q", "hammer")
            .query_param("api_key", "k")
            .query_param("page_size", "24");
        then.status(200)
            .json_body(serde_json::json!({"products": products(2, "hammer")}));
    });
    let second = server.mock(|when, then| {
        when.method(GET).path("/search.json").query_param("q", "circular saw");
        then.status(200)
            .json_body(serde_json::json!({"products": products(1, "saw")}));
    });

    let config = test_config(&server, &keywords, &output);
    let engine = Engine::new(SearchPipeline::new(config, "k".to_string()));

    let summary = engine.run().await.unwrap();

    first.assert();
    second.assert();
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.rows_written, 3);

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 rows
    assert_eq!(
        lines[0],
        "keyword,title,link,price,unit,rating,reviews,model_number,brand,\
         delivery_free,store_name,in_stock_quantity"
    );
    assert!(lines[1].starts_with("hammer,hammer 0,"));
    assert!(lines[3].starts_with("circular saw,saw 0,"));

    // 巢狀 delivery/pickup 欄位攤平進列尾
    assert!(lines[1].ends_with("true,Midtown,3"));
}

#[tokio::test]
async fn test_keyword_limit_caps_processing() {
    let temp_dir = TempDir::new().unwrap();
    let keywords = temp_dir.path().join("kw.txt");
    std::fs::write(&keywords, "a\nb\nc\n").unwrap();
    let output = temp_dir.path().join("results.csv");

    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET).path("/search.json");
        then.status(200)
            .json_body(serde_json::json!({"products": products(1, "x")}));
    });

    let mut config = test_config(&server, &keywords, &output);
    config.limit = 1;
    let engine = Engine::new(SearchPipeline::new(config, "k".to_string()));

    let summary = engine.run().await.unwrap();

    any.assert_hits(1);
    assert_eq!(summary.attempted, 1);
    assert_eq!(summary.rows_written, 1);
}
