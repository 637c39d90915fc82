use crate::domain::model::{ProductRow, SearchRow};
use crate::utils::error::Result;
use serde_json::Value;

/// 描述欄位的字元上限，超出時截斷並補上 `...` 標記
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// 把一筆成功的產品詳情攤平成固定 18 欄的輸出列。
/// 缺少的欄位一律先補空字串 / 空清單 / 空結構再格式化。
pub fn product_row(asin: &str, detail: &Value) -> Result<ProductRow> {
    Ok(ProductRow {
        asin: asin.to_string(),
        name: scalar(detail, "name"),
        brand: scalar(detail, "brand"),
        url: scalar(detail, "url"),
        price: scalar(detail, "price"),
        price_reduced: scalar(detail, "price_reduced"),
        rating: scalar(detail, "rating"),
        review_count: scalar(detail, "total_ratings"),
        availability: detail.get("in_stock").and_then(Value::as_bool).unwrap_or(true),
        category: join_names(detail, "categories"),
        bullet_points: join_strings(detail, "features"),
        description: truncate_text(
            detail.get("description").and_then(Value::as_str).unwrap_or(""),
            DESCRIPTION_MAX_CHARS,
        ),
        product_dimensions: serde_json::to_string(details_value(detail, "Product Dimensions"))?,
        product_specifications: json_cell(detail, "details_table")?,
        product_weight: details_value(detail, "Item Weight").to_string(),
        main_image_url: scalar(detail, "main_image"),
        whats_in_box: join_strings(detail, "whats_in_box"),
        variant_data: json_cell(detail, "variants")?,
    })
}

/// 一頁搜尋結果攤平成輸出列；沒有產品就是零列，不是錯誤。
pub fn search_rows(keyword: &str, products: &[Value]) -> Vec<SearchRow> {
    products
        .iter()
        .map(|product| search_row(keyword, product))
        .collect()
}

fn search_row(keyword: &str, product: &Value) -> SearchRow {
    let delivery_free = match product.get("delivery") {
        Some(Value::Object(delivery)) => {
            delivery.get("free").and_then(Value::as_bool).unwrap_or(false)
        }
        Some(other) => {
            tracing::debug!("Unexpected delivery shape, defaulting: {}", other);
            false
        }
        None => false,
    };

    let (store_name, in_stock_quantity) = match product.get("pickup") {
        Some(Value::Object(pickup)) => (
            pickup
                .get("store_name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            pickup.get("quantity").and_then(quantity_as_i64).unwrap_or(0),
        ),
        Some(other) => {
            tracing::debug!("Unexpected pickup shape, defaulting: {}", other);
            (String::new(), 0)
        }
        None => (String::new(), 0),
    };

    SearchRow {
        keyword: keyword.to_string(),
        title: scalar(product, "title"),
        link: scalar(product, "link"),
        price: scalar(product, "price"),
        unit: scalar(product, "unit"),
        rating: scalar(product, "rating"),
        reviews: scalar(product, "reviews"),
        model_number: scalar(product, "model_number"),
        brand: scalar(product, "brand"),
        delivery_free,
        store_name,
        in_stock_quantity,
    }
}

// API 對同一欄位有時回字串有時回數字，一律轉成字串存進 CSV
fn scalar(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn join_strings(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default()
}

// categories 形如 [{"name": "...", ...}, ...]
fn join_names(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.get("name").and_then(Value::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default()
}

// details_table 形如 [{"name": "...", "value": "..."}, ...]；取第一個同名項的值
fn details_value<'a>(detail: &'a Value, name: &str) -> &'a str {
    detail
        .get("details_table")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .find(|item| item.get("name").and_then(Value::as_str) == Some(name))
        })
        .and_then(|item| item.get("value"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

// 巢狀結構整包序列化成 JSON 文字存入單一欄位；缺值時寫空物件
fn json_cell(detail: &Value, key: &str) -> Result<String> {
    match detail.get(key) {
        Some(value) => Ok(serde_json::to_string(value)?),
        None => Ok("{}".to_string()),
    }
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn quantity_as_i64(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_row_full_payload() {
        let detail = json!({
            "name": "USB Cable",
            "brand": "Acme",
            "url": "https://www.amazon.com/dp/B000123/",
            "price": 12.99,
            "price_reduced": "9.99",
            "rating": 4.5,
            "total_ratings": 321,
            "in_stock": false,
            "categories": [{"name": "Electronics"}, {"name": "Cables"}],
            "features": ["Fast", "Durable"],
            "description": "Short description",
            "details_table": [
                {"name": "Product Dimensions", "value": "6 x 4 x 1 inches"},
                {"name": "Item Weight", "value": "3.2 ounces"}
            ],
            "main_image": "https://images.example/cable.jpg",
            "whats_in_box": ["Cable", "Manual"],
            "variants": {"color": ["red", "blue"]}
        });

        let row = product_row("B000123", &detail).unwrap();

        assert_eq!(row.asin, "B000123");
        assert_eq!(row.name, "USB Cable");
        assert_eq!(row.price, "12.99");
        assert_eq!(row.price_reduced, "9.99");
        assert_eq!(row.rating, "4.5");
        assert_eq!(row.review_count, "321");
        assert!(!row.availability);
        assert_eq!(row.category, "Electronics; Cables");
        assert_eq!(row.bullet_points, "Fast; Durable");
        assert_eq!(row.description, "Short description");
        assert_eq!(row.product_dimensions, "\"6 x 4 x 1 inches\"");
        assert_eq!(row.product_weight, "3.2 ounces");
        assert_eq!(row.main_image_url, "https://images.example/cable.jpg");
        assert_eq!(row.whats_in_box, "Cable; Manual");
        assert_eq!(row.variant_data, "{\"color\":[\"red\",\"blue\"]}");
        assert!(row.product_specifications.contains("Product Dimensions"));
    }

    #[test]
    fn test_product_row_missing_fields_default_empty() {
        let detail = json!({"name": "Bare"});

        let row = product_row("B000456", &detail).unwrap();

        assert_eq!(row.brand, "");
        assert_eq!(row.category, "");
        assert_eq!(row.bullet_points, "");
        assert_eq!(row.description, "");
        // 缺 in_stock 時預設有貨
        assert!(row.availability);
        // 缺巢狀結構時的空值表示
        assert_eq!(row.product_dimensions, "\"\"");
        assert_eq!(row.product_specifications, "{}");
        assert_eq!(row.product_weight, "");
        assert_eq!(row.variant_data, "{}");
    }

    #[test]
    fn test_description_truncated_when_over_limit() {
        let long = "x".repeat(1500);
        let detail = json!({"description": long});

        let row = product_row("B1", &detail).unwrap();

        assert_eq!(row.description.chars().count(), 1003);
        assert!(row.description.ends_with("..."));
        assert_eq!(&row.description[..1000], "x".repeat(1000).as_str());
    }

    #[test]
    fn test_description_at_exact_limit_unchanged() {
        let exact = "y".repeat(1000);
        let detail = json!({"description": exact});

        let row = product_row("B1", &detail).unwrap();

        assert_eq!(row.description, "y".repeat(1000));
        assert!(!row.description.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        // 多位元組字元也按字元數截斷
        let text = "漢".repeat(1200);
        let truncated = truncate_text(&text, DESCRIPTION_MAX_CHARS);
        assert_eq!(truncated.chars().count(), 1003);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_details_value_takes_first_match() {
        let detail = json!({
            "details_table": [
                {"name": "Item Weight", "value": "1 pound"},
                {"name": "Item Weight", "value": "2 pounds"}
            ]
        });
        assert_eq!(details_value(&detail, "Item Weight"), "1 pound");
        assert_eq!(details_value(&detail, "Batteries"), "");
    }

    #[test]
    fn test_search_row_full_payload() {
        let product = json!({
            "title": "Claw Hammer",
            "link": "https://www.homedepot.com/p/123",
            "price": 24.97,
            "unit": "each",
            "rating": 4.8,
            "reviews": 1250,
            "model_number": "CH-16",
            "brand": "Husky",
            "delivery": {"free": true},
            "pickup": {"store_name": "Midtown", "quantity": 12}
        });

        let rows = search_rows("hammer", &[product]);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.keyword, "hammer");
        assert_eq!(row.title, "Claw Hammer");
        assert_eq!(row.price, "24.97");
        assert_eq!(row.reviews, "1250");
        assert!(row.delivery_free);
        assert_eq!(row.store_name, "Midtown");
        assert_eq!(row.in_stock_quantity, 12);
    }

    #[test]
    fn test_search_row_missing_nested_structures_default() {
        let product = json!({"title": "Plain"});

        let rows = search_rows("hammer", &[product]);

        let row = &rows[0];
        assert!(!row.delivery_free);
        assert_eq!(row.store_name, "");
        assert_eq!(row.in_stock_quantity, 0);
    }

    #[test]
    fn test_search_row_malformed_nested_structures_default_silently() {
        let product = json!({
            "title": "Odd",
            "delivery": "free shipping",
            "pickup": ["store"]
        });

        let rows = search_rows("hammer", &[product]);

        let row = &rows[0];
        assert!(!row.delivery_free);
        assert_eq!(row.store_name, "");
        assert_eq!(row.in_stock_quantity, 0);
    }

    #[test]
    fn test_search_row_float_quantity() {
        let product = json!({"pickup": {"quantity": 7.0}});
        let rows = search_rows("k", &[product]);
        assert_eq!(rows[0].in_stock_quantity, 7);
    }

    #[test]
    fn test_search_rows_empty_page_is_zero_rows() {
        assert!(search_rows("hammer", &[]).is_empty());
    }
}
