use serde::{Deserialize, Serialize};

/// 產品詳情輸出列。欄位宣告順序就是 CSV 欄位順序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRow {
    pub asin: String,
    pub name: String,
    pub brand: String,
    pub url: String,
    pub price: String,
    pub price_reduced: String,
    pub rating: String,
    pub review_count: String,
    pub availability: bool,
    pub category: String,
    pub bullet_points: String,
    pub description: String,
    pub product_dimensions: String,
    pub product_specifications: String,
    pub product_weight: String,
    pub main_image_url: String,
    pub whats_in_box: String,
    pub variant_data: String,
}

/// 關鍵字搜尋輸出列。欄位宣告順序就是 CSV 欄位順序。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRow {
    pub keyword: String,
    pub title: String,
    pub link: String,
    pub price: String,
    pub unit: String,
    pub rating: String,
    pub reviews: String,
    pub model_number: String,
    pub brand: String,
    pub delivery_free: bool,
    pub store_name: String,
    pub in_stock_quantity: i64,
}

/// Tallies accumulated across one run, emitted once at the end.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed_keys: Vec<String>,
    pub rows_written: usize,
    pub remaining_credits: Option<i64>,
    pub output_path: String,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failed_keys.len()
    }
}
