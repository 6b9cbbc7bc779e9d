use crate::domain::deal_category::DealCategory;

/// A deal scraped from a retailer feed, before it gets a scraped date.
#[derive(Debug)]
pub struct NewDeal {
    pub retailer: String,
    pub product_id: String,
    pub title: String,
    pub url: String,
    pub price: String,
    pub price_value: Option<i64>,
    pub orig_price: Option<String>,
    pub category: DealCategory,
    pub image: Option<String>,
}

/// A stored deal for the current day, flagged when its price is the lowest
/// ever recorded for that product.
#[derive(Debug, serde::Serialize)]
pub struct TodayDeal {
    pub retailer: String,
    pub title: String,
    pub price: String,
    pub orig_price: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub category: String,
    pub is_new_low: bool,
}

/// Extracts an integer amount from a display price such as "R 1,299".
/// Whitespace is dropped, the first run of digits (with thousand separators)
/// is kept.
pub fn parse_price_value(price_text: &str) -> Option<i64> {
    let cleaned: String = price_text.chars().filter(|c| !c.is_whitespace()).collect();
    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let digits: String = cleaned[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();

    digits.parse().ok()
}
