const BEAUTY_KEYWORDS: [&str; 7] = [
    "foundation",
    "eyeliner",
    "lip",
    "mascara",
    "skincare",
    "cream",
    "serum",
];
const ELECTRONICS_KEYWORDS: [&str; 10] = [
    "tv", "monitor", "laptop", "iphone", "phone", "charger", "adapter", "tablet", "gaming",
    "headphone",
];

#[derive(Debug, serde::Serialize)]
pub enum DealCategory {
    Beauty,
    Electronics,
    Other,
}

impl DealCategory {
    /// Keyword-based classification of a product title.
    pub fn from_title(title: &str) -> DealCategory {
        let title = title.to_lowercase();

        if BEAUTY_KEYWORDS.iter().any(|k| title.contains(k)) {
            return DealCategory::Beauty;
        }
        if ELECTRONICS_KEYWORDS.iter().any(|k| title.contains(k)) {
            return DealCategory::Electronics;
        }

        DealCategory::Other
    }

    pub fn parse(category: String) -> Result<DealCategory, String> {
        match category.as_str() {
            "Beauty" => Ok(DealCategory::Beauty),
            "Electronics" => Ok(DealCategory::Electronics),
            "Other" => Ok(DealCategory::Other),
            _ => Err(format!("{} is not a valid deal category", category)),
        }
    }
}

impl AsRef<str> for DealCategory {
    fn as_ref(&self) -> &str {
        match self {
            DealCategory::Beauty => "Beauty",
            DealCategory::Electronics => "Electronics",
            DealCategory::Other => "Other",
        }
    }
}
