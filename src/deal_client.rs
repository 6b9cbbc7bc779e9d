use reqwest::Client;
use serde::Deserialize;
use std::time;

use crate::domain::deal::{parse_price_value, NewDeal};
use crate::domain::deal_category::DealCategory;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);
// Retailer feeds refuse requests without a browser user agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/113.0.0.0 Safari/537.36";

/// Fetches the JSON deals feed of a single retailer.
pub struct DealClient {
    http_client: Client,
    retailer: String,
    deals_url: String,
}

#[derive(Deserialize)]
struct DealsFeed {
    products: Vec<ProductPayload>,
}

#[derive(Deserialize)]
struct ProductPayload {
    product_id: Option<String>,
    title: String,
    url: String,
    price: String,
    #[serde(default)]
    list_price: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl DealClient {
    pub fn new(retailer: String, deals_url: String, timeout: Option<time::Duration>) -> DealClient {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()
            .unwrap();

        DealClient {
            http_client,
            retailer,
            deals_url,
        }
    }

    pub fn get_retailer(&self) -> &str {
        &self.retailer
    }

    /// Downloads the feed and maps it to deals. Products without an id cannot
    /// be tracked across days and are skipped.
    pub async fn fetch_deals(&self) -> Result<Vec<NewDeal>, reqwest::Error> {
        let feed: DealsFeed = self
            .http_client
            .get(&self.deals_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()? // return an error when server response status code is 4xx or 5xx
            .json()
            .await?;

        let deals = feed
            .products
            .into_iter()
            .filter_map(|product| product.into_new_deal(&self.retailer))
            .collect();

        Ok(deals)
    }
}

impl ProductPayload {
    fn into_new_deal(self, retailer: &str) -> Option<NewDeal> {
        let product_id = self.product_id?;
        let price_value = parse_price_value(&self.price);
        let category = DealCategory::from_title(&self.title);

        Some(NewDeal {
            retailer: String::from(retailer),
            product_id,
            title: self.title,
            url: self.url,
            price: self.price,
            price_value,
            orig_price: self.list_price,
            category,
            image: self.image,
        })
    }
}
