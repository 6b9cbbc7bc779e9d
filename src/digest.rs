use chrono::NaiveDate;

use crate::domain::deal::TodayDeal;

/// How many deals a digest carries at most.
pub const DIGEST_LIMIT: usize = 10;

pub fn digest_subject(date: NaiveDate) -> String {
    format!("New Low Deals for {}", date)
}

/// Renders the daily digest as an HTML fragment, one list item per deal.
pub fn render_digest(deals: &[TodayDeal]) -> String {
    if deals.is_empty() {
        return String::from("<p>No new low deals today.</p>");
    }

    let mut html = String::from("<h2>Today's New Low Deals</h2><ul>");

    for deal in deals {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> &mdash; <strong>{}</strong>",
            deal.url, deal.title, deal.price
        ));
        if let Some(orig_price) = &deal.orig_price {
            html.push_str(&format!(" <del>{}</del>", orig_price));
        }
        html.push_str(&format!(" <em>{}</em></li>", deal.category));
    }

    html.push_str("</ul>");

    html
}
