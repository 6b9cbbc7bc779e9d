use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::deal::{NewDeal, TodayDeal};

/// SQLite-backed history of scraped deals, one row per product per day.
pub struct DealStore {
    pool: SqlitePool,
}

impl DealStore {
    pub fn new(pool: SqlitePool) -> DealStore {
        DealStore { pool }
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS deals (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              retailer TEXT,
              product_id TEXT,
              title TEXT,
              url TEXT,
              price TEXT,
              price_value INTEGER,
              orig_price TEXT,
              category TEXT,
              image TEXT,
              scraped_date TEXT,
              UNIQUE(retailer, product_id, scraped_date)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the deals under the given scrape date, ignoring products
    /// already recorded for that retailer and day. Returns how many rows were
    /// actually inserted.
    pub async fn save_deals(
        &self,
        deals: &[NewDeal],
        scraped_date: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for deal in deals {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO deals
                  (retailer, product_id, title, url, price, price_value, orig_price, category, image, scraped_date)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&deal.retailer)
            .bind(&deal.product_id)
            .bind(&deal.title)
            .bind(&deal.url)
            .bind(&deal.price)
            .bind(deal.price_value)
            .bind(&deal.orig_price)
            .bind(deal.category.as_ref())
            .bind(&deal.image)
            .bind(scraped_date.to_string())
            .execute(&self.pool)
            .await?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Deals scraped on the given day, cheapest first, flagged as a new low
    /// when the day's price equals the lowest price ever recorded for the
    /// product.
    pub async fn today_deals(&self, today: NaiveDate) -> Result<Vec<TodayDeal>, sqlx::Error> {
        sqlx::query(
            r#"
            SELECT d.retailer,
                   d.title,
                   d.price,
                   d.orig_price,
                   d.url,
                   d.image,
                   d.category,
                   CASE WHEN d.price_value = m.min_price THEN 1 ELSE 0 END AS is_new_low
            FROM deals AS d
            JOIN (
                SELECT retailer, product_id, MIN(price_value) AS min_price
                FROM deals
                WHERE price_value IS NOT NULL
                GROUP BY retailer, product_id
            ) AS m
              ON d.retailer = m.retailer
             AND d.product_id = m.product_id
            WHERE d.scraped_date = ?
            ORDER BY d.price_value ASC
            "#,
        )
        .bind(today.to_string())
        .map(|row: SqliteRow| TodayDeal {
            retailer: row.get("retailer"),
            title: row.get("title"),
            price: row.get("price"),
            orig_price: row.get("orig_price"),
            url: row.get("url"),
            image: row.get("image"),
            category: row.get("category"),
            is_new_low: row.get::<i64, _>("is_new_low") == 1,
        })
        .fetch_all(&self.pool)
        .await
    }

    /// Drops deals scraped before the cutoff so the history does not grow
    /// without bound. Returns how many rows were removed.
    pub async fn clean_old_deals(&self, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deals WHERE scraped_date < ?")
            .bind(cutoff.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
