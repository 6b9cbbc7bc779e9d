use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::{Duration, Utc};
use serde_json::json;

use crate::deal_client::DealClient;
use crate::deal_store::DealStore;
use crate::digest::{digest_subject, render_digest, DIGEST_LIMIT};
use crate::domain::deal::TodayDeal;
use crate::email_client::EmailClient;
use crate::subscriber_store::{StoreError, SubscriberStore};

const RETENTION_DAYS: i64 = 30;

#[tracing::instrument(name = "Refreshing deals from the retailer feeds", skip_all)]
pub async fn handle_refresh_deals(
    deal_clients: web::Data<Vec<DealClient>>,
    deal_store: web::Data<DealStore>,
) -> Result<HttpResponse, RefreshDealsError> {
    let today = Utc::now().date_naive();
    let mut inserted = 0;

    for deal_client in deal_clients.iter() {
        let deals = deal_client.fetch_deals().await?;

        tracing::info!(
            "Retrieved {} deals from {}",
            deals.len(),
            deal_client.get_retailer()
        );

        inserted += deal_store
            .save_deals(&deals, today)
            .await
            .map_err(RefreshDealsError::SaveDealsError)?;
    }

    let removed = deal_store
        .clean_old_deals(today - Duration::days(RETENTION_DAYS))
        .await
        .map_err(RefreshDealsError::SaveDealsError)?;

    tracing::info!("Inserted {} new deals, removed {} old ones", inserted, removed);

    Ok(HttpResponse::Ok().json(json!({ "inserted": inserted })))
}

#[tracing::instrument(name = "Listing today's deals", skip_all)]
pub async fn handle_get_today_deals(
    deal_store: web::Data<DealStore>,
) -> Result<HttpResponse, TodayDealsError> {
    let deals = deal_store.today_deals(Utc::now().date_naive()).await?;

    Ok(HttpResponse::Ok().json(deals))
}

#[tracing::instrument(name = "Publishing the deals digest to all subscribers", skip_all)]
pub async fn handle_publish_digest(
    deal_store: web::Data<DealStore>,
    subscriber_store: web::Data<SubscriberStore>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, PublishDigestError> {
    let today = Utc::now().date_naive();
    let deals = deal_store
        .today_deals(today)
        .await
        .map_err(PublishDigestError::QueryDealsError)?;
    let new_lows: Vec<TodayDeal> = deals
        .into_iter()
        .filter(|deal| deal.is_new_low)
        .take(DIGEST_LIMIT)
        .collect();

    let subscriber_emails = subscriber_store
        .list()
        .map_err(PublishDigestError::GetSubscribersError)?;

    if !subscriber_emails.is_empty() {
        email_client
            .broadcast_email(
                subscriber_emails,
                &digest_subject(today),
                &render_digest(&new_lows),
            )
            .await
            .map_err(PublishDigestError::SendEmailError)?;
    }

    Ok(HttpResponse::Ok().finish())
}

#[derive(thiserror::Error)]
pub enum RefreshDealsError {
    #[error("Failed to fetch deals from a retailer feed.")]
    FetchDealsError(#[from] reqwest::Error),
    #[error("Failed to write deals to the database.")]
    SaveDealsError(#[source] sqlx::Error),
}

#[derive(thiserror::Error)]
pub enum TodayDealsError {
    #[error("Failed to query today's deals.")]
    QueryDealsError(#[from] sqlx::Error),
}

#[derive(thiserror::Error)]
pub enum PublishDigestError {
    #[error("Failed to send the digest email.")]
    SendEmailError(#[from] reqwest::Error),
    #[error("Failed to query today's deals.")]
    QueryDealsError(#[source] sqlx::Error),
    #[error("Failed to read the subscribers file.")]
    GetSubscribersError(#[source] StoreError),
}

impl std::fmt::Debug for RefreshDealsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl std::fmt::Debug for TodayDealsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl std::fmt::Debug for PublishDigestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Caused by:\n\t({})", self)
    }
}

impl ResponseError for RefreshDealsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for TodayDealsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for PublishDigestError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
