use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberBody};
use crate::subscriber_store::{StoreError, SubscriberStore};

#[derive(thiserror::Error, Debug)]
pub enum SubscribeError {
    #[error("Failed to persist the new subscriber: {0}")]
    StoreError(#[from] StoreError),
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(name = "Creating a new subscriber handler", skip(body, store))]
pub async fn handle_create_subscription(
    body: web::Json<NewSubscriberBody>,
    store: web::Data<SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = match body.try_into() {
        Ok(subscriber) => subscriber,
        Err(err) => {
            tracing::error!("Validation error: {:?}", err);
            return Ok(HttpResponse::BadRequest().json(json!({ "error": "Email required" })));
        }
    };

    let subscribed_at = store.append(&new_subscriber)?;

    tracing::info!(
        "Subscriber {} stored at {}",
        new_subscriber.email.as_ref(),
        subscribed_at
    );

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
