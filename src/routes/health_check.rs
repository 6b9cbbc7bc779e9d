use actix_web::{HttpRequest, HttpResponse, Responder};

/// Liveness endpoint, always replies with an empty 200
#[tracing::instrument(name = "Health Check handler")]
pub async fn health_check(_: HttpRequest) -> impl Responder {
    HttpResponse::Ok()
}
