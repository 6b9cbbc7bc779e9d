use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::net::TcpListener;
use std::path::Path;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::deal_client::DealClient;
use crate::deal_store::DealStore;
use crate::email_client::EmailClient;
use crate::routes::{
    handle_create_subscription, handle_get_today_deals, handle_publish_digest,
    handle_refresh_deals, health_check,
};
use crate::subscriber_store::SubscriberStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let subscriber_store = SubscriberStore::new(config.get_subscribers_file());

        let deal_store = DealStore::new(get_deals_db_pool(&config.get_deals_db()));
        deal_store
            .init()
            .await
            .expect("Failed to initialize the deals database.");

        let deal_clients: Vec<DealClient> = config
            .get_retailers()
            .iter()
            .map(|retailer| DealClient::new(retailer.get_name(), retailer.get_deals_url(), None))
            .collect();

        let sender_email = config
            .get_email_client_sender()
            .expect("Sender email is not valid");
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender_email,
            config.get_email_client_api(),
            None,
        );

        let listener =
            TcpListener::bind(config.get_address()).expect("Failed to bind the address.");
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, subscriber_store, deal_store, deal_clients, email_client)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    subscriber_store: SubscriberStore,
    deal_store: DealStore,
    deal_clients: Vec<DealClient>,
    email_client: EmailClient,
) -> Result<Server, std::io::Error> {
    let subscriber_store = web::Data::new(subscriber_store);
    let deal_store = web::Data::new(deal_store);
    let deal_clients = web::Data::new(deal_clients);
    let email_client = web::Data::new(email_client);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            // Only POST is registered: actix-web answers any other method on
            // this path with an empty 405
            .route("/subscriptions", web::post().to(handle_create_subscription))
            .route("/deals/refresh", web::post().to(handle_refresh_deals))
            .route("/deals/today", web::get().to(handle_get_today_deals))
            .route("/deals/digest", web::post().to(handle_publish_digest))
            .app_data(subscriber_store.clone())
            .app_data(deal_store.clone())
            .app_data(deal_clients.clone())
            .app_data(email_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_deals_db_pool(db_path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    SqlitePoolOptions::new().connect_lazy_with(options)
}
