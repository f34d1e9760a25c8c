use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use invoice_engine::{FulfillmentApi, JsonlJournal};
use log::info;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{
        email::TransactionalMailer,
        github_archive::GithubArchive,
        pdf::PdfRenderer,
        razorpay::RazorpayApi,
    },
    middleware::{HmacMiddlewareFactory, WEBHOOK_SIGNATURE_HEADER},
    routes::{health, index, CreateOrderRoute, VerifyRoute, WebhookRoute},
};

/// The fulfillment API with every seam bound to its live transport.
pub type LiveFulfillmentApi = FulfillmentApi<JsonlJournal, PdfRenderer, GithubArchive, TransactionalMailer>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let journal = JsonlJournal::open(&config.journal_dir)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("📒️ Journal open with {} order(s) on record.", journal.order_count().await);
    let srv = create_server_instance(config, journal)?;
    srv.await.map_err(ServerError::from)
}

pub fn create_server_instance(config: ServerConfig, journal: JsonlJournal) -> Result<Server, ServerError> {
    let renderer = PdfRenderer::new(config.store.clone());
    let archive = match &config.archive {
        Some(cfg) => {
            Some(GithubArchive::new(cfg.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?)
        },
        None => None,
    };
    let notifier = match &config.email {
        Some(cfg) => {
            Some(TransactionalMailer::new(cfg.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?)
        },
        None => None,
    };
    let gateway =
        RazorpayApi::new(config.gateway.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let api: LiveFulfillmentApi =
        FulfillmentApi::new(journal, renderer, archive, notifier, config.gateway.key_secret.clone());
    // Data is constructed once here; the factory closure only clones the inner Arc.
    let api = web::Data::new(api);
    let gateway = web::Data::new(gateway);
    let srv = HttpServer::new(move || {
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(
                WEBHOOK_SIGNATURE_HEADER,
                config.webhook_secret.clone(),
                config.webhook_checks,
            ))
            .service(WebhookRoute::<JsonlJournal, PdfRenderer, GithubArchive, TransactionalMailer>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ifg::access_log"))
            .app_data(api.clone())
            .app_data(gateway.clone())
            .service(health)
            .service(index)
            .service(CreateOrderRoute::<JsonlJournal, PdfRenderer, GithubArchive, TransactionalMailer, RazorpayApi>::new())
            .service(VerifyRoute::<JsonlJournal, PdfRenderer, GithubArchive, TransactionalMailer>::new())
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
