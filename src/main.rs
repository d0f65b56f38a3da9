use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use pretty_env_logger::env_logger::{Builder, Env};

use charity_ledger::config::AppConfig;
use charity_ledger::lifecycle::LifecycleManager;
use charity_ledger::state::{AppState, DbContext};
use charity_ledger::storage::FileStore;
use charity_ledger::{handlers, notify};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let logger_env = Env::default().default_filter_or("info");
    let mut logger_builder = Builder::from_env(logger_env);
    logger_builder.init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Application initialization failed: {:#}", e);
        std::io::Error::other(e.to_string())
    })?;

    let db = DbContext::new(&config.database_url).await.map_err(|e| {
        log::error!("Database initialization failed: {:#}", e);
        std::io::Error::other(e.to_string())
    })?;
    log::info!("Database initialized successfully");

    let files = FileStore::new(&config.upload_dir);

    let (mailer, mailbox) = notify::channel(64);
    tokio::spawn(notify::run_dispatcher(mailbox));

    let lifecycle = LifecycleManager::new(
        db.clone(),
        files.clone(),
        mailer,
        config.notify_timeout,
    );

    let data = web::Data::new(AppState {
        db,
        files,
        lifecycle,
    });

    log::info!("Starting server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::new("%a %t %r %s  %{Referer}i %Dms"))
            .service(handlers::index)
            .service(handlers::create_donation)
            .service(handlers::get_user_donations)
            .service(handlers::get_charity_donations)
            .service(handlers::get_campaign_donations)
            .service(handlers::get_donation_receipt)
            .service(handlers::export_donation_history)
            .service(handlers::get_donation_certificate)
            .service(handlers::create_transaction)
            .service(handlers::get_user_transactions)
            .service(handlers::create_withdrawal)
            .service(handlers::get_charity_withdrawals)
            .service(handlers::get_platform_statistics)
            .service(handlers::get_donor_leaderboard)
            .service(handlers::create_campaign)
            // "active" must be registered before the wallet capture route.
            .service(handlers::get_active_campaigns)
            .service(handlers::get_campaigns_by_wallet)
            .service(handlers::register_charity)
            .service(handlers::get_charity_requests)
            .service(handlers::get_charity_request)
            .service(handlers::approve_charity_request)
            .service(handlers::reject_charity_request)
            .service(handlers::update_charity_request)
            .service(handlers::admin_update_charity_request)
            .service(handlers::delete_charity_request)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
