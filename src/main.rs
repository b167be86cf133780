use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::io;

use infra::config::AppConfigImpl;
use log::info;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use server::middleware::other;

/// 日志同时输出到控制台和 app.log，级别取自 RUST_LOG
fn init_logging() -> io::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}",
        )))
        .build("app.log")?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder().build())))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )
        .map_err(|e| io::Error::other(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| io::Error::other(e.to_string()))?;
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logging()?;

    let cfg = AppConfigImpl::load().map_err(|e| io::Error::other(e.to_string()))?;
    let server_cfg = cfg.server();
    let store = server::AppState::init_store(&cfg)?;

    let app_state = server::AppState::new(store.clone(), cfg)?;
    server::seed_users(&app_state).await;
    let app_state = web::Data::new(app_state);

    info!("listening on {}:{}", server_cfg.host, server_cfg.port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(server::api::configure_service)
            .default_service(web::to(other::route_not_found))
            .wrap(other::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await?;

    let flushed = store.flush().await.map_err(io::Error::other)?;
    info!("document store flushed ({} bytes)", flushed);
    Ok(())
}
