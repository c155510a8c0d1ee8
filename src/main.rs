use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, Responder, get};

use hrm_conges::config::{Config, StoreBackend};
use hrm_conges::db::{init_db, run_migrations};
use hrm_conges::docs::ApiDoc;
use hrm_conges::routes;
use hrm_conges::store::{MemoryStore, Stores};
use hrm_conges::utils::email_filter;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRM leave service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.store_backend, policy = %config.hr_notify_policy, "Server starting...");

    let stores = match config.store_backend {
        StoreBackend::Mysql => {
            let pool = init_db(&config.database_url, config.db_max_connections).await?;
            run_migrations(&pool).await?;

            let pool_for_filter_warmup = pool.clone();
            actix_web::rt::spawn(async move {
                if let Err(e) =
                    email_filter::warmup_email_filter(&pool_for_filter_warmup, 100).await
                {
                    error!(error = %e, "Failed to warm up email filter");
                }
            });

            Stores::mysql(pool)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Stores::memory(MemoryStore::new())
        }
    };

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        let config = config.clone();
        let stores = stores.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} so the UI's JS/CSS files resolve
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(index)
            .configure(move |cfg| routes::configure(cfg, config, stores))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
