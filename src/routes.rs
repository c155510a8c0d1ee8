use crate::{
    api::{attendance, leave_request, notification, payroll},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
    service::Services,
    store::Stores,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

/// Registers shared state, extractor error mapping, and every route.
pub fn configure(cfg: &mut web::ServiceConfig, config: Config, stores: Stores) {
    let services = Services::new(&stores, &config);

    cfg.app_data(web::Data::new(config.clone()))
        .app_data(web::Data::new(stores))
        .app_data(web::Data::new(services))
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
        );

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::list_own_leaves))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // before /{id} so it is not read as an id
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::list_pending_leaves)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::modify_leave))
                            .route(web::delete().to(leave_request::cancel_leave)),
                    )
                    // /leave/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::patch().to(leave_request::adjudicate_leave)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::record_attendance))
                            .route(web::get().to(attendance::list_own_attendance)),
                    )
                    .service(
                        web::resource("/all").route(web::get().to(attendance::list_all_attendance)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .service(
                        web::resource("")
                            .route(web::get().to(notification::list_own_notifications))
                            .route(web::post().to(notification::create_notification)),
                    )
                    .service(
                        web::resource("/all")
                            .route(web::get().to(notification::list_all_notifications)),
                    )
                    .service(
                        web::resource("/{id}/read")
                            .route(web::patch().to(notification::mark_notification_read)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("")
                            .route(web::post().to(payroll::create_payroll))
                            .route(web::get().to(payroll::list_own_payrolls)),
                    )
                    .service(web::resource("/all").route(web::get().to(payroll::list_all_payrolls)))
                    .service(
                        web::resource("/{id}/paid")
                            .route(web::patch().to(payroll::mark_payroll_paid)),
                    ),
            ),
    );
}
