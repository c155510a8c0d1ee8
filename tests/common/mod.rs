#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::Method;
use actix_web::test::TestRequest;
use hrm_conges::auth::jwt::generate_access_token;
use hrm_conges::config::{Config, HrNotifyPolicy, StoreBackend};
use hrm_conges::model::role::Role;
use hrm_conges::models::Claims;
use hrm_conges::store::{MemoryStore, Stores};

pub const SECRET: &str = "integration-test-secret";

/// Builds the full route table over `$stores` as a test service.
macro_rules! app {
    ($config:expr, $stores:expr) => {{
        let config = $config;
        let stores = $stores;
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(move |cfg| hrm_conges::routes::configure(cfg, config, stores)),
        )
        .await
    }};
}

pub fn config(policy: HrNotifyPolicy) -> Config {
    Config {
        database_url: "mysql://unused".into(),
        jwt_secret: SECRET.into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 3600,
        db_max_connections: 1,
        rate_login_per_min: 600,
        rate_register_per_min: 600,
        rate_protected_per_min: 6000,
        api_prefix: "/api".into(),
        hr_notify_policy: policy,
        store_backend: StoreBackend::Memory,
        log_dir: "logs".into(),
    }
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// A seeded user plus a bearer token for it.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: u64,
    pub employee_id: Option<u64>,
    pub token: String,
}

pub fn mint(user_id: u64, email: &str, role: Role, name: Option<String>, employee_id: Option<u64>, exp: usize) -> String {
    let claims = Claims {
        user_id,
        sub: email.to_string(),
        role,
        name,
        employee_id,
        exp,
        jti: format!("test-{user_id}-{exp}"),
    };
    generate_access_token(&claims, SECRET).unwrap()
}

pub fn actor(store: &MemoryStore, email: &str, role: Role, names: Option<(&str, &str)>) -> Actor {
    let seeded = store.seed_user(email, role, names);
    let name = names.map(|(first, last)| format!("{first} {last}"));
    Actor {
        user_id: seeded.user_id,
        employee_id: seeded.employee_id,
        token: mint(seeded.user_id, email, role, name, seeded.employee_id, now() + 3600),
    }
}

pub fn expired_token(actor: &Actor) -> String {
    mint(actor.user_id, "expired@example.org", Role::Employee, None, actor.employee_id, now() - 60)
}

/// Employee, a second employee and one HR account over a fresh memory store.
pub struct Fixture {
    pub store: MemoryStore,
    pub stores: Stores,
    pub config: Config,
    pub employee: Actor,
    pub other: Actor,
    pub hr: Actor,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(HrNotifyPolicy::First)
    }

    pub fn with_policy(policy: HrNotifyPolicy) -> Self {
        let store = MemoryStore::new();
        let employee = actor(&store, "ada@example.org", Role::Employee, Some(("Ada", "Lovelace")));
        let other = actor(&store, "alan@example.org", Role::Employee, Some(("Alan", "Turing")));
        let hr = actor(&store, "grace@example.org", Role::Hr, Some(("Grace", "Hopper")));
        Self {
            stores: Stores::memory(store.clone()),
            store,
            config: config(policy),
            employee,
            other,
            hr,
        }
    }
}

pub fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

/// Request with a peer address (the rate limiter keys on it) and an optional bearer token.
pub fn request(method: Method, uri: &str, token: Option<&str>) -> TestRequest {
    let req = TestRequest::default()
        .method(method)
        .uri(uri)
        .peer_addr(peer());
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    }
}

pub fn june(day: u32) -> String {
    format!("2024-06-{day:02}")
}
