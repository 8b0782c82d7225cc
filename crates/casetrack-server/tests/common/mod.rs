#![allow(dead_code)]

use std::net::Ipv4Addr;

use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use tokio::task::JoinHandle;

use casetrack_server::{AppConfig, build_app};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ISSUER: &str = "https://login.test/casetrack/v2.0";
pub const AUDIENCE: &str = "api://casetrack";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.issuer = ISSUER.to_string();
    cfg.auth.audience = AUDIENCE.to_string();
    cfg.auth.hs256_secret = Some(TEST_SECRET.to_string());
    cfg
}

pub async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&test_config()).expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

/// Mints an HS256 token the test server accepts.
pub fn mint(username: &str, oid: &str, roles: &[&str]) -> String {
    encode(
        &Header::default(),
        &json!({
            "sub": format!("sub-{oid}"),
            "oid": oid,
            "preferred_username": username,
            "roles": roles,
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": 9_999_999_999i64,
        }),
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn admin_token() -> String {
    mint("ada@example.com", "oid-admin", &["Admin"])
}

pub fn attorney_token() -> String {
    mint("lee@example.com", "oid-attorney", &["Attorney"])
}
