//! Shared helpers: a local axum server on a random port and clients
//! pointed at it.

#![allow(dead_code)]

use axum::Router;
use postlane::{ClientConfig, ClientConfigBuilder, HttpClient};
use std::net::SocketAddr;

pub const API_KEY: &str = "test-key";
pub const GRANT: &str = "grant-1";

/// Serves `router` on `127.0.0.1:0` with peer addresses available through
/// `ConnectInfo<SocketAddr>`.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

pub fn client(addr: SocketAddr) -> HttpClient {
    client_with(addr, |builder| builder)
}

pub fn client_with(
    addr: SocketAddr,
    configure: impl FnOnce(ClientConfigBuilder) -> ClientConfigBuilder,
) -> HttpClient {
    let builder = ClientConfig::builder(API_KEY)
        .base_url(format!("http://{addr}"))
        .rate_limit(1000);
    HttpClient::new(configure(builder).build()).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
