//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use tempfile::TempDir;

use feature_board::config::AppConfig;
use feature_board::{HttpServer, Shutdown};

/// A running service instance bound to an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub upload_dir: TempDir,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Names of files currently persisted in the upload directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Spawn the service with a config the functional tests won't rate-limit on.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the service, letting the test adjust the config first.
pub async fn spawn_app_with(mutate: impl FnOnce(&mut AppConfig)) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    config.upload.dir = upload_dir.path().to_path_buf();
    // Generous so only the rate-limit tests, which tighten it, ever hit 429.
    config.rate_limit.requests_per_window = 10_000;
    mutate(&mut config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
        upload_dir,
        shutdown,
    }
}
