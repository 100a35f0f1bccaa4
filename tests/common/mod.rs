#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use task_manager_api::auth::{generate_jwt, Claims};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "https://issuer.tasks.test";
pub const TEST_AUDIENCE: &str = "tenant:tasks-test";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // In-memory store and a shared secret so no outside services are needed
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_task-manager-api"));
        cmd.env("APP_ENV", "development")
            .env("TASKS_STORE", "memory")
            .env_remove("DATABASE_URL")
            .env("TASKS_API_PORT", port.to_string())
            .env("AUTH_JWT_SECRET", TEST_SECRET)
            .env("AUTH_ISSUER", TEST_ISSUER)
            .env("AUTH_AUDIENCE", TEST_AUDIENCE)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A valid bearer token for `subject`
pub fn token_for(subject: &str) -> String {
    let claims = Claims::new(TEST_ISSUER, TEST_AUDIENCE, subject, chrono::Duration::minutes(15));
    generate_jwt(&claims, TEST_SECRET).expect("failed to sign test token")
}

/// A fresh subject per test so tests sharing the server never see each other's rows
pub fn unique_user(label: &str) -> String {
    format!("{}_{}", label, uuid::Uuid::new_v4().simple())
}
