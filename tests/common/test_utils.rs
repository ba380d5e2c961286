use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use fortune_teller::{
    config::{Config, Environment, LlmConfig, LogsConfig, ServerConfig},
    oracle::Oracle,
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::{
    io,
    sync::{Arc, Mutex},
};
use tracing::subscriber::DefaultGuard;

/// 1x1 transparent PNG
pub const PIXEL_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn pixel_data_uri(subtype: &str) -> String {
    format!("data:image/{subtype};base64,{PIXEL_BASE64}")
}

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: Environment::Production,
            body_limit_bytes: 10 * 1024 * 1024,
            cors_origins: vec![],
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: LlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 5,
        },
    }
}

pub fn create_test_app_with_config(mock: MockLlmClient, config: &Config) -> Router {
    let state = AppState {
        oracle: Oracle::new(Arc::new(mock)),
        environment: config.server.environment,
    };
    server::router(state, &config.server)
}

pub fn create_test_app(mock: MockLlmClient, environment: Environment) -> Router {
    let mut config = create_test_config();
    config.server.environment = environment;
    create_test_app_with_config(mock, &config)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Routes this thread's tracing events into the buffer until the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  environment: "production"
  body_limit_bytes: 2048
  cors_origins:
    - "https://fortune-teller-backend.onrender.com"
    - "capacitor://localhost"
  logs:
    level: "debug"

llm:
  base_url: "http://localhost:4000"
  api_key: "yaml-api-key"
  model: "gemini-1.5-pro"
  timeout_secs: 10
"#;

/// Only the required key; everything else falls back to defaults
pub const MINIMAL_CONFIG_YAML: &str = r#"
llm:
  api_key: "minimal-key"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
  environment: "staging"
"#;
