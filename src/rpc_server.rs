//! gitlab-reporter RPC Server: JSON-RPC over stdin/stdout for the browser extension.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"profile.resolve", "params":{"url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so they never interleave with responses.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Instant;

use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use gitlab_reporter::app::{default_database_path, App};
use gitlab_reporter::rpc_handler::{handle_async_method, handle_method, is_async_method};
use gitlab_reporter::services::capture_channel;
use gitlab_reporter::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per one-second window.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(response: &Value) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", response).and_then(|_| stdout.flush()).is_err() {
        error!("Failed to write response to stdout");
    }
}

#[tokio::main]
async fn main() {
    let mut settings_engine = SettingsEngine::new(None);
    let settings = settings_engine.load().unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.logging.level.as_str()),
    )
    .init();

    let db_path = default_database_path(&settings.storage.database_file);
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Could not create data directory {}: {}", parent.display(), e);
        }
    }

    let app = match App::new(&db_path.to_string_lossy()) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!("Failed to initialize gitlab-reporter: {}", e);
            std::process::exit(1);
        }
    };
    let capture = capture_channel::spawn();

    respond(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));
    info!("Listening for requests on stdin");

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            respond(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let result = if is_async_method(method) {
            handle_async_method(&app, &capture, method, &params).await
        } else {
            handle_method(&app, method, &params)
        };

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                warn!("{} failed: {}", method, err);
                json!({"id": id, "error": err})
            }
        };
        respond(&response);
    }

    info!("stdin closed, shutting down");
}
