//! Shared helpers for the server integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{Method, Request, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use paragliding_server::{api::app_router, build_state, config::Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A minimal IGC log for a given pilot.
pub fn igc_file(pilot: &str) -> String {
    format!(
        "AXCT7fa4c3e5ba1e4e8f\r\n\
         HFDTE020518\r\n\
         HFPLTPILOTINCHARGE:{}\r\n\
         HFGTYGLIDERTYPE:Ozone Enzo 3\r\n\
         HFGIDGLIDERID:D-1234\r\n\
         B1101355206343N00006198WA0058700558\r\n\
         B1101455206259N00006295WA0059300556\r\n\
         B1101555206300N00006061WA0060300576\r\n",
        pilot
    )
}

pub type Received = Arc<Mutex<Vec<(String, Value)>>>;

/// Local stand-in for IGC hosts and webhook receivers.
pub struct Fixtures {
    pub addr: SocketAddr,
    pub received: Received,
}

impl Fixtures {
    pub async fn start() -> Self {
        let received: Received = Arc::new(Mutex::new(Vec::new()));

        async fn igc(Path(name): Path<String>) -> Response {
            let status = if name.starts_with("missing") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            let body = match name.strip_suffix(".igc") {
                Some(pilot) => igc_file(pilot),
                None => "<html>not a flight log</html>".to_string(),
            };
            Response::builder()
                .status(status)
                .body(Body::from(body))
                .unwrap()
        }

        async fn hook(
            Path(name): Path<String>,
            State(received): State<Received>,
            Json(payload): Json<Value>,
        ) -> StatusCode {
            received.lock().unwrap().push((name.clone(), payload));
            if name == "broken" {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            }
        }

        let app = Router::new()
            .route("/files/{name}", get(igc))
            .route("/hooks/{name}", post(hook))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("http://{}/files/{}", self.addr, name)
    }

    pub fn hook_url(&self, name: &str) -> String {
        format!("http://{}/hooks/{}", self.addr, name)
    }

    /// Payloads received by `name` so far.
    pub fn received_by(&self, name: &str) -> Vec<Value> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Waits until `name` has received at least `count` payloads.
    pub async fn wait_for(&self, name: &str, count: usize) -> Vec<Value> {
        for _ in 0..100 {
            let received = self.received_by(name);
            if received.len() >= count {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.received_by(name)
    }
}

/// The application under test plus whatever keeps its storage alive.
pub struct TestApp {
    pub router: Router,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub async fn sqlite() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db").to_string_lossy().to_string();
        let router = Self::build(&[("PG_STORAGE", "sqlite"), ("PG_DB_PATH", &db_path)]).await;
        Self {
            router,
            _dir: Some(dir),
        }
    }

    pub async fn memory() -> Self {
        let router = Self::build(&[("PG_STORAGE", "memory")]).await;
        Self { router, _dir: None }
    }

    async fn build(vars: &[(&str, &str)]) -> Router {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_vars(|key| vars.get(key).cloned()).unwrap();
        let state = build_state(&config).await.unwrap();
        app_router(state, &config)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.request(Method::GET, uri, None).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let (status, body) = self.request(Method::GET, uri, None).await;
        (status, String::from_utf8(body).unwrap())
    }

    /// Ingests `url` and returns the assigned id.
    pub async fn ingest(&self, url: &str) -> String {
        let (status, body) = self
            .request(Method::POST, "/paragliding/api/track", Some(Value::from(url)))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).unwrap()
    }
}
