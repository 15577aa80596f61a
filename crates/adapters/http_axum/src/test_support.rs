//! Stub ports and request helpers for the handler tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use endscripts_app::end_scripts::EndScripts;
use endscripts_app::notification_bus::InProcessNotifier;
use endscripts_app::ports::{Device, ScriptSettings};
use endscripts_domain::error::EndScriptsError;
use endscripts_domain::lifecycle::{DeviceState, LifecycleEvent};
use endscripts_domain::script::Script;

use crate::state::AppState;

pub struct StubSettings {
    raw: Mutex<Value>,
}

impl ScriptSettings for StubSettings {
    fn get(&self) -> impl Future<Output = Result<Value, EndScriptsError>> + Send {
        let raw = self.raw.lock().unwrap().clone();
        async { Ok(raw) }
    }

    fn set(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        *self.raw.lock().unwrap() = serde_json::to_value(scripts).unwrap();
        async { Ok(()) }
    }

    fn save(&self) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        async { Ok(()) }
    }
}

pub struct StubPrinter;

impl Device for StubPrinter {
    fn send(&self, _commands: Vec<String>) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        async { Ok(()) }
    }

    fn current_state(&self) -> impl Future<Output = DeviceState> + Send {
        async { DeviceState::Operational }
    }
}

pub type TestState = AppState<StubSettings, StubPrinter>;

pub async fn test_state(raw: Value) -> (TestState, mpsc::Receiver<LifecycleEvent>) {
    let notifier = Arc::new(InProcessNotifier::new(16));
    let end_scripts = EndScripts::initialize(
        StubSettings {
            raw: Mutex::new(raw),
        },
        Arc::new(StubPrinter),
        Arc::clone(&notifier),
    )
    .await
    .unwrap();
    let (events_tx, events_rx) = mpsc::channel(8);
    let state = AppState::new(
        Arc::new(tokio::sync::Mutex::new(end_scripts)),
        notifier,
        events_tx,
        watch::channel(false).1,
    );
    (state, events_rx)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    json_request("POST", uri, body)
}

pub fn put_json(uri: &str, body: &Value) -> Request<Body> {
    json_request("PUT", uri, body)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
