//! Test doubles shared by the module tests.

use crate::error::{DashboardError, Result};
use crate::loader::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Transport answering from a route table and recording every path.
///
/// Gated paths block until their `Notify` is triggered, which lets a test
/// decide the order in which responses arrive.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Result<Value>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Ok(body));
    }

    pub fn fail(&self, path: &str, error: DashboardError) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Err(error));
    }

    /// Hold requests for `path` until the returned handle is notified.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), notify.clone());
        notify
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Yield until a request for `path` has been issued.
    pub async fn wait_for_request(&self, path: &str) {
        while !self.requests().iter().any(|p| p == path) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(path.to_string());

        let gate = self.gates.lock().unwrap().get(path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.routes
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(DashboardError::Network(format!("HTTP 404 for {}", path))))
    }
}
