//! Common record types and helpers for criteria integration tests

#![allow(dead_code)]

use criteria::Filterable;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// A login audit entry, as stored by the access-log service.
#[derive(Filterable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[filterable(name = "LoginEvent")]
pub struct LoginEvent {
    #[filterable(rename = "userId")]
    pub user_id: String,
    #[filterable]
    pub ip: String,
    #[filterable]
    pub device: String,
    #[filterable]
    pub attempts: u16,
    #[filterable]
    pub success: bool,
    #[filterable]
    pub latency_ms: Option<f64>,
    pub tenant_id: String,
}

impl LoginEvent {
    pub fn new(user_id: &str, ip: &str, device: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ip: ip.to_string(),
            device: device.to_string(),
            attempts: 1,
            success: true,
            latency_ms: None,
            tenant_id: "acme".to_string(),
        }
    }

    pub fn attempts(mut self, attempts: u16) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    pub fn latency(mut self, latency_ms: f64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}

/// The four-entry data set used by the criteria endpoint scenarios.
pub fn login_events() -> Vec<LoginEvent> {
    vec![
        LoginEvent::new("user_one", "192.168.1.100", "Device1"),
        LoginEvent::new("user_one_updated", "192.168.1.100", "Device2").attempts(3).latency(120.5),
        LoginEvent::new("user_one_updated", "10.0.0.7", "Other").failed(),
        LoginEvent::new("user_two", "192.168.1.101", "Device3").attempts(7).failed().latency(980.0),
    ]
}
