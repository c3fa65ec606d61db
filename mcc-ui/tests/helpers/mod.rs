//! Shared fakes for mcc-ui integration tests
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use mcc_common::events::{Command, ServerEvent};
use mcc_common::models::{LoginRequest, LoginResponse, MediaItem};
use mcc_common::{Error, Result};
use mcc_ui::{AuthApi, Connector, DashboardHandle, DashboardState, MediaLibrary, PushChannel};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

// ========================================
// Media listing
// ========================================

/// Listing endpoint returning a fixed result after an optional delay
pub struct FakeLibrary {
    result: std::result::Result<Vec<MediaItem>, String>,
    delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl FakeLibrary {
    pub fn with_items(items: Vec<MediaItem>) -> Self {
        Self {
            result: Ok(items),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl MediaLibrary for FakeLibrary {
    async fn list_media(&self) -> Result<Vec<MediaItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone().map_err(Error::Http)
    }
}

// ========================================
// Push channel
// ========================================

pub type InboundTx = mpsc::UnboundedSender<Result<ServerEvent>>;

/// What the fake channel observed
#[derive(Clone, Default)]
pub struct ChannelProbe {
    pub connects: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<Command>>>,
    pub closed: Arc<AtomicBool>,
}

impl ChannelProbe {
    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Connector handing out one in-memory channel fed by the test
pub struct FakeConnector {
    probe: ChannelProbe,
    inbound: Mutex<Option<mpsc::UnboundedReceiver<Result<ServerEvent>>>>,
    fail: bool,
}

impl FakeConnector {
    pub fn new() -> (Self, InboundTx, ChannelProbe) {
        let (tx, rx) = mpsc::unbounded_channel();
        let probe = ChannelProbe::default();
        let connector = Self {
            probe: probe.clone(),
            inbound: Mutex::new(Some(rx)),
            fail: false,
        };
        (connector, tx, probe)
    }

    pub fn refusing() -> (Self, ChannelProbe) {
        let probe = ChannelProbe::default();
        let connector = Self {
            probe: probe.clone(),
            inbound: Mutex::new(None),
            fail: true,
        };
        (connector, probe)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn PushChannel>> {
        self.probe.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Channel("connection refused".to_string()));
        }
        let inbound = self
            .inbound
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| Error::Channel("fake channel already handed out".to_string()))?;
        Ok(Box::new(FakeChannel {
            inbound,
            probe: self.probe.clone(),
        }))
    }
}

struct FakeChannel {
    inbound: mpsc::UnboundedReceiver<Result<ServerEvent>>,
    probe: ChannelProbe,
}

#[async_trait]
impl PushChannel for FakeChannel {
    async fn emit(&mut self, command: &Command) -> Result<()> {
        if self.probe.is_closed() {
            return Err(Error::Channel("closed".to_string()));
        }
        self.probe.sent.lock().unwrap().push(command.clone());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<Result<ServerEvent>> {
        self.inbound.recv().await
    }

    async fn close(&mut self) -> Result<()> {
        self.probe.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ========================================
// Authentication
// ========================================

/// Login endpoint returning a fixed response
pub struct FakeAuthApi {
    response: std::result::Result<LoginResponse, String>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeAuthApi {
    pub fn issuing(token: Option<&str>) -> Self {
        Self {
            response: Ok(LoginResponse {
                token: token.map(str::to_string),
                access_token: None,
            }),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn issuing_access_token(token: &str) -> Self {
        Self {
            response: Ok(LoginResponse {
                token: None,
                access_token: Some(token.to_string()),
            }),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _request: &LoginRequest<'_>) -> Result<LoginResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(Error::Http)
    }
}

// ========================================
// Waiting
// ========================================

/// Wait for the dashboard to reach a state, failing the test after a timeout
pub async fn wait_for_state(
    handle: &DashboardHandle,
    predicate: impl FnMut(&DashboardState) -> bool,
) -> DashboardState {
    tokio::time::timeout(WAIT_TIMEOUT, handle.wait_for(predicate))
        .await
        .expect("timed out waiting for dashboard state")
        .expect("dashboard task ended")
}

/// Poll a condition, failing the test after a timeout
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT_TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
