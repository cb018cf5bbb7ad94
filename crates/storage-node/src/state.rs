//! Shared storage-node state: the data map plus the registration
//! lifecycle flags the heartbeat loop and the HTTP handlers both read.

use crate::store::{InMemoryStore, Store};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::Notify;

pub struct StorageNodeState {
    pub node_id: String,
    pub address: String,
    pub port: u16,
    pub gateway_address: String,
    pub store: InMemoryStore,
    /// Whether the background heartbeat loop should keep iterating.
    pub running: AtomicBool,
    /// Whether the gateway currently acknowledges this node.
    pub registered: AtomicBool,
    /// Set by `admin_shutdown`; `health()` reports `stopping` once set so
    /// the gateway's direct probe fails fast instead of waiting out the
    /// heartbeat timeout.
    pub explicitly_stopped: AtomicBool,
    /// Notified on `shutdown()`, so the HTTP server's graceful-shutdown
    /// future wakes promptly instead of polling.
    pub shutdown_notify: Notify,
    started_at: Instant,
}

impl StorageNodeState {
    pub fn new(node_id: String, address: String, port: u16, gateway_address: String) -> Self {
        Self {
            node_id,
            address,
            port,
            gateway_address,
            store: InMemoryStore::new(),
            running: AtomicBool::new(true),
            registered: AtomicBool::new(false),
            explicitly_stopped: AtomicBool::new(false),
            shutdown_notify: Notify::new(),
            started_at: Instant::now(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_stopping(&self) -> bool {
        self.explicitly_stopped.load(Ordering::SeqCst)
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn shutdown(&self) {
        self.explicitly_stopped.store(true, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        self.shutdown_notify.notify_waiters();
    }
}
