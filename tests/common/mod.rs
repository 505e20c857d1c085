//! In-memory stand-in for the MySQL pool, counting every checkout, release and rollback.
#![allow(dead_code)]

use async_trait::async_trait;
use poolsight::db::{ConnectionSource, DbConnection, PoolStatus};
use poolsight::{PoolsightError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum Behavior {
    Healthy,
    /// Checkouts fail with this message
    AcquireFails(String),
    /// Checkouts succeed but `SELECT 1` fails with this message
    QueryFails(String),
    /// Every `n`th checkout (1-based) gets a connection whose query fails
    QueryFailsEvery(usize),
}

#[derive(Debug, Default)]
pub struct Counters {
    pub acquire_attempts: AtomicUsize,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub pings: AtomicUsize,
}

impl Counters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    pub fn attempts(&self) -> usize {
        self.acquire_attempts.load(Ordering::SeqCst)
    }
}

pub struct MockSource {
    pub counters: Arc<Counters>,
    behavior: Mutex<Behavior>,
    introspection: bool,
    size: u32,
}

impl MockSource {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            behavior: Mutex::new(behavior),
            introspection: true,
            size: 5,
        }
    }

    pub fn healthy() -> Self {
        Self::new(Behavior::Healthy)
    }

    pub fn without_introspection(mut self) -> Self {
        self.introspection = false;
        self
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl ConnectionSource for MockSource {
    async fn acquire(&self) -> Result<Box<dyn DbConnection>> {
        let attempt = self.counters.acquire_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let behavior = self.behavior.lock().unwrap().clone();

        let fail_query = match behavior {
            Behavior::Healthy => None,
            Behavior::AcquireFails(message) => {
                return Err(PoolsightError::ConnectionAcquisition(message))
            }
            Behavior::QueryFails(message) => Some(message),
            Behavior::QueryFailsEvery(n) => {
                (attempt % n == 0).then(|| format!("query {} failed", attempt))
            }
        };

        // Let concurrent checkouts overlap
        tokio::task::yield_now().await;

        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            counters: self.counters.clone(),
            fail_query,
        }))
    }

    fn pool_status(&self) -> Result<PoolStatus> {
        if !self.introspection {
            return Err(PoolsightError::PoolIntrospection(
                "pool does not expose statistics".to_string(),
            ));
        }

        let released = self.counters.released();
        let active = self.counters.acquired().saturating_sub(released) as u32;
        Ok(PoolStatus {
            pool_name: "mock_pool".to_string(),
            configured_size: self.size,
            active_connections: active,
            idle_connections: self.size.saturating_sub(active),
            total_connections: self.size,
        })
    }
}

pub struct MockConnection {
    counters: Arc<Counters>,
    fail_query: Option<String>,
}

#[async_trait]
impl DbConnection for MockConnection {
    async fn ping(&mut self) -> Result<()> {
        self.counters.pings.fetch_add(1, Ordering::SeqCst);
        match &self.fail_query {
            Some(message) => Err(PoolsightError::QueryExecution(message.clone())),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self) -> Result<()> {
        self.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
