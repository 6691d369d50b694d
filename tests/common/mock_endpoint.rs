//! Mock control endpoint for testing session lifecycle behavior.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use yumi::session::ControlEndpoint;

#[derive(Default)]
pub struct MockEndpoint {
    pub fail_connect: bool,
    pub fail_auth: bool,
    pub fail_close: bool,
    closes: Arc<AtomicUsize>,
}

impl MockEndpoint {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn failing_auth() -> Self {
        Self {
            fail_auth: true,
            ..Self::default()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Self::default()
        }
    }

    pub fn closes_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl ControlEndpoint for MockEndpoint {
    async fn connect(&mut self) -> anyhow::Result<()> {
        if self.fail_connect {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    async fn authenticate(&mut self) -> anyhow::Result<()> {
        if self.fail_auth {
            anyhow::bail!("token rejected");
        }
        Ok(())
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            anyhow::bail!("close frame lost");
        }
        Ok(())
    }
}
