use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// How long `stop()` lets a module exit on its own before killing it.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(3000);

/// Something that owns child processes: a single module or a batch of them.
#[async_trait]
pub trait Supervised: Send {
    async fn start(&mut self) -> Result<()>;

    async fn wait(&mut self) -> Result<()>;

    async fn stop_in(&mut self, timeout: Duration) -> Result<()>;

    async fn stop(&mut self) -> Result<()> {
        self.stop_in(DEFAULT_STOP_TIMEOUT).await
    }

    /// One-shot execution: start, then wait for termination.
    async fn run(&mut self) -> Result<()> {
        self.start().await?;
        self.wait().await
    }
}
