//! Bar feed module
//!
//! Supplies the ordered bar stream the speedometer consumes

mod jsonl;
mod types;

pub use jsonl::{parse_bar_line, JsonlBarFeed};
pub use types::Bar;

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Trait for bar feed implementations
#[async_trait]
pub trait BarFeed: Send + Sync {
    /// Subscribe to bar updates
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<Bar>>;
}
