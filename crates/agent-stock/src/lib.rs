//! Narrated multi-agent stock analysis desk
//!
//! A query goes to an external agent graph where a supervisor coordinates
//! four workers. Their streamed messages are filtered into per-agent outputs
//! and a spoken transcript, which is rendered to one clip per agent and
//! played back in pipeline order.
//!
//! # Architecture
//!
//! - [`StockBot`]: command handling, the analysis turn and the voice turn
//! - [`AnalysisRunner`]: drives one graph run and reports progress
//! - [`filter`]: decides which messages are displayed and which are spoken
//! - [`SessionState`]: everything a session remembers between turns
//! - [`interface`]: text rendering for terminal front-ends
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_playback::NoOpSurface;
//! use agent_stock::{Reply, SessionState, StockBot, StockConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = StockBot::from_config(StockConfig::from_env()?)?;
//!     let mut session = SessionState::new();
//!
//!     if let Reply::Message(text) = bot
//!         .process_input("Find 2 promising NSE banking stocks", &mut session, &mut NoOpSurface)
//!         .await?
//!     {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod bot;
pub mod config;
pub mod error;
pub mod filter;
pub mod interface;
pub mod prompts;
pub mod session;

// Re-export main types for convenience
pub use analysis::{
    AnalysisEventHandler, AnalysisOutcome, AnalysisRunner, NoOpEventHandler, build_request,
};
pub use bot::{Command, Reply, StockBot};
pub use config::{ApiState, ApiStatus, StockConfig, StockConfigBuilder};
pub use error::{ErrorCategory, Result, StockError};
pub use filter::OutputCollector;
pub use session::{DEFAULT_QUERY, SessionState};
