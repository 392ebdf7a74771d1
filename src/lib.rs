pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{R2Store, RetryingHttpClient, TcpProbe};
pub use config::MirrorConfig;
pub use crate::core::{mirror::MirrorEngine, transfer::TransferWorker};
pub use domain::model::{Outcome, RunSummary};
pub use utils::error::{MirrorError, Result};
pub use utils::run_log::RunLog;
