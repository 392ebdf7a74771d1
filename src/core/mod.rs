pub mod filename;
pub mod mirror;
pub mod sheet;
pub mod transfer;

pub use crate::domain::model::{HttpResponse, Outcome, RunSummary};
pub use crate::domain::ports::{ByteSource, ConnectivityProbe, HttpSource, ObjectStore};
pub use crate::utils::error::Result;
