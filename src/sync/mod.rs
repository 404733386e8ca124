//! Sync module
//!
//! The consolidation (exposure netting) use case.

mod orchestrator;

pub use orchestrator::{SyncError, SyncRemittanceOrdersHandler, SyncReport};
