//! Service components
//!
//! - registry_client: government PWD registry lookups
//! - risk_aggregator: verification signals → risk tier and score
//! - sync_worker: fire-and-forget workspace sync

pub mod registry_client;
pub mod risk_aggregator;
pub mod sync_worker;

pub use registry_client::{RegistryCheck, RegistryClient, RegistryError, RegistryOutcome};
pub use risk_aggregator::{aggregate, RiskInputs};
pub use sync_worker::{LogSink, SyncFailure, SyncQueue, SyncRecord, SyncSink, WebhookSink};
