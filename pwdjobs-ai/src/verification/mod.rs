//! Identity verification flows

pub mod consistency;
pub mod document;
pub mod liveness;

pub use document::verify_document;
pub use liveness::check_liveness;
