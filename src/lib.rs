#![doc(test(attr(deny(warnings))))]

//! Contract Forms is a schema-driven form engine for licensing contracts: a nested
//! record addressed by dot paths, per-line field catalogs, lock/clear composites,
//! bulk-apply, required-field validation, and import of prior contracts, plus an
//! interactive shell that drives it.

pub mod access;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod record;
pub mod utils;

use std::sync::Once;

pub use errors::{FormError, Result};
pub use form::FormStore;
pub use record::{ContractLine, ContractRecord, FieldPath};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Contract Forms tracing initialized.");
    });
}
