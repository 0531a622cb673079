// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod listings;

// Check pipeline stages, in run order
pub mod select;
pub mod matcher;
pub mod dedup;
pub mod notify;
pub mod ledger;

pub mod engine;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::config::Settings;
pub use crate::engine::{list_cinemas, run_check, RunReport};
pub use crate::error::RunError;
pub use crate::ledger::{NotificationLedger, SeenUrls};
pub use crate::listings::{Cinema, Film, Listings, ListingsSource, Show};
pub use crate::notify::{NotificationTransport, Notifier, SmsReceipt, TransportError};
