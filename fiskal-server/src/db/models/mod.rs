//! Database Models
//!
//! Typed records for the embedded SurrealDB tables. Chain entries and the
//! append-only logs are immutable once persisted; none of them has an
//! update/delete surface in the repository layer.

pub mod chain_entry;
pub mod error_log;
pub mod fiscal_config;
pub mod transaction;
pub mod transmission_log;
pub mod z_report;

pub use chain_entry::{ChainEntry, ChainStamp, PayloadKind};
pub use error_log::ErrorLogEntry;
pub use fiscal_config::{AuthorityCredentials, AuthorityEnvironment, FiscalConfig, TenantStatus};
pub use transaction::{NewTransaction, Transaction};
pub use transmission_log::{TransmissionLogEntry, TransmissionStatus};
pub use z_report::{ZReport, ZReportStatus};
