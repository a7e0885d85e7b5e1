//! Core types and domain logic for the grange backend.
//!
//! This crate holds everything the HTTP server builds on:
//! - `event` and `recurrence` for the calendar and its rollover pass
//! - `ledger`, `note` and `home` record types
//! - `store` traits (with in-memory and hosted-database implementations)
//! - `assistant` and `media` collaborator clients
//! - `config` for the server's TOML + environment configuration

pub mod assistant;
pub mod config;
pub mod error;
pub mod event;
pub mod home;
pub mod ledger;
pub mod media;
pub mod note;
pub mod recurrence;
pub mod store;

pub use error::{GrangeError, GrangeResult};
pub use event::{Event, NewEvent, Recurrence};
pub use home::HomeSection;
pub use ledger::{LedgerEntry, LedgerKind, MonthSummary, NewLedgerEntry};
pub use note::{NewNote, Note};
