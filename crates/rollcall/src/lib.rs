//! `rollcall` - Guardian roster and messaging deep-link outreach
//!
//! This library keeps an in-memory roster of students and guardian phone
//! numbers, composes pre-filled messaging links, and tracks one bulk message
//! across a selection of contacts. A connectivity gate swaps the roster for a
//! small offline game while the network is unreachable.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod bulk;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod contact;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod link;
pub mod logging;
pub mod roster;
pub mod selection;
pub mod shell;

pub use bulk::{BulkSession, CloseAction, DispatchOutcome, RecipientState};
pub use config::Config;
pub use connectivity::{Connectivity, ConnectivityHandle, ConnectivityMonitor, ConnectivitySource};
pub use contact::{ContactRecord, RecordId};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use link::{compose_link, LinkComposer};
pub use logging::init_logging;
pub use roster::Roster;
pub use selection::Selection;
pub use shell::Shell;
