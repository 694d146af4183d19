//! `guestbook` - A local visitor guestbook
//!
//! This library records visitor entries (name, message, attendance, time) in a
//! single persistent slot, renders them as a filterable list and lets callers
//! toggle attendance, delete entries or clear the book.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod logging;
pub mod persistence;
pub mod record;
pub mod storage;
pub mod surface;
pub mod view;

pub use config::Config;
pub use controller::{AddOutcome, ClearOutcome, Guestbook, GuestbookOptions, GuestbookStats};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use persistence::GuestStore;
pub use record::{GuestForm, GuestRecord, RecordId};
pub use storage::{SlotBackend, Storage, StorageStats};
pub use surface::{Confirm, Notice, Surface};
pub use view::{GuestbookView, ViewOptions};
