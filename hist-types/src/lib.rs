//! # hist-types
//!
//! Shared types for the mirrorhist session-history mirror.
//!
//! This crate provides the foundational types used across all mirrorhist
//! crates:
//! - [`ChangeId`], [`Epoch`] - Identity and ordering types
//! - [`GoRequest`], [`ReloadFlags`] - Boundary payloads handed to a
//!   delegated history authority
//! - [`HistoryError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;

pub use error::HistoryError;
pub use ids::{ChangeId, Epoch};
pub use messages::{GoRequest, ReloadFlags};
