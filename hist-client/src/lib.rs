//! # hist-client
//!
//! Caller-facing session-history facade for mirrorhist.
//!
//! This is the crate applications bind a history authority into.
//!
//! ## Architecture
//!
//! [`SessionHistory`] keeps a cheap local projection (from hist-core) of
//! the authoritative store's index and length, and routes navigations to
//! whichever authority variant is bound.
//!
//! ```text
//! Caller → SessionHistory → HistoryAuthority (co-located store)
//!               ↓         ↘ HistoryGateway  (delegated authority)
//!          hist-core (pure accounting)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use mirrorhist_client::{AuthorityBinding, SessionHistory};
//!
//! let session = SessionHistory::new(AuthorityBinding::Local(store));
//! if session.can_go(-1) {
//!     session.go(-1, true)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod admission;
pub mod authority;
pub mod gateway;
pub mod mock;
pub mod session;

pub use admission::{AdmissionControl, Caller, UnlimitedAdmission};
pub use authority::HistoryAuthority;
pub use gateway::HistoryGateway;
pub use mock::{DenyingAdmission, MockAuthority, MockGateway};
pub use session::{AuthorityBinding, SessionHistory};
