//! Authentication session lifecycle for the learning platform clients.
//!
//! This crate owns everything the browser client and the CLI share: the wire
//! DTOs, local form validation, the token store contract, the REST transport
//! contracts, and the two stores (auth session and profile) that UI layers
//! read from. It performs no I/O itself; each front end plugs in its own
//! [`TokenStore`] and transport implementation.
//!
//! ARCHITECTURE
//! ============
//! `guard` -> `store` -> `transport` -> `token`. Successful login/register
//! populate the [`SessionStore`]; route guards and pages observe it through
//! `subscribe()` snapshots rather than reaching into shared globals.

pub mod config;
pub mod error;
pub mod guard;
pub mod profile;
pub mod store;
pub mod token;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use config::ApiConfig;
pub use error::SessionError;
pub use guard::{GuardDecision, GuardOptions, RouteGuard};
pub use profile::{ProfileState, ProfileStore};
pub use store::{Session, SessionPhase, SessionStore};
pub use token::{MemoryTokenStore, TokenStore};
pub use transport::{AuthApi, ProfileApi};
