//! Access control for tavla: scoped, time-boxed tokens and the actor model.
//!
//! A caller proves its identity out-of-band (see `tavla-crypto`), receives a
//! signed token carrying its granted scopes, and presents that token on every
//! protected request. Verification reconstructs an [`Actor`] and enforces
//! "at least one required scope" before any repository work happens.

mod actor;
mod scope;
mod token;

pub use actor::*;
pub use scope::*;
pub use token::*;

/// Default token lifetime when a request does not specify one.
pub const DEFAULT_TTL_SECS: u64 = 1200;

/// Hard upper bound on requested token lifetime.
pub const MAX_TTL_SECS: u64 = 2400;

/// Scope pair gating read endpoints.
pub const READ_SCOPES: [ProjectScope; 2] = [ProjectScope::Read, ProjectScope::ReadSelf];

/// Scope pair gating write endpoints.
pub const WRITE_SCOPES: [ProjectScope; 2] = [ProjectScope::Write, ProjectScope::WriteSelf];
