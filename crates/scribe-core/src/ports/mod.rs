//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod generation;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use generation::{GenerationError, TextGenerator};
pub use rate_limit::{RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, PostRepository, UserRepository};
