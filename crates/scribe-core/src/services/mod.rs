//! Services - use cases composed from domain entities and ports.

mod accounts;
mod generation;
mod posts;

pub use accounts::{AccountService, IssuedToken};
pub use generation::{GenerationService, fallback_response, instruction_for};
pub use posts::PostService;
