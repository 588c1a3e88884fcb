//! Domain entities - the core business objects.

mod generation;
mod post;
mod user;

pub use generation::GenerationAction;
pub use post::{
    DEFAULT_POST_TITLE, MAX_TITLE_CHARS, NewPost, Post, PostPage, PostPatch, PostQuery,
    PostStatus,
};
pub use user::{User, mask_email};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision every storage backend round-trips (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
