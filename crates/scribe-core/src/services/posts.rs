//! Document store - the post lifecycle.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPage, PostPatch, PostQuery};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Create, read, list, update, publish and delete posts.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Persist a new draft.
    pub async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        input.validate()?;

        let post = self.repo.insert(Post::new(input)).await?;
        tracing::info!(post_id = %post.id, "Post created");

        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Newest activity first. Any limit is accepted.
    pub async fn list(&self, query: PostQuery) -> Result<PostPage, DomainError> {
        Ok(self.repo.list(&query.bounded()).await?)
    }

    /// Apply a partial update. Status is never changed here.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, DomainError> {
        patch.validate()?;

        let mut post = self.get(id).await?;
        post.apply(patch);

        let post = self.save(post).await?;
        tracing::debug!(post_id = %post.id, "Post updated");

        Ok(post)
    }

    pub async fn publish(&self, id: Uuid) -> Result<Post, DomainError> {
        let mut post = self.get(id).await?;
        post.publish();

        let post = self.save(post).await?;
        tracing::info!(post_id = %post.id, "Post published");

        Ok(post)
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = %id, "Post deleted");
                Ok(true)
            }
            Err(RepoError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let id = post.id;
        self.repo.update(post).await.map_err(|e| match e {
            // Deleted between read and write.
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })
    }
}
