//! SQL repository implementations (SQLite or PostgreSQL through SeaORM).

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use scribe_core::domain::{PostPage, PostQuery, User, mask_email};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::sql_base::{SqlBaseRepository, map_db_err};

/// SQL user repository.
pub type SqlUserRepository = SqlBaseRepository<UserEntity>;

/// SQL post repository.
pub type SqlPostRepository = SqlBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn list(&self, query: &PostQuery) -> Result<PostPage, RepoError> {
        let mut select = PostEntity::find();
        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(post::Status::from(status)));
        }

        let total = select.clone().count(&*self.db).await.map_err(map_db_err)?;

        let posts = select
            .order_by_desc(post::Column::UpdatedAt)
            .order_by_desc(post::Column::CreatedAt)
            .offset(query.offset)
            .limit(query.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(PostPage {
            posts: posts.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
