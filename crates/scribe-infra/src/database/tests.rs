#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use serde_json::json;

    use crate::database::entity::post;
    use crate::database::sql_repo::SqlPostRepository;
    use scribe_core::domain::{NewPost, Post, PostQuery, PostStatus};
    use scribe_core::error::RepoError;
    use scribe_core::ports::{BaseRepository, PostRepository};

    fn post_model(title: &str, status: post::Status) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            content_json: Some(json!({
                "root": {
                    "children": [{"type": "text", "text": "Hello", "format": 1, "bold": true}],
                    "version": 1
                }
            })),
            content_html: Some("<p>Hello</p>".to_owned()),
            status,
            author_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let model = post_model("Test Post", post::Status::Draft);
        let post_id = model.id;
        let tree = model.content_json.clone();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let repo = SqlPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.content_json, tree);
    }

    #[tokio::test]
    async fn test_insert_returns_stored_post() {
        let post = Post::new(NewPost {
            title: Some("Fresh".to_string()),
            ..Default::default()
        });
        let stored = post::Model {
            id: post.id,
            title: post.title.clone(),
            content_json: None,
            content_html: None,
            status: post::Status::Draft,
            author_id: None,
            created_at: post.created_at.into(),
            updated_at: post.updated_at.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();
        let repo = SqlPostRepository::new(db);

        let saved = repo.insert(post.clone()).await.unwrap();

        assert_eq!(saved, post);
    }

    #[tokio::test]
    async fn test_list_returns_page_and_total() {
        let published = post_model("Published", post::Status::Published);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(7)),
            )])]])
            .append_query_results([vec![published.clone()]])
            .into_connection();
        let repo = SqlPostRepository::new(db);

        let page = repo
            .list(&PostQuery {
                status: Some(PostStatus::Published),
                offset: 3,
                limit: 1,
            })
            .await
            .unwrap();

        assert_eq!(page.total, 7);
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].id, published.id);
        assert_eq!(page.posts[0].status, PostStatus::Published);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        let repo = SqlPostRepository::new(db);

        let result = repo.update(Post::new(NewPost::default())).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = SqlPostRepository::new(db);

        let result = BaseRepository::<Post, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
