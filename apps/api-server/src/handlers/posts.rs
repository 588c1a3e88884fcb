//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{NewPost, Post, PostPatch, PostQuery, PostStatus};
use scribe_shared::dto::{
    CreatePostRequest, ListPostsQuery, PostListResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content_json: post.content_json,
        content_html: post.content_html,
        status: post.status.to_string(),
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// An id that is not a UUID cannot name an existing post.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post with id {} not found", raw)))
}

/// POST /api/posts/
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let post = state
        .posts
        .create(NewPost {
            title: req.title.flatten(),
            content_json: req.content_json,
            content_html: req.content_html,
            author_id: None,
        })
        .await?;

    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /api/posts/?status=&skip=&limit=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let req = query.into_inner();

    // Status is an exact match: a value no post can hold selects nothing.
    let status = match req.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.parse::<PostStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                tracing::debug!(status = %raw, "Unknown status filter, empty result");
                return Ok(HttpResponse::Ok().json(PostListResponse {
                    posts: Vec::new(),
                    total: 0,
                }));
            }
        },
    };

    let page = state
        .posts
        .list(PostQuery {
            status,
            offset: req.skip.unwrap_or(0),
            limit: req.limit.unwrap_or(PostQuery::DEFAULT_LIMIT),
        })
        .await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: page.posts.into_iter().map(to_response).collect(),
        total: page.total,
    }))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.posts.get(id).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let post = state
        .posts
        .update(
            id,
            PostPatch {
                title: req.title.flatten(),
                content_json: req.content_json,
                content_html: req.content_html,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /api/posts/{id}/publish
pub async fn publish_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.posts.publish(id).await?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    if state.posts.delete(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound(format!("Post with id {} not found", id)))
    }
}
