//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use scribe_core::ports::{PasswordService, PostRepository, RateLimiter, TokenService, UserRepository};
use scribe_core::services::{AccountService, GenerationService, PostService};
use scribe_infra::database::connect;
use scribe_infra::{
    Argon2PasswordService, ChatCompletionGenerator, DatabaseConfig, InMemoryPostRepository,
    InMemoryRateLimiter, InMemoryUserRepository, JwtTokenService, SqlPostRepository,
    SqlUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub generation: GenerationService,
    /// Applied to the AI routes. `None` lets every request through.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Falls back to in-memory repositories when the database is unreachable
    /// or its migrations fail.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, users) = match open_database(&config.database).await {
            Some(repos) => repos,
            None => in_memory_repositories(),
        };

        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let rate_limiter = config.rate_limit.clone().map(|limits| {
            tracing::info!(
                max_requests = limits.max_requests,
                window_secs = limits.window.as_secs(),
                "Rate limiting enabled for AI routes"
            );
            Arc::new(InMemoryRateLimiter::new(limits)) as Arc<dyn RateLimiter>
        });

        tracing::info!("Application state initialized");

        Self {
            posts: PostService::new(posts),
            accounts: AccountService::new(users, passwords, tokens),
            generation: GenerationService::new(ChatCompletionGenerator::from_config(
                &config.generation,
            )),
            rate_limiter,
        }
    }

    /// State with in-memory storage, no text generation provider and the
    /// given token service. Used by tests.
    pub fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        let (posts, users) = in_memory_repositories();

        Self {
            posts: PostService::new(posts),
            accounts: AccountService::new(users, Arc::new(Argon2PasswordService::new()), tokens),
            generation: GenerationService::offline(),
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }
}

fn in_memory_repositories() -> Repositories {
    let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    (posts, users)
}

async fn open_database(config: &DatabaseConfig) -> Option<Repositories> {
    let conn = match connect(config).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return None;
        }
    };

    if config.auto_migrate {
        if let Err(e) = Migrator::up(&conn, None).await {
            tracing::error!("Failed to run migrations: {}. Using in-memory fallback.", e);
            return None;
        }
        tracing::info!("Database migrations applied");
    }

    let conn = Arc::new(conn);
    let posts: Arc<dyn PostRepository> = Arc::new(SqlPostRepository::new(Arc::clone(&conn)));
    let users: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(conn));
    Some((posts, users))
}
