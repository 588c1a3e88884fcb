//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_PASSWORD_CHARS: usize = 128;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_GENERATION_TEXT_CHARS: usize = 50_000;

/// Deserialize a present field as `Some`, so that with `#[serde(default)]`
/// an absent field stays `None` and an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------- Posts ----------

/// Request to create a post. Every field may be omitted; `title` may not be `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default)]
    pub content_json: Option<Value>,
    #[serde(default)]
    pub content_html: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if matches!(self.title, Some(None)) {
            return Err(vec!["title cannot be null".to_string()]);
        }
        Ok(())
    }
}

/// Partial update of a post. Only fields present in the body are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content_json: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub content_html: Option<Option<String>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if matches!(self.title, Some(None)) {
            return Err(vec!["title cannot be null".to_string()]);
        }
        Ok(())
    }
}

/// Query string for listing posts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content_json: Option<Value>,
    pub content_html: Option<String>,
    pub status: String,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of posts plus the size of the filtered set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: u64,
}

// ---------- Auth ----------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push("email must be a valid email address".to_string());
        }
        let password_chars = self.password.chars().count();
        if password_chars < MIN_PASSWORD_CHARS {
            errors.push(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ));
        }
        if password_chars > MAX_PASSWORD_CHARS {
            errors.push(format!(
                "password must be at most {MAX_PASSWORD_CHARS} characters"
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        if !is_valid_email(&self.email) {
            return Err(vec!["email must be a valid email address".to_string()]);
        }
        Ok(())
    }
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

// ---------- Generation ----------

/// Request to run an editorial action over some text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub action: String,
}

impl GenerateRequest {
    /// Shape checks on `text`. The action name is checked against the
    /// supported set by the caller.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let chars = self.text.chars().count();
        if chars == 0 {
            return Err(vec!["text must not be empty".to_string()]);
        }
        if chars > MAX_GENERATION_TEXT_CHARS {
            return Err(vec![format!(
                "text must be at most {MAX_GENERATION_TEXT_CHARS} characters"
            )]);
        }
        Ok(())
    }
}

/// Generated text and the action that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub result: String,
    pub action: String,
}

/// Structural email check: one `@`, a non-empty local part, and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty()
        || email.chars().count() > MAX_EMAIL_CHARS
        || email.chars().any(char::is_whitespace)
    {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let req: UpdatePostRequest =
            serde_json::from_value(json!({"content_html": null, "content_json": {"a": 1}}))
                .unwrap();

        assert!(req.title.is_none());
        assert_eq!(req.content_html, Some(None));
        assert_eq!(req.content_json, Some(Some(json!({"a": 1}))));
    }

    #[test]
    fn test_create_request_title_may_be_omitted_but_not_null() {
        let omitted: CreatePostRequest = serde_json::from_value(json!({})).unwrap();
        assert!(omitted.title.is_none());
        assert!(omitted.validate().is_ok());

        let null: CreatePostRequest = serde_json::from_value(json!({"title": null})).unwrap();
        assert!(null.validate().is_err());
    }

    #[test]
    fn test_update_request_null_title_is_invalid() {
        let req: UpdatePostRequest = serde_json::from_value(json!({"title": null})).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@.example.com"));
        assert!(!is_valid_email("user @example.com"));
    }

    #[test]
    fn test_signup_password_bounds() {
        let short = SignupRequest {
            email: "a@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = SignupRequest {
            password: "123456".to_string(),
            ..short
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_generate_text_bounds() {
        let empty = GenerateRequest {
            text: String::new(),
            action: "summarize".to_string(),
        };
        assert!(empty.validate().is_err());

        let too_long = GenerateRequest {
            text: "a".repeat(MAX_GENERATION_TEXT_CHARS + 1),
            ..empty
        };
        assert!(too_long.validate().is_err());
    }
}
