//! Editorial text generation handler.

use actix_web::{HttpResponse, web};

use scribe_core::domain::GenerationAction;
use scribe_shared::dto::{GenerateRequest, GenerateResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/ai/generate
///
/// Always answers with some text: provider failures fall back to an
/// offline result.
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;
    let action: GenerationAction = req.action.parse()?;

    let result = state.generation.generate(&req.text, action).await;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        result,
        action: action.to_string(),
    }))
}
