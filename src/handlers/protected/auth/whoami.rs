// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use serde::Serialize;

use crate::auth::{require_user_id, RequestContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Whoami {
    pub subject: String,
    pub issuer: String,
}

/// GET /api/auth/whoami - the subject the current token resolves to
pub async fn whoami(ctx: RequestContext) -> ApiResult<Whoami> {
    let subject = require_user_id(&ctx)?;
    let issuer = ctx
        .identity()
        .map(|user| user.issuer.clone())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    Ok(ApiResponse::success(Whoami { subject, issuer }))
}
