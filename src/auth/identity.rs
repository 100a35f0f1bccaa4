use tracing::debug;

use super::Claims;
use crate::database::error::TaskError;

/// Authenticated caller extracted from a verified JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub subject: String,
    pub issuer: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            issuer: claims.iss,
        }
    }
}

/// Per-call context handed to every task operation
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    identity: Option<AuthUser>,
}

impl RequestContext {
    pub fn authenticated(user: AuthUser) -> Self {
        Self { identity: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&AuthUser> {
        self.identity.as_ref()
    }
}

impl From<Option<AuthUser>> for RequestContext {
    fn from(identity: Option<AuthUser>) -> Self {
        Self { identity }
    }
}

/// The caller's subject, or `Unauthenticated`. Every layer that touches tasks calls this itself.
pub fn require_user_id(ctx: &RequestContext) -> Result<String, TaskError> {
    match ctx.identity() {
        Some(user) if !user.subject.is_empty() => Ok(user.subject.clone()),
        _ => {
            debug!("Rejecting call without an authenticated identity");
            Err(TaskError::Unauthenticated)
        }
    }
}
