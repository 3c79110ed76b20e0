use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::error::ApiError;
use crate::types::Role;

/// Roles permitted on a route group
#[derive(Clone, Copy, Debug)]
pub struct RoleGuard(pub &'static [Role]);

impl RoleGuard {
    pub const STUDENT: RoleGuard = RoleGuard(&[Role::Student]);
    pub const FACULTY: RoleGuard = RoleGuard(&[Role::Faculty]);
    pub const PRINCIPAL: RoleGuard = RoleGuard(&[Role::Principal]);

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

pub async fn require_role_middleware(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !guard.allows(auth_user.role) {
        tracing::warn!(
            "{} ({}) denied access to {}",
            auth_user.email,
            auth_user.role,
            request.uri().path()
        );
        return Err(ApiError::forbidden(format!(
            "This resource is not available to the {} role",
            auth_user.role
        )));
    }

    Ok(next.run(request).await)
}
