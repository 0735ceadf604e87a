//! Caller resolution shared by every entry point

use presence_core::traits::Identity;
use presence_core::{DomainError, User};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Resolve the bearer token to an identity, or fail with `Unauthenticated`
pub(crate) async fn resolve_identity(
    ctx: &ServiceContext,
    token: Option<&str>,
) -> ServiceResult<Identity> {
    ctx.identity()
        .resolve(token)
        .await?
        .ok_or_else(ServiceError::unauthenticated)
}

/// Resolve the bearer token to a provisioned user
///
/// Fails with `Unauthenticated` when the token does not resolve and with
/// `UserNotRegistered` when the identity has no user record.
pub(crate) async fn resolve_caller(ctx: &ServiceContext, token: Option<&str>) -> ServiceResult<User> {
    let identity = resolve_identity(ctx, token).await?;
    ctx.user_repo()
        .find_by_token_identifier(&identity.token_identifier)
        .await?
        .ok_or_else(|| DomainError::UserNotRegistered.into())
}
