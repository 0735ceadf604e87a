//! User service - account provisioning and member numbers

use tracing::{debug, info, instrument, warn};

use presence_core::traits::Identity;
use presence_core::{AuditLog, DomainError, MemberNumber, Role, Snowflake, User};

use crate::dto::{BackfillResponse, CurrentUserResponse, ProvisionResponse};

use super::caller::{resolve_caller, resolve_identity};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Attempts at claiming a member number before giving up
const MEMBER_NUMBER_ATTEMPTS: usize = 5;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the caller's account on first sign-in, or return the existing one
    #[instrument(skip(self, token))]
    pub async fn provision_current_user(&self, token: Option<&str>) -> ServiceResult<ProvisionResponse> {
        let identity = resolve_identity(self.ctx, token).await?;

        if let Some(existing) = self.find_by_identity(&identity).await? {
            return Ok(existing.id.into());
        }

        let mut user = self.new_account(identity);
        for attempt in 1..=MEMBER_NUMBER_ATTEMPTS {
            user.member_number = Some(self.next_member_number().await?);

            match self.ctx.user_repo().create(&user).await {
                Ok(()) => {
                    self.record_account_created(user.id).await;
                    info!(
                        user_id = %user.id,
                        role = %user.role,
                        member_number = ?user.member_number.map(|n| n.to_string()),
                        "User provisioned"
                    );
                    return Ok(user.id.into());
                }
                Err(DomainError::TokenIdentifierExists) => {
                    debug!("Concurrent sign-in created the account first");
                    let winner = self
                        .ctx
                        .user_repo()
                        .find_by_token_identifier(&user.token_identifier)
                        .await?
                        .ok_or_else(|| ServiceError::internal("provisioned user vanished"))?;
                    return Ok(winner.id.into());
                }
                Err(DomainError::MemberNumberExists) => {
                    debug!(attempt, "Member number taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::conflict("could not allocate a member number"))
    }

    /// The caller's account, or `None` if it has not been provisioned
    ///
    /// # Errors
    /// * `Unauthenticated` - the token does not resolve
    /// * `AccountRestricted` - the account is under review
    #[instrument(skip(self, token))]
    pub async fn get_current_user(
        &self,
        token: Option<&str>,
    ) -> ServiceResult<Option<CurrentUserResponse>> {
        let identity = resolve_identity(self.ctx, token).await?;
        let Some(user) = self.find_by_identity(&identity).await? else {
            return Ok(None);
        };

        if user.account_access_restricted {
            return Err(DomainError::AccountRestricted.into());
        }
        Ok(Some(user.into()))
    }

    /// Assign member numbers to every account that has none (owners only)
    #[instrument(skip(self, token))]
    pub async fn backfill_member_numbers(&self, token: Option<&str>) -> ServiceResult<BackfillResponse> {
        let caller = resolve_caller(self.ctx, token).await?;
        if !caller.is_owner() {
            return Err(ServiceError::forbidden("Only owners can run this migration"));
        }

        let pending = self.ctx.user_repo().list_without_member_number().await?;
        let mut updated = 0_u64;
        for user in pending {
            self.assign_member_number(user.id).await?;
            updated += 1;
        }

        info!(caller_id = %caller.id, updated, "Member numbers backfilled");
        Ok(BackfillResponse::new(updated))
    }

    /// First free member number at or after `user count + 1`
    pub async fn next_member_number(&self) -> ServiceResult<MemberNumber> {
        let repo = self.ctx.user_repo();
        let mut candidate = MemberNumber::after(repo.count().await?)?;
        while repo.member_number_exists(candidate).await? {
            candidate = candidate.next()?;
        }
        Ok(candidate)
    }

    async fn assign_member_number(&self, id: Snowflake) -> ServiceResult<MemberNumber> {
        for attempt in 1..=MEMBER_NUMBER_ATTEMPTS {
            let number = self.next_member_number().await?;
            match self.ctx.user_repo().set_member_number(id, number).await {
                Ok(()) => return Ok(number),
                Err(DomainError::MemberNumberExists) => {
                    debug!(user_id = %id, attempt, "Member number taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ServiceError::conflict("could not allocate a member number"))
    }

    async fn find_by_identity(&self, identity: &Identity) -> ServiceResult<Option<User>> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_token_identifier(&identity.token_identifier)
            .await?)
    }

    fn new_account(&self, identity: Identity) -> User {
        let role = if self.is_super_admin(identity.email.as_deref()) {
            Role::Owner
        } else {
            Role::Member
        };

        let now = self.ctx.clock().now();
        let mut user = User::new(self.ctx.generate_id(), identity.token_identifier, role);
        user.name = identity.name;
        user.email = identity.email;
        user.avatar = identity.picture;
        user.created_at = now;
        user.updated_at = now;
        user
    }

    fn is_super_admin(&self, email: Option<&str>) -> bool {
        match (self.ctx.super_admin_email(), email) {
            (Some(admin), Some(email)) => email.trim().eq_ignore_ascii_case(admin),
            _ => false,
        }
    }

    async fn record_account_created(&self, user_id: Snowflake) {
        let entry = AuditLog::account_created(self.ctx.generate_id(), user_id, self.ctx.clock().now());
        if let Err(e) = self.ctx.audit_log_repo().insert(&entry).await {
            warn!(user_id = %user_id, error = %e, "Failed to write audit log");
        }
    }
}
