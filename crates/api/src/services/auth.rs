//! Account lifecycle service: signup, login, password management,
//! deactivation and deletion.
//!
//! Destructive actions (deactivate, delete) and the password change are
//! gated on re-entering the current password; the gate failing surfaces
//! as a `wrong_password` field error, never as a silent no-op.

use chrono::{Duration, Utc};
use domain::models::member::{
    self, LoginRequest, PasswordChangeRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    SignupRequest,
};
use domain::models::Member;
use persistence::repositories::{MemberRepository, PasswordResetRepository, SessionRepository};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::config::Config;
use crate::error::ApiError;
use crate::services::EmailService;

/// Code attached to failed login attempts.
pub const INVALID_LOGIN_CODE: &str = "invalid_login";

/// Message shown for failed login attempts. Deliberately identical for
/// unknown usernames, wrong passwords and deactivated accounts.
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Message shown when a password reset token does not resolve.
pub const INVALID_RESET_TOKEN_MESSAGE: &str =
    "The password reset link was invalid, possibly because it has already been used.";

/// A successful login: the member and the one-time-visible session token.
pub struct LoginOutcome {
    pub member: Member,
    pub token: String,
}

/// Service wrapping account operations over the member, session and
/// reset-token repositories.
#[derive(Clone)]
pub struct AuthService {
    members: MemberRepository,
    sessions: SessionRepository,
    reset_tokens: PasswordResetRepository,
    email: EmailService,
    config: Arc<Config>,
}

impl AuthService {
    /// Creates a new AuthService with the given pool and configuration.
    pub fn new(pool: PgPool, config: Arc<Config>) -> Self {
        Self {
            members: MemberRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            reset_tokens: PasswordResetRepository::new(pool),
            email: EmailService::new(config.email.clone()),
            config,
        }
    }

    /// Register a new member account.
    pub async fn signup(&self, req: SignupRequest) -> Result<Member, ApiError> {
        req.validate()?;

        if req.password1 != req.password2 {
            return Err(ApiError::field(
                "password2",
                member::PASSWORD_MISMATCH_CODE,
                member::PASSWORD_MISMATCH_MESSAGE,
            ));
        }

        if self.members.username_exists(&req.username).await? {
            return Err(ApiError::field(
                "username",
                member::UNIQUE_USERNAME_CODE,
                member::UNIQUE_USERNAME_MESSAGE,
            ));
        }

        let password_hash = shared::password::hash_password(&req.password1)?;
        let entity = self
            .members
            .create_member(
                &req.username,
                &password_hash,
                &req.first_name,
                &req.last_name,
                &req.email,
            )
            .await?;

        info!(username = %entity.username, "Member signed up");
        Ok(entity.into())
    }

    /// Authenticate a member and open a new session.
    ///
    /// Unknown usernames, wrong passwords and deactivated accounts all
    /// fail the same way.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome, ApiError> {
        req.validate()?;

        let invalid_login = || {
            ApiError::field("__all__", INVALID_LOGIN_CODE, INVALID_LOGIN_MESSAGE)
        };

        let entity = self
            .members
            .find_by_username(&req.username)
            .await?
            .ok_or_else(invalid_login)?;

        if !shared::password::verify_password(&req.password, &entity.password_hash)? {
            warn!(username = %req.username, "Failed login attempt");
            return Err(invalid_login());
        }

        if !entity.is_active {
            warn!(username = %req.username, "Login attempt on deactivated account");
            return Err(invalid_login());
        }

        let token = shared::crypto::generate_token();
        let token_hash = shared::crypto::sha256_hex(&token);
        let expires_at = Utc::now() + Duration::seconds(self.config.security.session_expiry_secs);

        self.sessions
            .create_session(entity.id, &token_hash, expires_at)
            .await?;

        info!(username = %entity.username, "Member logged in");
        Ok(LoginOutcome {
            member: entity.into(),
            token,
        })
    }

    /// End the session behind the presented token.
    pub async fn logout(&self, token_hash: &str) -> Result<(), ApiError> {
        self.sessions.delete_by_token_hash(token_hash).await?;
        Ok(())
    }

    /// Change a logged-in member's password.
    ///
    /// Every other session the member holds is ended; the session that
    /// performed the change stays valid.
    pub async fn change_password(
        &self,
        member: &Member,
        token_hash: &str,
        req: PasswordChangeRequest,
    ) -> Result<(), ApiError> {
        req.validate()?;

        if !shared::password::verify_password(&req.old_password, &member.password_hash)? {
            return Err(ApiError::field(
                "old_password",
                member::WRONG_PASSWORD_CODE,
                member::WRONG_PASSWORD_MESSAGE,
            ));
        }

        if req.new_password1 != req.new_password2 {
            return Err(ApiError::field(
                "new_password2",
                member::PASSWORD_MISMATCH_CODE,
                member::PASSWORD_MISMATCH_MESSAGE,
            ));
        }

        if req.new_password1 == req.old_password {
            return Err(ApiError::field(
                "new_password1",
                member::UNIQUE_PASSWORD_CODE,
                member::UNIQUE_PASSWORD_MESSAGE,
            ));
        }

        let password_hash = shared::password::hash_password(&req.new_password1)?;
        self.members
            .update_password(member.id, &password_hash)
            .await?;
        self.sessions
            .delete_for_member_except(member.id, token_hash)
            .await?;

        info!(username = %member.username, "Password changed");
        Ok(())
    }

    /// Start a password reset for every active account under an email.
    ///
    /// Succeeds whether or not the address is known, so the endpoint
    /// never discloses which emails have accounts.
    pub async fn start_password_reset(&self, req: PasswordResetRequest) -> Result<(), ApiError> {
        req.validate()?;

        let members = self.members.find_active_by_email(&req.email).await?;

        for entity in members {
            let token = shared::crypto::generate_token();
            let token_hash = shared::crypto::sha256_hex(&token);
            let expires_at =
                Utc::now() + Duration::seconds(self.config.security.reset_token_expiry_secs);

            self.reset_tokens
                .create_token(entity.id, &token_hash, expires_at)
                .await?;

            let reset_url = format!(
                "{}/reset-password?token={}",
                self.config.server.app_base_url, token
            );

            if let Err(e) = self
                .email
                .send_password_reset_email(&entity.email, &reset_url)
                .await
            {
                warn!(username = %entity.username, error = %e, "Failed to send reset email");
            }
        }

        Ok(())
    }

    /// Complete a password reset with an emailed token.
    ///
    /// The new password must differ from the current one. Consumes every
    /// reset token the member holds and ends all of the member's sessions.
    pub async fn confirm_password_reset(
        &self,
        req: PasswordResetConfirmRequest,
    ) -> Result<(), ApiError> {
        req.validate()?;

        if req.new_password1 != req.new_password2 {
            return Err(ApiError::field(
                "new_password2",
                member::PASSWORD_MISMATCH_CODE,
                member::PASSWORD_MISMATCH_MESSAGE,
            ));
        }

        let token_hash = shared::crypto::sha256_hex(&req.token);
        let reset = self
            .reset_tokens
            .find_valid_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                ApiError::field("token", "invalid", INVALID_RESET_TOKEN_MESSAGE)
            })?;

        let entity = self
            .members
            .find_by_id(reset.member_id)
            .await?
            .ok_or_else(|| ApiError::field("token", "invalid", INVALID_RESET_TOKEN_MESSAGE))?;

        if shared::password::verify_password(&req.new_password1, &entity.password_hash)? {
            return Err(ApiError::field(
                "new_password1",
                member::UNIQUE_PASSWORD_CODE,
                member::UNIQUE_PASSWORD_MESSAGE,
            ));
        }

        let password_hash = shared::password::hash_password(&req.new_password1)?;
        self.members
            .update_password(reset.member_id, &password_hash)
            .await?;
        self.reset_tokens.delete_for_member(reset.member_id).await?;
        self.sessions.delete_for_member(reset.member_id).await?;

        info!(member_id = %reset.member_id, "Password reset completed");
        Ok(())
    }

    /// Deactivate a member account behind the password gate.
    ///
    /// Data is retained and the account can be reactivated out of band;
    /// every session ends immediately.
    pub async fn deactivate(&self, member: &Member, password: &str) -> Result<(), ApiError> {
        self.check_password_gate(member, password)?;
        self.members.deactivate(member.id).await?;
        info!(username = %member.username, "Member deactivated");
        Ok(())
    }

    /// Permanently delete a member account and everything it owns,
    /// behind the password gate.
    pub async fn delete_account(&self, member: &Member, password: &str) -> Result<(), ApiError> {
        self.check_password_gate(member, password)?;
        self.members.delete_member(member.id).await?;
        info!(username = %member.username, "Member deleted");
        Ok(())
    }

    fn check_password_gate(&self, member: &Member, password: &str) -> Result<(), ApiError> {
        if !shared::password::verify_password(password, &member.password_hash)? {
            return Err(ApiError::field(
                "password",
                member::WRONG_PASSWORD_CODE,
                member::WRONG_PASSWORD_MESSAGE,
            ));
        }
        Ok(())
    }
}
