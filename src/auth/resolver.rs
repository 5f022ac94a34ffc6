use crate::auth::oauth::ExternalIdentity;
use crate::auth::password::{hash_password, verify_password};
use crate::db::{Storage, User};
use crate::error::ForgeError;
use tracing::info;
use uuid::Uuid;

/// Resolves who the current actor is, against an explicitly injected store
/// handle. Successful resolutions are bound to a session by the HTTP layer.
#[derive(Clone)]
pub struct IdentityResolver {
    storage: Storage,
}

impl IdentityResolver {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Validate a local credential pair. Unknown email, an account without a
    /// local credential, and a failed hash verification all collapse into
    /// `InvalidCredentials`.
    pub async fn resolve_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, ForgeError> {
        let user = self
            .storage
            .user_by_email(email)
            .await?
            .ok_or(ForgeError::InvalidCredentials)?;
        let Some(stored) = user.password.as_deref() else {
            return Err(ForgeError::InvalidCredentials);
        };
        verify_password(password, stored)?;
        Ok(user)
    }

    /// Trust a verified external identity assertion; materialize a user
    /// record on first sight. Repeat assertions for the same subject return
    /// the stored record without touching its profile fields.
    pub async fn resolve_by_external_assertion(
        &self,
        identity: ExternalIdentity,
    ) -> Result<User, ForgeError> {
        if !identity.email_verified {
            return Err(ForgeError::UnverifiedEmail);
        }
        if let Some(existing) = self.storage.user_by_id(&identity.sub).await? {
            return Ok(existing);
        }
        let user = User {
            id: identity.sub,
            name: identity.given_name,
            email: identity.email,
            profile_pic: identity.picture,
            password: None,
        };
        self.storage.insert_user(&user).await?;
        info!(user = %user.id, "created user from external assertion");
        Ok(user)
    }

    /// Create a locally-registered account with a fresh identifier and a
    /// hashed credential. Duplicate emails are rejected.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        profile_pic: &str,
    ) -> Result<User, ForgeError> {
        if self.storage.user_by_email(email).await?.is_some() {
            return Err(ForgeError::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            profile_pic: profile_pic.to_string(),
            password: Some(hash_password(password)?),
        };
        self.storage.insert_user(&user).await?;
        info!(user = %user.id, "registered local user");
        Ok(user)
    }
}
