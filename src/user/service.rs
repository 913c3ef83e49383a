use std::sync::Arc;

use validator::Validate;

use crate::crypto::PasswordManager;
use crate::error::{Result, ServerError};
use crate::model::body::{Login, Register};
use crate::session::{Identity, SessionContext};
use crate::user::{NewUser, UserRepository};
use crate::validation;

/// Registration and login use cases.
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn UserRepository>,
    pwd: PasswordManager,
}

impl AccountService {
    /// Create a new [`AccountService`].
    pub fn new(repo: Arc<dyn UserRepository>, pwd: PasswordManager) -> Self {
        Self { repo, pwd }
    }

    /// Create an account. Does not log the user in.
    pub async fn register(&self, body: Register) -> Result<i64> {
        body.validate()?;

        if self.repo.exists(&body.username, &body.email).await? {
            return Err(ServerError::Conflict);
        }

        let password_hash = self
            .pwd
            .hash_password(&body.password)
            .map_err(|err| ServerError::internal("cannot hash password", err))?;

        let user_id = self
            .repo
            .insert(&NewUser {
                username: body.username,
                email: body.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id, "user registered");
        Ok(user_id)
    }

    /// Check credentials and bind the user to `session`.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn login(
        &self,
        session: &dyn SessionContext,
        body: Login,
    ) -> Result<Identity> {
        let (username, password) = body.credentials().ok_or_else(|| {
            validation::reject(
                "username",
                validator::ValidationError::new("required").with_message(
                    "Username and password are required".into(),
                ),
            )
        })?;

        let user = self.repo.find_by_username(username).await?;

        let verified = self.pwd.verify_password_or_dummy(
            password,
            user.as_ref().map(|user| user.password_hash.as_str()),
        );

        let Some(user) = user.filter(|_| verified) else {
            tracing::info!("login refused");
            return Err(ServerError::InvalidCredentials);
        };

        let identity = Identity {
            user_id: user.id,
            username: user.username,
        };
        session.authenticate(identity.clone()).await?;

        tracing::info!(user_id = identity.user_id, "user logged in");
        Ok(identity)
    }

    /// Forget the session identity. Succeeds when already anonymous.
    pub async fn logout(&self, session: &dyn SessionContext) -> Result<()> {
        if let Some(identity) = session.identity().await? {
            tracing::info!(user_id = identity.user_id, "user logged out");
        }

        session.clear().await
    }
}
