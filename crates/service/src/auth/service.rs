use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{InsertOutcome, LoginOutcome, RegisterOutcome, User};
use super::errors::AuthError;
use super::password::PasswordScheme;
use super::repository::CredentialStore;

/// Auth service configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthConfig {
    pub password_scheme: PasswordScheme,
}

/// Auth business service independent of web framework
pub struct AuthService<R: CredentialStore + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: CredentialStore + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    pub fn store(&self) -> &Arc<R> { &self.repo }

    /// Register a new user unless the username is already taken.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::memory::MemoryCredentialStore};
    /// use service::auth::domain::{RegisterOutcome, User};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryCredentialStore::new()), AuthConfig::default());
    /// let first = tokio_test::block_on(svc.register(User::new("alice", "pw1"))).unwrap();
    /// let second = tokio_test::block_on(svc.register(User::new("alice", "pw2"))).unwrap();
    /// assert_eq!(first, RegisterOutcome::Registered);
    /// assert_eq!(second, RegisterOutcome::UsernameTaken);
    /// ```
    #[instrument(skip(self, candidate), fields(username = %candidate.username))]
    pub async fn register(&self, candidate: User) -> Result<RegisterOutcome, AuthError> {
        if candidate.username.trim().is_empty() {
            return Err(AuthError::Validation("username is required".into()));
        }
        if candidate.password.is_empty() {
            return Err(AuthError::Validation("password is required".into()));
        }

        // cheap rejection before hashing; the insert below is what enforces uniqueness
        if self.repo.find_by_username(&candidate.username).await?.is_some() {
            info!("register_rejected");
            return Ok(RegisterOutcome::UsernameTaken);
        }

        let sealed = User {
            password: self.cfg.password_scheme.seal(&candidate.password)?,
            username: candidate.username,
        };
        match self.repo.insert_if_absent(sealed).await? {
            InsertOutcome::Inserted => {
                info!(scheme = self.cfg.password_scheme.name(), "user_registered");
                Ok(RegisterOutcome::Registered)
            }
            InsertOutcome::Taken => {
                debug!("lost registration race");
                info!("register_rejected");
                Ok(RegisterOutcome::UsernameTaken)
            }
        }
    }

    /// Check a username/password pair against the stored record.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::memory::MemoryCredentialStore};
    /// use service::auth::domain::{LoginOutcome, User};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryCredentialStore::new()), AuthConfig::default());
    /// tokio_test::block_on(svc.register(User::new("alice", "pw1"))).unwrap();
    /// let ok = tokio_test::block_on(svc.login(User::new("alice", "pw1"))).unwrap();
    /// let bad = tokio_test::block_on(svc.login(User::new("alice", "pw2"))).unwrap();
    /// assert_eq!(ok, LoginOutcome::LoginSuccess);
    /// assert_eq!(bad, LoginOutcome::InvalidCredentials);
    /// ```
    #[instrument(skip(self, candidate), fields(username = %candidate.username))]
    pub async fn login(&self, candidate: User) -> Result<LoginOutcome, AuthError> {
        let Some(stored) = self.repo.find_by_username(&candidate.username).await? else {
            debug!("unknown username");
            info!("login_rejected");
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if self.cfg.password_scheme.verify(&stored.password, &candidate.password) {
            info!("login_succeeded");
            Ok(LoginOutcome::LoginSuccess)
        } else {
            debug!("password mismatch");
            info!("login_rejected");
            Ok(LoginOutcome::InvalidCredentials)
        }
    }
}
