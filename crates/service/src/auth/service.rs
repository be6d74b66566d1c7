use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password::PasswordHasher;
use super::repository::AuthRepository;
use super::token::TokenService;

/// Auth business service independent of web framework. The repository, the
/// password hasher, and the token service are injected; nothing here reaches
/// for globals.
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::{password::PasswordHasher, token::TokenService};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, PasswordHasher::default(), TokenService::new(b"secret", chrono::Duration::seconds(900)));
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }
        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let hash = self.hasher.hash(&input.password)?;
        // A concurrent registration may win between the check above and this
        // insert; the repository reports that as the same Conflict.
        let record = self.repo.create(&input.email, &hash).await?;
        info!(user_id = %record.id, email = %record.email, "user_registered");
        Ok(record.public())
    }

    /// Authenticate a user and issue a token. Unknown email and wrong
    /// password are the same outcome; callers cannot probe which emails
    /// exist.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockAuthRepository};
    /// use service::auth::{password::PasswordHasher, token::TokenService};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, PasswordHasher::default(), TokenService::new(b"secret", chrono::Duration::seconds(900)));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let record = self.repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !self.hasher.verify(&input.password, &record.password_hash) {
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(record.id)?;
        info!(user_id = %record.id, "user_authenticated");
        Ok(AuthSession { user: record.public(), token })
    }

    /// Resolve the subject id carried by a bearer token. Pure computation;
    /// nothing is looked up.
    pub fn identity(&self, token: &str) -> Result<Uuid, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Public user listing, `{id, email}` only.
    pub async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        self.repo.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::TokenError;
    use crate::auth::repository::mock::MockAuthRepository;
    use chrono::Duration;

    fn svc(repo: Arc<MockAuthRepository>, ttl_secs: i64) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, PasswordHasher::default(), TokenService::new(b"test-secret", Duration::seconds(ttl_secs)))
    }

    fn creds(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn register_stores_a_verifying_hash() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo.clone(), 900);

        let user = svc.register(creds("a@x.com", "p1")).await.unwrap();
        assert_eq!(user.email, "a@x.com");

        let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "p1");
        assert!(PasswordHasher::default().verify("p1", &stored.password_hash));
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let svc = svc(Arc::new(MockAuthRepository::default()), 900);
        let err = svc.register(creds("", "p1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = svc.register(creds("a@x.com", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_password() {
        let svc = svc(Arc::new(MockAuthRepository::default()), 900);
        svc.register(creds("a@x.com", "p1")).await.unwrap();
        let err = svc.register(creds("a@x.com", "something-else")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn login_issues_a_token_for_exact_credentials_only() {
        let svc = svc(Arc::new(MockAuthRepository::default()), 900);
        let user = svc.register(creds("a@x.com", "p1")).await.unwrap();

        let session = svc
            .login(LoginInput { email: "a@x.com".into(), password: "p1".into() })
            .await
            .unwrap();
        assert!(!session.token.is_empty());
        assert_eq!(svc.identity(&session.token).unwrap(), user.id);

        let err = svc
            .login(LoginInput { email: "a@x.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));

        let err = svc
            .login(LoginInput { email: "nobody@x.com".into(), password: "p1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));

        // Email matching is exact, case included.
        let err = svc
            .login(LoginInput { email: "A@X.com".into(), password: "p1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn expired_token_carries_no_identity() {
        let svc = svc(Arc::new(MockAuthRepository::default()), -60);
        svc.register(creds("a@x.com", "p1")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "a@x.com".into(), password: "p1".into() })
            .await
            .unwrap();
        let err = svc.identity(&session.token).unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Expired)));
    }

    #[tokio::test]
    async fn listing_exposes_id_and_email_only() {
        let svc = svc(Arc::new(MockAuthRepository::default()), 900);
        svc.register(creds("a@x.com", "p1")).await.unwrap();
        svc.register(creds("b@x.com", "p2")).await.unwrap();

        let users = svc.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[1].email, "b@x.com");

        let json = serde_json::to_value(&users).unwrap();
        for entry in json.as_array().unwrap() {
            let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
            assert_eq!(keys.len(), 2);
            assert!(entry.get("password_hash").is_none());
        }
    }
}
