//! Authentication service: login, registration and admin seeding

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a user and issue a JWT
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let token = UserClaims::new(&user, self.config.jwt_expiration_hours)
            .to_token(&self.config.jwt_secret)?;

        Ok((token, user))
    }

    /// Create a new account with the default MEMBER role
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        let hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .create(username, &hash, Role::Member)
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "account registered");
        Ok(user)
    }

    /// Get the account behind a set of claims
    pub async fn me(&self, claims: &UserClaims) -> AppResult<User> {
        self.repository.users.get_by_id(claims.sub).await
    }

    /// Create the initial admin account when the user table is empty
    pub async fn seed_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password(&self.config.admin_password)?;
        let admin = self
            .repository
            .users
            .create(&self.config.admin_username, &hash, Role::Admin)
            .await?;

        tracing::info!(username = %admin.username, "seeded initial admin account");
        Ok(())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
