use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::auth::domain::{AuthUser, UserRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| UserRecord { id: u.id, email: u.email, password_hash: u.password_hash }))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, AuthError> {
        let created = models::user::create(&self.db, email, password_hash)
            .await
            .map_err(|e| match e {
                ModelError::Conflict => AuthError::Conflict,
                ModelError::Validation(msg) => AuthError::Validation(msg),
                ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(UserRecord { id: created.id, email: created.email, password_hash: created.password_hash })
    }

    async fn list_all(&self) -> Result<Vec<AuthUser>, AuthError> {
        let rows = models::user::Entity::find()
            .order_by_asc(models::user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(rows.into_iter().map(|u| AuthUser { id: u.id, email: u.email }).collect())
    }
}
