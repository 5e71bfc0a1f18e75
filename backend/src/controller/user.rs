use super::{crypto::CryptoController, tools::*};
use crate::entity::user::{self, Role};

/// Insert a user with hashed password
///
/// A taken email surfaces as [`Error::ConstraintViolation`].
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    crypto: &CryptoController,
    email: &str,
    password: &str,
    role: Role,
) -> Result<user::Model> {
    let email = non_blank(email, "email")?;
    if password.is_empty() {
        return Err(Error::BadArgument("password"));
    }

    user::ActiveModel {
        email: Set(email),
        password: Set(crypto.hash(password)),
        role: Set(role),
        create_at: Set(now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::<Error>::into)
}

pub struct UserController {
    db: Arc<DatabaseConnection>,
    crypto: Arc<CryptoController>,
}

impl UserController {
    pub fn new(db: Arc<DatabaseConnection>, crypto: Arc<CryptoController>) -> Self {
        Self { db, crypto }
    }
    #[instrument(skip(self, password))]
    pub async fn create(&self, email: &str, password: &str, role: Role) -> Result<user::Model> {
        let model = insert(self.db.deref(), &self.crypto, email, password, role).await?;
        tracing::debug!(id = model.id, "user_created");
        Ok(model)
    }
    pub async fn by_email(&self, email: &str) -> Result<Option<user::Model>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim()))
            .one(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn by_id(&self, id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(id)
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(user::Entity::DEBUG_NAME))
    }
    #[instrument(skip(self, password))]
    pub async fn update_password(&self, id: i32, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::BadArgument("password"));
        }
        let result = user::Entity::update_many()
            .col_expr(user::Column::Password, Expr::value(self.crypto.hash(password)))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.deref())
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound(user::Entity::DEBUG_NAME));
        }
        Ok(())
    }
    pub async fn touch_login(&self, id: i32) -> Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.deref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::data;

    #[tokio::test]
    async fn duplicate_email() {
        let db = data::connect().await;
        let users = UserController::new(db.clone(), data::crypto());

        users.create("a@x.io", "pw", Role::Admin).await.unwrap();
        let err = users.create("a@x.io", "pw", Role::Learner).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }
    #[tokio::test]
    async fn change_password() {
        let db = data::connect().await;
        let crypto = data::crypto();
        let users = UserController::new(db.clone(), crypto.clone());

        let model = users.create("a@x.io", "old", Role::Admin).await.unwrap();
        users.update_password(model.id, "new").await.unwrap();

        let model = users.by_id(model.id).await.unwrap();
        assert!(crypto.hash_eq("new", &model.password));
        assert!(matches!(
            users.update_password(9999, "new").await,
            Err(Error::NotFound(_))
        ));
    }
}
