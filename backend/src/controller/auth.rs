use super::{
    crypto::CryptoController, instructor::InstructorController, learner::LearnerController,
    tools::*, user::UserController,
};
use crate::{
    entity::user::{self, Role},
    util::auth::Session,
};

pub struct AuthController {
    crypto: Arc<CryptoController>,
    users: UserController,
    learners: LearnerController,
    instructors: InstructorController,
}

impl AuthController {
    pub fn new(db: Arc<DatabaseConnection>, crypto: Arc<CryptoController>) -> Self {
        Self {
            users: UserController::new(db.clone(), crypto.clone()),
            learners: LearnerController::new(db.clone(), crypto.clone()),
            instructors: InstructorController::new(db, crypto.clone()),
            crypto,
        }
    }
    /// id of the profile matching the user's role, `0` for administrator
    async fn profile_id(&self, user: &user::Model) -> Result<Option<i32>> {
        Ok(match user.role {
            Role::Admin => Some(0),
            Role::Learner => self.learners.by_user_id(user.id).await?.map(|x| x.id),
            Role::Instructor => self.instructors.by_user_id(user.id).await?.map(|x| x.id),
        })
    }
    /// Check credential and open a session
    ///
    /// Unknown email, wrong password and a user without profile all return
    /// `None`, the caller cannot tell them apart.
    #[instrument(skip_all, fields(email = email))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Session>> {
        let user = match self.users.by_email(email).await? {
            Some(x) => x,
            None => return Ok(None),
        };
        if !self.crypto.hash_eq(password, &user.password) {
            tracing::debug!("password_mismatch");
            return Ok(None);
        }
        let entity_id = match self.profile_id(&user).await? {
            Some(x) => x,
            None => {
                tracing::warn!(user_id = user.id, "missing_profile");
                return Ok(None);
            }
        };

        self.users.touch_login(user.id).await?;

        tracing::info!(user_id = user.id, role = %user.role, "login");
        Ok(Some(Session {
            user_id: user.id,
            entity_id,
            role: user.role,
            email: user.email,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{entity::learner, test::data};

    #[tokio::test]
    async fn login() {
        let db = data::connect().await;
        let crypto = data::crypto();
        let learner_id = LearnerController::new(db.clone(), crypto.clone())
            .add("Alice", "alice@x.io", "secret", None)
            .await
            .unwrap();

        let auth = AuthController::new(db.clone(), crypto);
        let session = auth
            .authenticate("alice@x.io", "secret")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.role, Role::Learner);
        assert_eq!(session.entity_id, learner_id);
        assert!(!session.is_admin());

        let user = user::Entity::find_by_id(session.user_id)
            .one(db.deref())
            .await
            .unwrap()
            .unwrap();
        assert!(user.last_login.is_some());

        assert_eq!(auth.authenticate("alice@x.io", "wrong").await.unwrap(), None);
        assert_eq!(auth.authenticate("nobody@x.io", "secret").await.unwrap(), None);
    }
    #[tokio::test]
    async fn admin_session() {
        let db = data::connect().await;
        let crypto = data::crypto();
        UserController::new(db.clone(), crypto.clone())
            .create("root@x.io", "admin", Role::Admin)
            .await
            .unwrap();

        let session = AuthController::new(db, crypto)
            .authenticate("root@x.io", "admin")
            .await
            .unwrap()
            .unwrap();
        assert!(session.is_admin());
        assert_eq!(session.entity_id, 0);
    }
    #[tokio::test]
    async fn profile_by_role() {
        let db = data::connect().await;
        let crypto = data::crypto();
        let instructor_id = InstructorController::new(db.clone(), crypto.clone())
            .add("Grace", "grace@x.io", "pw", None)
            .await
            .unwrap();
        let learner_id = LearnerController::new(db.clone(), crypto.clone())
            .add("Alice", "alice@x.io", "pw", None)
            .await
            .unwrap();

        let auth = AuthController::new(db.clone(), crypto);
        let session = auth
            .authenticate("grace@x.io", "pw")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.role, Role::Instructor);
        assert_eq!(session.entity_id, instructor_id);

        learner::Entity::delete_by_id(learner_id)
            .exec(db.deref())
            .await
            .unwrap();
        assert_eq!(auth.authenticate("alice@x.io", "pw").await.unwrap(), None);
    }
}
