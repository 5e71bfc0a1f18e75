use super::{crypto::CryptoController, tools::*, user as user_ctl};
use crate::entity::{
    learner,
    user::{self, Role},
};

/// learner profile joined with its login email
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LearnerInfo {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// fields left as `None` are not touched
#[derive(Debug, Default)]
pub struct LearnerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl LearnerPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

pub struct LearnerController {
    db: Arc<DatabaseConnection>,
    crypto: Arc<CryptoController>,
}

impl LearnerController {
    pub fn new(db: Arc<DatabaseConnection>, crypto: Arc<CryptoController>) -> Self {
        Self { db, crypto }
    }
    fn info_select() -> Select<learner::Entity> {
        learner::Entity::find()
            .select_only()
            .columns([
                learner::Column::Id,
                learner::Column::UserId,
                learner::Column::Name,
                learner::Column::Phone,
            ])
            .column_as(user::Column::Email, "email")
            .inner_join(user::Entity)
            .order_by_asc(learner::Column::Id)
    }
    /// create the login and the profile together
    #[instrument(skip(self, password))]
    pub async fn add(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
    ) -> Result<i32> {
        let name = non_blank(name, "name")?;
        let txn = self.db.begin().await?;

        let user = user_ctl::insert(&txn, &self.crypto, email, password, Role::Learner).await?;

        let model = learner::ActiveModel {
            user_id: Set(user.id),
            name: Set(name),
            phone: Set(phone),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(id = model.id, "learner_created");
        Ok(model.id)
    }
    pub async fn get(&self, id: i32) -> Result<LearnerInfo> {
        Self::info_select()
            .filter(learner::Column::Id.eq(id))
            .into_model::<LearnerInfo>()
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(learner::Entity::DEBUG_NAME))
    }
    pub async fn by_user_id(&self, user_id: i32) -> Result<Option<learner::Model>> {
        learner::Entity::find()
            .filter(learner::Column::UserId.eq(user_id))
            .one(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn list(&self) -> Result<Vec<LearnerInfo>> {
        Self::info_select()
            .into_model::<LearnerInfo>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, patch: LearnerPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(Error::BadArgument("update"));
        }
        let name = patch.name.map(|x| non_blank(&x, "name")).transpose()?;
        let email = patch.email.map(|x| non_blank(&x, "email")).transpose()?;
        let txn = self.db.begin().await?;

        let model = learner::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(learner::Entity::DEBUG_NAME))?;

        if let Some(email) = email {
            user::ActiveModel {
                id: Unchanged(model.user_id),
                email: Set(email),
                ..Default::default()
            }
            .update(&txn)
            .await?;
        }

        let mut model = model.into_active_model();
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(Some(phone));
        }
        if model.is_changed() {
            model.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }
    /// remove the learner and its login
    ///
    /// Enrollments and lecture views go with it, enrollment logs keep their
    /// rows with the learner reference nulled.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let model = learner::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(learner::Entity::DEBUG_NAME))?;

        user::Entity::delete_by_id(model.user_id).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(id, "learner_removed");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        controller::enrollment::EnrollmentController,
        entity::{enrollment, enrollment_log, lecture_view},
        test::data,
    };

    #[tokio::test]
    async fn crud() {
        let db = data::connect().await;
        let learners = LearnerController::new(db.clone(), data::crypto());

        let id = learners
            .add("Alice", "alice@x.io", "pw", Some("123".to_owned()))
            .await
            .unwrap();
        let info = learners.get(id).await.unwrap();
        assert_eq!(info.name, "Alice");
        assert_eq!(info.email, "alice@x.io");
        assert_eq!(info.phone.as_deref(), Some("123"));

        learners
            .update(
                id,
                LearnerPatch {
                    email: Some("alice@y.io".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(learners.get(id).await.unwrap().email, "alice@y.io");
        assert_eq!(learners.get(id).await.unwrap().name, "Alice");

        assert!(matches!(
            learners.update(id, LearnerPatch::default()).await,
            Err(Error::BadArgument(_))
        ));

        learners.delete(id).await.unwrap();
        assert!(matches!(learners.get(id).await, Err(Error::NotFound(_))));
        assert_eq!(user::Entity::find().count(db.deref()).await.unwrap(), 0);
        assert!(matches!(learners.delete(id).await, Err(Error::NotFound(_))));
    }
    #[tokio::test]
    async fn failed_add_leaves_nothing() {
        let db = data::connect().await;
        let learners = LearnerController::new(db.clone(), data::crypto());

        learners.add("Alice", "same@x.io", "pw", None).await.unwrap();
        let err = learners
            .add("Bob", "same@x.io", "pw", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert_eq!(learners.list().await.unwrap().len(), 1);
    }
    #[tokio::test]
    async fn delete_takes_progress_along() {
        let db = data::connect().await;
        let learners = LearnerController::new(db.clone(), data::crypto());
        let engine = EnrollmentController::new(db.clone());

        let id = learners.add("Alice", "alice@x.io", "pw", None).await.unwrap();
        let course = data::course(&db, "Intro", None).await;
        let lecture = data::lecture(&db, course, "Welcome").await;
        let enrollment_id = engine.enroll(id, course).await.unwrap();
        engine.mark_lecture_viewed(id, lecture).await.unwrap();

        learners.delete(id).await.unwrap();

        assert_eq!(enrollment::Entity::find().count(db.deref()).await.unwrap(), 0);
        assert_eq!(lecture_view::Entity::find().count(db.deref()).await.unwrap(), 0);

        let logs = enrollment_log::Entity::find()
            .filter(enrollment_log::Column::EnrollmentId.eq(enrollment_id))
            .all(db.deref())
            .await
            .unwrap();
        assert!(!logs.is_empty());
        assert!(logs.iter().all(|x| x.learner_id.is_none()));
        assert!(logs.iter().all(|x| x.course_id == Some(course)));
    }
    #[tokio::test]
    async fn blank_fields_rejected() {
        let db = data::connect().await;
        let learners = LearnerController::new(db, data::crypto());

        assert!(matches!(
            learners.add("  ", "alice@x.io", "pw", None).await,
            Err(Error::BadArgument("name"))
        ));
        let id = learners.add(" Alice ", "alice@x.io", "pw", None).await.unwrap();
        assert_eq!(learners.get(id).await.unwrap().name, "Alice");

        for (name, email, field) in [(Some(" "), None, "name"), (None, Some(""), "email")] {
            let patch = LearnerPatch {
                name: name.map(str::to_owned),
                email: email.map(str::to_owned),
                ..Default::default()
            };
            assert!(matches!(
                learners.update(id, patch).await,
                Err(Error::BadArgument(x)) if x == field
            ));
        }

        learners
            .update(
                id,
                LearnerPatch {
                    name: Some("  Alicia ".to_owned()),
                    email: Some(" alicia@x.io ".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let info = learners.get(id).await.unwrap();
        assert_eq!(info.name, "Alicia");
        assert_eq!(info.email, "alicia@x.io");
    }
}
