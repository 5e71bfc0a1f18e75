use super::{crypto::CryptoController, tools::*, user as user_ctl};
use crate::entity::{
    instructor,
    user::{self, Role},
};

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct InstructorInfo {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub expertise: Option<String>,
}

#[derive(Debug, Default)]
pub struct InstructorPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Option<String>,
}

pub struct InstructorController {
    db: Arc<DatabaseConnection>,
    crypto: Arc<CryptoController>,
}

impl InstructorController {
    pub fn new(db: Arc<DatabaseConnection>, crypto: Arc<CryptoController>) -> Self {
        Self { db, crypto }
    }
    fn info_select() -> Select<instructor::Entity> {
        instructor::Entity::find()
            .select_only()
            .columns([
                instructor::Column::Id,
                instructor::Column::UserId,
                instructor::Column::Name,
                instructor::Column::Expertise,
            ])
            .column_as(user::Column::Email, "email")
            .inner_join(user::Entity)
            .order_by_asc(instructor::Column::Id)
    }
    #[instrument(skip(self, password))]
    pub async fn add(
        &self,
        name: &str,
        email: &str,
        password: &str,
        expertise: Option<String>,
    ) -> Result<i32> {
        let name = non_blank(name, "name")?;
        let txn = self.db.begin().await?;

        let user = user_ctl::insert(&txn, &self.crypto, email, password, Role::Instructor).await?;

        let model = instructor::ActiveModel {
            user_id: Set(user.id),
            name: Set(name),
            expertise: Set(expertise),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(id = model.id, "instructor_created");
        Ok(model.id)
    }
    pub async fn get(&self, id: i32) -> Result<InstructorInfo> {
        Self::info_select()
            .filter(instructor::Column::Id.eq(id))
            .into_model::<InstructorInfo>()
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(instructor::Entity::DEBUG_NAME))
    }
    pub async fn by_user_id(&self, user_id: i32) -> Result<Option<instructor::Model>> {
        instructor::Entity::find()
            .filter(instructor::Column::UserId.eq(user_id))
            .one(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn list(&self) -> Result<Vec<InstructorInfo>> {
        Self::info_select()
            .into_model::<InstructorInfo>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, patch: InstructorPatch) -> Result<()> {
        if patch.name.is_none() && patch.email.is_none() && patch.expertise.is_none() {
            return Err(Error::BadArgument("update"));
        }
        let name = patch.name.map(|x| non_blank(&x, "name")).transpose()?;
        let email = patch.email.map(|x| non_blank(&x, "email")).transpose()?;
        let txn = self.db.begin().await?;

        let model = instructor::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(instructor::Entity::DEBUG_NAME))?;

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
        if let Some(expertise) = patch.expertise {
            model.expertise = Set(Some(expertise));
        }
        if model.is_changed() {
            model.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }
    /// courses taught by the instructor are kept without instructor
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let model = instructor::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(instructor::Entity::DEBUG_NAME))?;

        user::Entity::delete_by_id(model.user_id).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(id, "instructor_removed");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{entity::course, test::data};

    #[tokio::test]
    async fn delete_keeps_courses() {
        let db = data::connect().await;
        let instructors = InstructorController::new(db.clone(), data::crypto());

        let id = instructors
            .add("Grace", "grace@x.io", "pw", Some("Compilers".to_owned()))
            .await
            .unwrap();
        let course_id = data::course(&db, "Intro", Some(id)).await;

        instructors.delete(id).await.unwrap();

        let course = course::Entity::find_by_id(course_id)
            .one(db.deref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(course.instructor_id, None);
        assert!(instructors.list().await.unwrap().is_empty());
    }
    #[tokio::test]
    async fn update_expertise() {
        let db = data::connect().await;
        let instructors = InstructorController::new(db.clone(), data::crypto());

        let id = instructors.add("Grace", "grace@x.io", "pw", None).await.unwrap();
        instructors
            .update(
                id,
                InstructorPatch {
                    expertise: Some("Databases".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let info = instructors.get(id).await.unwrap();
        assert_eq!(info.expertise.as_deref(), Some("Databases"));
        assert_eq!(info.email, "grace@x.io");
        assert!(matches!(
            instructors.update(404, InstructorPatch {
                name: Some("x".to_owned()),
                ..Default::default()
            })
            .await,
            Err(Error::NotFound(_))
        ));
    }
}
