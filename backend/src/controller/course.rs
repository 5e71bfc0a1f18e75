use super::tools::*;
use crate::entity::{course, instructor};

/// course with the name of its instructor, if any
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CourseInfo {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructor_id: Option<i32>,
    pub instructor_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructor_id: Option<i32>,
}

pub struct CourseController {
    db: Arc<DatabaseConnection>,
}

impl CourseController {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
    fn info_select() -> Select<course::Entity> {
        course::Entity::find()
            .select_only()
            .columns([
                course::Column::Id,
                course::Column::Name,
                course::Column::Description,
                course::Column::InstructorId,
            ])
            .column_as(instructor::Column::Name, "instructor_name")
            .left_join(instructor::Entity)
            .order_by_asc(course::Column::Id)
    }
    async fn check_instructor<C: ConnectionTrait>(conn: &C, id: i32) -> Result<()> {
        instructor::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(Error::NotFound(instructor::Entity::DEBUG_NAME))?;
        Ok(())
    }
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        name: &str,
        description: Option<String>,
        instructor_id: Option<i32>,
    ) -> Result<i32> {
        let name = non_blank(name, "name")?;
        let txn = self.db.begin().await?;

        if let Some(id) = instructor_id {
            Self::check_instructor(&txn, id).await?;
        }
        let model = course::ActiveModel {
            name: Set(name),
            description: Set(description),
            instructor_id: Set(instructor_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(id = model.id, "course_created");
        Ok(model.id)
    }
    pub async fn get(&self, id: i32) -> Result<CourseInfo> {
        Self::info_select()
            .filter(course::Column::Id.eq(id))
            .into_model::<CourseInfo>()
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(course::Entity::DEBUG_NAME))
    }
    pub async fn list(&self) -> Result<Vec<CourseInfo>> {
        Self::info_select()
            .into_model::<CourseInfo>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn by_instructor(&self, instructor_id: i32) -> Result<Vec<CourseInfo>> {
        Self::info_select()
            .filter(course::Column::InstructorId.eq(instructor_id))
            .into_model::<CourseInfo>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    /// whether `instructor_id` teaches `course_id`
    pub async fn owned_by(&self, course_id: i32, instructor_id: i32) -> Result<bool> {
        let count = course::Entity::find_by_id(course_id)
            .filter(course::Column::InstructorId.eq(instructor_id))
            .count(self.db.deref())
            .await?;
        Ok(count > 0)
    }
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, patch: CoursePatch) -> Result<()> {
        if patch.name.is_none() && patch.description.is_none() && patch.instructor_id.is_none() {
            return Err(Error::BadArgument("update"));
        }
        let name = patch.name.map(|x| non_blank(&x, "name")).transpose()?;
        let txn = self.db.begin().await?;

        let mut model = course::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(course::Entity::DEBUG_NAME))?
            .into_active_model();

        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(Some(description));
        }
        if let Some(instructor_id) = patch.instructor_id {
            Self::check_instructor(&txn, instructor_id).await?;
            model.instructor_id = Set(Some(instructor_id));
        }
        if model.is_changed() {
            model.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }
    /// lectures, enrollments and views of the course go with it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = course::Entity::delete_by_id(id)
            .exec(self.db.deref())
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound(course::Entity::DEBUG_NAME));
        }

        tracing::debug!(id, "course_removed");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::data;

    #[tokio::test]
    async fn instructor_must_exist() {
        let db = data::connect().await;
        let courses = CourseController::new(db.clone());

        assert!(matches!(
            courses.add("Intro", None, Some(42)).await,
            Err(Error::NotFound("instructor"))
        ));
        assert!(courses.list().await.unwrap().is_empty());
    }
    #[tokio::test]
    async fn ownership_and_listing() {
        let db = data::connect().await;
        let courses = CourseController::new(db.clone());
        let grace = data::instructor(&db, "Grace").await;
        let alan = data::instructor(&db, "Alan").await;

        let intro = courses
            .add("Intro", Some("basics".to_owned()), Some(grace))
            .await
            .unwrap();
        let free = courses.add("Unassigned", None, None).await.unwrap();

        assert!(courses.owned_by(intro, grace).await.unwrap());
        assert!(!courses.owned_by(intro, alan).await.unwrap());
        assert!(!courses.owned_by(free, grace).await.unwrap());

        let info = courses.get(intro).await.unwrap();
        assert_eq!(info.instructor_name.as_deref(), Some("Grace"));
        assert_eq!(courses.get(free).await.unwrap().instructor_name, None);
        assert_eq!(courses.by_instructor(grace).await.unwrap().len(), 1);

        courses
            .update(
                free,
                CoursePatch {
                    instructor_id: Some(alan),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(courses.owned_by(free, alan).await.unwrap());

        assert!(matches!(
            courses
                .update(
                    free,
                    CoursePatch {
                        name: Some("   ".to_owned()),
                        ..Default::default()
                    },
                )
                .await,
            Err(Error::BadArgument("name"))
        ));
        courses
            .update(
                free,
                CoursePatch {
                    name: Some(" Advanced ".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(courses.get(free).await.unwrap().name, "Advanced");
    }
    #[tokio::test]
    async fn delete_unknown() {
        let db = data::connect().await;
        let courses = CourseController::new(db);

        assert!(matches!(courses.delete(1).await, Err(Error::NotFound(_))));
    }
}
