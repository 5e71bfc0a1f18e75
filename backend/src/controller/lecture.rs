use std::collections::HashMap;

use futures::try_join;

use super::{enrollment, tools::*};
use crate::entity::{course, lecture, lecture_view};

/// lecture as seen by one learner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureStatus {
    pub id: i32,
    pub title: String,
    pub viewed_at: Option<chrono::NaiveDateTime>,
}

impl LectureStatus {
    pub fn viewed(&self) -> bool {
        self.viewed_at.is_some()
    }
}

#[derive(Debug, Default)]
pub struct LecturePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct LectureController {
    db: Arc<DatabaseConnection>,
}

impl LectureController {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
    /// Add a lecture at the end of a course
    ///
    /// Enrollments of the course are recomputed, a completed learner drops
    /// back to In Progress.
    #[instrument(skip(self, content))]
    pub async fn add(&self, course_id: i32, title: &str, content: Option<String>) -> Result<i32> {
        let title = non_blank(title, "title")?;
        let txn = self.db.begin().await?;

        course::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(course::Entity::DEBUG_NAME))?;

        let model = lecture::ActiveModel {
            course_id: Set(course_id),
            title: Set(title),
            content: Set(content),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        enrollment::refresh_course(&txn, course_id).await?;

        txn.commit().await?;

        tracing::debug!(id = model.id, course_id, "lecture_created");
        Ok(model.id)
    }
    pub async fn get(&self, id: i32) -> Result<lecture::Model> {
        lecture::Entity::find_by_id(id)
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(lecture::Entity::DEBUG_NAME))
    }
    /// lectures of a course in creation order
    pub async fn by_course(&self, course_id: i32) -> Result<Vec<lecture::Model>> {
        lecture::Entity::find()
            .filter(lecture::Column::CourseId.eq(course_id))
            .order_by_asc(lecture::Column::Id)
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    /// lectures of a course, each with the learner's view time if any
    pub async fn with_view_status(
        &self,
        learner_id: i32,
        course_id: i32,
    ) -> Result<Vec<LectureStatus>> {
        let lectures = self.by_course(course_id);
        let views = lecture_view::Entity::find()
            .inner_join(lecture::Entity)
            .filter(lecture_view::Column::LearnerId.eq(learner_id))
            .filter(lecture::Column::CourseId.eq(course_id))
            .all(self.db.deref());
        let (lectures, views) = try_join!(lectures, async { views.await.map_err(Error::from) })?;

        let views: HashMap<i32, chrono::NaiveDateTime> = views
            .into_iter()
            .map(|view| (view.lecture_id, view.viewed_at))
            .collect();

        Ok(lectures
            .into_iter()
            .map(|model| LectureStatus {
                viewed_at: views.get(&model.id).copied(),
                id: model.id,
                title: model.title,
            })
            .collect())
    }
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: LecturePatch) -> Result<()> {
        if patch.title.is_none() && patch.content.is_none() {
            return Err(Error::BadArgument("update"));
        }
        let title = patch.title.map(|x| non_blank(&x, "title")).transpose()?;
        let mut model = self.get(id).await?.into_active_model();

        if let Some(title) = title {
            model.title = Set(title);
        }
        if let Some(content) = patch.content {
            model.content = Set(Some(content));
        }
        if model.is_changed() {
            model.update(self.db.deref()).await?;
        }
        Ok(())
    }
    /// views of the lecture go with it, enrollments are recomputed
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        let model = lecture::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(lecture::Entity::DEBUG_NAME))?;

        lecture::Entity::delete_by_id(id).exec(&txn).await?;
        enrollment::refresh_course(&txn, model.course_id).await?;

        txn.commit().await?;

        tracing::debug!(id, "lecture_removed");
        Ok(())
    }
}
