//! Enrollment lifecycle and lecture-view driven progress
//!
//! Progress is never edited directly: `status` and `progress` of an
//! enrollment are always the projection of the learner's lecture views over
//! the lectures of the course, recomputed whenever one of them changes.
//!
//! ```text
//! viewed == 0            -> Not Started
//! 0 < viewed < total     -> In Progress
//! viewed == total > 0    -> Completed
//! progress = round(100 * viewed / total), 0 when total == 0
//! ```
use futures::try_join;

use super::{audit, tools::*};
use crate::entity::{
    course,
    enrollment::{self, Status},
    enrollment_log::ENROLLMENT_CREATED,
    learner, lecture, lecture_view,
};

/// Progress of one enrollment, computed from current lecture views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub enrollment_id: i32,
    pub viewed: u64,
    pub total: u64,
    pub status: Status,
    pub percentage: i32,
}

impl Progress {
    fn new(enrollment_id: i32, viewed: u64, total: u64) -> Self {
        Self {
            enrollment_id,
            viewed,
            total,
            status: Status::from_counts(viewed, total),
            percentage: enrollment::percentage(viewed, total),
        }
    }
}

/// enrollment row with learner and course names
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct EnrollmentDetail {
    pub id: i32,
    pub learner_id: i32,
    pub course_id: i32,
    pub learner_name: String,
    pub course_name: String,
    pub enrolled_at: chrono::NaiveDateTime,
    pub status: Status,
    pub progress: i32,
}

pub(crate) fn detail_select() -> Select<enrollment::Entity> {
    enrollment::Entity::find()
        .select_only()
        .columns([
            enrollment::Column::Id,
            enrollment::Column::LearnerId,
            enrollment::Column::CourseId,
            enrollment::Column::EnrolledAt,
            enrollment::Column::Status,
            enrollment::Column::Progress,
        ])
        .column_as(learner::Column::Name, "learner_name")
        .column_as(course::Column::Name, "course_name")
        .inner_join(learner::Entity)
        .inner_join(course::Entity)
        .order_by_asc(enrollment::Column::Id)
}

/// (viewed, total) lectures of `course_id` for `learner_id`
async fn count_progress<C: ConnectionTrait>(
    conn: &C,
    learner_id: i32,
    course_id: i32,
) -> Result<(u64, u64)> {
    let viewed = lecture_view::Entity::find()
        .inner_join(lecture::Entity)
        .filter(lecture_view::Column::LearnerId.eq(learner_id))
        .filter(lecture::Column::CourseId.eq(course_id))
        .count(conn);
    let total = lecture::Entity::find()
        .filter(lecture::Column::CourseId.eq(course_id))
        .count(conn);

    Ok(try_join!(viewed, total)?)
}

/// Persist the derived status and progress of `model`
///
/// A status transition is appended to the enrollment log.
pub(crate) async fn recompute<C: ConnectionTrait>(
    conn: &C,
    model: enrollment::Model,
) -> Result<Progress> {
    let (viewed, total) = count_progress(conn, model.learner_id, model.course_id).await?;
    let progress = Progress::new(model.id, viewed, total);

    if progress.status == model.status && progress.percentage == model.progress {
        return Ok(progress);
    }

    let status_changed = progress.status != model.status;
    let mut active = model.clone().into_active_model();
    active.status = Set(progress.status);
    active.progress = Set(progress.percentage);
    active.update(conn).await?;

    if status_changed {
        audit::append(conn, &model, &format!("Status Changed: {}", progress.status)).await?;
    }

    tracing::trace!(
        id = model.id,
        viewed,
        total,
        status = %progress.status,
        "progress_updated"
    );
    Ok(progress)
}

/// Recompute every enrollment of a course, after its lecture set changed
pub(crate) async fn refresh_course<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<()> {
    let models = enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .all(conn)
        .await?;
    for model in models {
        recompute(conn, model).await?;
    }
    Ok(())
}

pub struct EnrollmentController {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentController {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
    /// Enroll a learner, starting at 0% / Not Started
    #[instrument(skip(self))]
    pub async fn enroll(&self, learner_id: i32, course_id: i32) -> Result<i32> {
        let txn = self.db.begin().await?;

        learner::Entity::find_by_id(learner_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(learner::Entity::DEBUG_NAME))?;
        course::Entity::find_by_id(course_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(course::Entity::DEBUG_NAME))?;

        let existing = enrollment::Entity::find()
            .filter(enrollment::Column::LearnerId.eq(learner_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(Error::DuplicateEnrollment);
        }

        let model = enrollment::ActiveModel {
            learner_id: Set(learner_id),
            course_id: Set(course_id),
            enrolled_at: Set(now()),
            status: Set(Status::NotStarted),
            progress: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|err| Error::on_unique(err, Error::DuplicateEnrollment))?;

        audit::append(&txn, &model, ENROLLMENT_CREATED).await?;

        txn.commit().await?;

        tracing::debug!(id = model.id, "enrollment_created");
        Ok(model.id)
    }
    /// Record that a learner viewed a lecture now
    pub async fn mark_lecture_viewed(&self, learner_id: i32, lecture_id: i32) -> Result<Progress> {
        self.mark_lecture_viewed_at(learner_id, lecture_id, now()).await
    }
    /// Record a lecture view at `at` and update the enrollment
    ///
    /// Preconditions are checked in order: lecture exists, learner exists,
    /// learner is enrolled in the lecture's course, no earlier view of the
    /// lecture, `at` is not before the enrollment date.
    #[instrument(skip(self))]
    pub async fn mark_lecture_viewed_at(
        &self,
        learner_id: i32,
        lecture_id: i32,
        at: chrono::NaiveDateTime,
    ) -> Result<Progress> {
        let txn = self.db.begin().await?;

        let lecture = lecture::Entity::find_by_id(lecture_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(lecture::Entity::DEBUG_NAME))?;
        learner::Entity::find_by_id(learner_id)
            .one(&txn)
            .await?
            .ok_or(Error::NotFound(learner::Entity::DEBUG_NAME))?;

        let model = enrollment::Entity::find()
            .filter(enrollment::Column::LearnerId.eq(learner_id))
            .filter(enrollment::Column::CourseId.eq(lecture.course_id))
            .one(&txn)
            .await?
            .ok_or(Error::NotEnrolled)?;

        let viewed = lecture_view::Entity::find_by_id((learner_id, lecture_id))
            .count(&txn)
            .await?;
        if viewed > 0 {
            return Err(Error::AlreadyViewed);
        }
        if at < model.enrolled_at {
            return Err(Error::InvalidViewDate);
        }

        lecture_view::Entity::insert(lecture_view::ActiveModel {
            learner_id: Set(learner_id),
            lecture_id: Set(lecture_id),
            viewed_at: Set(at),
        })
        .exec_without_returning(&txn)
        .await
        .map_err(|err| Error::on_unique(err, Error::AlreadyViewed))?;

        let progress = recompute(&txn, model).await?;

        txn.commit().await?;

        tracing::debug!(
            learner_id,
            lecture_id,
            percentage = progress.percentage,
            "lecture_viewed"
        );
        Ok(progress)
    }
    /// Progress recomputed from current data, nothing is written
    pub async fn get_progress(&self, enrollment_id: i32) -> Result<Progress> {
        let model = enrollment::Entity::find_by_id(enrollment_id)
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(enrollment::Entity::DEBUG_NAME))?;

        let (viewed, total) =
            count_progress(self.db.deref(), model.learner_id, model.course_id).await?;
        Ok(Progress::new(model.id, viewed, total))
    }
    pub async fn by_learner(&self, learner_id: i32) -> Result<Vec<EnrollmentDetail>> {
        detail_select()
            .filter(enrollment::Column::LearnerId.eq(learner_id))
            .into_model::<EnrollmentDetail>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn by_course(&self, course_id: i32) -> Result<Vec<EnrollmentDetail>> {
        detail_select()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .into_model::<EnrollmentDetail>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn all(&self) -> Result<Vec<EnrollmentDetail>> {
        detail_select()
            .into_model::<EnrollmentDetail>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    /// enrollment of a learner in a course, if any
    pub async fn find(&self, learner_id: i32, course_id: i32) -> Result<Option<enrollment::Model>> {
        enrollment::Entity::find()
            .filter(enrollment::Column::LearnerId.eq(learner_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .one(self.db.deref())
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{entity::enrollment_log, test::data};

    async fn setup(lectures: usize) -> (Arc<DatabaseConnection>, i32, i32, Vec<i32>) {
        let db = data::connect().await;
        let learner = data::learner(&db, "Alice").await;
        let course = data::course(&db, "Intro", None).await;
        let mut ids = Vec::new();
        for n in 0..lectures {
            ids.push(data::lecture(&db, course, &format!("Lecture {}", n + 1)).await);
        }
        (db, learner, course, ids)
    }

    async fn stored(db: &DatabaseConnection, id: i32) -> enrollment::Model {
        enrollment::Entity::find_by_id(id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_enrollment() {
        let (db, learner, course, _) = setup(1).await;
        let engine = EnrollmentController::new(db.clone());

        let id = engine.enroll(learner, course).await.unwrap();
        assert!(matches!(
            engine.enroll(learner, course).await,
            Err(Error::DuplicateEnrollment)
        ));

        let model = stored(&db, id).await;
        assert_eq!(model.status, Status::NotStarted);
        assert_eq!(model.progress, 0);
        assert_eq!(engine.all().await.unwrap().len(), 1);
    }
    #[tokio::test]
    async fn enroll_unknown() {
        let (db, learner, course, _) = setup(0).await;
        let engine = EnrollmentController::new(db);

        assert!(matches!(
            engine.enroll(learner + 100, course).await,
            Err(Error::NotFound("learner"))
        ));
        assert!(matches!(
            engine.enroll(learner, course + 100).await,
            Err(Error::NotFound("course"))
        ));
    }
    #[tokio::test]
    async fn progress_follows_views() {
        let (db, learner, course, lectures) = setup(3).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(learner, course).await.unwrap();

        let expected = [(33, Status::InProgress), (67, Status::InProgress), (100, Status::Completed)];
        for (lecture, (percentage, status)) in lectures.iter().zip(expected) {
            let progress = engine.mark_lecture_viewed(learner, *lecture).await.unwrap();
            assert_eq!(progress.percentage, percentage);
            assert_eq!(progress.status, status);

            let model = stored(&db, id).await;
            assert_eq!(model.progress, percentage);
            assert_eq!(model.status, status);
            assert_eq!(engine.get_progress(id).await.unwrap(), progress);
        }
    }
    #[tokio::test]
    async fn double_view() {
        let (db, learner, course, lectures) = setup(2).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(learner, course).await.unwrap();

        engine.mark_lecture_viewed(learner, lectures[0]).await.unwrap();
        let before = stored(&db, id).await;

        assert!(matches!(
            engine.mark_lecture_viewed(learner, lectures[0]).await,
            Err(Error::AlreadyViewed)
        ));
        assert_eq!(stored(&db, id).await, before);
        assert_eq!(before.progress, 50);
    }
    #[tokio::test]
    async fn intro_course_scenario() {
        let (db, alice, intro, lectures) = setup(4).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(alice, intro).await.unwrap();

        let progress = engine.mark_lecture_viewed(alice, lectures[0]).await.unwrap();
        assert_eq!(progress.percentage, 25);
        assert_eq!(progress.status, Status::InProgress);

        for lecture in &lectures[1..] {
            engine.mark_lecture_viewed(alice, *lecture).await.unwrap();
        }
        let model = stored(&db, id).await;
        assert_eq!(model.progress, 100);
        assert_eq!(model.status, Status::Completed);

        let actions: Vec<String> = enrollment_log::Entity::find()
            .filter(enrollment_log::Column::EnrollmentId.eq(id))
            .order_by_asc(enrollment_log::Column::Id)
            .all(db.deref())
            .await
            .unwrap()
            .into_iter()
            .map(|log| log.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                "Enrollment Created",
                "Status Changed: In Progress",
                "Status Changed: Completed"
            ]
        );
    }
    #[tokio::test]
    async fn course_without_lecture() {
        let (db, learner, course, _) = setup(0).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(learner, course).await.unwrap();

        let progress = engine.get_progress(id).await.unwrap();
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percentage, 0);
        assert_eq!(progress.status, Status::NotStarted);

        refresh_course(db.deref(), course).await.unwrap();
        assert_eq!(stored(&db, id).await.status, Status::NotStarted);
    }
    #[tokio::test]
    async fn course_delete_cascades() {
        let (db, learner, course, lectures) = setup(2).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(learner, course).await.unwrap();
        engine.mark_lecture_viewed(learner, lectures[0]).await.unwrap();

        course::Entity::delete_by_id(course).exec(db.deref()).await.unwrap();

        assert_eq!(enrollment::Entity::find().count(db.deref()).await.unwrap(), 0);
        assert_eq!(lecture::Entity::find().count(db.deref()).await.unwrap(), 0);
        assert_eq!(lecture_view::Entity::find().count(db.deref()).await.unwrap(), 0);

        let logs = enrollment_log::Entity::find()
            .filter(enrollment_log::Column::EnrollmentId.eq(id))
            .all(db.deref())
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|log| log.course_id.is_none()));
        assert!(logs.iter().all(|log| log.learner_id == Some(learner)));
    }
    #[tokio::test]
    async fn view_before_enrollment() {
        let (db, learner, course, lectures) = setup(1).await;
        let engine = EnrollmentController::new(db.clone());
        let id = engine.enroll(learner, course).await.unwrap();
        let enrolled_at = stored(&db, id).await.enrolled_at;

        assert!(matches!(
            engine
                .mark_lecture_viewed_at(learner, lectures[0], enrolled_at - chrono::Duration::days(1))
                .await,
            Err(Error::InvalidViewDate)
        ));
        assert_eq!(lecture_view::Entity::find().count(db.deref()).await.unwrap(), 0);
    }
    #[tokio::test]
    async fn view_without_enrollment() {
        let (db, learner, _, lectures) = setup(1).await;
        let engine = EnrollmentController::new(db.clone());

        assert!(matches!(
            engine.mark_lecture_viewed(learner, lectures[0]).await,
            Err(Error::NotEnrolled)
        ));
        assert!(matches!(
            engine.mark_lecture_viewed(learner, lectures[0] + 100).await,
            Err(Error::NotFound("lecture"))
        ));
        assert!(matches!(
            engine.mark_lecture_viewed(learner + 100, lectures[0]).await,
            Err(Error::NotFound("learner"))
        ));
    }
    #[tokio::test]
    async fn detail_listing() {
        let (db, learner, course, _) = setup(1).await;
        let engine = EnrollmentController::new(db.clone());
        engine.enroll(learner, course).await.unwrap();

        let rows = engine.by_learner(learner).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].learner_name, "Alice");
        assert_eq!(rows[0].course_name, "Intro");
        assert_eq!(engine.by_course(course).await.unwrap(), rows);
        assert!(engine.find(learner, course).await.unwrap().is_some());
    }
}
