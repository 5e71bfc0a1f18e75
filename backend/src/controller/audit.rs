use super::tools::*;
use crate::entity::{course, enrollment, enrollment_log, learner};

/// log entry with names of learner and course while they still exist
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LogEntry {
    pub id: i32,
    pub enrollment_id: i32,
    pub learner_id: Option<i32>,
    pub course_id: Option<i32>,
    pub learner_name: Option<String>,
    pub course_name: Option<String>,
    pub log_time: chrono::NaiveDateTime,
    pub action: String,
}

/// Append one event for `model`, inside the caller's transaction
pub async fn append<C: ConnectionTrait>(
    conn: &C,
    model: &enrollment::Model,
    action: &str,
) -> Result<()> {
    enrollment_log::Entity::insert(enrollment_log::ActiveModel {
        enrollment_id: Set(model.id),
        learner_id: Set(Some(model.learner_id)),
        course_id: Set(Some(model.course_id)),
        log_time: Set(now()),
        action: Set(action.to_owned()),
        ..Default::default()
    })
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

pub struct AuditController {
    db: Arc<DatabaseConnection>,
}

impl AuditController {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
    fn entry_select() -> Select<enrollment_log::Entity> {
        enrollment_log::Entity::find()
            .select_only()
            .columns([
                enrollment_log::Column::Id,
                enrollment_log::Column::EnrollmentId,
                enrollment_log::Column::LearnerId,
                enrollment_log::Column::CourseId,
                enrollment_log::Column::LogTime,
                enrollment_log::Column::Action,
            ])
            .column_as(learner::Column::Name, "learner_name")
            .column_as(course::Column::Name, "course_name")
            .left_join(learner::Entity)
            .left_join(course::Entity)
            .order_by_desc(enrollment_log::Column::LogTime)
            .order_by_desc(enrollment_log::Column::Id)
    }
    /// every entry, newest first
    pub async fn list(&self) -> Result<Vec<LogEntry>> {
        Self::entry_select()
            .into_model::<LogEntry>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn by_enrollment(&self, enrollment_id: i32) -> Result<Vec<LogEntry>> {
        Self::entry_select()
            .filter(enrollment_log::Column::EnrollmentId.eq(enrollment_id))
            .into_model::<LogEntry>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{controller::enrollment::EnrollmentController, test::data};

    #[tokio::test]
    async fn survives_learner_removal() {
        let db = data::connect().await;
        let learner = data::learner(&db, "Alice").await;
        let course = data::course(&db, "Intro", None).await;
        let id = EnrollmentController::new(db.clone())
            .enroll(learner, course)
            .await
            .unwrap();

        let audit = AuditController::new(db.clone());
        let entries = audit.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].learner_name.as_deref(), Some("Alice"));
        assert_eq!(entries[0].course_name.as_deref(), Some("Intro"));

        learner::Entity::delete_by_id(learner)
            .exec(db.deref())
            .await
            .unwrap();

        let entries = audit.by_enrollment(id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].learner_id, None);
        assert_eq!(entries[0].learner_name, None);
        assert_eq!(entries[0].course_name.as_deref(), Some("Intro"));
        assert_eq!(entries[0].action, "Enrollment Created");
    }
}
