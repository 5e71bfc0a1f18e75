//! Read-only aggregates over the catalog
use super::{
    enrollment::{detail_select, EnrollmentDetail},
    tools::*,
};
use crate::entity::{course, enrollment, instructor, learner, lecture};

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct Workload {
    pub instructor_id: i32,
    pub name: String,
    pub course_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ActiveCourse {
    pub course_id: i32,
    pub name: String,
    pub enrollment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CourseOverview {
    pub course_id: i32,
    pub name: String,
    pub instructor_name: Option<String>,
    pub lecture_count: i64,
    pub enrollment_count: i64,
}

pub struct ReportController {
    db: Arc<DatabaseConnection>,
}

impl ReportController {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
    /// one row per instructor, including those without course
    pub async fn instructor_workload(&self) -> Result<Vec<Workload>> {
        instructor::Entity::find()
            .select_only()
            .column_as(instructor::Column::Id, "instructor_id")
            .column_as(instructor::Column::Name, "name")
            .column_as(course::Column::Id.count(), "course_count")
            .left_join(course::Entity)
            .group_by(instructor::Column::Id)
            .group_by(instructor::Column::Name)
            .order_by_asc(instructor::Column::Id)
            .into_model::<Workload>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn course_completion_summary(&self, course_id: i32) -> Result<Vec<EnrollmentDetail>> {
        course::Entity::find_by_id(course_id)
            .one(self.db.deref())
            .await?
            .ok_or(Error::NotFound(course::Entity::DEBUG_NAME))?;

        detail_select()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .into_model::<EnrollmentDetail>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    /// courses with at least one enrollment, most enrolled first
    pub async fn active_courses(&self) -> Result<Vec<ActiveCourse>> {
        course::Entity::find()
            .select_only()
            .column_as(course::Column::Id, "course_id")
            .column_as(course::Column::Name, "name")
            .column_as(enrollment::Column::Id.count(), "enrollment_count")
            .inner_join(enrollment::Entity)
            .group_by(course::Column::Id)
            .group_by(course::Column::Name)
            .order_by_desc(enrollment::Column::Id.count())
            .order_by_asc(course::Column::Name)
            .into_model::<ActiveCourse>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn course_overview(&self) -> Result<Vec<CourseOverview>> {
        let lecture_count = Expr::col((lecture::Entity, lecture::Column::Id)).count_distinct();
        let enrollment_count =
            Expr::col((enrollment::Entity, enrollment::Column::Id)).count_distinct();

        course::Entity::find()
            .select_only()
            .column_as(course::Column::Id, "course_id")
            .column_as(course::Column::Name, "name")
            .column_as(instructor::Column::Name, "instructor_name")
            .column_as(lecture_count, "lecture_count")
            .column_as(enrollment_count, "enrollment_count")
            .left_join(instructor::Entity)
            .left_join(lecture::Entity)
            .left_join(enrollment::Entity)
            .group_by(course::Column::Id)
            .group_by(course::Column::Name)
            .group_by(instructor::Column::Name)
            .order_by_asc(course::Column::Id)
            .into_model::<CourseOverview>()
            .all(self.db.deref())
            .await
            .map_err(Into::into)
    }
    pub async fn learner_count(&self) -> Result<u64> {
        learner::Entity::find()
            .count(self.db.deref())
            .await
            .map_err(Into::into)
    }
}
