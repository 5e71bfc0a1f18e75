//! Append-only trail of enrollment lifecycle events
//!
//! `enrollment_id` carries no foreign key, so a row outlives the enrollment
//! it describes.
use super::*;

pub const ENROLLMENT_CREATED: &str = "Enrollment Created";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollment_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub enrollment_id: i32,
    #[sea_orm(nullable)]
    pub learner_id: Option<i32>,
    #[sea_orm(nullable)]
    pub course_id: Option<i32>,
    pub log_time: DateTime,
    pub action: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::learner::Entity",
        from = "Column::LearnerId",
        to = "super::learner::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Learner,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Course,
}

impl Related<super::learner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Learner.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl DebugName for Entity {
    const DEBUG_NAME: &'static str = "enrollment_log";
}
