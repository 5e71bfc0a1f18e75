use std::fmt::Display;

use super::*;

/// Completion status, always derived from viewed/total lecture counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "Not Started")]
    NotStarted,
    #[sea_orm(string_value = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl Status {
    pub fn from_counts(viewed: u64, total: u64) -> Self {
        match viewed {
            0 => Status::NotStarted,
            x if x >= total => Status::Completed,
            _ => Status::InProgress,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::NotStarted => write!(f, "Not Started"),
            Status::InProgress => write!(f, "In Progress"),
            Status::Completed => write!(f, "Completed"),
        }
    }
}

/// `round(100 * viewed / total)`, half away from zero
///
/// A course without lecture stays at 0.
pub fn percentage(viewed: u64, total: u64) -> i32 {
    if total == 0 {
        return 0;
    }
    let ratio = viewed.min(total) as f64 * 100.0 / total as f64;
    ratio.round() as i32
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub learner_id: i32,
    pub course_id: i32,
    pub enrolled_at: DateTime,
    pub status: Status,
    pub progress: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::learner::Entity",
        from = "Column::LearnerId",
        to = "super::learner::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Learner,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
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
    const DEBUG_NAME: &'static str = "enrollment";
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_from_counts() {
        assert_eq!(Status::from_counts(0, 0), Status::NotStarted);
        assert_eq!(Status::from_counts(0, 4), Status::NotStarted);
        assert_eq!(Status::from_counts(1, 4), Status::InProgress);
        assert_eq!(Status::from_counts(3, 4), Status::InProgress);
        assert_eq!(Status::from_counts(4, 4), Status::Completed);
    }
    #[test]
    fn percentage_rounding() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 4), 25);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 3), 100);
    }
}
