use paste::paste;
use sea_orm_migration::prelude::*;

static CREATE_AT: &str = "DEFAULT CURRENT_TIMESTAMP";

macro_rules! index {
    ($manager:expr,$table:ident,$col:ident) => {
        paste! {
            $manager
            .create_index(
                Index::create()
                    .name(
                        concat!(
                            "idx-",
                            stringify!($table),
                            "-",
                            stringify!($col),
                        ).to_lowercase()
                    )
                    .table($table::Table)
                    .col($table::$col)
                    .to_owned(),
            )
            .await?;
        }
    };
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    Password,
    Role,
    LastLogin,
    CreateAt,
}

#[derive(DeriveIden)]
pub enum Learners {
    Table,
    Id,
    UserId,
    Name,
    Phone,
}

#[derive(DeriveIden)]
pub enum Instructors {
    Table,
    Id,
    UserId,
    Name,
    Expertise,
}

#[derive(DeriveIden)]
pub enum Courses {
    Table,
    Id,
    Name,
    Description,
    InstructorId,
}

#[derive(DeriveIden)]
pub enum Lectures {
    Table,
    Id,
    CourseId,
    Title,
    Content,
}

#[derive(DeriveIden)]
pub enum Enrollments {
    Table,
    Id,
    LearnerId,
    CourseId,
    EnrolledAt,
    Status,
    Progress,
}

#[derive(DeriveIden)]
pub enum LectureViews {
    Table,
    LearnerId,
    LectureId,
    ViewedAt,
}

#[derive(DeriveIden)]
pub enum EnrollmentLogs {
    Table,
    Id,
    EnrollmentId,
    LearnerId,
    CourseId,
    LogTime,
    Action,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).binary().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::LastLogin).date_time().null())
                    .col(
                        ColumnDef::new(Users::CreateAt)
                            .date_time()
                            .not_null()
                            .extra(CREATE_AT.to_string()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Learners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Learners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Learners::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-learners-user")
                            .from(Learners::Table, Learners::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(Learners::Name).text().not_null())
                    .col(ColumnDef::new(Learners::Phone).text().null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Instructors::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-instructors-user")
                            .from(Instructors::Table, Instructors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(Instructors::Name).text().not_null())
                    .col(ColumnDef::new(Instructors::Expertise).text().null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).text().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::InstructorId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-instructor")
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lectures::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lectures::CourseId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lectures-course")
                            .from(Lectures::Table, Lectures::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(Lectures::Title).text().not_null())
                    .col(ColumnDef::new(Lectures::Content).text().null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::LearnerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-learner")
                            .from(Enrollments::Table, Enrollments::LearnerId)
                            .to(Learners::Table, Learners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(Enrollments::CourseId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-course")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .date_time()
                            .not_null()
                            .extra(CREATE_AT.to_string()),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Status)
                            .string()
                            .not_null()
                            .default("Not Started"),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-enrollments-learner-course")
                    .table(Enrollments::Table)
                    .col(Enrollments::LearnerId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        index!(manager, Enrollments, CourseId);
        manager
            .create_table(
                Table::create()
                    .table(LectureViews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LectureViews::LearnerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lecture_views-learner")
                            .from(LectureViews::Table, LectureViews::LearnerId)
                            .to(Learners::Table, Learners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(ColumnDef::new(LectureViews::LectureId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lecture_views-lecture")
                            .from(LectureViews::Table, LectureViews::LectureId)
                            .to(Lectures::Table, Lectures::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .col(
                        ColumnDef::new(LectureViews::ViewedAt)
                            .date_time()
                            .not_null()
                            .extra(CREATE_AT.to_string()),
                    )
                    .primary_key(
                        Index::create()
                            .col(LectureViews::LearnerId)
                            .col(LectureViews::LectureId),
                    )
                    .to_owned(),
            )
            .await?;
        index!(manager, LectureViews, LectureId);
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentLogs::EnrollmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EnrollmentLogs::LearnerId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_logs-learner")
                            .from(EnrollmentLogs::Table, EnrollmentLogs::LearnerId)
                            .to(Learners::Table, Learners::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .col(ColumnDef::new(EnrollmentLogs::CourseId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment_logs-course")
                            .from(EnrollmentLogs::Table, EnrollmentLogs::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .col(
                        ColumnDef::new(EnrollmentLogs::LogTime)
                            .date_time()
                            .not_null()
                            .extra(CREATE_AT.to_string()),
                    )
                    .col(ColumnDef::new(EnrollmentLogs::Action).text().not_null())
                    .to_owned(),
            )
            .await?;
        index!(manager, EnrollmentLogs, EnrollmentId);

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EnrollmentLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LectureViews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Learners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
