use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, DatabaseConnection};

use crate::{
    controller::crypto::CryptoController,
    entity::{
        course, instructor, learner, lecture,
        user::{self, Role},
    },
    init,
    util::time::now,
};

/// Fresh in-memory database with the full schema
///
/// Pool holds a single connection, every connection of `sqlite::memory:`
/// would otherwise open its own empty database.
pub async fn connect() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);

    let db = init::db::connect(opt).await.unwrap();
    init::db::migrate(&db).await.unwrap();
    Arc::new(db)
}

pub fn crypto() -> Arc<CryptoController> {
    Arc::new(CryptoController::new("test"))
}

async fn user(db: &DatabaseConnection, name: &str, role: Role) -> i32 {
    user::ActiveModel {
        email: Set(format!("{}@test.io", name.to_lowercase())),
        password: Set(crypto().hash("password")),
        role: Set(role),
        create_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn learner(db: &DatabaseConnection, name: &str) -> i32 {
    let user_id = user(db, name, Role::Learner).await;
    learner::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn instructor(db: &DatabaseConnection, name: &str) -> i32 {
    let user_id = user(db, name, Role::Instructor).await;
    instructor::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn course(db: &DatabaseConnection, name: &str, instructor_id: Option<i32>) -> i32 {
    course::ActiveModel {
        name: Set(name.to_owned()),
        instructor_id: Set(instructor_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

/// insert without touching enrollments
pub async fn lecture(db: &DatabaseConnection, course_id: i32, title: &str) -> i32 {
    lecture::ActiveModel {
        course_id: Set(course_id),
        title: Set(title.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}
