use std::path::Path;

use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectOptions, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, EntityTrait, PaginatorTrait, Statement,
};
use tracing::{debug_span, instrument, Instrument};

use super::{config, InitError};
use crate::{
    controller::crypto::CryptoController,
    entity::user::{self, Role},
    util::time::now,
};

#[instrument(skip_all, name = "construct_db")]
/// initialize the database and connection
///
/// 1. Connect to database.
/// 2. Run migration(skip when `migrate = false`).
/// 3. insert the configured admin if there is no user.
/// 4. return DatabaseConnection
pub async fn init(
    config: &config::Database,
    admin: &config::Admin,
    crypto: &CryptoController,
) -> super::Result<DatabaseConnection> {
    if let Some(parent) = Path::new(&config.path)
        .parent()
        .filter(|x| !x.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(InitError::DatabaseDir)?;
    }

    let db = connect(ConnectOptions::new(format!("sqlite://{}?mode=rwc", config.path))).await?;

    if config.migrate {
        migrate(&db).await?;
    }

    init_user(&db, admin, crypto).await?;

    Ok(db)
}

/// Connect and tune a sqlite database
pub async fn connect(mut opt: ConnectOptions) -> super::Result<DatabaseConnection> {
    opt.sqlx_logging_level(log::LevelFilter::Trace);

    let db = Database::connect(opt).await.map_err(InitError::InitConn)?;

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;PRAGMA cache_size = -16384;", // 16MiB cache
    ))
    .instrument(debug_span!("db_optimize"))
    .await
    .map_err(InitError::OptimizeDB)?;

    Ok(db)
}

/// Run migration
pub async fn migrate(db: &DatabaseConnection) -> super::Result<()> {
    Migrator::up(db, None)
        .instrument(debug_span!("db_migrate"))
        .await
        .map_err(InitError::AutoMigrate)
}

#[instrument(skip_all, name = "construct_admin")]
/// check if any user exist or insert the configured admin
async fn init_user(
    db: &DatabaseConnection,
    admin: &config::Admin,
    crypto: &CryptoController,
) -> super::Result<()> {
    if user::Entity::find()
        .count(db)
        .await
        .map_err(InitError::UserCreation)?
        != 0
    {
        return Ok(());
    }

    tracing::info!(email = %admin.email, "setting_up_admin");

    user::ActiveModel {
        email: ActiveValue::Set(admin.email.clone()),
        password: ActiveValue::Set(crypto.hash(&admin.password)),
        role: ActiveValue::Set(Role::Admin),
        create_at: ActiveValue::Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(InitError::UserCreation)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn bootstrap_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config::Database {
            path: dir
                .path()
                .join("db")
                .join("test.sqlite")
                .to_string_lossy()
                .into_owned(),
            salt: "salt".to_owned(),
            migrate: true,
        };
        let admin = config::Admin::default();
        let crypto = CryptoController::new(&config.salt);

        let db = init(&config, &admin, &crypto).await.unwrap();
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 1);

        // second start must not seed again
        let db = init(&config, &admin, &crypto).await.unwrap();
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 1);
    }
}
