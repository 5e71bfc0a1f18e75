use std::{
    io::{self, ErrorKind},
    path::Path,
    sync::Arc,
};

use sea_orm::DatabaseConnection;
use tracing::{instrument, Instrument};

use crate::{
    controller::{
        audit::AuditController, auth::AuthController, course::CourseController,
        crypto::CryptoController, enrollment::EnrollmentController,
        instructor::InstructorController, learner::LearnerController, lecture::LectureController,
        report::ReportController, user::UserController,
    },
    endpoint::{self, console::Console},
    init::{
        self,
        config::{self, GlobalConfig},
        logger,
    },
    util::error::{Error, Result},
};

/// Every controller, sharing one connection pool
pub struct App {
    pub users: UserController,
    pub learners: LearnerController,
    pub instructors: InstructorController,
    pub courses: CourseController,
    pub lectures: LectureController,
    pub enrollments: EnrollmentController,
    pub reports: ReportController,
    pub audit: AuditController,
    pub auth: AuthController,
    config: GlobalConfig,
}

impl App {
    /// Load config, then logger, then database
    pub async fn new(config_path: impl AsRef<Path>) -> init::Result<Self> {
        let config = config::load(config_path).await?;
        logger::init(&config)?;

        let crypto = Arc::new(CryptoController::new(&config.database.salt));
        let db = init::db::init(&config.database, &config.admin, &crypto)
            .instrument(tracing::info_span!("app_construct"))
            .await?;

        Ok(Self::with_db(config, Arc::new(db), crypto))
    }
    pub fn with_db(
        config: GlobalConfig,
        db: Arc<DatabaseConnection>,
        crypto: Arc<CryptoController>,
    ) -> Self {
        Self {
            users: UserController::new(db.clone(), crypto.clone()),
            learners: LearnerController::new(db.clone(), crypto.clone()),
            instructors: InstructorController::new(db.clone(), crypto.clone()),
            courses: CourseController::new(db.clone()),
            lectures: LectureController::new(db.clone()),
            enrollments: EnrollmentController::new(db.clone()),
            reports: ReportController::new(db.clone()),
            audit: AuditController::new(db.clone()),
            auth: AuthController::new(db, crypto),
            config,
        }
    }
    /// Drive the menus on stdin/stdout until exit or end of input
    #[instrument(skip_all)]
    pub async fn start(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut console = Console::new(
            stdin.lock(),
            stdout.lock(),
            self.config.ui.max_column_width,
        );

        match endpoint::run(self, &mut console).await {
            Err(Error::Io(err)) if err.kind() == ErrorKind::UnexpectedEof => {
                tracing::debug!("input_closed");
                Ok(())
            }
            x => x,
        }
    }
}
