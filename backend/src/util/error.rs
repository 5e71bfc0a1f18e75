use sea_orm::{DbErr, SqlErr};

pub type Result<T> = std::result::Result<T, Error>;

/// Centralized Error for controller
///
/// The endpoint renders it as `[kind] message`, it never retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{0}` not found")]
    NotFound(&'static str),
    #[error("learner is already enrolled in this course")]
    DuplicateEnrollment,
    #[error("lecture was already viewed by this learner")]
    AlreadyViewed,
    #[error("learner is not enrolled in the course of this lecture")]
    NotEnrolled,
    #[error("view time precedes the enrollment date")]
    InvalidViewDate,
    #[error("rejected by database: `{0}`")]
    ConstraintViolation(String),
    #[error("cannot reach database: `{0}`")]
    ConnectionFailure(String),
    #[error("`{0}` is not a valid argument")]
    BadArgument(&'static str),
    #[error("seaorm error: `{0}`")]
    DBErr(DbErr),
    #[error("io error: `{0}`")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// stable label of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NotFound",
            Error::DuplicateEnrollment => "DuplicateEnrollment",
            Error::AlreadyViewed => "AlreadyViewed",
            Error::NotEnrolled => "NotEnrolled",
            Error::InvalidViewDate => "InvalidViewDate",
            Error::ConstraintViolation(_) => "ConstraintViolation",
            Error::ConnectionFailure(_) => "ConnectionFailure",
            Error::BadArgument(_) => "BadArgument",
            Error::DBErr(_) => "DatabaseError",
            Error::Io(_) => "IoError",
        }
    }
    /// Convert a unique constraint violation into `err`, classify the rest as usual
    ///
    /// Used where a lost insert race must surface as a domain error.
    pub fn on_unique(value: DbErr, err: Error) -> Error {
        match value.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => err,
            _ => value.into(),
        }
    }
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        match value.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(x)) => {
                return Error::ConstraintViolation(x);
            }
            Some(SqlErr::ForeignKeyConstraintViolation(x)) => {
                return Error::ConstraintViolation(x);
            }
            _ => {}
        }
        match value {
            DbErr::ConnectionAcquire(x) => Error::ConnectionFailure(x.to_string()),
            DbErr::Conn(x) => Error::ConnectionFailure(x.to_string()),
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => Error::NotFound("record"),
            _ => {
                tracing::warn!(err = %value, "database_error");
                Error::DBErr(value)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify_db_error() {
        assert!(matches!(
            Error::from(DbErr::RecordNotUpdated),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from(DbErr::Custom("boom".to_owned())),
            Error::DBErr(_)
        ));
        assert_eq!(Error::AlreadyViewed.kind(), "AlreadyViewed");
    }
}
