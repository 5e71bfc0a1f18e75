//! Stateless controllers over the entity graph
//!
//! Every controller holds an injected connection and re-reads state on each
//! call. Writes spanning several statements run inside one transaction.
pub mod audit;
pub mod auth;
pub mod course;
pub mod crypto;
pub mod enrollment;
pub mod instructor;
pub mod learner;
pub mod lecture;
pub mod report;
pub mod user;

mod tools {
    pub use sea_orm::sea_query::Expr;
    pub use sea_orm::*;
    pub use std::{ops::Deref, sync::Arc};
    pub use tracing::instrument;

    pub use super::non_blank;
    pub use crate::entity::DebugName;
    pub use crate::util::{
        error::{Error, Result},
        time::now,
    };
}

use crate::util::error::{Error, Result};

/// trimmed copy of a required text field
pub fn non_blank(value: &str, field: &'static str) -> Result<String> {
    match value.trim() {
        "" => Err(Error::BadArgument(field)),
        x => Ok(x.to_owned()),
    }
}
