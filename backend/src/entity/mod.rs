//! collection of entity
//!
//! Cascading rules (`on_delete`) mirror the foreign keys created by the
//! `migration` crate, the database is the one enforcing them.
use sea_orm::entity::prelude::*;

pub mod course;
pub mod enrollment;
pub mod enrollment_log;
pub mod instructor;
pub mod learner;
pub mod lecture;
pub mod lecture_view;
pub mod user;

/// Name used in [`crate::util::error::Error::NotFound`]
pub trait DebugName {
    const DEBUG_NAME: &'static str = "TEMPLATE_DEBUG_NAME";
}
