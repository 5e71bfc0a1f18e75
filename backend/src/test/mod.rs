//! shared fixture for controller tests
pub mod data;
