//! Domain model module declarations.

pub mod plan;
pub mod reflection;
pub mod suggestion;
pub mod task;
