//! Platform-agnostic building blocks shared by the survey flow and its views.

pub mod config;
pub mod format;
pub mod ident;
pub mod platform;
pub mod timing;
