pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod permission;
