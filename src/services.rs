pub mod auth;
pub mod collection_service;
pub mod dashboard_service;
pub mod navigation;
pub mod permission;
pub mod staff_service;

pub use auth::AuthService;
pub use collection_service::CollectionService;
pub use dashboard_service::DashboardService;
pub use staff_service::StaffService;
