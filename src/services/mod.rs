//! Business logic services layer

pub mod aml_service;
pub mod auth_service;
pub mod permission_service;

pub use aml_service::AmlService;
pub use auth_service::AuthService;
pub use permission_service::PermissionService;
