pub mod auth_service;
pub mod contact_service;

pub use auth_service::{AuthService, AuthSession};
pub use contact_service::ContactService;
