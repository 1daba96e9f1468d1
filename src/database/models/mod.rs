pub mod contact;
pub mod tenant;
pub mod user;

pub use contact::{Contact, ContactStatus, TipoSoggetto};
pub use tenant::Tenant;
pub use user::{PublicUser, User, UserTenant};
