pub mod error;
pub mod session;

pub use error::PortalError;
pub use session::{AuthSession, UserRole};
