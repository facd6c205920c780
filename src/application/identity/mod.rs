//! Identity bounded context: authentication and user management

pub mod service;

pub use service::{AuthResult, NewUser, UserChanges, UserService};
