pub mod access;
pub mod roles;

pub use access::{Rejection, authorize};
pub use roles::require_role;
