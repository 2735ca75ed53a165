// User domain module
// Identities, their login email and the authorization profile

pub mod profile;
pub mod value_objects;

pub use profile::{UserProfile, UserRole};
pub use value_objects::Email;
