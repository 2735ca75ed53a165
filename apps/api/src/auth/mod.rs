// Identity: bearer tokens and password hashing

pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenIssuer};
pub use password::PasswordHasher;
