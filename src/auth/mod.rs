//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod scope;

pub use jwt::{Claims, JwtService};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use password::PasswordHasher;
pub use scope::AccessScope;
