/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access-token generation and validation
/// - [`identity`]: resolving the authenticated principal to a stored user
///
/// Authorization itself lives in `service::access`; this module only
/// establishes *who* is calling, never what they may do.

pub mod identity;
pub mod jwt;
pub mod password;
