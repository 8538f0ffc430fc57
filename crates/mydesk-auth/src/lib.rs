//! # MyDesk Auth
//!
//! Bearer token types and JWT utilities for the MyDesk API.
//!
//! Identity is established outside this service; the API only verifies the
//! signature and expiry of the presented token and reads the user id from
//! its `sub` claim.
//!
//! - [`claims`]: the access token claim set
//! - [`jwt`]: token creation (used by the CLI and tests) and verification
//!
//! # Example
//!
//! ```ignore
//! use mydesk_auth::{create_access_token, verify_token};
//! use mydesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@school.test", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id()?, user_id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
