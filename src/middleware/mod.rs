//! Middleware and extractors for request processing.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor validating bearer tokens
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` verifies the JWT and extracts its claims
//! 3. The handler turns the claims into a
//!    [`RequestContext`](crate::context::RequestContext) and runs its
//!    [`Pipeline`](crate::context::Pipeline), which confirms the user is live
//!    and authorizes the request
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn list_classes(auth_user: AuthUser, ...) -> Result<Json<Vec<Class>>, AppError> {
//!     let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
//!     // ...
//! }
//! ```

pub mod auth;
