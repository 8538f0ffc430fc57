//! # MyDesk Core
//!
//! Core types shared by every MyDesk crate:
//!
//! - [`errors`]: the application error type and its HTTP mapping
//! - [`envelope`]: the `{"details": [...]}` response envelope
//! - [`filter`]: match predicates for optional filter fields
//! - [`serde`]: deserializers for loosely-typed query parameters
//!
//! # Example
//!
//! ```ignore
//! use mydesk_core::{AppError, Details};
//!
//! fn lookup(org_id: Option<&str>) -> Result<Details<String>, AppError> {
//!     let org_id = org_id.ok_or_else(|| AppError::missing_parameter("org_id"))?;
//!     Ok(Details::message(format!("found {org_id}")))
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod filter;
pub mod serde;

pub use envelope::{Details, DetailsResponse};
pub use errors::{AppError, AppResult, ErrorKind};
