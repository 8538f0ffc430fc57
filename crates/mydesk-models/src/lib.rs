//! # MyDesk Models
//!
//! Domain entities, request DTOs and filter types for the MyDesk API.
//!
//! Every entity carries an `is_active` liveness flag; deleting flips it to
//! `false`. Filter structs hold only `Option` fields and select live rows
//! matching every supplied field.
//!
//! # Modules
//!
//! - [`ids`]: typed keys for every entity
//! - [`users`], [`organizations`], [`departments`], [`classes`],
//!   [`sections`], [`teachers`], [`subjects`], [`students`],
//!   [`announcements`]: one module per resource
//!
//! # Example
//!
//! ```ignore
//! use mydesk_models::classes::ClassFilter;
//!
//! let filter = ClassFilter {
//!     organization: Some(org.id),
//!     ..Default::default()
//! };
//! ```

pub mod announcements;
pub mod classes;
pub mod departments;
pub mod ids;
pub mod organizations;
pub mod sections;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use announcements::{Announcement, AnnouncementFilter, AnnouncementOrigin};
pub use classes::{Class, ClassFilter};
pub use departments::{Department, DepartmentFilter};
pub use organizations::{Organization, OrganizationFilter};
pub use sections::{Section, SectionFilter};
pub use students::{Student, StudentFilter};
pub use subjects::{Subject, SubjectFilter};
pub use teachers::{Teacher, TeacherFilter};
pub use users::{User, UserSummary};
