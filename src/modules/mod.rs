pub mod announcements;
pub mod classes;
pub mod departments;
pub mod organizations;
pub mod sections;
pub mod students;
pub mod subjects;
pub mod teachers;
