pub use mydesk_models::students::{
    DeleteStudentDto, JoinSectionDto, Student, StudentFilter, StudentListQuery,
};
