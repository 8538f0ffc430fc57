pub use mydesk_models::teachers::{
    CreateTeacherDto, DeleteTeacherDto, Teacher, TeacherFilter, TeacherListQuery,
};
