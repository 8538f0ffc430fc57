pub use mydesk_models::subjects::{
    CreateSubjectDto, DeleteSubjectDto, Subject, SubjectFilter, SubjectListQuery,
};
