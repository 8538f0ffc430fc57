pub use mydesk_models::classes::Class;
pub use mydesk_models::departments::{
    AdmitStudentsDto, ApproveJoinRequestDto, CreateDepartmentDto, Department, DepartmentChanges,
    DepartmentFilter, DepartmentQuery, DepartmentRef, PendingStudentsQuery, UpdateDepartmentDto,
};
pub use mydesk_models::students::Student;

/// Upper bound on `department_id` generation attempts before giving up.
pub const MAX_DEPARTMENT_ID_ATTEMPTS: usize = 5;

pub const ADMIT_STUDENTS_USAGE: &str = "students not passed or students format should be like this. [1, 2, 3] where 1, 2 and 3 are student ID's";
