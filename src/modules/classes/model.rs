pub use mydesk_models::classes::{
    Class, ClassFilter, ClassListQuery, CreateClassDto, DeleteClassDto, UpdateClassDto,
};
