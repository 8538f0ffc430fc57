pub use mydesk_models::sections::{
    CreateSectionDto, DeleteSectionDto, Section, SectionFilter, SectionListQuery,
};
