pub use mydesk_models::organizations::{
    CreateOrganizationDto, Organization, OrganizationChanges, OrganizationFilter,
    OrganizationRef, UpdateOrganizationDto,
};
