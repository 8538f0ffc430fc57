use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use mydesk_core::DetailsResponse;
use mydesk_models::announcements::{
    Announcement, AnnouncementChanges, AnnouncementOrigin, CreateAnnouncementDto,
    DeleteAnnouncementDto, UpdateAnnouncementDto,
};
use mydesk_models::classes::{Class, CreateClassDto, DeleteClassDto, UpdateClassDto};
use mydesk_models::departments::{
    AdmitStudentsDto, ApproveJoinRequestDto, CreateDepartmentDto, Department, DepartmentChanges,
    DepartmentRef, UpdateDepartmentDto,
};
use mydesk_models::organizations::{
    CreateOrganizationDto, Organization, OrganizationChanges, OrganizationRef,
    UpdateOrganizationDto,
};
use mydesk_models::sections::{CreateSectionDto, DeleteSectionDto, Section};
use mydesk_models::students::{DeleteStudentDto, JoinSectionDto, Student};
use mydesk_models::subjects::{CreateSubjectDto, DeleteSubjectDto, Subject};
use mydesk_models::teachers::{CreateTeacherDto, DeleteTeacherDto, Teacher};
use mydesk_models::users::UserSummary;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::organizations::controller::get_organizations,
        crate::modules::organizations::controller::create_organization,
        crate::modules::organizations::controller::update_organization,
        crate::modules::organizations::controller::delete_organization,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::departments::controller::verify_department,
        crate::modules::departments::controller::join_department,
        crate::modules::departments::controller::approve_join_request,
        crate::modules::departments::controller::get_assigned_classes,
        crate::modules::departments::controller::get_pending_students,
        crate::modules::departments::controller::admit_students,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::sections::controller::get_sections,
        crate::modules::sections::controller::create_section,
        crate::modules::sections::controller::delete_section,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::join_section,
        crate::modules::students::controller::delete_student,
        crate::modules::announcements::controller::get_announcements,
        crate::modules::announcements::controller::create_announcement,
        crate::modules::announcements::controller::update_announcement,
        crate::modules::announcements::controller::delete_announcement,
    ),
    components(
        schemas(
            DetailsResponse,
            UserSummary,
            Organization,
            OrganizationChanges,
            CreateOrganizationDto,
            UpdateOrganizationDto,
            OrganizationRef,
            Department,
            DepartmentChanges,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            DepartmentRef,
            ApproveJoinRequestDto,
            AdmitStudentsDto,
            Class,
            CreateClassDto,
            UpdateClassDto,
            DeleteClassDto,
            Section,
            CreateSectionDto,
            DeleteSectionDto,
            Teacher,
            CreateTeacherDto,
            DeleteTeacherDto,
            Subject,
            CreateSubjectDto,
            DeleteSubjectDto,
            Student,
            JoinSectionDto,
            DeleteStudentDto,
            Announcement,
            AnnouncementOrigin,
            AnnouncementChanges,
            CreateAnnouncementDto,
            UpdateAnnouncementDto,
            DeleteAnnouncementDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Organizations", description = "Tenants and their administrators"),
        (name = "Departments", description = "Departments, join requests and student admission"),
        (name = "Classes", description = "Classes of a department"),
        (name = "Sections", description = "Sections of a class"),
        (name = "Teachers", description = "Teachers of a department"),
        (name = "Subjects", description = "Subjects taught in a section"),
        (name = "Students", description = "Students and section join requests"),
        (name = "Announcements", description = "Announcements published by organizations, departments and teachers")
    ),
    info(
        title = "MyDesk API",
        version = "0.1.0",
        description = "Multi-tenant school administration API. Every request is resolved against the caller's organization and department before any data is touched.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
