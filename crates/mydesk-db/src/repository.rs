//! Repository traits, one per entity, and the [`Store`] super-trait that
//! services receive.
//!
//! Every `find_*` returns live rows only and applies each supplied filter
//! field conjunctively. Every `soft_delete_*` matches live rows only, so
//! deleting an already-deleted row reports [`StoreError::NotFound`].
//!
//! [`StoreError::NotFound`]: crate::StoreError::NotFound

use async_trait::async_trait;

use mydesk_models::announcements::{
    Announcement, AnnouncementChanges, AnnouncementFilter, NewAnnouncement,
};
use mydesk_models::classes::{Class, ClassFilter, NewClass};
use mydesk_models::departments::{Department, DepartmentChanges, DepartmentFilter, NewDepartment};
use mydesk_models::ids::{
    AnnouncementId, ClassId, DepartmentKey, OrganizationKey, SectionId, StudentId, SubjectId,
    TeacherId, UserId,
};
use mydesk_models::organizations::{
    NewOrganization, Organization, OrganizationChanges, OrganizationFilter,
};
use mydesk_models::sections::{NewSection, Section, SectionFilter};
use mydesk_models::students::{Student, StudentFilter};
use mydesk_models::subjects::{NewSubject, Subject, SubjectFilter};
use mydesk_models::teachers::{NewTeacher, Teacher, TeacherFilter};
use mydesk_models::users::{NewUser, User};

use crate::error::StoreResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Live user by id.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_organizations(&self, filter: &OrganizationFilter)
    -> StoreResult<Vec<Organization>>;

    async fn find_organization(
        &self,
        filter: &OrganizationFilter,
    ) -> StoreResult<Option<Organization>> {
        Ok(self.find_organizations(filter).await?.into_iter().next())
    }

    /// Fails with a unique violation on [`crate::ORG_ID_KEY`] when the
    /// `org_id` is taken, including by a deleted organization.
    async fn insert_organization(&self, new: NewOrganization) -> StoreResult<Organization>;

    async fn update_organization(
        &self,
        id: OrganizationKey,
        changes: &OrganizationChanges,
    ) -> StoreResult<Organization>;

    async fn soft_delete_organization(&self, id: OrganizationKey) -> StoreResult<()>;
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Live departments with `requesting_users` populated.
    async fn find_departments(&self, filter: &DepartmentFilter) -> StoreResult<Vec<Department>>;

    async fn find_department(&self, filter: &DepartmentFilter) -> StoreResult<Option<Department>> {
        Ok(self.find_departments(filter).await?.into_iter().next())
    }

    /// Fails with a unique violation on [`crate::DEPARTMENT_ID_KEY`] when the
    /// generated `department_id` collides.
    async fn insert_department(&self, new: NewDepartment) -> StoreResult<Department>;

    async fn update_department(
        &self,
        id: DepartmentKey,
        changes: &DepartmentChanges,
    ) -> StoreResult<Department>;

    async fn soft_delete_department(&self, id: DepartmentKey) -> StoreResult<()>;

    /// Fails with a unique violation on [`crate::JOIN_REQUEST_KEY`] when the
    /// request already exists.
    async fn add_join_request(&self, id: DepartmentKey, user: UserId) -> StoreResult<()>;

    /// Makes `user` the department owner and drops their pending request.
    /// `NotFound` when no such request is pending.
    async fn approve_join_request(&self, id: DepartmentKey, user: UserId)
    -> StoreResult<Department>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn find_classes(&self, filter: &ClassFilter) -> StoreResult<Vec<Class>>;

    async fn find_class(&self, filter: &ClassFilter) -> StoreResult<Option<Class>> {
        Ok(self.find_classes(filter).await?.into_iter().next())
    }

    /// Fails with a unique violation on [`crate::CLASS_TITLE_KEY`] when a live
    /// class of the department already has the title.
    async fn insert_class(&self, new: NewClass) -> StoreResult<Class>;

    async fn update_class(&self, id: ClassId, title: &str) -> StoreResult<Class>;

    async fn soft_delete_class(&self, id: ClassId) -> StoreResult<()>;
}

#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn find_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<Section>>;

    async fn find_section(&self, filter: &SectionFilter) -> StoreResult<Option<Section>> {
        Ok(self.find_sections(filter).await?.into_iter().next())
    }

    async fn insert_section(&self, new: NewSection) -> StoreResult<Section>;

    async fn soft_delete_section(&self, id: SectionId) -> StoreResult<()>;
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn find_teachers(&self, filter: &TeacherFilter) -> StoreResult<Vec<Teacher>>;

    async fn find_teacher(&self, filter: &TeacherFilter) -> StoreResult<Option<Teacher>> {
        Ok(self.find_teachers(filter).await?.into_iter().next())
    }

    /// Fails with a unique violation on [`crate::TEACHER_KEY`] when the user is
    /// already a live teacher of the department.
    async fn insert_teacher(&self, new: NewTeacher) -> StoreResult<Teacher>;

    async fn soft_delete_teacher(&self, id: TeacherId) -> StoreResult<()>;
}

#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn find_subjects(&self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>>;

    async fn find_subject(&self, filter: &SubjectFilter) -> StoreResult<Option<Subject>> {
        Ok(self.find_subjects(filter).await?.into_iter().next())
    }

    async fn insert_subject(&self, new: NewSubject) -> StoreResult<Subject>;

    async fn soft_delete_subject(&self, id: SubjectId) -> StoreResult<()>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_students(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>>;

    async fn find_student(&self, filter: &StudentFilter) -> StoreResult<Option<Student>> {
        Ok(self.find_students(filter).await?.into_iter().next())
    }

    /// Records a pending request for `section` on the user's live student
    /// record, creating the record if the user has none.
    async fn request_section(&self, user: UserId, section: SectionId) -> StoreResult<Student>;

    /// Moves every listed student's pending request into their section, all
    /// or nothing. `NotFound` (and no change) unless every id is a live
    /// student with a pending request.
    async fn admit_students(&self, ids: &[StudentId]) -> StoreResult<Vec<Student>>;

    async fn soft_delete_student(&self, id: StudentId) -> StoreResult<()>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn find_announcements(
        &self,
        filter: &AnnouncementFilter,
    ) -> StoreResult<Vec<Announcement>>;

    async fn find_announcement(
        &self,
        filter: &AnnouncementFilter,
    ) -> StoreResult<Option<Announcement>> {
        Ok(self.find_announcements(filter).await?.into_iter().next())
    }

    async fn insert_announcement(&self, new: NewAnnouncement) -> StoreResult<Announcement>;

    async fn update_announcement(
        &self,
        id: AnnouncementId,
        changes: &AnnouncementChanges,
    ) -> StoreResult<Announcement>;

    async fn soft_delete_announcement(&self, id: AnnouncementId) -> StoreResult<()>;
}

/// Everything a request handler may touch.
pub trait Store:
    UserRepository
    + OrganizationRepository
    + DepartmentRepository
    + ClassRepository
    + SectionRepository
    + TeacherRepository
    + SubjectRepository
    + StudentRepository
    + AnnouncementRepository
{
}

impl<T> Store for T where
    T: UserRepository
        + OrganizationRepository
        + DepartmentRepository
        + ClassRepository
        + SectionRepository
        + TeacherRepository
        + SubjectRepository
        + StudentRepository
        + AnnouncementRepository
{
}
