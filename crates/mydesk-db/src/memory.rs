//! In-process implementation of the repository traits.
//!
//! Mirrors the PostgreSQL schema: rows keep their foreign keys, reads join at
//! projection time, and the unique constraints and indexes of the migrations
//! are enforced with the same constraint names. Every table sits behind one
//! [`tokio::sync::RwLock`], so each operation is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use mydesk_core::filter::{at_least, at_most, field_matches, optional_field_matches};
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
use mydesk_models::users::{NewUser, User, UserSummary};

use crate::error::{
    CLASS_TITLE_KEY, DEPARTMENT_ID_KEY, JOIN_REQUEST_KEY, ORG_ID_KEY, StoreError, StoreResult,
    TEACHER_KEY, USER_EMAIL_KEY,
};
use crate::repository::{
    AnnouncementRepository, ClassRepository, DepartmentRepository, OrganizationRepository,
    SectionRepository, StudentRepository, SubjectRepository, TeacherRepository, UserRepository,
};

#[derive(Debug, Clone)]
struct ClassRow {
    id: ClassId,
    title: String,
    department: DepartmentKey,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SectionRow {
    id: SectionId,
    title: String,
    class: ClassId,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct TeacherRow {
    id: TeacherId,
    user_id: UserId,
    department: DepartmentKey,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SubjectRow {
    id: SubjectId,
    title: String,
    section: SectionId,
    teacher: Option<TeacherId>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StudentRow {
    id: StudentId,
    user_id: UserId,
    section: Option<SectionId>,
    requested_section: Option<SectionId>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    next_key: i64,
    users: Vec<User>,
    organizations: Vec<Organization>,
    /// Stored with `requesting_users` empty; filled on read.
    departments: Vec<Department>,
    join_requests: Vec<(DepartmentKey, UserId)>,
    classes: Vec<ClassRow>,
    sections: Vec<SectionRow>,
    teachers: Vec<TeacherRow>,
    subjects: Vec<SubjectRow>,
    students: Vec<StudentRow>,
    announcements: Vec<Announcement>,
}

fn require(exists: bool, reference: &str) -> StoreResult<()> {
    if exists {
        Ok(())
    } else {
        Err(StoreError::ForeignKeyViolation(reference.to_string()))
    }
}

impl Tables {
    fn next_key(&mut self) -> i64 {
        self.next_key += 1;
        self.next_key
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn organization(&self, id: OrganizationKey) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    fn department(&self, id: DepartmentKey) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    fn class(&self, id: ClassId) -> Option<&ClassRow> {
        self.classes.iter().find(|c| c.id == id)
    }

    fn section(&self, id: SectionId) -> Option<&SectionRow> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_department(&self, id: SectionId) -> Option<&Department> {
        let section = self.section(id)?;
        let class = self.class(section.class)?;
        self.department(class.department)
    }

    fn project_department(&self, department: &Department) -> Department {
        let requesting_users = self
            .join_requests
            .iter()
            .filter(|(key, _)| *key == department.id)
            .filter_map(|(_, user)| self.user(*user))
            .map(UserSummary::from)
            .collect();

        Department {
            requesting_users,
            ..department.clone()
        }
    }

    fn project_class(&self, row: &ClassRow) -> Option<Class> {
        let department = self.department(row.department)?;
        Some(Class {
            id: row.id,
            title: row.title.clone(),
            department: row.department,
            department_name: department.name.clone(),
            department_id: department.department_id.clone(),
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }

    fn project_section(&self, row: &SectionRow) -> Option<Section> {
        let class = self.class(row.class)?;
        Some(Section {
            id: row.id,
            title: row.title.clone(),
            class: row.class,
            class_title: class.title.clone(),
            department: class.department,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }

    fn project_teacher(&self, row: &TeacherRow) -> Option<Teacher> {
        let user = self.user(row.user_id)?;
        Some(Teacher {
            id: row.id,
            user_id: row.user_id,
            email: user.email.clone(),
            department: row.department,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }

    fn project_subject(&self, row: &SubjectRow) -> Option<Subject> {
        let department = self.section_department(row.section)?;
        Some(Subject {
            id: row.id,
            title: row.title.clone(),
            section: row.section,
            teacher: row.teacher,
            department: department.id,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }

    fn project_student(&self, row: &StudentRow) -> Option<Student> {
        let user = self.user(row.user_id)?;
        Some(Student {
            id: row.id,
            user_id: row.user_id,
            email: user.email.clone(),
            section: row.section,
            requested_section: row.requested_section,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }

    fn department_matches(&self, department: &Department, filter: &DepartmentFilter) -> bool {
        let org_id = self
            .organization(department.organization_id)
            .map(|o| o.org_id.clone());

        department.is_active
            && field_matches(filter.id.as_ref(), &department.id)
            && field_matches(filter.department_id.as_ref(), &department.department_id)
            && optional_field_matches(filter.org_id.as_ref(), org_id.as_ref())
            && field_matches(filter.organization.as_ref(), &department.organization_id)
            && optional_field_matches(filter.owner.as_ref(), department.owner_id.as_ref())
    }

    fn student_matches(&self, row: &StudentRow, filter: &StudentFilter) -> bool {
        let admitted = row.section.and_then(|s| self.section_department(s));
        let requested = row
            .requested_section
            .and_then(|s| self.section_department(s));

        row.is_active
            && field_matches(filter.id.as_ref(), &row.id)
            && field_matches(filter.user.as_ref(), &row.user_id)
            && optional_field_matches(
                filter.organization.as_ref(),
                admitted.map(|d| &d.organization_id),
            )
            && optional_field_matches(filter.department.as_ref(), admitted.map(|d| &d.id))
            && optional_field_matches(filter.section.as_ref(), row.section.as_ref())
            && optional_field_matches(
                filter.requested_section.as_ref(),
                row.requested_section.as_ref(),
            )
            && optional_field_matches(
                filter.requested_department.as_ref(),
                requested.map(|d| &d.id),
            )
    }
}

/// Repository implementation backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.user(id).filter(|u| u.is_active).cloned())
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation(USER_EMAIL_KEY.to_string()));
        }
        if tables.user(new.id).is_some() {
            return Err(StoreError::UniqueViolation("users_pkey".to_string()));
        }

        let user = User {
            id: new.id,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn find_organizations(
        &self,
        filter: &OrganizationFilter,
    ) -> StoreResult<Vec<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .iter()
            .filter(|o| {
                o.is_active
                    && field_matches(filter.id.as_ref(), &o.id)
                    && field_matches(filter.org_id.as_ref(), &o.org_id)
                    && field_matches(filter.owner.as_ref(), &o.owner_id)
                    && field_matches(filter.accepting_requests.as_ref(), &o.accepting_requests)
            })
            .cloned()
            .collect())
    }

    async fn insert_organization(&self, new: NewOrganization) -> StoreResult<Organization> {
        let mut tables = self.tables.write().await;
        if tables.organizations.iter().any(|o| o.org_id == new.org_id) {
            return Err(StoreError::UniqueViolation(ORG_ID_KEY.to_string()));
        }
        require(tables.user(new.owner_id).is_some(), "organizations_owner_id_fkey")?;

        let organization = Organization {
            id: OrganizationKey(tables.next_key()),
            org_id: new.org_id,
            name: new.name,
            owner_id: new.owner_id,
            accepting_requests: true,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.organizations.push(organization.clone());
        Ok(organization)
    }

    async fn update_organization(
        &self,
        id: OrganizationKey,
        changes: &OrganizationChanges,
    ) -> StoreResult<Organization> {
        let mut tables = self.tables.write().await;
        let organization = tables
            .organizations
            .iter_mut()
            .find(|o| o.id == id && o.is_active)
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = &changes.name {
            organization.name = name.clone();
        }
        if let Some(accepting) = changes.accepting_requests {
            organization.accepting_requests = accepting;
        }
        Ok(organization.clone())
    }

    async fn soft_delete_organization(&self, id: OrganizationKey) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let organization = tables
            .organizations
            .iter_mut()
            .find(|o| o.id == id && o.is_active)
            .ok_or(StoreError::NotFound)?;
        organization.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for MemoryStore {
    async fn find_departments(&self, filter: &DepartmentFilter) -> StoreResult<Vec<Department>> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .iter()
            .filter(|d| tables.department_matches(d, filter))
            .map(|d| tables.project_department(d))
            .collect())
    }

    async fn insert_department(&self, new: NewDepartment) -> StoreResult<Department> {
        let mut tables = self.tables.write().await;
        if tables
            .departments
            .iter()
            .any(|d| d.department_id == new.department_id)
        {
            return Err(StoreError::UniqueViolation(DEPARTMENT_ID_KEY.to_string()));
        }
        require(
            tables.organization(new.organization_id).is_some(),
            "departments_organization_id_fkey",
        )?;
        if let Some(user) = new.requested_by {
            require(tables.user(user).is_some(), "department_join_requests_user_id_fkey")?;
        }

        let department = Department {
            id: DepartmentKey(tables.next_key()),
            department_id: new.department_id,
            name: new.name,
            contact_name: new.contact_name,
            contact_phone: new.contact_phone,
            contact_email: new.contact_email,
            organization_id: new.organization_id,
            owner_id: None,
            is_active: true,
            created_at: Utc::now(),
            requesting_users: Vec::new(),
        };
        tables.departments.push(department.clone());
        if let Some(user) = new.requested_by {
            tables.join_requests.push((department.id, user));
        }
        Ok(tables.project_department(&department))
    }

    async fn update_department(
        &self,
        id: DepartmentKey,
        changes: &DepartmentChanges,
    ) -> StoreResult<Department> {
        let mut tables = self.tables.write().await;
        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == id && d.is_active)
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = &changes.name {
            department.name = name.clone();
        }
        if let Some(contact_name) = &changes.contact_name {
            department.contact_name = Some(contact_name.clone());
        }
        if let Some(contact_phone) = &changes.contact_phone {
            department.contact_phone = Some(contact_phone.clone());
        }
        if let Some(contact_email) = &changes.contact_email {
            department.contact_email = Some(contact_email.clone());
        }
        let department = department.clone();
        Ok(tables.project_department(&department))
    }

    async fn soft_delete_department(&self, id: DepartmentKey) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == id && d.is_active)
            .ok_or(StoreError::NotFound)?;
        department.is_active = false;
        Ok(())
    }

    async fn add_join_request(&self, id: DepartmentKey, user: UserId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.join_requests.contains(&(id, user)) {
            return Err(StoreError::UniqueViolation(JOIN_REQUEST_KEY.to_string()));
        }
        require(
            tables.department(id).is_some(),
            "department_join_requests_department_id_fkey",
        )?;
        require(tables.user(user).is_some(), "department_join_requests_user_id_fkey")?;

        tables.join_requests.push((id, user));
        Ok(())
    }

    async fn approve_join_request(
        &self,
        id: DepartmentKey,
        user: UserId,
    ) -> StoreResult<Department> {
        let mut tables = self.tables.write().await;
        let position = tables
            .join_requests
            .iter()
            .position(|request| *request == (id, user))
            .ok_or(StoreError::NotFound)?;
        let department = tables
            .departments
            .iter_mut()
            .find(|d| d.id == id && d.is_active)
            .ok_or(StoreError::NotFound)?;

        department.owner_id = Some(user);
        let department = department.clone();
        tables.join_requests.remove(position);
        Ok(tables.project_department(&department))
    }
}

#[async_trait]
impl ClassRepository for MemoryStore {
    async fn find_classes(&self, filter: &ClassFilter) -> StoreResult<Vec<Class>> {
        let tables = self.tables.read().await;
        Ok(tables
            .classes
            .iter()
            .filter(|c| {
                let organization = tables.department(c.department).map(|d| &d.organization_id);
                c.is_active
                    && field_matches(filter.id.as_ref(), &c.id)
                    && optional_field_matches(filter.organization.as_ref(), organization)
                    && field_matches(filter.department.as_ref(), &c.department)
                    && field_matches(filter.title.as_ref(), &c.title)
            })
            .filter_map(|c| tables.project_class(c))
            .collect())
    }

    async fn insert_class(&self, new: NewClass) -> StoreResult<Class> {
        let mut tables = self.tables.write().await;
        if tables
            .classes
            .iter()
            .any(|c| c.is_active && c.department == new.department && c.title == new.title)
        {
            return Err(StoreError::UniqueViolation(CLASS_TITLE_KEY.to_string()));
        }
        require(
            tables.department(new.department).is_some(),
            "classes_department_id_fkey",
        )?;

        let row = ClassRow {
            id: ClassId(tables.next_key()),
            title: new.title,
            department: new.department,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.classes.push(row.clone());
        tables.project_class(&row).ok_or(StoreError::NotFound)
    }

    async fn update_class(&self, id: ClassId, title: &str) -> StoreResult<Class> {
        let mut tables = self.tables.write().await;
        let department = tables
            .class(id)
            .filter(|c| c.is_active)
            .map(|c| c.department)
            .ok_or(StoreError::NotFound)?;
        if tables
            .classes
            .iter()
            .any(|c| c.is_active && c.id != id && c.department == department && c.title == title)
        {
            return Err(StoreError::UniqueViolation(CLASS_TITLE_KEY.to_string()));
        }

        let row = tables
            .classes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        row.title = title.to_string();
        let row = row.clone();
        tables.project_class(&row).ok_or(StoreError::NotFound)
    }

    async fn soft_delete_class(&self, id: ClassId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .classes
            .iter_mut()
            .find(|c| c.id == id && c.is_active)
            .ok_or(StoreError::NotFound)?;
        row.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl SectionRepository for MemoryStore {
    async fn find_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<Section>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sections
            .iter()
            .filter(|s| {
                let department = tables.section_department(s.id);
                s.is_active
                    && field_matches(filter.id.as_ref(), &s.id)
                    && optional_field_matches(
                        filter.organization.as_ref(),
                        department.map(|d| &d.organization_id),
                    )
                    && optional_field_matches(
                        filter.department.as_ref(),
                        department.map(|d| &d.id),
                    )
                    && field_matches(filter.class.as_ref(), &s.class)
            })
            .filter_map(|s| tables.project_section(s))
            .collect())
    }

    async fn insert_section(&self, new: NewSection) -> StoreResult<Section> {
        let mut tables = self.tables.write().await;
        require(tables.class(new.class).is_some(), "sections_class_id_fkey")?;

        let row = SectionRow {
            id: SectionId(tables.next_key()),
            title: new.title,
            class: new.class,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.sections.push(row.clone());
        tables.project_section(&row).ok_or(StoreError::NotFound)
    }

    async fn soft_delete_section(&self, id: SectionId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .sections
            .iter_mut()
            .find(|s| s.id == id && s.is_active)
            .ok_or(StoreError::NotFound)?;
        row.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl TeacherRepository for MemoryStore {
    async fn find_teachers(&self, filter: &TeacherFilter) -> StoreResult<Vec<Teacher>> {
        let tables = self.tables.read().await;
        Ok(tables
            .teachers
            .iter()
            .filter(|t| {
                let Some(department) = tables.department(t.department) else {
                    return false;
                };
                t.is_active
                    && department.is_active
                    && field_matches(filter.id.as_ref(), &t.id)
                    && field_matches(filter.organization.as_ref(), &department.organization_id)
                    && field_matches(filter.department.as_ref(), &t.department)
                    && field_matches(filter.user.as_ref(), &t.user_id)
            })
            .filter_map(|t| tables.project_teacher(t))
            .collect())
    }

    async fn insert_teacher(&self, new: NewTeacher) -> StoreResult<Teacher> {
        let mut tables = self.tables.write().await;
        if tables
            .teachers
            .iter()
            .any(|t| t.is_active && t.user_id == new.user_id && t.department == new.department)
        {
            return Err(StoreError::UniqueViolation(TEACHER_KEY.to_string()));
        }
        require(tables.user(new.user_id).is_some(), "teachers_user_id_fkey")?;
        require(
            tables.department(new.department).is_some(),
            "teachers_department_id_fkey",
        )?;

        let row = TeacherRow {
            id: TeacherId(tables.next_key()),
            user_id: new.user_id,
            department: new.department,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.teachers.push(row.clone());
        tables.project_teacher(&row).ok_or(StoreError::NotFound)
    }

    async fn soft_delete_teacher(&self, id: TeacherId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .teachers
            .iter_mut()
            .find(|t| t.id == id && t.is_active)
            .ok_or(StoreError::NotFound)?;
        row.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for MemoryStore {
    async fn find_subjects(&self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>> {
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .iter()
            .filter(|s| {
                let department = tables.section_department(s.section);
                s.is_active
                    && field_matches(filter.id.as_ref(), &s.id)
                    && optional_field_matches(
                        filter.organization.as_ref(),
                        department.map(|d| &d.organization_id),
                    )
                    && optional_field_matches(
                        filter.department.as_ref(),
                        department.map(|d| &d.id),
                    )
                    && field_matches(filter.section.as_ref(), &s.section)
                    && optional_field_matches(filter.teacher.as_ref(), s.teacher.as_ref())
            })
            .filter_map(|s| tables.project_subject(s))
            .collect())
    }

    async fn insert_subject(&self, new: NewSubject) -> StoreResult<Subject> {
        let mut tables = self.tables.write().await;
        require(tables.section(new.section).is_some(), "subjects_section_id_fkey")?;
        if let Some(teacher) = new.teacher {
            require(
                tables.teachers.iter().any(|t| t.id == teacher),
                "subjects_teacher_id_fkey",
            )?;
        }

        let row = SubjectRow {
            id: SubjectId(tables.next_key()),
            title: new.title,
            section: new.section,
            teacher: new.teacher,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.subjects.push(row.clone());
        tables.project_subject(&row).ok_or(StoreError::NotFound)
    }

    async fn soft_delete_subject(&self, id: SubjectId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .subjects
            .iter_mut()
            .find(|s| s.id == id && s.is_active)
            .ok_or(StoreError::NotFound)?;
        row.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for MemoryStore {
    async fn find_students(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .iter()
            .filter(|s| tables.student_matches(s, filter))
            .filter_map(|s| tables.project_student(s))
            .collect())
    }

    async fn request_section(&self, user: UserId, section: SectionId) -> StoreResult<Student> {
        let mut tables = self.tables.write().await;
        require(tables.user(user).is_some(), "students_user_id_fkey")?;
        require(
            tables.section(section).is_some(),
            "students_requested_section_id_fkey",
        )?;

        let row = match tables
            .students
            .iter_mut()
            .find(|s| s.user_id == user && s.is_active)
        {
            Some(row) => {
                row.requested_section = Some(section);
                row.clone()
            }
            None => {
                let row = StudentRow {
                    id: StudentId(tables.next_key()),
                    user_id: user,
                    section: None,
                    requested_section: Some(section),
                    is_active: true,
                    created_at: Utc::now(),
                };
                tables.students.push(row.clone());
                row
            }
        };
        tables.project_student(&row).ok_or(StoreError::NotFound)
    }

    async fn admit_students(&self, ids: &[StudentId]) -> StoreResult<Vec<Student>> {
        let mut tables = self.tables.write().await;
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let all_pending = ids.iter().all(|id| {
            tables
                .students
                .iter()
                .any(|s| s.id == *id && s.is_active && s.requested_section.is_some())
        });
        if !all_pending {
            return Err(StoreError::NotFound);
        }

        for row in tables.students.iter_mut().filter(|s| ids.contains(&s.id)) {
            row.section = row.requested_section.take();
        }

        Ok(tables
            .students
            .iter()
            .filter(|s| ids.contains(&s.id))
            .filter_map(|s| tables.project_student(s))
            .collect())
    }

    async fn soft_delete_student(&self, id: StudentId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .students
            .iter_mut()
            .find(|s| s.id == id && s.is_active)
            .ok_or(StoreError::NotFound)?;
        row.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl AnnouncementRepository for MemoryStore {
    async fn find_announcements(
        &self,
        filter: &AnnouncementFilter,
    ) -> StoreResult<Vec<Announcement>> {
        let tables = self.tables.read().await;
        let mut announcements: Vec<Announcement> = tables
            .announcements
            .iter()
            .filter(|a| {
                let org_id = tables.organization(a.organization_id).map(|o| &o.org_id);
                a.is_active
                    && field_matches(filter.id.as_ref(), &a.id)
                    && optional_field_matches(filter.org_id.as_ref(), org_id)
                    && at_least(filter.start_date.as_ref(), a.date.as_ref())
                    && at_most(filter.end_date.as_ref(), a.date.as_ref())
                    && field_matches(filter.is_public.as_ref(), &a.is_public)
                    && field_matches(filter.author.as_ref(), &a.user_id)
            })
            .cloned()
            .collect();
        announcements.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(announcements)
    }

    async fn insert_announcement(&self, new: NewAnnouncement) -> StoreResult<Announcement> {
        let mut tables = self.tables.write().await;
        require(tables.user(new.user_id).is_some(), "announcements_user_id_fkey")?;
        require(
            tables.organization(new.organization_id).is_some(),
            "announcements_organization_id_fkey",
        )?;

        let now = Utc::now();
        let announcement = Announcement {
            id: AnnouncementId(tables.next_key()),
            user_id: new.user_id,
            organization_id: new.organization_id,
            title: new.title,
            description: new.description,
            data: new.data,
            date: new.date,
            visible: new.visible,
            origin: new.origin,
            is_public: new.is_public,
            acknowledge: new.acknowledge,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.announcements.push(announcement.clone());
        Ok(announcement)
    }

    async fn update_announcement(
        &self,
        id: AnnouncementId,
        changes: &AnnouncementChanges,
    ) -> StoreResult<Announcement> {
        let mut tables = self.tables.write().await;
        let announcement = tables
            .announcements
            .iter_mut()
            .find(|a| a.id == id && a.is_active)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = &changes.title {
            announcement.title = title.clone();
        }
        if let Some(description) = &changes.description {
            announcement.description = Some(description.clone());
        }
        if let Some(data) = &changes.data {
            announcement.data = Some(data.clone());
        }
        if let Some(date) = changes.date {
            announcement.date = Some(date);
        }
        if let Some(visible) = changes.visible {
            announcement.visible = visible;
        }
        if let Some(is_public) = changes.is_public {
            announcement.is_public = is_public;
        }
        if let Some(acknowledge) = changes.acknowledge {
            announcement.acknowledge = acknowledge;
        }
        announcement.updated_at = Utc::now();
        Ok(announcement.clone())
    }

    async fn soft_delete_announcement(&self, id: AnnouncementId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let announcement = tables
            .announcements
            .iter_mut()
            .find(|a| a.id == id && a.is_active)
            .ok_or(StoreError::NotFound)?;
        announcement.is_active = false;
        announcement.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mydesk_models::announcements::AnnouncementOrigin;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .insert_user(NewUser {
                id: UserId::new(),
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_department(store: &MemoryStore, owner: &User) -> (Organization, Department) {
        let organization = store
            .insert_organization(NewOrganization {
                org_id: format!("org-{}", owner.id),
                name: "Greenfield".to_string(),
                owner_id: owner.id,
            })
            .await
            .unwrap();
        let department = store
            .insert_department(NewDepartment {
                department_id: uuid::Uuid::new_v4().to_string(),
                name: "Science".to_string(),
                contact_name: None,
                contact_phone: None,
                contact_email: None,
                organization_id: organization.id,
                requested_by: Some(owner.id),
            })
            .await
            .unwrap();
        (organization, department)
    }

    #[tokio::test]
    async fn test_org_id_unique_even_after_delete() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let (organization, _) = seed_department(&store, &owner).await;
        store.soft_delete_organization(organization.id).await.unwrap();

        let err = store
            .insert_organization(NewOrganization {
                org_id: organization.org_id.clone(),
                name: "Again".to_string(),
                owner_id: owner.id,
            })
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_of(ORG_ID_KEY));
    }

    #[tokio::test]
    async fn test_second_soft_delete_is_not_found() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let (_, department) = seed_department(&store, &owner).await;
        let class = store
            .insert_class(NewClass {
                title: "Grade 1".to_string(),
                department: department.id,
            })
            .await
            .unwrap();

        store.soft_delete_class(class.id).await.unwrap();
        assert!(matches!(
            store.soft_delete_class(class.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_deleted_class_title_can_be_reused() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let (_, department) = seed_department(&store, &owner).await;
        let new = NewClass {
            title: "Grade 1".to_string(),
            department: department.id,
        };

        let first = store.insert_class(new.clone()).await.unwrap();
        let duplicate = store.insert_class(new.clone()).await.unwrap_err();
        assert!(duplicate.is_unique_violation_of(CLASS_TITLE_KEY));

        store.soft_delete_class(first.id).await.unwrap();
        let second = store.insert_class(new).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_requesting_users_are_projected() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let joiner = seed_user(&store, "joiner@school.test").await;
        let (_, department) = seed_department(&store, &owner).await;

        store.add_join_request(department.id, joiner.id).await.unwrap();
        let err = store
            .add_join_request(department.id, joiner.id)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation_of(JOIN_REQUEST_KEY));

        let approved = store
            .approve_join_request(department.id, joiner.id)
            .await
            .unwrap();
        assert_eq!(approved.owner_id, Some(joiner.id));
        assert!(!approved.is_requested_by(joiner.id));
        assert!(approved.is_requested_by(owner.id));
    }

    #[tokio::test]
    async fn test_admit_students_is_all_or_nothing() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let pupil = seed_user(&store, "pupil@school.test").await;
        let (_, department) = seed_department(&store, &owner).await;
        let class = store
            .insert_class(NewClass {
                title: "Grade 1".to_string(),
                department: department.id,
            })
            .await
            .unwrap();
        let section = store
            .insert_section(NewSection {
                title: "A".to_string(),
                class: class.id,
            })
            .await
            .unwrap();
        let student = store.request_section(pupil.id, section.id).await.unwrap();

        let err = store
            .admit_students(&[student.id, StudentId(9_999)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        let unchanged = store
            .find_student(&StudentFilter {
                id: Some(student.id),
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.requested_section, Some(section.id));

        let admitted = store.admit_students(&[student.id]).await.unwrap();
        assert_eq!(admitted[0].section, Some(section.id));
        assert!(admitted[0].requested_section.is_none());
    }

    #[tokio::test]
    async fn test_announcement_date_range_excludes_undated_rows() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@school.test").await;
        let (organization, _) = seed_department(&store, &owner).await;
        let new = |date| NewAnnouncement {
            user_id: owner.id,
            organization_id: organization.id,
            title: "Exam week".to_string(),
            description: None,
            data: None,
            date,
            visible: true,
            origin: AnnouncementOrigin::Organization {
                organization: organization.id,
            },
            is_public: false,
            acknowledge: false,
        };
        store.insert_announcement(new(Some(Utc::now()))).await.unwrap();
        store.insert_announcement(new(None)).await.unwrap();

        let filter = AnnouncementFilter {
            start_date: Some(Utc::now() - chrono::Duration::days(1)),
            ..Default::default()
        };
        assert_eq!(store.find_announcements(&filter).await.unwrap().len(), 1);
        assert_eq!(
            store
                .find_announcements(&AnnouncementFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
    }
}
