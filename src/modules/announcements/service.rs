use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult, ErrorKind};
use mydesk_db::{Store, StoreError};
use mydesk_models::announcements::NewAnnouncement;
use mydesk_models::classes::ClassFilter;
use mydesk_models::ids::{AnnouncementId, ClassId, SubjectId};
use mydesk_models::subjects::SubjectFilter;
use mydesk_models::teachers::TeacherFilter;

use crate::context::{Pipeline, RequestContext, Resolved, UserType};
use crate::metrics::track_soft_delete;
use crate::modules::announcements::model::{
    Announcement, AnnouncementFilter, AnnouncementOrigin, CreateAnnouncementDto,
    DeleteAnnouncementDto, UpdateAnnouncementDto,
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Works out what the caller is publishing as. `from` names a class of the
/// caller's department for `dept` and a subject the caller teaches for
/// `teacher`.
async fn resolve_origin(
    store: &dyn Store,
    resolved: &Resolved,
    from: Option<i64>,
) -> AppResult<AnnouncementOrigin> {
    let organization = resolved.organization()?;

    match resolved.user_type()? {
        UserType::Organization => {
            if organization.owner_id != resolved.user_id() {
                return Err(AppError::invalid("organization user is not valid"));
            }
            Ok(AnnouncementOrigin::Organization {
                organization: organization.id,
            })
        }
        UserType::Department => {
            let invalid = || AppError::invalid("Department user is not valid");
            let department = resolved.department()?;
            let class_id = from.map(ClassId).ok_or_else(invalid)?;

            let filter = ClassFilter {
                id: Some(class_id),
                department: Some(department.id),
                ..Default::default()
            };
            let class = store.find_class(&filter).await?.ok_or_else(invalid)?;

            Ok(AnnouncementOrigin::Department {
                class: class.id,
                department: department.id,
            })
        }
        UserType::Teacher => {
            let invalid = || AppError::invalid("Teacher user is not valid");
            let subject_id = from.map(SubjectId).ok_or_else(invalid)?;

            let filter = SubjectFilter {
                id: Some(subject_id),
                organization: Some(organization.id),
                ..Default::default()
            };
            let subject = store.find_subject(&filter).await?.ok_or_else(invalid)?;
            let teacher_id = subject.teacher.ok_or_else(invalid)?;

            let taught_by_caller = TeacherFilter {
                id: Some(teacher_id),
                user: Some(resolved.user_id()),
                ..Default::default()
            };
            let teacher = store
                .find_teacher(&taught_by_caller)
                .await?
                .ok_or_else(invalid)?;

            Ok(AnnouncementOrigin::Teacher {
                subject: subject.id,
                teacher: teacher.id,
            })
        }
    }
}

pub struct AnnouncementService;

impl AnnouncementService {
    #[instrument(skip(store))]
    pub async fn get_announcements(
        store: &dyn Store,
        ctx: &RequestContext,
        filter: AnnouncementFilter,
    ) -> AppResult<Vec<Announcement>> {
        Pipeline::new().run(store, ctx).await?;

        Ok(store.find_announcements(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_announcement(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateAnnouncementDto,
    ) -> AppResult<Announcement> {
        let (Some(title), Some(user_type)) =
            (non_empty(dto.title.clone()), non_empty(dto.user_type.clone()))
        else {
            return Err(AppError::new(
                ErrorKind::MissingParameter,
                "title and user_type are required",
            ));
        };

        let resolved = Pipeline::new()
            .organization()
            .role(user_type)
            .run(store, ctx)
            .await?;
        let origin = resolve_origin(store, &resolved, dto.from).await?;

        let announcement = store
            .insert_announcement(NewAnnouncement {
                user_id: resolved.user_id(),
                organization_id: resolved.organization()?.id,
                title,
                description: dto.description,
                data: dto.data,
                date: dto.date,
                visible: dto.visible.unwrap_or(true),
                origin,
                is_public: dto.is_public.unwrap_or(false),
                acknowledge: dto.acknowledge.unwrap_or(false),
            })
            .await?;

        info!(announcement_id = %announcement.id, "announcement published");
        Ok(announcement)
    }

    async fn authored(
        store: &dyn Store,
        resolved: &Resolved,
        id: Option<AnnouncementId>,
    ) -> AppResult<Announcement> {
        let id = id.ok_or_else(|| AppError::missing_parameter("id"))?;
        let filter = AnnouncementFilter {
            id: Some(id),
            org_id: Some(resolved.organization()?.org_id.clone()),
            author: Some(resolved.user_id()),
            ..Default::default()
        };

        store
            .find_announcement(&filter)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))
    }

    /// Only the author may change an announcement.
    #[instrument(skip(store))]
    pub async fn update_announcement(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: UpdateAnnouncementDto,
    ) -> AppResult<Announcement> {
        let resolved = Pipeline::new().organization().run(store, ctx).await?;
        let announcement = Self::authored(store, &resolved, dto.id).await?;

        store
            .update_announcement(announcement.id, &dto.changes)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })
    }

    #[instrument(skip(store))]
    pub async fn delete_announcement(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteAnnouncementDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new().organization().run(store, ctx).await?;
        let announcement = Self::authored(store, &resolved, dto.id).await?;

        store
            .soft_delete_announcement(announcement.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("announcement");
        Ok(())
    }
}
