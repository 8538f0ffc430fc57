use axum::extract::State;
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::announcements::model::{
    Announcement, AnnouncementFilter, CreateAnnouncementDto, DeleteAnnouncementDto,
    UpdateAnnouncementDto,
};
use crate::modules::announcements::service::AnnouncementService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/announcements",
    params(AnnouncementFilter),
    responses(
        (status = 200, description = "Live announcements in the details envelope, newest first", body = Vec<Announcement>),
        (status = 400, description = "Malformed filter", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse)
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_announcements(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<AnnouncementFilter>,
) -> Result<Details<Announcement>, AppError> {
    let ctx = auth_user.context()?;
    let announcements = AnnouncementService::get_announcements(state.store(), &ctx, filter).await?;

    Ok(Details::new(announcements))
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    request_body = CreateAnnouncementDto,
    responses(
        (status = 200, description = "Announcement published, wrapped in the details envelope", body = Announcement),
        (status = 400, description = "Missing fields, invalid user_type or origin", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAnnouncementDto>,
) -> Result<Details<Announcement>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let announcement = AnnouncementService::create_announcement(state.store(), &ctx, dto).await?;

    Ok(Details::single(announcement))
}

#[utoipa::path(
    put,
    path = "/api/announcements",
    request_body = UpdateAnnouncementDto,
    responses(
        (status = 200, description = "Announcement updated, wrapped in the details envelope", body = Announcement),
        (status = 400, description = "Missing identifier or invalid input", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "Unknown organization, or no live announcement by the caller", body = DetailsResponse)
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateAnnouncementDto>,
) -> Result<Details<Announcement>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let announcement = AnnouncementService::update_announcement(state.store(), &ctx, dto).await?;

    Ok(Details::single(announcement))
}

#[utoipa::path(
    delete,
    path = "/api/announcements",
    request_body = DeleteAnnouncementDto,
    responses(
        (status = 200, description = "Announcement soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "Unknown organization, or no live announcement by the caller", body = DetailsResponse)
    ),
    tag = "Announcements",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_announcement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteAnnouncementDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    AnnouncementService::delete_announcement(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted announcement"))
}
