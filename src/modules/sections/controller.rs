use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::sections::model::{
    CreateSectionDto, DeleteSectionDto, Section, SectionListQuery,
};
use crate::modules::sections::service::SectionService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/sections",
    params(SectionListQuery),
    responses(
        (status = 200, description = "Live sections of the organization", body = Vec<Section>),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_sections(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<SectionListQuery>,
) -> Result<Json<Vec<Section>>, AppError> {
    let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
    let sections = SectionService::get_sections(state.store(), &ctx, query).await?;

    Ok(Json(sections))
}

#[utoipa::path(
    post,
    path = "/api/sections",
    request_body = CreateSectionDto,
    responses(
        (status = 201, description = "Section created", body = Section),
        (status = 400, description = "Missing identifier or invalid input", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or class", body = DetailsResponse)
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_section(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<(StatusCode, Json<Section>), AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    let section = SectionService::create_section(state.store(), &ctx, dto).await?;

    Ok((StatusCode::CREATED, Json(section)))
}

#[utoipa::path(
    delete,
    path = "/api/sections",
    request_body = DeleteSectionDto,
    responses(
        (status = 200, description = "Section soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or section", body = DetailsResponse)
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_section(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteSectionDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    SectionService::delete_section(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted section"))
}
