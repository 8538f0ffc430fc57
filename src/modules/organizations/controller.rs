use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::organizations::model::{
    CreateOrganizationDto, Organization, OrganizationFilter, OrganizationRef,
    UpdateOrganizationDto,
};
use crate::modules::organizations::service::OrganizationService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/organizations",
    params(OrganizationFilter),
    responses(
        (status = 200, description = "Live organizations matching the filter", body = Vec<Organization>),
        (status = 400, description = "Malformed filter", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse)
    ),
    tag = "Organizations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_organizations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<OrganizationFilter>,
) -> Result<Json<Vec<Organization>>, AppError> {
    let ctx = auth_user.context()?;
    let organizations = OrganizationService::get_organizations(state.store(), &ctx, filter).await?;

    Ok(Json(organizations))
}

#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationDto,
    responses(
        (status = 201, description = "Organization created, caller is its owner", body = Organization),
        (status = 400, description = "Invalid input", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 409, description = "org_id already exists", body = DetailsResponse)
    ),
    tag = "Organizations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateOrganizationDto>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    let ctx = auth_user.context()?;
    let organization = OrganizationService::create_organization(state.store(), &ctx, dto).await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

#[utoipa::path(
    put,
    path = "/api/organizations",
    request_body = UpdateOrganizationDto,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 400, description = "org_id is not passed or input is invalid", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Organizations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateOrganizationDto>,
) -> Result<Json<Organization>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let organization = OrganizationService::update_organization(state.store(), &ctx, dto).await?;

    Ok(Json(organization))
}

#[utoipa::path(
    delete,
    path = "/api/organizations",
    request_body = OrganizationRef,
    responses(
        (status = 200, description = "Organization soft-deleted", body = DetailsResponse),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Organizations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(body): ValidatedJson<OrganizationRef>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user.context()?.with_org_id(body.org_id.as_deref());
    OrganizationService::delete_organization(state.store(), &ctx).await?;

    Ok(Details::message("Successfully deleted organization"))
}
