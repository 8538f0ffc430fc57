use axum::{Json, extract::State};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::classes::model::{
    Class, ClassListQuery, CreateClassDto, DeleteClassDto, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassListQuery),
    responses(
        (status = 200, description = "Live classes of the organization", body = Vec<Class>),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ClassListQuery>,
) -> Result<Json<Vec<Class>>, AppError> {
    let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
    let classes = ClassService::get_classes(state.store(), &ctx, query).await?;

    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 200, description = "Class created, wrapped in the details envelope", body = Class),
        (status = 400, description = "Missing identifier or title", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization or department", body = DetailsResponse),
        (status = 409, description = "Class already exists", body = DetailsResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<Details<Class>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    let class = ClassService::create_class(state.store(), &ctx, dto).await?;

    Ok(Details::single(class))
}

#[utoipa::path(
    put,
    path = "/api/classes",
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class renamed", body = Class),
        (status = 400, description = "Missing identifier or title", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "Unknown organization or class", body = DetailsResponse),
        (status = 409, description = "Class already exists", body = DetailsResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let class = ClassService::update_class(state.store(), &ctx, dto).await?;

    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes",
    request_body = DeleteClassDto,
    responses(
        (status = 200, description = "Class soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "Unknown organization or class", body = DetailsResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteClassDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    ClassService::delete_class(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted class"))
}
