use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::teachers::model::{
    CreateTeacherDto, DeleteTeacherDto, Teacher, TeacherListQuery,
};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherListQuery),
    responses(
        (status = 200, description = "Live teachers of the organization", body = Vec<Teacher>),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<TeacherListQuery>,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
    let teachers = TeacherService::get_teachers(state.store(), &ctx, query).await?;

    Ok(Json(teachers))
}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "User added as a teacher of the department", body = Teacher),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or user", body = DetailsResponse),
        (status = 409, description = "Teacher already exists", body = DetailsResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    let teacher = TeacherService::create_teacher(state.store(), &ctx, dto).await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    delete,
    path = "/api/teachers",
    request_body = DeleteTeacherDto,
    responses(
        (status = 200, description = "Teacher soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or teacher", body = DetailsResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteTeacherDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    TeacherService::delete_teacher(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted teacher"))
}
