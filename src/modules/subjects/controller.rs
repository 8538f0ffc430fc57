use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::subjects::model::{
    CreateSubjectDto, DeleteSubjectDto, Subject, SubjectListQuery,
};
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/subjects",
    params(SubjectListQuery),
    responses(
        (status = 200, description = "Live subjects of the organization", body = Vec<Subject>),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<SubjectListQuery>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
    let subjects = SubjectService::get_subjects(state.store(), &ctx, query).await?;

    Ok(Json(subjects))
}

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Missing identifier or invalid input", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department, section or teacher", body = DetailsResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_subject(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    let subject = SubjectService::create_subject(state.store(), &ctx, dto).await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    delete,
    path = "/api/subjects",
    request_body = DeleteSubjectDto,
    responses(
        (status = 200, description = "Subject soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or subject", body = DetailsResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteSubjectDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    SubjectService::delete_subject(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted subject"))
}
