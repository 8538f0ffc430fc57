use axum::{Json, extract::State};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::students::model::{
    DeleteStudentDto, JoinSectionDto, Student, StudentListQuery,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListQuery),
    responses(
        (status = 200, description = "Admitted students of the organization", body = Vec<Student>),
        (status = 400, description = "org_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<StudentListQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    let ctx = auth_user.context()?.with_org_id(query.org_id.as_deref());
    let students = StudentService::get_students(state.store(), &ctx, query).await?;

    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/students/join",
    request_body = JoinSectionDto,
    responses(
        (status = 200, description = "Pending admission request recorded", body = Student),
        (status = 400, description = "Missing identifier or organization not accepting requests", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "Unknown organization or section", body = DetailsResponse),
        (status = 409, description = "Request already sent", body = DetailsResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn join_section(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<JoinSectionDto>,
) -> Result<Json<Student>, AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let student = StudentService::join_section(state.store(), &ctx, dto).await?;

    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students",
    request_body = DeleteStudentDto,
    responses(
        (status = 200, description = "Student soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization, department or student", body = DetailsResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<DeleteStudentDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    StudentService::delete_student(state.store(), &ctx, dto).await?;

    Ok(Details::message("Successfully deleted student"))
}
