use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use mydesk_core::{AppError, Details, DetailsResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::departments::model::{
    AdmitStudentsDto, ApproveJoinRequestDto, Class, CreateDepartmentDto, Department,
    DepartmentFilter, DepartmentQuery, DepartmentRef, PendingStudentsQuery, Student,
    UpdateDepartmentDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/departments",
    params(DepartmentFilter),
    responses(
        (status = 200, description = "Live departments matching the filter", body = Vec<Department>),
        (status = 400, description = "Malformed filter", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<DepartmentFilter>,
) -> Result<Json<Vec<Department>>, AppError> {
    let ctx = auth_user.context()?;
    let departments = DepartmentService::get_departments(state.store(), &ctx, filter).await?;

    Ok(Json(departments))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created with a generated dept_id", body = Department),
        (status = 400, description = "org_id is not passed or input is invalid", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not a member of the organization", body = DetailsResponse),
        (status = 404, description = "invalid org_id", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let ctx = auth_user.context()?.with_org_id(dto.org_id.as_deref());
    let department = DepartmentService::create_department(state.store(), &ctx, dto).await?;

    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    put,
    path = "/api/departments",
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = DetailsResponse),
        (status = 400, description = "Missing identifier or invalid input", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller owns neither the department nor its organization", body = DetailsResponse),
        (status = 404, description = "Unknown organization or department", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    DepartmentService::update_department(state.store(), &ctx, dto).await?;

    Ok(Details::message("successfully updated department"))
}

#[utoipa::path(
    delete,
    path = "/api/departments",
    request_body = DepartmentRef,
    responses(
        (status = 200, description = "Department soft-deleted", body = DetailsResponse),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "Unknown organization or department", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(body): ValidatedJson<DepartmentRef>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(body.org_id.as_deref())
        .with_dept_id(body.dept_id.as_deref());
    DepartmentService::delete_department(state.store(), &ctx).await?;

    Ok(Details::message("Successfully deleted department"))
}

#[utoipa::path(
    get,
    path = "/api/departments/verify-dept_id",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "The department", body = Department),
        (status = 400, description = "dept_id is not passed", body = DetailsResponse),
        (status = 404, description = "invalid dept_id", body = DetailsResponse)
    ),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn verify_department(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<DepartmentQuery>,
) -> Result<Json<Department>, AppError> {
    let department =
        DepartmentService::verify_department(state.store(), query.dept_id.as_deref()).await?;

    Ok(Json(department))
}

#[utoipa::path(
    post,
    path = "/api/departments/join",
    request_body = DepartmentRef,
    responses(
        (status = 200, description = "Join request recorded", body = DetailsResponse),
        (status = 400, description = "Missing identifier or organization not accepting requests", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "Unknown organization or department", body = DetailsResponse),
        (status = 409, description = "Request already sent", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn join_department(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(body): ValidatedJson<DepartmentRef>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(body.org_id.as_deref())
        .with_dept_id(body.dept_id.as_deref());
    DepartmentService::join_department(state.store(), &ctx).await?;

    Ok(Details::message("Join request sent"))
}

#[utoipa::path(
    post,
    path = "/api/departments/requests/approve",
    request_body = ApproveJoinRequestDto,
    responses(
        (status = 200, description = "Requester is now the department owner", body = Department),
        (status = 400, description = "Missing identifier", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the organization owner", body = DetailsResponse),
        (status = 404, description = "Unknown department or no pending request", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn approve_join_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ApproveJoinRequestDto>,
) -> Result<Json<Department>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    let department = DepartmentService::approve_join_request(state.store(), &ctx, dto).await?;

    Ok(Json(department))
}

#[utoipa::path(
    get,
    path = "/api/departments/assigned-classes",
    params(DepartmentQuery),
    responses(
        (status = 200, description = "Live classes of the department", body = Vec<Class>),
        (status = 400, description = "dept_id is not passed", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 404, description = "invalid dept_id", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_assigned_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DepartmentQuery>,
) -> Result<Json<Vec<Class>>, AppError> {
    let ctx = auth_user.context()?.with_dept_id(query.dept_id.as_deref());
    let classes = DepartmentService::get_assigned_classes(state.store(), &ctx).await?;

    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/departments/requests/student",
    params(PendingStudentsQuery),
    responses(
        (status = 200, description = "Students waiting for the section", body = Vec<Student>),
        (status = 400, description = "Missing identifier or nothing pending", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the department owner", body = DetailsResponse),
        (status = 404, description = "invalid dept_id", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_pending_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PendingStudentsQuery>,
) -> Result<Json<Vec<Student>>, AppError> {
    let ctx = auth_user.context()?.with_dept_id(query.dept_id.as_deref());
    let students =
        DepartmentService::get_pending_students(state.store(), &ctx, query.sec_id).await?;

    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/departments/requests/student",
    request_body = AdmitStudentsDto,
    responses(
        (status = 200, description = "All listed students admitted", body = DetailsResponse),
        (status = 400, description = "Malformed list, unknown student or nothing pending", body = DetailsResponse),
        (status = 401, description = "Unauthorized", body = DetailsResponse),
        (status = 403, description = "Caller is not the department owner", body = DetailsResponse),
        (status = 404, description = "Unknown organization or department", body = DetailsResponse)
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn admit_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<AdmitStudentsDto>,
) -> Result<Details<String>, AppError> {
    let ctx = auth_user
        .context()?
        .with_org_id(dto.org_id.as_deref())
        .with_dept_id(dto.dept_id.as_deref());
    DepartmentService::admit_students(state.store(), &ctx, dto).await?;

    Ok(Details::message(
        "Successfully accepted all provided requests.",
    ))
}
