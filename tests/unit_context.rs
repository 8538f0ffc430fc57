use mydesk::context::{Pipeline, RequestContext, UserType};
use mydesk_core::ErrorKind;
use mydesk_db::{
    DepartmentRepository, JOIN_REQUEST_KEY, MemoryStore, OrganizationRepository, StoreError,
    UserRepository,
};
use mydesk_models::departments::{Department, NewDepartment};
use mydesk_models::ids::UserId;
use mydesk_models::organizations::{NewOrganization, Organization};
use mydesk_models::users::NewUser;
use uuid::Uuid;

async fn user(store: &MemoryStore) -> UserId {
    let id = UserId::new();
    store
        .insert_user(NewUser {
            id,
            email: format!("{}@school.test", Uuid::new_v4()),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        })
        .await
        .unwrap();
    id
}

async fn organization(store: &MemoryStore, owner: UserId) -> Organization {
    store
        .insert_organization(NewOrganization {
            org_id: format!("org-{}", Uuid::new_v4().simple()),
            name: "Greenfield High".to_string(),
            owner_id: owner,
        })
        .await
        .unwrap()
}

async fn department(store: &MemoryStore, organization: &Organization) -> Department {
    store
        .insert_department(NewDepartment {
            department_id: Uuid::new_v4().simple().to_string(),
            name: "Science".to_string(),
            contact_name: None,
            contact_phone: None,
            contact_email: None,
            organization_id: organization.id,
            requested_by: None,
        })
        .await
        .unwrap()
}

fn context(user: UserId, org: &Organization, dept: Option<&Department>) -> RequestContext {
    RequestContext::new(user)
        .with_org_id(Some(&org.org_id))
        .with_dept_id(dept.map(|d| d.department_id.as_str()))
}

#[tokio::test]
async fn test_unknown_user_is_unauthorized() {
    let store = MemoryStore::new();

    let err = Pipeline::new()
        .run(&store, &RequestContext::new(UserId::new()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_unknown_organization_is_not_found() {
    let store = MemoryStore::new();
    let caller = user(&store).await;
    let ctx = RequestContext::new(caller).with_org_id(Some("missing"));

    let err = Pipeline::new()
        .organization()
        .run(&store, &ctx)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message(), "invalid org_id");
}

#[tokio::test]
async fn test_missing_org_id_is_missing_parameter() {
    let store = MemoryStore::new();
    let caller = user(&store).await;

    let err = Pipeline::new()
        .organization()
        .run(&store, &RequestContext::new(caller))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::MissingParameter);
    assert_eq!(err.message(), "org_id is not passed");
}

#[tokio::test]
async fn test_department_of_other_organization() {
    let store = MemoryStore::new();
    let caller = user(&store).await;
    let home = organization(&store, caller).await;
    let away = organization(&store, caller).await;
    let away_dept = department(&store, &away).await;

    let err = Pipeline::new()
        .organization()
        .department()
        .department_in_organization()
        .run(&store, &context(caller, &home, Some(&away_dept)))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message(), "Invalid dept_id");
}

#[tokio::test]
async fn test_other_org_admin_has_no_department_role() {
    let store = MemoryStore::new();
    let owner = user(&store).await;
    let rival = user(&store).await;
    let org = organization(&store, owner).await;
    organization(&store, rival).await;
    let dept = department(&store, &org).await;

    let err = Pipeline::new()
        .organization()
        .department()
        .department_in_organization()
        .department_or_org_admin()
        .run(&store, &context(rival, &org, Some(&dept)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let resolved = Pipeline::new()
        .organization()
        .department()
        .department_in_organization()
        .department_or_org_admin()
        .run(&store, &context(owner, &org, Some(&dept)))
        .await
        .unwrap();
    assert_eq!(resolved.department().unwrap().id, dept.id);
    assert_eq!(resolved.organization().unwrap().id, org.id);
}

#[tokio::test]
async fn test_first_failing_check_wins() {
    let store = MemoryStore::new();
    let owner = user(&store).await;
    let stranger = user(&store).await;
    let org = organization(&store, owner).await;

    // the department is never looked at
    let err = Pipeline::new()
        .organization()
        .org_admin()
        .department()
        .run(&store, &context(stranger, &org, None))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_department_owner_resolves_department_role() {
    let store = MemoryStore::new();
    let owner = user(&store).await;
    let head = user(&store).await;
    let org = organization(&store, owner).await;
    let dept = department(&store, &org).await;
    store.add_join_request(dept.id, head).await.unwrap();
    store.approve_join_request(dept.id, head).await.unwrap();

    let resolved = Pipeline::new()
        .organization()
        .role("dept")
        .run(&store, &context(head, &org, None))
        .await
        .unwrap();

    assert_eq!(resolved.user_type().unwrap(), UserType::Department);
    assert_eq!(resolved.department().unwrap().id, dept.id);

    let err = Pipeline::new()
        .organization()
        .role("teacher")
        .run(&store, &context(head, &org, None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Invalid);
}

#[tokio::test]
async fn test_soft_delete_twice_is_not_found() {
    let store = MemoryStore::new();
    let owner = user(&store).await;
    let org = organization(&store, owner).await;
    let dept = department(&store, &org).await;

    store.soft_delete_department(dept.id).await.unwrap();
    let err = store.soft_delete_department(dept.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    let err = Pipeline::new()
        .department()
        .run(&store, &context(owner, &org, Some(&dept)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_duplicate_join_request_leaves_one() {
    let store = MemoryStore::new();
    let owner = user(&store).await;
    let applicant = user(&store).await;
    let org = organization(&store, owner).await;
    let dept = department(&store, &org).await;

    store.add_join_request(dept.id, applicant).await.unwrap();
    let err = store.add_join_request(dept.id, applicant).await.unwrap_err();
    assert!(err.is_unique_violation_of(JOIN_REQUEST_KEY));

    let reloaded = Pipeline::new()
        .department()
        .run(&store, &context(owner, &org, Some(&dept)))
        .await
        .unwrap();
    assert_eq!(reloaded.department().unwrap().requesting_users.len(), 1);
}
