//! Store tests against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`.

use mydesk_db::{
    CLASS_TITLE_KEY, ClassRepository, DepartmentRepository, JOIN_REQUEST_KEY, ORG_ID_KEY,
    OrganizationRepository, PgStore, StoreError, UserRepository,
};
use mydesk_models::classes::{ClassFilter, NewClass};
use mydesk_models::departments::{DepartmentFilter, NewDepartment};
use mydesk_models::ids::UserId;
use mydesk_models::organizations::{NewOrganization, Organization};
use mydesk_models::users::NewUser;
use sqlx::PgPool;

async fn seed(store: &PgStore) -> (UserId, Organization) {
    let owner = store
        .insert_user(NewUser {
            id: UserId::new(),
            email: "owner@school.test".to_string(),
            first_name: "Olive".to_string(),
            last_name: "Owner".to_string(),
        })
        .await
        .unwrap();
    let organization = store
        .insert_organization(NewOrganization {
            org_id: "greenfield".to_string(),
            name: "Greenfield".to_string(),
            owner_id: owner.id,
        })
        .await
        .unwrap();
    (owner.id, organization)
}

fn new_department(
    organization: &Organization,
    department_id: &str,
    requested_by: Option<UserId>,
) -> NewDepartment {
    NewDepartment {
        department_id: department_id.to_string(),
        name: "Science".to_string(),
        contact_name: None,
        contact_phone: None,
        contact_email: None,
        organization_id: organization.id,
        requested_by,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_org_id_is_unique(pool: PgPool) {
    let store = PgStore::new(pool);
    let (owner, _) = seed(&store).await;

    let err = store
        .insert_organization(NewOrganization {
            org_id: "greenfield".to_string(),
            name: "Copy".to_string(),
            owner_id: owner,
        })
        .await
        .unwrap_err();

    assert!(err.is_unique_violation_of(ORG_ID_KEY));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_join_requests_and_approval(pool: PgPool) {
    let store = PgStore::new(pool);
    let (owner, organization) = seed(&store).await;
    let department = store
        .insert_department(new_department(&organization, "dept-1", Some(owner)))
        .await
        .unwrap();
    assert_eq!(department.requesting_users.len(), 1);

    let err = store
        .add_join_request(department.id, owner)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation_of(JOIN_REQUEST_KEY));

    let approved = store
        .approve_join_request(department.id, owner)
        .await
        .unwrap();
    assert_eq!(approved.owner_id, Some(owner));
    assert!(approved.requesting_users.is_empty());

    let err = store
        .approve_join_request(department.id, owner)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_deleted_rows_are_hidden(pool: PgPool) {
    let store = PgStore::new(pool);
    let (_, organization) = seed(&store).await;
    let department = store
        .insert_department(new_department(&organization, "dept-1", None))
        .await
        .unwrap();

    store.soft_delete_department(department.id).await.unwrap();

    let filter = DepartmentFilter {
        organization: Some(organization.id),
        ..Default::default()
    };
    assert!(store.find_departments(&filter).await.unwrap().is_empty());
    assert!(matches!(
        store.soft_delete_department(department.id).await,
        Err(StoreError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_class_title_unique_among_live_classes(pool: PgPool) {
    let store = PgStore::new(pool);
    let (_, organization) = seed(&store).await;
    let department = store
        .insert_department(new_department(&organization, "dept-1", None))
        .await
        .unwrap();
    let new_class = || NewClass {
        title: "Grade 7".to_string(),
        department: department.id,
    };

    let class = store.insert_class(new_class()).await.unwrap();
    let err = store.insert_class(new_class()).await.unwrap_err();
    assert!(err.is_unique_violation_of(CLASS_TITLE_KEY));

    store.soft_delete_class(class.id).await.unwrap();
    let again = store.insert_class(new_class()).await.unwrap();

    let scoped = ClassFilter {
        organization: Some(organization.id),
        ..Default::default()
    };
    let classes = store.find_classes(&scoped).await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].id, again.id);
    assert_eq!(classes[0].department_id, "dept-1");
}
