//! Integration tests for the SQLite organization repository and migrations.

use uuid::Uuid;

use flightdeck::adapters::sqlite::{
    all_embedded_migrations, create_migrated_test_pool, initialize_database, Migrator,
    SqliteOrganizationRepository,
};
use flightdeck::domain::errors::DomainError;
use flightdeck::domain::models::organization::{Organization, DEFAULT_ORG_ID};
use flightdeck::domain::ports::OrganizationRepository;

#[tokio::test]
async fn test_migration_seeds_default_org() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool);

    let default_org = repo.get_by_id(DEFAULT_ORG_ID).await.unwrap();
    assert!(default_org.is_default);
    assert_eq!(default_org.display_name, "Default");
    assert_eq!(default_org.external_id, "");
}

#[tokio::test]
async fn test_default_org_is_unique() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool.clone());

    // Re-running migrations must not reseed or duplicate.
    Migrator::new(pool)
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .unwrap();

    let orgs = repo.list().await.unwrap();
    let defaults: Vec<_> = orgs.iter().filter(|org| org.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, DEFAULT_ORG_ID);
}

#[tokio::test]
async fn test_file_backed_database_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite:{}", dir.path().join("flightdeck.db").display());

    let pool = initialize_database(&database_url, None).await.unwrap();
    let repo = SqliteOrganizationRepository::new(pool);

    assert!(repo.get_by_id(DEFAULT_ORG_ID).await.unwrap().is_default);
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool);

    let missing = Uuid::new_v4();
    let err = repo.get_by_id(missing).await.unwrap_err();
    assert!(matches!(err, DomainError::OrganizationNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_create_if_absent_collapses_on_external_id() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool);

    let first = Organization::new("ext-1", "Acme");
    let second = Organization::new("ext-1", "Acme Again");

    let created = repo.create_if_absent(&first).await.unwrap();
    let collided = repo.create_if_absent(&second).await.unwrap();

    // The second insert lost the race; both callers see the surviving row.
    assert_eq!(created.id, first.id);
    assert_eq!(collided.id, first.id);
    assert_eq!(collided.display_name, "Acme");

    let orgs = repo.list().await.unwrap();
    assert_eq!(orgs.iter().filter(|o| o.external_id == "ext-1").count(), 1);
}

#[tokio::test]
async fn test_get_by_external_id() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool);

    let org = Organization::new("ext-2", "Beta");
    repo.create_if_absent(&org).await.unwrap();

    let found = repo.get_by_external_id("ext-2").await.unwrap().unwrap();
    assert_eq!(found.id, org.id);

    assert!(repo.get_by_external_id("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_display_name() {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let repo = SqliteOrganizationRepository::new(pool);

    let org = Organization::new("ext-3", "Old Name");
    repo.create_if_absent(&org).await.unwrap();

    repo.update_display_name(org.id, "New Name").await.unwrap();
    let updated = repo.get_by_id(org.id).await.unwrap();
    assert_eq!(updated.display_name, "New Name");
    assert!(updated.updated_at >= org.updated_at);

    let err = repo
        .update_display_name(Uuid::new_v4(), "Nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OrganizationNotFound(_)));
}
