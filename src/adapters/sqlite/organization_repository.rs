//! SQLite adapter for `OrganizationRepository`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::organization::Organization;
use crate::domain::ports::OrganizationRepository;

#[derive(Clone)]
pub struct SqliteOrganizationRepository {
    pool: SqlitePool,
}

impl SqliteOrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: String,
    external_id: String,
    display_name: String,
    is_default: i64,
    created_at: String,
    updated_at: String,
}

fn row_to_organization(row: OrganizationRow) -> DomainResult<Organization> {
    Ok(Organization {
        id: parse_uuid(&row.id)?,
        external_id: row.external_id,
        display_name: row.display_name,
        is_default: row.is_default != 0,
        created_at: parse_datetime(&row.created_at)?,
        updated_at: parse_datetime(&row.updated_at)?,
    })
}

#[async_trait]
impl OrganizationRepository for SqliteOrganizationRepository {
    async fn get_by_id(&self, id: Uuid) -> DomainResult<Organization> {
        let row: Option<OrganizationRow> =
            sqlx::query_as("SELECT * FROM organizations WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_organization)
            .transpose()?
            .ok_or(DomainError::OrganizationNotFound(id))
    }

    async fn get_by_external_id(&self, external_id: &str) -> DomainResult<Option<Organization>> {
        let row: Option<OrganizationRow> =
            sqlx::query_as("SELECT * FROM organizations WHERE external_id = ?")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_organization).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Organization>> {
        let rows: Vec<OrganizationRow> =
            sqlx::query_as("SELECT * FROM organizations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(row_to_organization).collect()
    }

    async fn create_if_absent(&self, org: &Organization) -> DomainResult<Organization> {
        sqlx::query(
            "INSERT INTO organizations
             (id, external_id, display_name, is_default, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(external_id) DO NOTHING",
        )
        .bind(org.id.to_string())
        .bind(&org.external_id)
        .bind(&org.display_name)
        .bind(org.is_default as i64)
        .bind(org.created_at.to_rfc3339())
        .bind(org.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        // Re-read: under a concurrent provisioning the surviving row may not
        // be the one we just offered.
        self.get_by_external_id(&org.external_id)
            .await?
            .ok_or_else(|| DomainError::Database("organization vanished after insert".into()))
    }

    async fn update_display_name(&self, id: Uuid, display_name: &str) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE organizations SET display_name = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(display_name)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OrganizationNotFound(id));
        }
        Ok(())
    }
}
