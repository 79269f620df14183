//! Repository-backed organization service: tenant listing for the Publisher
//! and API, lazy provisioning for the identity-mapping path.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::organization::{
    Organization, OrganizationSummary, DEFAULT_DISPLAY_NAME,
};
use crate::domain::ports::{OrganizationRepository, OrganizationService};

pub struct OrganizationDirectory {
    repo: Arc<dyn OrganizationRepository>,
}

impl OrganizationDirectory {
    pub fn new(repo: Arc<dyn OrganizationRepository>) -> Self {
        Self { repo }
    }

    /// Returns the organization for an external id, creating it on first
    /// observation. Concurrent first observations collapse onto a single row
    /// through the repository's unique constraint.
    pub async fn resolve_external(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> DomainResult<Organization> {
        if let Some(existing) = self.repo.get_by_external_id(external_id).await? {
            return Ok(existing);
        }

        let candidate = Organization::new(external_id, display_name);
        let org = self.repo.create_if_absent(&candidate).await?;
        if org.id == candidate.id {
            info!(org_id = %org.id, external_id, "provisioned organization");
        }
        Ok(org)
    }

    pub async fn rename(&self, id: Uuid, display_name: &str) -> DomainResult<()> {
        self.repo.update_display_name(id, display_name).await
    }
}

#[async_trait]
impl OrganizationService for OrganizationDirectory {
    async fn list_organizations(&self) -> DomainResult<Vec<OrganizationSummary>> {
        let orgs = self.repo.list().await?;
        Ok(orgs
            .into_iter()
            .map(|org| OrganizationSummary {
                name: org.id.to_string(),
                display_name: if org.display_name.is_empty() {
                    DEFAULT_DISPLAY_NAME.to_string()
                } else {
                    org.display_name
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::errors::DomainError;

    #[derive(Default)]
    struct FakeRepo {
        orgs: Mutex<Vec<Organization>>,
    }

    #[async_trait]
    impl OrganizationRepository for FakeRepo {
        async fn get_by_id(&self, id: Uuid) -> DomainResult<Organization> {
            self.orgs
                .lock()
                .unwrap()
                .iter()
                .find(|org| org.id == id)
                .cloned()
                .ok_or(DomainError::OrganizationNotFound(id))
        }

        async fn get_by_external_id(
            &self,
            external_id: &str,
        ) -> DomainResult<Option<Organization>> {
            Ok(self
                .orgs
                .lock()
                .unwrap()
                .iter()
                .find(|org| org.external_id == external_id)
                .cloned())
        }

        async fn list(&self) -> DomainResult<Vec<Organization>> {
            Ok(self.orgs.lock().unwrap().clone())
        }

        async fn create_if_absent(&self, org: &Organization) -> DomainResult<Organization> {
            let mut orgs = self.orgs.lock().unwrap();
            if let Some(existing) = orgs.iter().find(|o| o.external_id == org.external_id) {
                return Ok(existing.clone());
            }
            orgs.push(org.clone());
            Ok(org.clone())
        }

        async fn update_display_name(&self, id: Uuid, display_name: &str) -> DomainResult<()> {
            let mut orgs = self.orgs.lock().unwrap();
            let org = orgs
                .iter_mut()
                .find(|org| org.id == id)
                .ok_or(DomainError::OrganizationNotFound(id))?;
            org.display_name = display_name.to_string();
            Ok(())
        }
    }

    fn stored_org(external_id: &str, display_name: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            display_name: display_name.into(),
            is_default: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_uses_uuid_string_names() {
        let repo = Arc::new(FakeRepo::default());
        let org = stored_org("e1", "Acme");
        repo.orgs.lock().unwrap().push(org.clone());

        let directory = OrganizationDirectory::new(repo);
        let listed = directory.list_organizations().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, org.id.to_string());
        assert_eq!(listed[0].display_name, "Acme");
    }

    #[tokio::test]
    async fn test_list_defaults_empty_display_name() {
        let repo = Arc::new(FakeRepo::default());
        repo.orgs.lock().unwrap().push(stored_org("e1", ""));

        let directory = OrganizationDirectory::new(repo);
        let listed = directory.list_organizations().await.unwrap();
        assert_eq!(listed[0].display_name, DEFAULT_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_resolve_external_provisions_once() {
        let repo = Arc::new(FakeRepo::default());
        let directory = OrganizationDirectory::new(repo.clone());

        let first = directory.resolve_external("e1", "Acme").await.unwrap();
        let second = directory.resolve_external("e1", "Acme").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.orgs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename() {
        let repo = Arc::new(FakeRepo::default());
        let org = stored_org("e1", "Old");
        repo.orgs.lock().unwrap().push(org.clone());

        let directory = OrganizationDirectory::new(repo.clone());
        directory.rename(org.id, "New").await.unwrap();

        assert_eq!(repo.orgs.lock().unwrap()[0].display_name, "New");
    }
}
