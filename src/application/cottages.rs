//! Cottage registry slice: listing and ownership lookup

use std::sync::Arc;

use tracing::info;

use crate::domain::{Caller, Cottage, DomainError, DomainResult, RepositoryProvider, Role};
use crate::shared::Clock;

pub struct CottageService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl CottageService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// List a new cottage owned by the caller.
    pub async fn register(
        &self,
        caller: &Caller,
        name: &str,
        location: &str,
    ) -> DomainResult<Cottage> {
        caller.require_role(Role::Owner, "register cottages")?;
        let (name, location) = (name.trim(), location.trim());
        if name.is_empty() || location.is_empty() {
            return Err(DomainError::Validation(
                "cottage name and location are required".to_string(),
            ));
        }

        let cottage = Cottage::new(name, location, &caller.id, self.clock.now());
        self.repos.cottages().save(cottage.clone()).await?;
        info!(cottage_id = %cottage.id, owner_id = %cottage.owner_id, "Cottage registered");
        Ok(cottage)
    }

    pub async fn get(&self, cottage_id: &str) -> DomainResult<Cottage> {
        self.repos
            .cottages()
            .find_by_id(cottage_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Cottage", cottage_id))
    }

    pub async fn list_mine(&self, caller: &Caller) -> DomainResult<Vec<Cottage>> {
        caller.require_role(Role::Owner, "list their cottages")?;
        self.repos.cottages().find_by_owner(&caller.id).await
    }
}
