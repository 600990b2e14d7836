//! Cottage repository interface

use async_trait::async_trait;

use super::model::Cottage;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

#[async_trait]
pub trait CottageRepository: Send + Sync {
    /// Save a new cottage
    async fn save(&self, cottage: Cottage) -> DomainResult<()>;

    /// Find cottage by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Cottage>>;

    /// Cottages listed by an owner, ordered by name
    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Cottage>>;

    async fn count(&self) -> DomainResult<u64>;

    /// Owner of a cottage, `NotFound` for unknown ids
    async fn get_owner(&self, cottage_id: &str) -> DomainResult<String> {
        self.find_by_id(cottage_id)
            .await?
            .map(|c| c.owner_id)
            .ok_or_else(|| DomainError::not_found("Cottage", cottage_id))
    }
}
