//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` : unified access to all per-aggregate repositories
//! - `DomainResult` : standard result type for domain operations

use super::cottage::CottageRepository;
use super::reservation::ReservationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let owner = repos.cottages().get_owner("c-1").await?;
///     let booked = repos.reservations().find_blocking_for_cottage("c-1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn cottages(&self) -> &dyn CottageRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
}
