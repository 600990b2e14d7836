//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::reservation::{
    find_conflict, Reservation, ReservationRepository, ReservationStatus, StayPeriod,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let status = m
        .status
        .parse::<ReservationStatus>()
        .map_err(|e| corrupt(&m.id, e))?;
    let period = StayPeriod::new(m.start_date, m.end_date).map_err(|e| corrupt(&m.id, e))?;

    Ok(Reservation {
        id: m.id,
        tourist_id: m.tourist_id,
        cottage_id: m.cottage_id,
        period,
        status,
        deny_comment: m.deny_comment,
        is_reviewed: m.is_reviewed,
        created_at: m.created_at,
    })
}

fn models_to_domain(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

fn corrupt(id: &str, e: DomainError) -> DomainError {
    DomainError::StoreUnavailable(format!("stored reservation {} is invalid: {}", id, e))
}

fn to_active_model(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id.clone()),
        tourist_id: Set(r.tourist_id.clone()),
        cottage_id: Set(r.cottage_id.clone()),
        start_date: Set(r.period.start()),
        end_date: Set(r.period.end()),
        status: Set(r.status.as_str().to_string()),
        deny_comment: Set(r.deny_comment.clone()),
        is_reviewed: Set(r.is_reviewed),
        created_at: Set(r.created_at),
    }
}

async fn blocking_for_cottage<C>(conn: &C, cottage_id: &str) -> DomainResult<Vec<Reservation>>
where
    C: ConnectionTrait,
{
    let models = reservation::Entity::find()
        .filter(reservation::Column::CottageId.eq(cottage_id))
        .filter(
            reservation::Column::Status
                .is_in(ReservationStatus::BLOCKING.iter().map(|s| s.as_str())),
        )
        .order_by_asc(reservation::Column::StartDate)
        .all(conn)
        .await
        .map_err(db_err)?;
    models_to_domain(models)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_if_available(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(
            "Inserting reservation {} for cottage {} [{} .. {})",
            r.id,
            r.cottage_id,
            r.period.start(),
            r.period.end()
        );

        // Rolled back on drop unless committed.
        let txn = self.db.begin().await.map_err(db_err)?;

        let blocking = blocking_for_cottage(&txn, &r.cottage_id).await?;
        if let Some(existing) = find_conflict(&blocking, &r.period, None) {
            debug!(
                "Reservation {} overlaps {} on cottage {}",
                r.id, existing.id, r.cottage_id
            );
            return Err(DomainError::Conflict(format!(
                "cottage {} is not available for selected period ({} .. {})",
                r.cottage_id,
                r.period.start().date_naive(),
                r.period.end().date_naive()
            )));
        }

        to_active_model(&r).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(r)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_blocking_for_cottage(&self, cottage_id: &str) -> DomainResult<Vec<Reservation>> {
        blocking_for_cottage(&self.db, cottage_id).await
    }

    async fn find_for_tourist(&self, tourist_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::TouristId.eq(tourist_id))
            .order_by_desc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_for_cottages(
        &self,
        cottage_ids: &[String],
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<Reservation>> {
        if cottage_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = reservation::Entity::find()
            .filter(reservation::Column::CottageId.is_in(cottage_ids.iter().cloned()));
        if let Some(status) = status {
            query = query.filter(reservation::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_desc(reservation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn update_status(
        &self,
        r: &Reservation,
        expected: ReservationStatus,
    ) -> DomainResult<bool> {
        debug!(
            "Updating reservation {}: {} -> {}",
            r.id, expected, r.status
        );

        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(r.status.as_str()))
            .col_expr(
                reservation::Column::DenyComment,
                Expr::value(r.deny_comment.clone()),
            )
            .filter(reservation::Column::Id.eq(r.id.as_str()))
            .filter(reservation::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected == 1)
    }

    async fn mark_reviewed(&self, id: &str) -> DomainResult<()> {
        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::IsReviewed, Expr::value(true))
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(())
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        reservation::Entity::find()
            .filter(reservation::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cottage::{Cottage, CottageRepository};
    use crate::domain::reservation::StayPolicy;
    use crate::infrastructure::database::repositories::cottage_repository::SeaOrmCottageRepository;
    use crate::infrastructure::database::test_database;
    use chrono::{Duration, NaiveDate};

    struct Fixture {
        repo: SeaOrmReservationRepository,
        cottages: SeaOrmCottageRepository,
        cottage_id: String,
    }

    async fn fixture() -> Fixture {
        let db = test_database().await;
        let cottages = SeaOrmCottageRepository::new(db.clone());
        let cottage = Cottage::new("Pine Lodge", "Kopaonik", "owner-1", Utc::now());
        let cottage_id = cottage.id.clone();
        cottages.save(cottage).await.unwrap();
        Fixture {
            repo: SeaOrmReservationRepository::new(db),
            cottages,
            cottage_id,
        }
    }

    fn stay(cottage_id: &str, start: &str, end: &str) -> Reservation {
        let period = StayPolicy::default()
            .normalize(
                start.parse::<NaiveDate>().unwrap(),
                end.parse::<NaiveDate>().unwrap(),
            )
            .unwrap();
        Reservation::new("tourist-1", cottage_id, period, Utc::now())
    }

    #[tokio::test]
    async fn insert_then_find_roundtrips_all_fields() {
        let f = fixture().await;
        let saved = f
            .repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-01", "2025-09-05"))
            .await
            .unwrap();

        let loaded = f.repo.find_by_id(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.period, saved.period);
        assert_eq!(loaded.status, ReservationStatus::Unresolved);
        assert_eq!(loaded.tourist_id, "tourist-1");
        assert!(!loaded.is_reviewed);
        assert!(f.repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overlapping_insert_is_rejected_without_writing() {
        let f = fixture().await;
        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-10", "2025-09-15"))
            .await
            .unwrap();

        let rejected = stay(&f.cottage_id, "2025-09-05", "2025-09-12");
        let rejected_id = rejected.id.clone();
        let err = f.repo.insert_if_available(rejected).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(f.repo.find_by_id(&rejected_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn back_to_back_inserts_succeed() {
        let f = fixture().await;
        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-01", "2025-09-05"))
            .await
            .unwrap();
        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-05", "2025-09-10"))
            .await
            .unwrap();

        let blocking = f.repo.find_blocking_for_cottage(&f.cottage_id).await.unwrap();
        assert_eq!(blocking.len(), 2);
        assert!(blocking[0].period.start() < blocking[1].period.start());
    }

    #[tokio::test]
    async fn canceled_slot_can_be_booked_again() {
        let f = fixture().await;
        let mut first = f
            .repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-10", "2025-09-15"))
            .await
            .unwrap();
        first.status = ReservationStatus::Canceled;
        assert!(f
            .repo
            .update_status(&first, ReservationStatus::Unresolved)
            .await
            .unwrap());

        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-10", "2025-09-15"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_status_is_compare_and_set() {
        let f = fixture().await;
        let mut r = f
            .repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-10", "2025-09-15"))
            .await
            .unwrap();

        r.status = ReservationStatus::Denied;
        r.deny_comment = Some("closed for renovation".into());
        assert!(f
            .repo
            .update_status(&r, ReservationStatus::Unresolved)
            .await
            .unwrap());

        // A second writer still expecting `unresolved` loses.
        r.status = ReservationStatus::Approved;
        assert!(!f
            .repo
            .update_status(&r, ReservationStatus::Unresolved)
            .await
            .unwrap());

        let stored = f.repo.find_by_id(&r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Denied);
        assert_eq!(stored.deny_comment.as_deref(), Some("closed for renovation"));
    }

    #[tokio::test]
    async fn mark_reviewed_sets_flag() {
        let f = fixture().await;
        let r = f
            .repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-10", "2025-09-15"))
            .await
            .unwrap();
        f.repo.mark_reviewed(&r.id).await.unwrap();
        assert!(f.repo.find_by_id(&r.id).await.unwrap().unwrap().is_reviewed);

        assert!(matches!(
            f.repo.mark_reviewed("missing").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn queries_by_tourist_and_cottages() {
        let f = fixture().await;
        let other = Cottage::new("Birch Cabin", "Tara", "owner-2", Utc::now());
        let other_id = other.id.clone();
        f.cottages.save(other).await.unwrap();

        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-01", "2025-09-03"))
            .await
            .unwrap();
        f.repo
            .insert_if_available(stay(&other_id, "2025-10-01", "2025-10-03"))
            .await
            .unwrap();

        let mine = f.repo.find_for_tourist("tourist-1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].cottage_id, other_id, "latest stay first");

        let only_first = f
            .repo
            .find_for_cottages(&[f.cottage_id.clone()], None)
            .await
            .unwrap();
        assert_eq!(only_first.len(), 1);

        let approved = f
            .repo
            .find_for_cottages(
                &[f.cottage_id.clone(), other_id],
                Some(ReservationStatus::Approved),
            )
            .await
            .unwrap();
        assert!(approved.is_empty());
        assert!(f.repo.find_for_cottages(&[], None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_created_since_uses_created_at() {
        let f = fixture().await;
        let mut old = stay(&f.cottage_id, "2025-09-01", "2025-09-03");
        old.created_at = Utc::now() - Duration::days(10);
        f.repo.insert_if_available(old).await.unwrap();
        f.repo
            .insert_if_available(stay(&f.cottage_id, "2025-09-05", "2025-09-07"))
            .await
            .unwrap();

        let since = Utc::now() - Duration::days(1);
        assert_eq!(f.repo.count_created_since(since).await.unwrap(), 1);
        let since = Utc::now() - Duration::days(30);
        assert_eq!(f.repo.count_created_since(since).await.unwrap(), 2);
    }
}
