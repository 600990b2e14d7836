//! SeaORM implementation of CottageRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::cottage::{Cottage, CottageRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::cottage;

pub struct SeaOrmCottageRepository {
    db: DatabaseConnection,
}

impl SeaOrmCottageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: cottage::Model) -> Cottage {
    Cottage {
        id: m.id,
        name: m.name,
        location: m.location,
        owner_id: m.owner_id,
        created_at: m.created_at,
    }
}

#[async_trait]
impl CottageRepository for SeaOrmCottageRepository {
    async fn save(&self, c: Cottage) -> DomainResult<()> {
        debug!("Saving cottage: {} ({})", c.id, c.name);

        let model = cottage::ActiveModel {
            id: Set(c.id),
            name: Set(c.name),
            location: Set(c.location),
            owner_id: Set(c.owner_id),
            created_at: Set(c.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Cottage>> {
        let model = cottage::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Cottage>> {
        let models = cottage::Entity::find()
            .filter(cottage::Column::OwnerId.eq(owner_id))
            .order_by_asc(cottage::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        cottage::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
