//! Picture gallery entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pictures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for narrative_core::domain::Picture {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            image: model.image,
            created_at: model.created_at.into(),
        }
    }
}

impl From<narrative_core::domain::Picture> for ActiveModel {
    fn from(item: narrative_core::domain::Picture) -> Self {
        Self {
            id: Set(item.id),
            description: Set(item.description),
            image: Set(item.image),
            created_at: Set(item.created_at.into()),
        }
    }
}
