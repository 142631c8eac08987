//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::ProductListing;

use super::category;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Join with the category row; no per-category count on this path
    pub fn into_listing(self, category: category::Model) -> ProductListing {
        ProductListing {
            id: self.id,
            name: self.name,
            category_id: self.category_id,
            category_name: category.name,
            price: self.price,
            created_at: self.created_at,
            category_product_count: None,
        }
    }
}
