use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "kv_hash_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub store_key: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub field: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
