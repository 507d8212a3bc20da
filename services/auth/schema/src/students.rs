use sea_orm::entity::prelude::*;

/// Student identity record. Created by the (out-of-scope) registration flow;
/// this service only reads it, looking up by email case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::auth_codes::Entity")]
    AuthCodes,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::auth_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthCodes.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
