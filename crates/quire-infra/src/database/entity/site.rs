//! Site entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub identifier: String,
    pub hostname: String,
    pub path: Option<String>,
    pub scheme: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog_post::Entity")]
    BlogPost,
}

impl Related<super::blog_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Site.
impl From<Model> for quire_core::domain::Site {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            identifier: model.identifier,
            hostname: model.hostname,
            path: model.path,
            scheme: model.scheme,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Site to SeaORM ActiveModel.
impl From<quire_core::domain::Site> for ActiveModel {
    fn from(site: quire_core::domain::Site) -> Self {
        Self {
            id: Set(site.id),
            identifier: Set(site.identifier),
            hostname: Set(site.hostname),
            path: Set(site.path),
            scheme: Set(site.scheme),
            created_at: Set(site.created_at.into()),
            updated_at: Set(site.updated_at.into()),
        }
    }
}
