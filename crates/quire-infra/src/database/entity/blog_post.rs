//! Blog post entity for SeaORM.
//!
//! The table carries a unique index on `(site_id, year, month, slug)`,
//! created by the migration crate.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use quire_core::domain::{BlogPost, Partition, PostAttachments, PostRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub site_id: Uuid,
    pub title: String,
    pub slug: String,
    pub year: i32,
    pub month: i32,
    pub published_at: DateTimeWithTimeZone,
    pub is_published: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub category_ids: Json,
    pub fragment_set_id: Option<Uuid>,
    pub revision_stream_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site::Entity",
        from = "Column::SiteId",
        to = "super::site::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Site,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for BlogPost {
    fn from(model: Model) -> Self {
        let category_ids = serde_json::from_value(model.category_ids).unwrap_or_else(|e| {
            tracing::warn!(post_id = %model.id, error = %e, "Unreadable category_ids column");
            Vec::new()
        });
        let partition = u32::try_from(model.month)
            .ok()
            .and_then(|month| Partition::new(model.year, month));

        BlogPost::rehydrate(PostRecord {
            id: model.id,
            site_id: model.site_id,
            title: model.title,
            slug: model.slug,
            published_at: model.published_at.into(),
            partition,
            is_published: model.is_published,
            attachments: PostAttachments {
                category_ids,
                fragment_set_id: model.fragment_set_id,
                revision_stream_id: model.revision_stream_id,
            },
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain BlogPost to SeaORM ActiveModel.
///
/// Attributes the pipeline has not derived yet are left `NotSet`, so
/// writing an unvalidated post fails on the NOT NULL columns.
impl From<BlogPost> for ActiveModel {
    fn from(post: BlogPost) -> Self {
        let partition = post.partition();
        Self {
            id: Set(post.id),
            site_id: Set(post.site_id),
            title: Set(post.title),
            slug: Set(post.slug),
            year: partition.map_or(NotSet, |p| Set(p.year)),
            month: partition.map_or(NotSet, |p| Set(p.month as i32)),
            published_at: post.published_at.map_or(NotSet, |at| Set(at.into())),
            is_published: Set(post.is_published),
            category_ids: Set(serde_json::json!(post.attachments.category_ids)),
            fragment_set_id: Set(post.attachments.fragment_set_id),
            revision_stream_id: Set(post.attachments.revision_stream_id),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
