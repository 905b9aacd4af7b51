use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_sites::Sites;

const SCOPE_INDEX: &str = "idx_blog_posts_site_year_month_slug";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BlogPosts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BlogPosts::SiteId).uuid().not_null())
                    .col(ColumnDef::new(BlogPosts::Title).string().not_null())
                    .col(ColumnDef::new(BlogPosts::Slug).string().not_null())
                    .col(ColumnDef::new(BlogPosts::Year).integer().not_null())
                    .col(ColumnDef::new(BlogPosts::Month).integer().not_null())
                    .col(
                        ColumnDef::new(BlogPosts::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::CategoryIds)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(BlogPosts::FragmentSetId).uuid().null())
                    .col(ColumnDef::new(BlogPosts::RevisionStreamId).uuid().null())
                    .col(
                        ColumnDef::new(BlogPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPosts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_posts_site_id")
                            .from(BlogPosts::Table, BlogPosts::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Slugs are unique per site and publication month.
        manager
            .create_index(
                Index::create()
                    .name(SCOPE_INDEX)
                    .table(BlogPosts::Table)
                    .col(BlogPosts::SiteId)
                    .col(BlogPosts::Year)
                    .col(BlogPosts::Month)
                    .col(BlogPosts::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_posts_site_published_at")
                    .table(BlogPosts::Table)
                    .col(BlogPosts::SiteId)
                    .col(BlogPosts::PublishedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPosts {
    Table,
    Id,
    SiteId,
    Title,
    Slug,
    Year,
    Month,
    PublishedAt,
    IsPublished,
    CategoryIds,
    FragmentSetId,
    RevisionStreamId,
    CreatedAt,
    UpdatedAt,
}
