//! Migration: Create the recipes table.

use sea_orm_migration::prelude::*;

use super::m20240110_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(ColumnDef::new(Recipes::Description).text().not_null())
                    .col(ColumnDef::new(Recipes::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Recipes::CookingTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::Difficulty).string().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).json_binary().not_null())
                    .col(ColumnDef::new(Recipes::Instructions).text().not_null())
                    .col(ColumnDef::new(Recipes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user_id")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The catalog lists newest-first with id as tiebreak
        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_created_at_id")
                    .table(Recipes::Table)
                    .col(Recipes::CreatedAt)
                    .col(Recipes::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user_id")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Recipes {
    Table,
    Id,
    Title,
    Description,
    ImageUrl,
    CookingTime,
    Difficulty,
    Ingredients,
    Instructions,
    UserId,
    CreatedAt,
    UpdatedAt,
}
