//! Migration: Create the recipe_likes relation table.
//!
//! One row per (recipe, user) pair; the composite primary key enforces
//! the at-most-once like invariant at the storage layer.

use sea_orm_migration::prelude::*;

use super::m20240110_000001_create_users_table::Users;
use super::m20240110_000002_create_recipes_table::Recipes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeLikes::RecipeId).uuid().not_null())
                    .col(ColumnDef::new(RecipeLikes::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(RecipeLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RecipeLikes::RecipeId)
                            .col(RecipeLikes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_likes_recipe_id")
                            .from(RecipeLikes::Table, RecipeLikes::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_likes_user_id")
                            .from(RecipeLikes::Table, RecipeLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Favorites listing scans by user
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_likes_user_id")
                    .table(RecipeLikes::Table)
                    .col(RecipeLikes::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeLikes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecipeLikes {
    Table,
    RecipeId,
    UserId,
    CreatedAt,
}
