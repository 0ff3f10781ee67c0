use sea_orm_migration::prelude::*;

/// Creates the `game_role` join table linking one player to one role in one game.
///
/// `unique_role_id` mirrors `role_id` only for unique roles, so the unique index on
/// `(game_id, unique_role_id)` rejects a unique role drawn twice while ignoring pool roles.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GameRole {
    Table,
    GameId,
    PlayerId,
    RoleId,
    UniqueRoleId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Player {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Role {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameRole::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameRole::GameId).string_len(6).not_null())
                    .col(ColumnDef::new(GameRole::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(GameRole::RoleId).uuid().not_null())
                    .col(ColumnDef::new(GameRole::UniqueRoleId).uuid().null())
                    .col(
                        ColumnDef::new(GameRole::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GameRole::GameId)
                            .col(GameRole::PlayerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_role_game_id")
                            .from(GameRole::Table, GameRole::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_role_player_id")
                            .from(GameRole::Table, GameRole::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_role_role_id")
                            .from(GameRole::Table, GameRole::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_role_unique_role")
                    .table(GameRole::Table)
                    .col(GameRole::GameId)
                    .col(GameRole::UniqueRoleId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameRole::Table).to_owned())
            .await
    }
}
