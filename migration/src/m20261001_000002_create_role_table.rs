use sea_orm_migration::prelude::*;

/// Creates the `role` catalog table.
///
/// `max_per_game` is `1` for unique roles, `n > 1` for capped pool roles and
/// `NULL` for unlimited pool roles.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Role {
    Table,
    Id,
    Name,
    Team,
    Description,
    MaxPerGame,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Role::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Role::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Role::Team).string_len(20).not_null())
                    .col(ColumnDef::new(Role::Description).text().not_null())
                    .col(ColumnDef::new(Role::MaxPerGame).integer().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await
    }
}
