use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Convert a UUID string (with dashes) to an `SQLite` hex-blob literal.
///
/// `SeaORM` stores UUID columns as 16-byte BLOBs in `SQLite`, so raw SQL
/// inserts must use `X'...'` notation to match the format.
fn uuid_blob(uuid_str: &str) -> String {
    let hex: String = uuid_str.chars().filter(|c| *c != '-').collect();
    format!("X'{hex}'")
}

/// A single catalog role definition. `max_per_game = None` is an unlimited pool role.
struct SeedRole {
    id: &'static str,
    name: &'static str,
    team: &'static str,
    description: &'static str,
    max_per_game: Option<i32>,
}

#[rustfmt::skip]
const ROLES: &[SeedRole] = &[
    SeedRole { id: "0a000000-0000-4000-8000-000000000001", name: "Godfather", team: "mafia",   description: "Leads the mafia and appears innocent to the detective.", max_per_game: Some(1) },
    SeedRole { id: "0a000000-0000-4000-8000-000000000002", name: "Mafioso",   team: "mafia",   description: "Votes with the mafia each night.",                     max_per_game: None },
    SeedRole { id: "0b000000-0000-4000-8000-000000000001", name: "Detective", team: "town",    description: "Investigates one player each night.",                  max_per_game: Some(1) },
    SeedRole { id: "0b000000-0000-4000-8000-000000000002", name: "Doctor",    team: "town",    description: "Protects one player from elimination each night.",     max_per_game: Some(1) },
    SeedRole { id: "0b000000-0000-4000-8000-000000000003", name: "Villager",  team: "town",    description: "Finds the mafia through discussion and votes.",        max_per_game: None },
    SeedRole { id: "0c000000-0000-4000-8000-000000000001", name: "Jester",    team: "neutral", description: "Wins by getting voted out by the town.",               max_per_game: Some(1) },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for role in ROLES {
            let max_per_game = role
                .max_per_game
                .map_or_else(|| "NULL".to_string(), |n| n.to_string());
            let sql = if backend == sea_orm::DatabaseBackend::Postgres {
                format!(
                    "INSERT INTO role (id, name, team, description, max_per_game) \
                     VALUES ('{id}', '{name}', '{team}', '{description}', {max_per_game}) \
                     ON CONFLICT (id) DO NOTHING",
                    id = role.id,
                    name = role.name,
                    team = role.team,
                    description = role.description,
                )
            } else {
                let id_blob = uuid_blob(role.id);
                format!(
                    "INSERT OR IGNORE INTO role (id, name, team, description, max_per_game) \
                     VALUES ({id_blob}, '{name}', '{team}', '{description}', {max_per_game})",
                    name = role.name,
                    team = role.team,
                    description = role.description,
                )
            };
            db.execute(sea_orm::Statement::from_string(backend, sql))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Role::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Role {
    Table,
}
