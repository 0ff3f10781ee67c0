pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_game_table;
mod m20261001_000002_create_role_table;
mod m20261001_000003_create_player_table;
mod m20261001_000004_create_game_role_table;
mod m20261001_000005_seed_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_game_table::Migration),
            Box::new(m20261001_000002_create_role_table::Migration),
            Box::new(m20261001_000003_create_player_table::Migration),
            Box::new(m20261001_000004_create_game_role_table::Migration),
            Box::new(m20261001_000005_seed_roles::Migration),
        ]
    }
}
