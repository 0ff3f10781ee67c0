use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::{AssignmentCommit, CommitOutcome, PlayerInsert, Repository};
use crate::domain::{
    AssignmentRecord, Game, GameError, GameStatus, NewGame, NewPlayer, NewRole, Player, Role,
    RoleCapacity, Team,
};
use crate::entities::{game, game_role, player, role};
use crate::utils::GameCode;

/// [`Repository`] backed by a `SeaORM` connection pool.
#[derive(Debug, Clone)]
pub struct SeaRepository {
    db: DatabaseConnection,
}

impl SeaRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `UPDATE game SET status = to WHERE id = ? AND status = from`.
///
/// The row lock taken by the update serializes concurrent transitions on one game.
async fn swap_status<C: ConnectionTrait>(
    conn: &C,
    id: &GameCode,
    from: GameStatus,
    to: GameStatus,
    now: DateTime<FixedOffset>,
) -> Result<bool, DbErr> {
    let result = game::Entity::update_many()
        .col_expr(game::Column::Status, Expr::value(to.as_str()))
        .col_expr(game::Column::UpdatedAt, Expr::value(now))
        .filter(game::Column::Id.eq(id.as_str()))
        .filter(game::Column::Status.eq(from.as_str()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Lock the game row if its status is one of `allowed`, without changing it.
async fn touch_if_status<C: ConnectionTrait>(
    conn: &C,
    id: &GameCode,
    allowed: &[GameStatus],
    now: DateTime<FixedOffset>,
) -> Result<bool, DbErr> {
    let result = game::Entity::update_many()
        .col_expr(game::Column::UpdatedAt, Expr::value(now))
        .filter(game::Column::Id.eq(id.as_str()))
        .filter(game::Column::Status.is_in(allowed.iter().map(GameStatus::as_str)))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

// Stored status, team and capacity text is parsed here, so an unknown value
// surfaces as a validation error instead of reaching game logic.

impl TryFrom<game::Model> for Game {
    type Error = GameError;

    fn try_from(model: game::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GameCode::parse(&model.id)?,
            status: GameStatus::parse(&model.status)?,
            moderator_id: model.moderator_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<player::Model> for Player {
    fn from(model: player::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            name: model.name,
            external_id: model.external_id,
            joined_at: model.joined_at,
        }
    }
}

impl TryFrom<role::Model> for Role {
    type Error = GameError;

    fn try_from(model: role::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            team: Team::parse(&model.team)?,
            capacity: RoleCapacity::from_column(model.max_per_game)?,
            name: model.name,
            description: model.description,
        })
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn assignment_record(
    row: game_role::Model,
    role: Option<role::Model>,
) -> Result<AssignmentRecord, GameError> {
    let role = role.ok_or_else(|| GameError::not_found(format!("role {}", row.role_id)))?;
    Ok(AssignmentRecord {
        player_id: row.player_id,
        role: Role::try_from(role)?,
        assigned_at: row.assigned_at,
    })
}

#[async_trait]
impl Repository for SeaRepository {
    async fn code_exists(&self, code: &GameCode) -> Result<bool, GameError> {
        let count = game::Entity::find_by_id(code.as_str())
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert_game(&self, new_game: NewGame) -> Result<Option<Game>, GameError> {
        let now = Utc::now().fixed_offset();
        let model = game::ActiveModel {
            id: Set(new_game.id.to_string()),
            status: Set(GameStatus::Created.as_str().to_string()),
            moderator_id: Set(new_game.moderator_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(Some(Game::try_from(inserted)?)),
            Err(err) if is_unique_violation(&err) => {
                tracing::debug!(code = %new_game.id, "game code already taken");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_game(&self, id: &GameCode) -> Result<Option<Game>, GameError> {
        game::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await?
            .map(Game::try_from)
            .transpose()
    }

    async fn transition_status(
        &self,
        id: &GameCode,
        from: GameStatus,
        to: GameStatus,
    ) -> Result<Option<Game>, GameError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        if !swap_status(&txn, id, from, to, now).await? {
            txn.rollback().await?;
            return Ok(None);
        }

        let updated = game::Entity::find_by_id(id.as_str()).one(&txn).await?;
        txn.commit().await?;

        updated.map(Game::try_from).transpose()
    }

    async fn add_player(
        &self,
        id: &GameCode,
        new_player: NewPlayer,
    ) -> Result<PlayerInsert, GameError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();

        if !touch_if_status(&txn, id, &GameStatus::JOINABLE, now).await? {
            txn.rollback().await?;
            return Ok(PlayerInsert::NotJoinable);
        }

        let inserted = player::ActiveModel {
            id: Set(Uuid::new_v4()),
            game_id: Set(id.to_string()),
            name: Set(new_player.name),
            external_id: Set(new_player.external_id),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await?;

        // First join opens the lobby; a no-op once the game is already there.
        let promoted = swap_status(&txn, id, GameStatus::Created, GameStatus::Lobby, now).await?;

        txn.commit().await?;

        Ok(PlayerInsert::Joined {
            player: Player::from(inserted),
            promoted,
        })
    }

    async fn list_players(&self, id: &GameCode) -> Result<Vec<Player>, GameError> {
        let players = player::Entity::find()
            .filter(player::Column::GameId.eq(id.as_str()))
            .order_by_asc(player::Column::JoinedAt)
            .order_by_asc(player::Column::Id)
            .all(&self.db)
            .await?;
        Ok(players.into_iter().map(Player::from).collect())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, GameError> {
        role::Entity::find()
            .order_by_asc(role::Column::Team)
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Role::try_from)
            .collect()
    }

    async fn insert_role(&self, new_role: NewRole) -> Result<Role, GameError> {
        let model = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_role.name.clone()),
            team: Set(new_role.team.as_str().to_string()),
            description: Set(new_role.description),
            max_per_game: Set(new_role.capacity.to_column()),
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Role::try_from(inserted),
            Err(err) if is_unique_violation(&err) => Err(GameError::conflict(format!(
                "a role named '{}' already exists",
                new_role.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_role(&self, id: Uuid) -> Result<bool, GameError> {
        let result = role::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn replace_assignments(
        &self,
        commit: AssignmentCommit,
    ) -> Result<CommitOutcome, GameError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().fixed_offset();
        let id = &commit.game_id;

        let guarded = match commit.next {
            Some(next) => swap_status(&txn, id, commit.expected, next, now).await?,
            None => touch_if_status(&txn, id, &[commit.expected], now).await?,
        };
        if !guarded {
            txn.rollback().await?;
            return Ok(CommitOutcome::StatusChanged);
        }

        let mut roster: Vec<Uuid> = player::Entity::find()
            .filter(player::Column::GameId.eq(id.as_str()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        roster.sort_unstable();
        let mut expected = commit.roster;
        expected.sort_unstable();
        if roster != expected {
            txn.rollback().await?;
            return Ok(CommitOutcome::RosterChanged);
        }

        game_role::Entity::delete_many()
            .filter(game_role::Column::GameId.eq(id.as_str()))
            .exec(&txn)
            .await?;

        let rows: Vec<game_role::ActiveModel> = commit
            .assignments
            .iter()
            .map(|a| game_role::ActiveModel {
                game_id: Set(id.to_string()),
                player_id: Set(a.player_id),
                role_id: Set(a.role.id),
                unique_role_id: Set(a.role.capacity.is_unique().then_some(a.role.id)),
                assigned_at: Set(now),
            })
            .collect();
        if !rows.is_empty() {
            game_role::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::debug!(
            game_id = %id,
            assignments = commit.assignments.len(),
            "assignment set replaced"
        );
        Ok(CommitOutcome::Committed { assigned_at: now })
    }

    async fn find_assignment(
        &self,
        id: &GameCode,
        player_id: Uuid,
    ) -> Result<Option<Role>, GameError> {
        let found = game_role::Entity::find_by_id((id.to_string(), player_id))
            .find_also_related(role::Entity)
            .one(&self.db)
            .await?;

        found
            .map(|(row, role)| assignment_record(row, role).map(|record| record.role))
            .transpose()
    }

    async fn list_assignments(
        &self,
        id: &GameCode,
    ) -> Result<Vec<AssignmentRecord>, GameError> {
        game_role::Entity::find()
            .filter(game_role::Column::GameId.eq(id.as_str()))
            .order_by_asc(game_role::Column::PlayerId)
            .find_also_related(role::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(row, role)| assignment_record(row, role))
            .collect()
    }

    async fn delete_game(&self, id: &GameCode) -> Result<bool, GameError> {
        let txn = self.db.begin().await?;

        // Children first; the FK cascade is only a backstop.
        let assignments = game_role::Entity::delete_many()
            .filter(game_role::Column::GameId.eq(id.as_str()))
            .exec(&txn)
            .await?;
        let players = player::Entity::delete_many()
            .filter(player::Column::GameId.eq(id.as_str()))
            .exec(&txn)
            .await?;
        let games = game::Entity::delete_by_id(id.as_str()).exec(&txn).await?;

        if games.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        tracing::debug!(
            game_id = %id,
            players = players.rows_affected,
            assignments = assignments.rows_affected,
            "game deleted with dependents"
        );
        Ok(true)
    }
}
