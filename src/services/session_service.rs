use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Assignment, AssignmentRecord, BalanceRules, Game, GameError, GameStateMachine, GameStatus,
    NewGame, NewPlayer, Player, Role, RoleAssignmentEngine,
};
use crate::repository::{
    AssignmentCommit, CallContext, CommitOutcome, PlayerInsert, Repository,
};
use crate::services::locks::{GameLockGuard, GameLocks};
use crate::utils::{CodeGenerator, GameCode, RandomSource};

/// Rounds of generate + check + insert before giving up on a new code.
pub const DEFAULT_CODE_ATTEMPTS: u32 = 5;

const MAX_NAME_LENGTH: usize = 50;
const MAX_EXTERNAL_ID_LENGTH: usize = 255;

/// Orchestrates the session lifecycle: codes, joins, role draws and status changes.
///
/// Every repository call runs under the caller's [`CallContext`]. Mutating
/// operations hold the per-game lock for their whole duration; the status
/// compare-and-swap in the repository covers writers in other processes.
/// Once a write has committed, the result is built without another
/// repository call, so a late cancellation cannot hide a saved change.
#[derive(Clone)]
pub struct SessionService {
    repo: Arc<dyn Repository>,
    codes: CodeGenerator,
    random: Arc<dyn RandomSource>,
    rules: BalanceRules,
    code_attempts: u32,
    locks: GameLocks,
}

impl SessionService {
    pub fn new(
        repo: Arc<dyn Repository>,
        random: Arc<dyn RandomSource>,
        rules: BalanceRules,
    ) -> Self {
        Self {
            repo,
            codes: CodeGenerator::new(Arc::clone(&random)),
            random,
            rules,
            code_attempts: DEFAULT_CODE_ATTEMPTS,
            locks: GameLocks::new(),
        }
    }

    #[must_use]
    pub fn with_code_attempts(mut self, attempts: u32) -> Self {
        self.code_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &BalanceRules {
        &self.rules
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Create a game in status `Created` under a fresh join code.
    ///
    /// # Errors
    ///
    /// [`GameError::CodeSpaceExhausted`] when every attempt collided with an existing code.
    pub async fn create_game(
        &self,
        ctx: &CallContext,
        moderator_id: Uuid,
    ) -> Result<Game, GameError> {
        for attempt in 1..=self.code_attempts {
            let code = self.codes.generate();

            if ctx.run("code_exists", self.repo.code_exists(&code)).await? {
                tracing::debug!(%code, attempt, "game code collision");
                continue;
            }

            let new_game = NewGame {
                id: code.clone(),
                moderator_id,
            };
            if let Some(game) = ctx.run("insert_game", self.repo.insert_game(new_game)).await? {
                tracing::info!(game_id = %game.id, %moderator_id, attempt, "game created");
                return Ok(game);
            }
            tracing::debug!(%code, attempt, "game code taken by concurrent insert");
        }

        tracing::warn!(attempts = self.code_attempts, "no free game code found");
        Err(GameError::CodeSpaceExhausted {
            attempts: self.code_attempts,
        })
    }

    /// Add a player to a Created or Lobby game. The first join opens the lobby.
    ///
    /// # Errors
    ///
    /// - [`GameError::Validation`] for a malformed code, name or external id
    /// - [`GameError::GameNotFound`] / [`GameError::GameNotJoinable`]
    pub async fn join_game(
        &self,
        ctx: &CallContext,
        code: &str,
        name: &str,
        external_id: &str,
    ) -> Result<Player, GameError> {
        let code = GameCode::parse(code)?;
        let new_player = NewPlayer {
            name: validate_player_name(name)?,
            external_id: validate_external_id(external_id)?,
        };

        let _guard = self.lock(ctx, &code).await?;
        match ctx
            .run("add_player", self.repo.add_player(&code, new_player))
            .await?
        {
            PlayerInsert::Joined { player, promoted } => {
                tracing::info!(game_id = %code, player_id = %player.id, "player joined");
                if promoted {
                    tracing::info!(game_id = %code, "lobby opened by first join");
                }
                Ok(player)
            }
            PlayerInsert::NotJoinable => {
                let game = self.load(ctx, &code).await?;
                if game.status.can_join() {
                    return Err(GameError::conflict(format!(
                        "game {code} changed while joining, try again"
                    )));
                }
                Err(GameError::GameNotJoinable {
                    code: code.to_string(),
                    status: game.status,
                })
            }
        }
    }

    /// Moderator opens the lobby before anyone has joined.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidStateTransition`] unless the game is `Created`.
    pub async fn open_lobby(&self, ctx: &CallContext, game_id: &str) -> Result<Game, GameError> {
        self.transition(ctx, game_id, GameStatus::Lobby, "open_lobby")
            .await
    }

    /// Draw a draft assignment while the lobby is open, replacing any earlier draft.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyStarted`] once the game is in progress
    /// - [`GameError::InvalidState`] outside the lobby
    /// - engine failures ([`GameError::InsufficientPlayers`], [`GameError::NoRolesConfigured`],
    ///   [`GameError::InsufficientRoles`])
    pub async fn assign_roles(
        &self,
        ctx: &CallContext,
        game_id: &str,
    ) -> Result<Vec<Assignment>, GameError> {
        let id = GameCode::parse(game_id)?;
        let _guard = self.lock(ctx, &id).await?;

        let game = self.load(ctx, &id).await?;
        match game.status {
            GameStatus::Lobby => {}
            GameStatus::InProgress => return Err(GameError::GameAlreadyStarted(id.to_string())),
            current => {
                return Err(GameError::InvalidState {
                    current,
                    action: "draw roles",
                });
            }
        }

        let (roster, assignments) = self.draw(ctx, &id).await?;
        let commit = AssignmentCommit {
            game_id: id.clone(),
            expected: GameStatus::Lobby,
            next: None,
            roster,
            assignments: assignments.clone(),
        };
        match ctx
            .run("replace_assignments", self.repo.replace_assignments(commit))
            .await?
        {
            CommitOutcome::Committed { .. } => {
                tracing::info!(game_id = %id, players = assignments.len(), "draft roles drawn");
                Ok(assignments)
            }
            CommitOutcome::StatusChanged => {
                Err(self.stale_status(ctx, &id, GameStatus::Lobby, "draw roles").await)
            }
            CommitOutcome::RosterChanged => Err(roster_changed(&id)),
        }
    }

    /// Deal roles and move the game Lobby -> InProgress in one transaction.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyStarted`] when already in progress
    /// - [`GameError::InvalidStateTransition`] from any other status than `Lobby`
    /// - engine failures; the game then stays in `Lobby`
    pub async fn start_game(&self, ctx: &CallContext, game_id: &str) -> Result<Game, GameError> {
        let id = GameCode::parse(game_id)?;
        let _guard = self.lock(ctx, &id).await?;

        let game = self.load(ctx, &id).await?;
        if game.status == GameStatus::InProgress {
            return Err(GameError::GameAlreadyStarted(id.to_string()));
        }
        GameStateMachine::transition(game.status, GameStatus::InProgress)?;

        let (roster, assignments) = self.draw(ctx, &id).await?;
        let commit = AssignmentCommit {
            game_id: id.clone(),
            expected: GameStatus::Lobby,
            next: Some(GameStatus::InProgress),
            roster,
            assignments,
        };
        match ctx
            .run("replace_assignments", self.repo.replace_assignments(commit))
            .await?
        {
            CommitOutcome::Committed { assigned_at } => {
                tracing::info!(game_id = %id, "game started");
                Ok(Game {
                    status: GameStatus::InProgress,
                    updated_at: assigned_at,
                    ..game
                })
            }
            CommitOutcome::StatusChanged => {
                Err(self.lost_race(ctx, &id, GameStatus::InProgress).await)
            }
            CommitOutcome::RosterChanged => Err(roster_changed(&id)),
        }
    }

    /// Redeal every role of a running game. Only the game's moderator may do this.
    ///
    /// # Errors
    ///
    /// - [`GameError::Forbidden`] for anyone but the moderator
    /// - [`GameError::InvalidState`] unless the game is in progress
    pub async fn reassign_roles(
        &self,
        ctx: &CallContext,
        game_id: &str,
        moderator_id: Uuid,
    ) -> Result<Vec<Assignment>, GameError> {
        let id = GameCode::parse(game_id)?;
        let _guard = self.lock(ctx, &id).await?;

        let game = self.load(ctx, &id).await?;
        if game.moderator_id != moderator_id {
            tracing::warn!(game_id = %id, caller = %moderator_id, "reassign refused");
            return Err(GameError::Forbidden("reassign roles"));
        }
        if game.status != GameStatus::InProgress {
            return Err(GameError::InvalidState {
                current: game.status,
                action: "reassign roles",
            });
        }

        let (roster, assignments) = self.draw(ctx, &id).await?;
        let commit = AssignmentCommit {
            game_id: id.clone(),
            expected: GameStatus::InProgress,
            next: None,
            roster,
            assignments: assignments.clone(),
        };
        match ctx
            .run("replace_assignments", self.repo.replace_assignments(commit))
            .await?
        {
            CommitOutcome::Committed { assigned_at } => {
                tracing::info!(game_id = %id, %assigned_at, "roles reassigned");
                Ok(assignments)
            }
            CommitOutcome::StatusChanged => {
                Err(self.stale_status(ctx, &id, GameStatus::InProgress, "reassign roles")
                    .await)
            }
            CommitOutcome::RosterChanged => Err(roster_changed(&id)),
        }
    }

    /// # Errors
    ///
    /// [`GameError::InvalidStateTransition`] unless the game is in progress.
    pub async fn end_game(&self, ctx: &CallContext, game_id: &str) -> Result<Game, GameError> {
        self.transition(ctx, game_id, GameStatus::Completed, "end_game")
            .await
    }

    /// # Errors
    ///
    /// [`GameError::InvalidStateTransition`] once the game is completed or cancelled.
    pub async fn cancel_game(&self, ctx: &CallContext, game_id: &str) -> Result<Game, GameError> {
        self.transition(ctx, game_id, GameStatus::Cancelled, "cancel_game")
            .await
    }

    /// Delete a game with all of its players and assignments, whatever its status.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] if there is no such game.
    pub async fn delete_game(&self, ctx: &CallContext, game_id: &str) -> Result<(), GameError> {
        let id = GameCode::parse(game_id)?;
        let _guard = self.lock(ctx, &id).await?;

        if !ctx.run("delete_game", self.repo.delete_game(&id)).await? {
            return Err(GameError::GameNotFound(id.to_string()));
        }

        tracing::info!(game_id = %id, "game deleted");
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// [`GameError::GameNotFound`] if there is no such game.
    pub async fn get_game(&self, ctx: &CallContext, game_id: &str) -> Result<Game, GameError> {
        let id = GameCode::parse(game_id)?;
        self.load(ctx, &id).await
    }

    /// Players in join order.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] if there is no such game.
    pub async fn list_players(
        &self,
        ctx: &CallContext,
        game_id: &str,
    ) -> Result<Vec<Player>, GameError> {
        let id = GameCode::parse(game_id)?;
        self.load(ctx, &id).await?;
        ctx.run("list_players", self.repo.list_players(&id)).await
    }

    /// The configured role catalog.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list_roles(&self, ctx: &CallContext) -> Result<Vec<Role>, GameError> {
        ctx.run("list_roles", self.repo.list_roles()).await
    }

    /// The role currently assigned to `player_id`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] when the player is not in the game or has no role yet.
    pub async fn get_assignment(
        &self,
        ctx: &CallContext,
        game_id: &str,
        player_id: Uuid,
    ) -> Result<Role, GameError> {
        let id = GameCode::parse(game_id)?;
        self.load(ctx, &id).await?;
        ctx.run("find_assignment", self.repo.find_assignment(&id, player_id))
            .await?
            .ok_or_else(|| GameError::not_found(format!("assignment for player {player_id}")))
    }

    /// The full assignment set, for the moderator only.
    ///
    /// # Errors
    ///
    /// [`GameError::Forbidden`] for anyone but the moderator.
    pub async fn list_assignments(
        &self,
        ctx: &CallContext,
        game_id: &str,
        moderator_id: Uuid,
    ) -> Result<Vec<AssignmentRecord>, GameError> {
        let id = GameCode::parse(game_id)?;
        let game = self.load(ctx, &id).await?;
        if game.moderator_id != moderator_id {
            return Err(GameError::Forbidden("view all assignments"));
        }
        ctx.run("list_assignments", self.repo.list_assignments(&id))
            .await
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    async fn lock(
        &self,
        ctx: &CallContext,
        id: &GameCode,
    ) -> Result<GameLockGuard, GameError> {
        ctx.run("acquire_game_lock", async { Ok(self.locks.acquire(id).await) })
            .await
    }

    async fn load(&self, ctx: &CallContext, id: &GameCode) -> Result<Game, GameError> {
        ctx.run("find_game", self.repo.find_game(id))
            .await?
            .ok_or_else(|| GameError::GameNotFound(id.to_string()))
    }

    /// Validate against the state machine, then compare-and-swap the status.
    async fn transition(
        &self,
        ctx: &CallContext,
        game_id: &str,
        to: GameStatus,
        label: &'static str,
    ) -> Result<Game, GameError> {
        let id = GameCode::parse(game_id)?;
        let _guard = self.lock(ctx, &id).await?;

        let game = self.load(ctx, &id).await?;
        GameStateMachine::transition(game.status, to)?;

        let Some(updated) = ctx
            .run(label, self.repo.transition_status(&id, game.status, to))
            .await?
        else {
            return Err(self.lost_race(ctx, &id, to).await);
        };

        tracing::info!(
            game_id = %id,
            from = %game.status,
            %to,
            finished = to.is_terminal(),
            "game status changed"
        );
        Ok(updated)
    }

    async fn draw(
        &self,
        ctx: &CallContext,
        id: &GameCode,
    ) -> Result<(Vec<Uuid>, Vec<Assignment>), GameError> {
        let players = ctx.run("list_players", self.repo.list_players(id)).await?;
        let catalog = ctx.run("list_roles", self.repo.list_roles()).await?;

        let assignments = RoleAssignmentEngine::new(self.random.as_ref())
            .assign(&players, &catalog, &self.rules)
            .inspect_err(|err| {
                tracing::info!(
                    game_id = %id,
                    players = players.len(),
                    error = %err,
                    "role draw rejected"
                );
            })?;

        Ok((players.iter().map(|p| p.id).collect(), assignments))
    }

    /// Explain a status swap that matched no row.
    async fn lost_race(
        &self,
        ctx: &CallContext,
        id: &GameCode,
        requested: GameStatus,
    ) -> GameError {
        let game = match self.load(ctx, id).await {
            Ok(game) => game,
            Err(err) => return err,
        };
        tracing::debug!(game_id = %id, observed = %game.status, %requested, "status swap lost");

        if requested == GameStatus::InProgress && game.status == GameStatus::InProgress {
            GameError::GameAlreadyStarted(id.to_string())
        } else if GameStateMachine::is_legal(game.status, requested) {
            GameError::conflict(format!("game {id} was modified concurrently"))
        } else {
            GameError::InvalidStateTransition {
                current: game.status,
                requested,
            }
        }
    }

    /// Explain a guarded assignment write that found the game in another status.
    async fn stale_status(
        &self,
        ctx: &CallContext,
        id: &GameCode,
        expected: GameStatus,
        action: &'static str,
    ) -> GameError {
        match self.load(ctx, id).await {
            Ok(game) if expected == GameStatus::Lobby && game.status == GameStatus::InProgress => {
                GameError::GameAlreadyStarted(id.to_string())
            }
            Ok(game) => GameError::InvalidState {
                current: game.status,
                action,
            },
            Err(err) => err,
        }
    }
}

fn roster_changed(id: &GameCode) -> GameError {
    GameError::conflict(format!("players of game {id} changed while roles were drawn"))
}

/// Trim and bound a display name.
///
/// # Errors
///
/// [`GameError::Validation`] when empty or longer than 50 characters after trimming.
pub fn validate_player_name(name: &str) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GameError::validation("player name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(GameError::validation(format!(
            "player name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_external_id(external_id: &str) -> Result<String, GameError> {
    let trimmed = external_id.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_EXTERNAL_ID_LENGTH {
        return Err(GameError::validation(format!(
            "external id must be 1 to {MAX_EXTERNAL_ID_LENGTH} bytes"
        )));
    }
    Ok(trimmed.to_string())
}
