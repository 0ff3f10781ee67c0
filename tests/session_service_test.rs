#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use game_night_api::domain::{
    AssignmentRecord, BalanceRules, Game, GameError, GameStatus, NewGame, NewPlayer, NewRole,
    Player, Role, Team,
};
use game_night_api::repository::{
    AssignmentCommit, CallContext, CommitOutcome, PlayerInsert, Repository, SeaRepository,
};
use game_night_api::services::SessionService;
use game_night_api::utils::{GameCode, SequenceSource, SharedRng, is_valid_game_code};

async fn lobby_with(svc: &SessionService, players: usize) -> (Game, Vec<Player>) {
    let ctx = common::ctx();
    let game = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();
    let mut joined = Vec::with_capacity(players);
    for n in 0..players {
        let player = svc
            .join_game(&ctx, game.id.as_str(), &format!("Player {n}"), &format!("ext-{n}"))
            .await
            .unwrap();
        joined.push(player);
    }
    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    (game, joined)
}

/// Fires `token` as soon as the repository call named `after` has returned,
/// so the caller's context is cancelled while its operation is still running.
struct CancelAfter {
    inner: SeaRepository,
    token: CancellationToken,
    after: &'static str,
}

impl CancelAfter {
    fn fire(&self, call: &'static str) {
        if call == self.after {
            self.token.cancel();
        }
    }
}

#[async_trait]
impl Repository for CancelAfter {
    async fn code_exists(&self, code: &GameCode) -> Result<bool, GameError> {
        self.inner.code_exists(code).await
    }

    async fn insert_game(&self, game: NewGame) -> Result<Option<Game>, GameError> {
        self.inner.insert_game(game).await
    }

    async fn find_game(&self, id: &GameCode) -> Result<Option<Game>, GameError> {
        self.inner.find_game(id).await
    }

    async fn transition_status(
        &self,
        id: &GameCode,
        from: GameStatus,
        to: GameStatus,
    ) -> Result<Option<Game>, GameError> {
        let outcome = self.inner.transition_status(id, from, to).await;
        self.fire("transition_status");
        outcome
    }

    async fn add_player(
        &self,
        id: &GameCode,
        player: NewPlayer,
    ) -> Result<PlayerInsert, GameError> {
        self.inner.add_player(id, player).await
    }

    async fn list_players(&self, id: &GameCode) -> Result<Vec<Player>, GameError> {
        self.inner.list_players(id).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, GameError> {
        let outcome = self.inner.list_roles().await;
        self.fire("list_roles");
        outcome
    }

    async fn insert_role(&self, role: NewRole) -> Result<Role, GameError> {
        self.inner.insert_role(role).await
    }

    async fn delete_role(&self, id: Uuid) -> Result<bool, GameError> {
        self.inner.delete_role(id).await
    }

    async fn replace_assignments(
        &self,
        commit: AssignmentCommit,
    ) -> Result<CommitOutcome, GameError> {
        let outcome = self.inner.replace_assignments(commit).await;
        self.fire("replace_assignments");
        outcome
    }

    async fn find_assignment(
        &self,
        id: &GameCode,
        player_id: Uuid,
    ) -> Result<Option<Role>, GameError> {
        self.inner.find_assignment(id, player_id).await
    }

    async fn list_assignments(&self, id: &GameCode) -> Result<Vec<AssignmentRecord>, GameError> {
        self.inner.list_assignments(id).await
    }

    async fn delete_game(&self, id: &GameCode) -> Result<bool, GameError> {
        self.inner.delete_game(id).await
    }
}

/// A service whose calls cancel `token` right after the repository call `after`.
fn cancelling_service(
    db: &sea_orm::DatabaseConnection,
    token: &CancellationToken,
    after: &'static str,
) -> SessionService {
    let repo = CancelAfter {
        inner: SeaRepository::new(db.clone()),
        token: token.clone(),
        after,
    };
    SessionService::new(
        Arc::new(repo),
        Arc::new(SharedRng::seeded(common::TEST_SEED)),
        BalanceRules::default(),
    )
}

#[tokio::test]
async fn create_game_starts_in_created() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let moderator = Uuid::new_v4();

    let game = svc.create_game(&common::ctx(), moderator).await.unwrap();

    assert_eq!(game.status, GameStatus::Created);
    assert_eq!(game.moderator_id, moderator);
    assert!(is_valid_game_code(game.id.as_str()));
}

#[tokio::test]
async fn first_join_opens_lobby() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let game = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();

    // Codes are accepted in any case and with surrounding whitespace.
    let code = format!("  {}  ", game.id.as_str().to_ascii_lowercase());
    let player = svc.join_game(&ctx, &code, "  Ada ", "device-1").await.unwrap();

    assert_eq!(player.name, "Ada");
    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Lobby);
}

#[tokio::test]
async fn open_lobby_only_from_created() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let game = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();

    let opened = svc.open_lobby(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(opened.status, GameStatus::Lobby);

    let again = svc.open_lobby(&ctx, game.id.as_str()).await;
    assert!(matches!(
        again,
        Err(GameError::InvalidStateTransition {
            current: GameStatus::Lobby,
            requested: GameStatus::Lobby,
        })
    ));
}

#[tokio::test]
async fn join_rejects_bad_input() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let game = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();

    let bad_code = svc.join_game(&ctx, "AB-12", "Ada", "ext").await;
    assert!(matches!(bad_code, Err(GameError::Validation(_))));

    let unknown = svc.join_game(&ctx, "ZZZZZZ", "Ada", "ext").await;
    assert!(matches!(unknown, Err(GameError::GameNotFound(_))));

    let blank = svc.join_game(&ctx, game.id.as_str(), "   ", "ext").await;
    assert!(matches!(blank, Err(GameError::Validation(_))));

    let long = svc
        .join_game(&ctx, game.id.as_str(), &"n".repeat(51), "ext")
        .await;
    assert!(matches!(long, Err(GameError::Validation(_))));

    // Nothing was inserted and the game never left Created.
    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Created);
    assert!(svc.list_players(&ctx, game.id.as_str()).await.unwrap().is_empty());
}

#[tokio::test]
async fn players_are_listed_in_join_order() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, joined) = lobby_with(&svc, 5).await;

    let listed = svc
        .list_players(&common::ctx(), game.id.as_str())
        .await
        .unwrap();

    let listed: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
    let joined: Vec<Uuid> = joined.iter().map(|p| p.id).collect();
    assert_eq!(listed, joined);
}

#[tokio::test]
async fn start_with_nine_players_deals_three_mafia_six_town() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, players) = lobby_with(&svc, 9).await;

    let started = svc.start_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(started.status, GameStatus::InProgress);

    let mut per_team: HashMap<Team, usize> = HashMap::new();
    let mut unique_roles = HashSet::new();
    for player in &players {
        let role = svc
            .get_assignment(&ctx, game.id.as_str(), player.id)
            .await
            .unwrap();
        *per_team.entry(role.team).or_default() += 1;
        if role.capacity.is_unique() {
            assert!(unique_roles.insert(role.id), "{} dealt twice", role.name);
        }
    }

    assert_eq!(per_team.get(&Team::Mafia), Some(&3));
    assert_eq!(per_team.get(&Team::Town), Some(&6));
    assert_eq!(per_team.get(&Team::Neutral), None);
}

#[tokio::test]
async fn start_below_minimum_keeps_lobby() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 2).await;

    let outcome = svc.start_game(&ctx, game.id.as_str()).await;
    assert!(matches!(
        outcome,
        Err(GameError::InsufficientPlayers {
            required: 4,
            actual: 2,
        })
    ));

    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Lobby);
    let records = svc
        .list_assignments(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn start_from_wrong_status() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();

    let created = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();
    let outcome = svc.start_game(&ctx, created.id.as_str()).await;
    assert!(matches!(
        outcome,
        Err(GameError::InvalidStateTransition {
            current: GameStatus::Created,
            requested: GameStatus::InProgress,
        })
    ));

    let (game, _) = lobby_with(&svc, 4).await;
    svc.start_game(&ctx, game.id.as_str()).await.unwrap();
    let twice = svc.start_game(&ctx, game.id.as_str()).await;
    assert!(matches!(twice, Err(GameError::GameAlreadyStarted(_))));
}

#[tokio::test]
async fn cancel_completed_game_is_rejected() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 4).await;

    svc.start_game(&ctx, game.id.as_str()).await.unwrap();
    let ended = svc.end_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(ended.status, GameStatus::Completed);

    let outcome = svc.cancel_game(&ctx, game.id.as_str()).await;
    assert!(matches!(
        outcome,
        Err(GameError::InvalidStateTransition {
            current: GameStatus::Completed,
            requested: GameStatus::Cancelled,
        })
    ));
    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Completed);
}

#[tokio::test]
async fn end_requires_in_progress() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 3).await;

    let outcome = svc.end_game(&ctx, game.id.as_str()).await;
    assert!(matches!(
        outcome,
        Err(GameError::InvalidStateTransition {
            current: GameStatus::Lobby,
            requested: GameStatus::Completed,
        })
    ));

    let cancelled = svc.cancel_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(cancelled.status, GameStatus::Cancelled);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_codes() {
    let db = common::test_db().await;
    let svc = Arc::new(common::service(&db));

    let creates = (0..20).map(|_| {
        let svc = Arc::clone(&svc);
        async move { svc.create_game(&common::ctx(), Uuid::new_v4()).await }
    });
    let games = futures_util::future::join_all(creates).await;

    let codes: HashSet<String> = games
        .into_iter()
        .map(|game| game.unwrap().id.to_string())
        .collect();
    assert_eq!(codes.len(), 20);
}

#[tokio::test]
async fn exhausted_code_space_is_reported() {
    let db = common::test_db().await;
    // Every draw is index 0, so every code is AAAAAA.
    let svc = common::service_with(&db, Arc::new(SequenceSource::new(vec![0])));
    let ctx = common::ctx();

    let first = svc.create_game(&ctx, Uuid::new_v4()).await.unwrap();
    assert_eq!(first.id.as_str(), "AAAAAA");

    let second = svc.create_game(&ctx, Uuid::new_v4()).await;
    assert!(matches!(
        second,
        Err(GameError::CodeSpaceExhausted { attempts: 5 })
    ));

    let fewer = common::service_with(&db, Arc::new(SequenceSource::new(vec![0])))
        .with_code_attempts(2)
        .create_game(&ctx, Uuid::new_v4())
        .await;
    assert!(matches!(
        fewer,
        Err(GameError::CodeSpaceExhausted { attempts: 2 })
    ));
}

#[tokio::test]
async fn latest_draft_replaces_earlier_one() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, players) = lobby_with(&svc, 6).await;

    svc.assign_roles(&ctx, game.id.as_str()).await.unwrap();
    let second = svc.assign_roles(&ctx, game.id.as_str()).await.unwrap();

    let records = svc
        .list_assignments(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert_eq!(records.len(), players.len());

    let drawn: HashMap<Uuid, Uuid> = second.iter().map(|a| (a.player_id, a.role.id)).collect();
    let stored: HashMap<Uuid, Uuid> = records.iter().map(|r| (r.player_id, r.role.id)).collect();
    assert_eq!(drawn, stored);

    // Drafting does not start the game.
    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Lobby);
}

#[tokio::test]
async fn draft_after_start_is_rejected() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 4).await;

    svc.start_game(&ctx, game.id.as_str()).await.unwrap();
    let outcome = svc.assign_roles(&ctx, game.id.as_str()).await;
    assert!(matches!(outcome, Err(GameError::GameAlreadyStarted(_))));
}

#[tokio::test]
async fn join_after_start_is_rejected() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 4).await;
    svc.start_game(&ctx, game.id.as_str()).await.unwrap();

    let outcome = svc.join_game(&ctx, game.id.as_str(), "Late", "late-1").await;
    assert!(matches!(
        outcome,
        Err(GameError::GameNotJoinable {
            status: GameStatus::InProgress,
            ..
        })
    ));
    assert_eq!(
        svc.list_players(&ctx, game.id.as_str()).await.unwrap().len(),
        4
    );
}

#[tokio::test]
async fn reassign_requires_moderator() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, players) = lobby_with(&svc, 5).await;
    svc.start_game(&ctx, game.id.as_str()).await.unwrap();

    let before = svc
        .list_assignments(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();

    let stranger = svc
        .reassign_roles(&ctx, game.id.as_str(), Uuid::new_v4())
        .await;
    assert!(matches!(stranger, Err(GameError::Forbidden(_))));
    let unchanged = svc
        .list_assignments(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert_eq!(before, unchanged);

    let redealt = svc
        .reassign_roles(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert_eq!(redealt.len(), players.len());

    let after = svc
        .list_assignments(&ctx, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    let drawn: HashMap<Uuid, Uuid> = redealt.iter().map(|a| (a.player_id, a.role.id)).collect();
    let stored: HashMap<Uuid, Uuid> = after.iter().map(|r| (r.player_id, r.role.id)).collect();
    assert_eq!(drawn, stored);

    let game = svc.get_game(&ctx, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::InProgress);
}

#[tokio::test]
async fn reassign_outside_play_is_rejected() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 4).await;

    let outcome = svc
        .reassign_roles(&ctx, game.id.as_str(), game.moderator_id)
        .await;
    assert!(matches!(
        outcome,
        Err(GameError::InvalidState {
            current: GameStatus::Lobby,
            ..
        })
    ));
}

#[tokio::test]
async fn assignments_are_moderator_only() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, _) = lobby_with(&svc, 4).await;

    let outcome = svc
        .list_assignments(&ctx, game.id.as_str(), Uuid::new_v4())
        .await;
    assert!(matches!(outcome, Err(GameError::Forbidden(_))));
}

#[tokio::test]
async fn missing_assignment_is_not_found() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, players) = lobby_with(&svc, 4).await;

    let unassigned = svc
        .get_assignment(&ctx, game.id.as_str(), players[0].id)
        .await;
    assert!(matches!(unassigned, Err(GameError::NotFound(_))));

    svc.start_game(&ctx, game.id.as_str()).await.unwrap();
    let stranger = svc
        .get_assignment(&ctx, game.id.as_str(), Uuid::new_v4())
        .await;
    assert!(matches!(stranger, Err(GameError::NotFound(_))));
}

#[tokio::test]
async fn cancelled_call_leaves_state_untouched() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 4).await;

    let token = CancellationToken::new();
    let ctx = CallContext::new(Duration::from_secs(5), token.clone());
    token.cancel();

    let outcome = svc.start_game(&ctx, game.id.as_str()).await;
    assert!(matches!(outcome, Err(GameError::Cancelled(_))));

    let live = common::ctx();
    let game = svc.get_game(&live, game.id.as_str()).await.unwrap();
    assert_eq!(game.status, GameStatus::Lobby);
    let records = svc
        .list_assignments(&live, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn committed_start_survives_late_cancellation() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 4).await;

    let token = CancellationToken::new();
    let racing = cancelling_service(&db, &token, "replace_assignments");
    let ctx = CallContext::new(Duration::from_secs(5), token.clone());

    let started = racing.start_game(&ctx, game.id.as_str()).await.unwrap();
    assert!(token.is_cancelled());
    assert_eq!(started.status, GameStatus::InProgress);

    let live = common::ctx();
    let stored = svc.get_game(&live, game.id.as_str()).await.unwrap();
    assert_eq!(stored.status, GameStatus::InProgress);
    let records = svc
        .list_assignments(&live, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn committed_cancel_survives_late_cancellation() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 2).await;

    let token = CancellationToken::new();
    let racing = cancelling_service(&db, &token, "transition_status");
    let ctx = CallContext::new(Duration::from_secs(5), token.clone());

    let cancelled = racing.cancel_game(&ctx, game.id.as_str()).await.unwrap();
    assert!(token.is_cancelled());
    assert_eq!(cancelled.status, GameStatus::Cancelled);

    let stored = svc.get_game(&common::ctx(), game.id.as_str()).await.unwrap();
    assert_eq!(stored, cancelled);
}

#[tokio::test]
async fn cancellation_during_draw_writes_nothing() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 4).await;

    let token = CancellationToken::new();
    let racing = cancelling_service(&db, &token, "list_roles");
    let ctx = CallContext::new(Duration::from_secs(5), token.clone());

    let outcome = racing.start_game(&ctx, game.id.as_str()).await;
    assert!(matches!(
        outcome,
        Err(GameError::Cancelled("replace_assignments"))
    ));

    let live = common::ctx();
    let stored = svc.get_game(&live, game.id.as_str()).await.unwrap();
    assert_eq!(stored.status, GameStatus::Lobby);
    let records = svc
        .list_assignments(&live, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn concurrent_starts_have_one_winner() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 5).await;

    // Separate services do not share the in-process lock, so only the
    // repository's status swap keeps the two starts apart.
    let services = [svc.clone(), common::service(&db)];
    let starts = services.iter().map(|svc| {
        let id = game.id.to_string();
        async move { svc.start_game(&common::ctx(), &id).await }
    });
    let outcomes = futures_util::future::join_all(starts).await;

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "{outcomes:?}");
    assert!(
        outcomes
            .iter()
            .any(|outcome| matches!(outcome, Err(GameError::GameAlreadyStarted(_)))),
        "{outcomes:?}"
    );

    let live = common::ctx();
    let records = svc
        .list_assignments(&live, game.id.as_str(), game.moderator_id)
        .await
        .unwrap();
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn concurrent_cancels_have_one_winner() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let (game, _) = lobby_with(&svc, 2).await;

    let services = [svc.clone(), svc.clone(), common::service(&db)];
    let cancels = services.iter().map(|svc| {
        let id = game.id.to_string();
        async move { svc.cancel_game(&common::ctx(), &id).await }
    });
    let outcomes = futures_util::future::join_all(cancels).await;

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "{outcomes:?}");
    for outcome in outcomes.iter().filter(|outcome| outcome.is_err()) {
        assert!(
            matches!(
                outcome,
                Err(GameError::InvalidStateTransition {
                    current: GameStatus::Cancelled,
                    requested: GameStatus::Cancelled,
                })
            ),
            "{outcome:?}"
        );
    }
}

#[tokio::test]
async fn expired_deadline_times_out() {
    let db = common::test_db().await;
    let svc = common::service(&db);

    let ctx = CallContext::with_timeout(Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(5)).await;

    let outcome = svc.create_game(&ctx, Uuid::new_v4()).await;
    assert!(matches!(outcome, Err(GameError::Timeout(_))));
}

#[tokio::test]
async fn delete_removes_game_and_players() {
    let db = common::test_db().await;
    let svc = common::service(&db);
    let ctx = common::ctx();
    let (game, players) = lobby_with(&svc, 4).await;
    svc.start_game(&ctx, game.id.as_str()).await.unwrap();

    svc.delete_game(&ctx, game.id.as_str()).await.unwrap();

    let gone = svc.get_game(&ctx, game.id.as_str()).await;
    assert!(matches!(gone, Err(GameError::GameNotFound(_))));
    let role = svc
        .get_assignment(&ctx, game.id.as_str(), players[0].id)
        .await;
    assert!(matches!(role, Err(GameError::GameNotFound(_))));

    let twice = svc.delete_game(&ctx, game.id.as_str()).await;
    assert!(matches!(twice, Err(GameError::GameNotFound(_))));
}

#[tokio::test]
async fn catalog_lists_seeded_roles() {
    let db = common::test_db().await;
    let svc = common::service(&db);

    let roles = svc.list_roles(&common::ctx()).await.unwrap();
    let names: HashSet<&str> = roles.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(roles.len(), 6);
    for expected in ["Godfather", "Mafioso", "Detective", "Doctor", "Villager", "Jester"] {
        assert!(names.contains(expected), "missing {expected}");
    }
}
