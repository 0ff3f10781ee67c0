//! Role assignment: team quotas from the balance ratio, then a shuffled
//! bijection between the lobby's players and a draw from the catalog.

use std::collections::HashSet;
use std::iter;

use crate::domain::error::GameError;
use crate::domain::models::{Assignment, Player, Role};
use crate::domain::team::Team;
use crate::utils::random::{RandomSource, shuffle};

/// Largest accepted weight in a ratio; keeps quota arithmetic far from overflow.
const MAX_TEAM_WEIGHT: usize = 1_000;

/// Team-balance configuration: a `team -> weight` ratio and a player minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRules {
    weights: Vec<(Team, usize)>,
    min_players: usize,
}

impl Default for BalanceRules {
    /// One mafia for every two town, at least four players.
    fn default() -> Self {
        Self {
            weights: vec![(Team::Mafia, 1), (Team::Town, 2)],
            min_players: 4,
        }
    }
}

impl BalanceRules {
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if a team is listed twice, every weight is
    /// zero, a weight exceeds the supported maximum, or `min_players` is zero.
    pub fn new(weights: Vec<(Team, usize)>, min_players: usize) -> Result<Self, GameError> {
        if min_players == 0 {
            return Err(GameError::validation("min_players must be at least 1"));
        }
        let mut seen = HashSet::new();
        for (team, weight) in &weights {
            if !seen.insert(*team) {
                return Err(GameError::validation(format!(
                    "team {team} appears twice in the ratio"
                )));
            }
            if *weight > MAX_TEAM_WEIGHT {
                return Err(GameError::validation(format!(
                    "weight for {team} exceeds {MAX_TEAM_WEIGHT}"
                )));
            }
        }
        if weights.iter().all(|(_, weight)| *weight == 0) {
            return Err(GameError::validation(
                "team ratio needs at least one positive weight",
            ));
        }
        Ok(Self {
            weights,
            min_players,
        })
    }

    /// Parse a ratio such as `mafia:1,town:2`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for malformed entries or unknown teams.
    pub fn parse_ratio(spec: &str) -> Result<Vec<(Team, usize)>, GameError> {
        spec.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (team, weight) = entry.split_once(':').ok_or_else(|| {
                    GameError::validation(format!("ratio entry '{entry}' must look like team:weight"))
                })?;
                let weight = weight.trim().parse::<usize>().map_err(|_| {
                    GameError::validation(format!("ratio weight in '{entry}' is not a number"))
                })?;
                Ok((Team::parse(team)?, weight))
            })
            .collect()
    }

    pub fn weights(&self) -> &[(Team, usize)] {
        &self.weights
    }

    pub const fn min_players(&self) -> usize {
        self.min_players
    }

    /// Weight of `team`, zero when it is not part of the ratio.
    pub fn weight_of(&self, team: Team) -> usize {
        self.weights
            .iter()
            .find(|(t, _)| *t == team)
            .map_or(0, |(_, weight)| *weight)
    }

    /// # Errors
    ///
    /// Returns [`GameError::InsufficientPlayers`] below the configured minimum.
    pub fn check_player_count(&self, players: usize) -> Result<(), GameError> {
        if players < self.min_players {
            return Err(GameError::InsufficientPlayers {
                required: self.min_players,
                actual: players,
            });
        }
        Ok(())
    }

    /// Seats per team for `players` players.
    ///
    /// Each team gets `floor(players * weight / total)`; the remainder goes to the
    /// team with the largest weight, ties resolved by [`Team`] order. Teams with
    /// zero weight are omitted. The result is in ratio order and sums to `players`.
    pub fn team_quotas(&self, players: usize) -> Vec<(Team, usize)> {
        let active: Vec<(Team, usize)> = self
            .weights
            .iter()
            .copied()
            .filter(|(_, weight)| *weight > 0)
            .collect();
        let total: usize = active.iter().map(|(_, weight)| weight).sum();

        let mut quotas: Vec<(Team, usize)> = active
            .iter()
            .map(|(team, weight)| (*team, players * weight / total))
            .collect();

        let seated: usize = quotas.iter().map(|(_, seats)| seats).sum();
        let largest = active
            .iter()
            .enumerate()
            .max_by(|(_, (ta, wa)), (_, (tb, wb))| wa.cmp(wb).then(tb.cmp(ta)))
            .map(|(idx, _)| idx);
        if let Some(idx) = largest {
            quotas[idx].1 += players - seated;
        }
        quotas
    }
}

/// Draws a randomized player-to-role bijection for one game.
pub struct RoleAssignmentEngine<'a> {
    source: &'a dyn RandomSource,
}

impl<'a> RoleAssignmentEngine<'a> {
    pub const fn new(source: &'a dyn RandomSource) -> Self {
        Self { source }
    }

    /// Assign every player exactly one role.
    ///
    /// Unique roles of a team are drawn first (shuffled, up to the team's quota);
    /// remaining seats are filled from the team's pool roles within their caps.
    /// Players are shuffled once and split into team blocks by quota.
    ///
    /// # Errors
    ///
    /// - [`GameError::InsufficientPlayers`] below the minimum player count
    /// - [`GameError::NoRolesConfigured`] for an empty catalog
    /// - [`GameError::InsufficientRoles`] / [`GameError::InsufficientTeamRoles`] when
    ///   the catalog cannot seat everyone within its caps
    pub fn assign(
        &self,
        players: &[Player],
        catalog: &[Role],
        rules: &BalanceRules,
    ) -> Result<Vec<Assignment>, GameError> {
        rules.check_player_count(players.len())?;
        if catalog.is_empty() {
            return Err(GameError::NoRolesConfigured);
        }

        let seatable = catalog.iter().filter(|role| rules.weight_of(role.team) > 0);
        let capacity: Option<usize> = seatable.map(|role| role.capacity.max_slots()).sum();
        if let Some(available) = capacity
            && available < players.len()
        {
            return Err(GameError::InsufficientRoles {
                required: players.len(),
                available,
            });
        }

        let mut seats: Vec<&Player> = players.iter().collect();
        shuffle(self.source, &mut seats);
        let mut seats = seats.into_iter();

        let mut assignments = Vec::with_capacity(players.len());
        for (team, quota) in rules.team_quotas(players.len()) {
            let roles = self.draw_team(team, quota, catalog)?;
            assignments.extend(
                seats
                    .by_ref()
                    .take(quota)
                    .zip(roles)
                    .map(|(player, role)| Assignment {
                        player_id: player.id,
                        role,
                    }),
            );
        }
        Ok(assignments)
    }

    /// Pick `quota` roles for `team`, honoring every role's cap, in shuffled order.
    fn draw_team(&self, team: Team, quota: usize, catalog: &[Role]) -> Result<Vec<Role>, GameError> {
        if quota == 0 {
            return Ok(Vec::new());
        }

        let (mut drawn, pool): (Vec<&Role>, Vec<&Role>) = catalog
            .iter()
            .filter(|role| role.team == team)
            .partition(|role| role.capacity.is_unique());
        shuffle(self.source, &mut drawn);
        drawn.truncate(quota);

        let needed = quota - drawn.len();
        if needed > 0 {
            let mut slots: Vec<&Role> = pool
                .iter()
                .flat_map(|role| iter::repeat_n(*role, role.capacity.slots(needed)))
                .collect();
            if slots.len() < needed {
                return Err(GameError::InsufficientTeamRoles {
                    team,
                    required: quota,
                    available: drawn.len() + slots.len(),
                });
            }
            shuffle(self.source, &mut slots);
            drawn.extend(slots.into_iter().take(needed));
        }

        shuffle(self.source, &mut drawn);
        Ok(drawn.into_iter().cloned().collect())
    }
}
