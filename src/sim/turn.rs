//! Players and turn sequencing

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::{BALLS_PER_GROUP, BallId, BallKind, Group};

/// Index of a player within the match (0 or 1)
pub type PlayerId = usize;

/// Players per match
pub const PLAYER_COUNT: usize = 2;

/// A participant in the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub group: Group,
    /// Regular balls credited to this player
    pub credited: BTreeSet<BallId>,
    /// Set when the player pots a ball of their own group this turn
    pub potted_correct_this_turn: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            group: Group::Unassigned,
            credited: BTreeSet::new(),
            potted_correct_this_turn: false,
        }
    }

    pub fn credit(&mut self, id: BallId) {
        self.credited.insert(id);
    }

    /// Credited balls belonging to the player's own group
    pub fn group_count(&self) -> usize {
        if !self.group.is_assigned() {
            return 0;
        }
        self.credited
            .iter()
            .filter(|&&id| BallKind::from_id(id).group() == self.group)
            .count()
    }

    /// Every ball of the player's group has been credited to them
    pub fn has_cleared_group(&self) -> bool {
        self.group.is_assigned() && self.group_count() == BALLS_PER_GROUP
    }
}

/// Active player, turn counter and break-shot tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSequencer {
    players: Vec<Player>,
    active: usize,
    /// 0 is the break shot
    turn: u32,
}

impl TurnSequencer {
    /// # Panics
    /// If `players` does not hold exactly two players.
    pub fn new(players: Vec<Player>) -> Self {
        assert_eq!(
            players.len(),
            PLAYER_COUNT,
            "a match needs exactly {PLAYER_COUNT} players, got {}",
            players.len()
        );
        Self {
            players,
            active: 0,
            turn: 0,
        }
    }

    /// Pick who breaks, uniformly at random
    pub fn initialize_starting_player<R: Rng>(&mut self, rng: &mut R) -> PlayerId {
        self.active = rng.random_range(0..PLAYER_COUNT);
        self.active
    }

    /// Close out a turn. The outgoing player's per-turn flag is always
    /// cleared and the counter always advances; the table only changes
    /// hands when `lose_turn` is set.
    pub fn advance_turn(&mut self, lose_turn: bool) {
        self.players[self.active].potted_correct_this_turn = false;
        if lose_turn {
            self.active = (self.active + 1) % PLAYER_COUNT;
        }
        self.turn += 1;
    }

    pub fn active_index(&self) -> PlayerId {
        self.active
    }

    pub fn inactive_index(&self) -> PlayerId {
        (self.active + 1) % PLAYER_COUNT
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active]
    }

    pub fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.active]
    }

    pub fn next_inactive_player(&self) -> &Player {
        &self.players[self.inactive_index()]
    }

    pub fn next_inactive_player_mut(&mut self) -> &mut Player {
        let idx = self.inactive_index();
        &mut self.players[idx]
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn turn_counter(&self) -> u32 {
        self.turn
    }

    pub fn is_break_shot(&self) -> bool {
        self.turn == 0
    }

    pub fn groups_assigned(&self) -> bool {
        self.players.iter().any(|p| p.group.is_assigned())
    }

    /// Give the active player `group` and the opponent its complement.
    ///
    /// Returns false and changes nothing if groups are already assigned or
    /// `group` is Unassigned.
    pub fn assign_groups(&mut self, group: Group) -> bool {
        if self.groups_assigned() || !group.is_assigned() {
            return false;
        }
        self.active_player_mut().group = group;
        self.next_inactive_player_mut().group = group.complement();
        true
    }

    /// Credit a regular ball to whichever player owns its group. A ball of
    /// the opponent's group goes to the opponent. Returns the player credited.
    pub fn credit_by_group(&mut self, id: BallId) -> Option<PlayerId> {
        let group = BallKind::from_id(id).group();
        if !group.is_assigned() || !self.groups_assigned() {
            return None;
        }
        if self.active_player().group == group {
            let player = self.active_player_mut();
            player.credit(id);
            player.potted_correct_this_turn = true;
            Some(self.active)
        } else {
            self.next_inactive_player_mut().credit(id);
            Some(self.inactive_index())
        }
    }
}
