//! Ball bookkeeping across a match
//!
//! `TurnRecord` holds everything that happened during one shot. A fresh
//! record is started for every turn and folded away once the turn has been
//! resolved, so nothing leaks across the turn boundary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ball::{BallId, BallKind, CUE_BALL_ID, Group};
use super::turn::Player;

/// Transient record of a single turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Balls potted this turn, in potting order
    pub potted: Vec<BallId>,
    pub eight_potted: bool,
    pub cue_potted: bool,
    /// First object ball the cue ball contacted
    pub first_touched: Option<BallId>,
}

/// Which balls are still in play and what happened this turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBallState {
    /// Un-potted object balls (never includes the cue ball)
    remaining: BTreeSet<BallId>,
    /// Regular balls potted before groups were assigned
    pre_assigned: Vec<BallId>,
    turn: TurnRecord,
}

impl MatchBallState {
    /// Start tracking the given balls; the cue ball is never tracked as remaining
    pub fn new(ids: impl IntoIterator<Item = BallId>) -> Self {
        Self {
            remaining: ids.into_iter().filter(|&id| id != CUE_BALL_ID).collect(),
            pre_assigned: Vec::new(),
            turn: TurnRecord::default(),
        }
    }

    pub fn remaining(&self) -> &BTreeSet<BallId> {
        &self.remaining
    }

    pub fn turn(&self) -> &TurnRecord {
        &self.turn
    }

    pub fn pre_assigned(&self) -> &[BallId] {
        &self.pre_assigned
    }

    pub fn add_potted(&mut self, id: BallId) {
        self.turn.potted.push(id);
    }

    /// Drop this turn's potted list
    pub fn clear_potted(&mut self) {
        self.turn.potted.clear();
    }

    pub fn remove_from_remaining(&mut self, id: BallId) -> bool {
        self.remaining.remove(&id)
    }

    pub fn mark_eight_ball_potted(&mut self) {
        self.turn.eight_potted = true;
    }

    pub fn mark_cue_ball_potted(&mut self) {
        self.turn.cue_potted = true;
    }

    pub fn reset_pot_flags(&mut self) {
        self.turn.eight_potted = false;
        self.turn.cue_potted = false;
    }

    pub fn add_pre_assigned_potted(&mut self, id: BallId) {
        self.pre_assigned.push(id);
    }

    /// Empty the pre-assignment queue, handing back its balls in potting order
    pub fn clear_pre_assigned_potted(&mut self) -> Vec<BallId> {
        std::mem::take(&mut self.pre_assigned)
    }

    /// Record the cue ball's first contact. Later contacts in the same turn
    /// are ignored.
    pub fn set_first_touched(&mut self, id: BallId) {
        if self.turn.first_touched.is_none() {
            self.turn.first_touched = Some(id);
        }
    }

    /// Record a pot: list it, flag the cue or eight ball, and take object
    /// balls out of the remaining set
    pub fn record_pot(&mut self, id: BallId) {
        self.add_potted(id);
        match BallKind::from_id(id) {
            BallKind::Cue => self.mark_cue_ball_potted(),
            BallKind::Eight => {
                self.mark_eight_ball_potted();
                self.remove_from_remaining(id);
            }
            BallKind::Regular { .. } => {
                self.remove_from_remaining(id);
            }
        }
    }

    /// Whether the cue ball's first contact was legal for `player`.
    ///
    /// An unassigned player may hit anything. An assigned player must hit
    /// their own group first, or the eight ball once their group is cleared.
    /// No contact at all is illegal. An illegal contact is a scratch, so the
    /// cue ball is marked potted here.
    pub fn is_ball_contact_valid(&mut self, player: &Player) -> bool {
        if !player.group.is_assigned() {
            return true;
        }

        let valid = match self.turn.first_touched.map(BallKind::from_id) {
            Some(BallKind::Regular { group }) => group == player.group,
            Some(BallKind::Eight) => player.has_cleared_group(),
            Some(BallKind::Cue) | None => false,
        };

        if !valid {
            log::debug!(
                "illegal first contact {:?} for {} ({})",
                self.turn.first_touched,
                player.name,
                player.group.as_str()
            );
            self.mark_cue_ball_potted();
        }
        valid
    }

    /// Close the current turn and start a fresh record, returning the old one
    pub fn finish_turn(&mut self) -> TurnRecord {
        std::mem::take(&mut self.turn)
    }

    /// Regular balls of `group` still on the table
    pub fn remaining_in_group(&self, group: Group) -> usize {
        self.remaining
            .iter()
            .filter(|&&id| BallKind::from_id(id).group() == group && group.is_assigned())
            .count()
    }
}
