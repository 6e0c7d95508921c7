//! Turn resolution: group assignment, crediting, fouls and the end of the match
//!
//! Runs once per turn after every ball has come to rest. It reads the
//! turn's record from `MatchBallState`, updates the players, and either
//! hands the table on or ends the match.

use serde::{Deserialize, Serialize};

use super::ball::{BallKind, Group};
use super::ball_state::MatchBallState;
use super::turn::{PlayerId, TurnSequencer};

/// What a resolved turn meant for the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Player who took the shot
    pub shooter: PlayerId,
    /// Turn counter value the shot was played on
    pub turn: u32,
    pub contact_valid: bool,
    /// Cue ball potted, or an illegal first contact
    pub scratch: bool,
    /// Shooter keeps the table
    pub retained: bool,
    /// Group given to the shooter, if groups were assigned this turn
    pub assigned: Option<Group>,
    /// Set when the eight ball went down and the match is over
    pub winner: Option<PlayerId>,
}

impl TurnOutcome {
    pub fn is_match_over(&self) -> bool {
        self.winner.is_some()
    }
}

/// Resolve the turn just played.
///
/// Order matters:
/// 1. The shooter's "all group balls potted" status is snapshotted before
///    this turn's pots are credited, so clearing the last group ball and the
///    eight on one shot is a loss, not a win.
/// 2. Regular pots are queued while groups are open. The first regular pot
///    after the break assigns groups and flushes the queue to the owners.
///    Once assigned, each pot is credited to its group's owner.
/// 3. First contact is judged after that, so a shooter who takes a group on
///    this shot must also have hit that group first.
/// 4. The shooter keeps the table only with a legal contact, at least one
///    own-group pot and no scratch.
/// 5. A potted eight ball ends the match instead of advancing the turn.
pub fn resolve_turn(ball_state: &mut MatchBallState, turns: &mut TurnSequencer) -> TurnOutcome {
    let shooter = turns.active_index();
    let turn = turns.turn_counter();
    let all_potted = turns.active_player().has_cleared_group();

    let mut assigned = None;
    let potted = ball_state.turn().potted.clone();
    for id in potted {
        let BallKind::Regular { group } = BallKind::from_id(id) else {
            continue;
        };

        if turns.groups_assigned() {
            turns.credit_by_group(id);
            continue;
        }

        // Groups still open: the pot counts for the shooter, but who owns
        // the ball is not known yet
        ball_state.add_pre_assigned_potted(id);
        turns.active_player_mut().potted_correct_this_turn = true;
        if turns.is_break_shot() {
            continue;
        }

        if turns.assign_groups(group) {
            log::info!(
                "{} takes {}, {} takes {}",
                turns.active_player().name,
                group.as_str(),
                turns.next_inactive_player().name,
                group.complement().as_str()
            );
            assigned = Some(group);
            for queued in ball_state.clear_pre_assigned_potted() {
                turns.credit_by_group(queued);
            }
        }
    }

    let contact_valid = ball_state.is_ball_contact_valid(turns.active_player());
    let record = ball_state.turn().clone();
    let scratch = record.cue_potted;
    let retained = contact_valid && turns.active_player().potted_correct_this_turn && !scratch;

    let winner = if record.eight_potted {
        let shooter_wins = all_potted && !scratch;
        let winner = if shooter_wins {
            shooter
        } else {
            turns.inactive_index()
        };
        log::info!(
            "eight ball down: {} {}",
            turns.active_player().name,
            if shooter_wins { "wins" } else { "loses" }
        );
        turns.active_player_mut().potted_correct_this_turn = false;
        Some(winner)
    } else {
        turns.advance_turn(!retained);
        None
    };

    ball_state.finish_turn();

    let outcome = TurnOutcome {
        shooter,
        turn,
        contact_valid,
        scratch,
        retained: retained && winner.is_none(),
        assigned,
        winner,
    };
    log::debug!("turn {turn} resolved: {outcome:?}");
    outcome
}
