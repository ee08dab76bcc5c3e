//! End-of-game scoring and the final report

use crate::core::{CardId, PlayerId};
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// The prestige pile ran out
    PrestigePileEmpty,
    /// Three supply piles ran out
    ThreePilesEmpty,
    /// A participant quit
    Quit(PlayerId),
    /// A participant broke the decision protocol or lost its connection
    Disconnected(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
}

/// `count` copies of `card` worth `points` in total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub card: CardId,
    pub count: u32,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: PlayerId,
    pub name: String,
    pub total: i32,
    pub breakdown: Vec<ScoreLine>,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub scores: Vec<PlayerScore>,
    /// Highest total; None on a tie
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

impl GameReport {
    pub fn score_of(&self, player: PlayerId) -> Option<i32> {
        self.scores
            .iter()
            .find(|s| s.player == player)
            .map(|s| s.total)
    }
}

/// Score every player's manifest
///
/// Each scoring card is worth its VP function evaluated for its owner.
/// Scoring cards without a VP function count as 0 and produce a diagnostic.
/// Breakdown lines follow the supply layout order, then any other cards in
/// the order they were first seen.
pub fn score_players(game: &GameState) -> Vec<PlayerScore> {
    game.players
        .iter()
        .map(|player| {
            let mut lines: Vec<ScoreLine> = game
                .supply
                .cards()
                .filter(|&id| game.card(id).is_scoring())
                .map(|card| ScoreLine {
                    card,
                    count: 0,
                    points: 0,
                })
                .collect();

            let mut total = 0;
            for id in player.manifest.iter() {
                let card = game.card(id);
                if !card.is_scoring() {
                    continue;
                }
                let Some(vp) = &card.vp else {
                    game.logger
                        .diagnostic(&format!("{} has no victory points defined", card.name));
                    continue;
                };
                let points = vp(game, player.id);
                total += points;
                match lines.iter_mut().find(|l| l.card == id) {
                    Some(line) => {
                        line.count += 1;
                        line.points += points;
                    }
                    None => lines.push(ScoreLine {
                        card: id,
                        count: 1,
                        points,
                    }),
                }
            }

            PlayerScore {
                player: player.id,
                name: player.name.clone(),
                total,
                breakdown: lines,
            }
        })
        .collect()
}

/// The unique highest scorer, if there is one
pub fn winner(scores: &[PlayerScore]) -> Option<PlayerId> {
    let best = scores.iter().map(|s| s.total).max()?;
    let mut leaders = scores.iter().filter(|s| s.total == best);
    let first = leaders.next()?;
    if leaders.next().is_some() {
        None
    } else {
        Some(first.player)
    }
}

/// Render a report the way it is printed at the end of a match
pub fn format_report(game: &GameState, report: &GameReport) -> String {
    let mut out = String::from("Game over\n");
    for score in &report.scores {
        out.push_str(&format!("{}: {}\n", score.name, score.total));
        for line in &score.breakdown {
            out.push_str(&format!(
                "{} x {} = {}\n",
                line.count,
                game.card_name(line.card),
                line.points
            ));
        }
    }
    match report.winner {
        Some(p) => out.push_str(&format!("{} wins", game.player_name(p))),
        None => out.push_str("Tie"),
    }
    out
}
