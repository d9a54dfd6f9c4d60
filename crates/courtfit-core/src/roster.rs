// Lineup context: role match, positional synergy and positional redundancy.

use crate::normalize::normalized_profile;
use crate::player::{PlayerVector, Position};
use crate::position::PositionResolver;

// ---------------------------------------------------------------------------
// Position matrices
// ---------------------------------------------------------------------------

/// Complementarity between positions (rows/cols PG, SG, SF, PF, C).
/// Same-position pairs add nothing.
pub const SYNERGY_MATRIX: [[f64; 5]; 5] = [
    [0.0, 50.0, 70.0, 80.0, 90.0],
    [50.0, 0.0, 20.0, 70.0, 85.0],
    [70.0, 20.0, 0.0, 45.0, 75.0],
    [80.0, 70.0, 45.0, 0.0, 60.0],
    [90.0, 85.0, 75.0, 60.0, 0.0],
];

/// Overlap between positions. Same-position pairs overlap fully.
pub const REDUNDANCY_MATRIX: [[f64; 5]; 5] = [
    [100.0, 60.0, 25.0, 10.0, 0.0],
    [60.0, 100.0, 55.0, 20.0, 5.0],
    [25.0, 55.0, 100.0, 50.0, 20.0],
    [10.0, 20.0, 50.0, 100.0, 65.0],
    [0.0, 5.0, 20.0, 65.0, 100.0],
];

pub fn synergy_between(a: Position, b: Position) -> f64 {
    SYNERGY_MATRIX[a.index()][b.index()]
}

pub fn overlap_between(a: Position, b: Position) -> f64 {
    REDUNDANCY_MATRIX[a.index()][b.index()]
}

// ---------------------------------------------------------------------------
// Roster summary
// ---------------------------------------------------------------------------

/// Teammates plus their per-feature centroid. Rebuild whenever the list changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSummary {
    teammates: Vec<PlayerVector>,
    centroid: PlayerVector,
}

impl RosterSummary {
    pub fn new(teammates: Vec<PlayerVector>) -> Self {
        let centroid = PlayerVector::centroid(&teammates);
        Self {
            teammates,
            centroid,
        }
    }

    pub fn teammates(&self) -> &[PlayerVector] {
        &self.teammates
    }

    pub fn centroid(&self) -> &PlayerVector {
        &self.centroid
    }

    pub fn is_empty(&self) -> bool {
        self.teammates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teammates.len()
    }
}

// ---------------------------------------------------------------------------
// Role match
// ---------------------------------------------------------------------------

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

/// Cosine similarity to the lineup centroid, rescaled from [-1,1] to [0,100].
/// Zero without roster context.
pub fn role_match(player: &PlayerVector, roster: Option<&RosterSummary>) -> f64 {
    let Some(roster) = roster.filter(|r| !r.is_empty()) else {
        return 0.0;
    };
    let candidate = normalized_profile(player);
    let centroid = normalized_profile(roster.centroid());
    ((cosine(&candidate, &centroid) + 1.0) * 50.0).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Synergy and redundancy
// ---------------------------------------------------------------------------

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Same reference, or the same real (non-negative) player id.
fn is_same_player(a: &PlayerVector, b: &PlayerVector) -> bool {
    std::ptr::eq(a, b) || (a.player_id >= 0 && a.player_id == b.player_id)
}

/// Mean positional complementarity over every teammate.
pub fn lineup_synergy(
    player: &PlayerVector,
    roster: Option<&RosterSummary>,
    resolver: &PositionResolver,
) -> f64 {
    let Some(roster) = roster else {
        return 0.0;
    };
    let pos = resolver.resolve(player);
    mean(
        roster
            .teammates()
            .iter()
            .map(|mate| synergy_between(pos, resolver.resolve(mate))),
    )
    .map_or(0.0, |s| s.clamp(0.0, 100.0))
}

/// Mean positional overlap with teammates, excluding the candidate itself.
///
/// 0 = fully complementary, 100 = every teammate plays the same spot.
pub fn team_redundancy(
    player: &PlayerVector,
    roster: Option<&RosterSummary>,
    resolver: &PositionResolver,
) -> f64 {
    let Some(roster) = roster else {
        return 0.0;
    };
    let pos = resolver.resolve(player);
    mean(
        roster
            .teammates()
            .iter()
            .filter(|mate| !is_same_player(player, mate))
            .map(|mate| overlap_between(pos, resolver.resolve(mate))),
    )
    .map_or(0.0, |r| r.clamp(0.0, 100.0))
}
