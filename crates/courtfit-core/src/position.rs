// Position resolution with an ordered fallback chain.
//
// 1. Known-player override table (by PLAYER_ID)
// 2. Supplied position string, validated against height
// 3. Dominant archetype mapped to a position family, height-gated
// 4. Pure height banding

use crate::player::{PlayerVector, Position};
use crate::role::{dominant_archetype, role_vector, Archetype};
use std::collections::BTreeMap;

/// Assist rate at or above which a pure guard is listed as a point guard.
const PG_ASSIST_RATE: f64 = 25.0;

/// Resolves a canonical position for any player vector.
#[derive(Debug, Clone, Default)]
pub struct PositionResolver {
    overrides: BTreeMap<i64, Position>,
}

impl PositionResolver {
    pub fn new(overrides: BTreeMap<i64, Position>) -> Self {
        Self { overrides }
    }

    /// Deterministic for identical inputs; every step short-circuits.
    pub fn resolve(&self, player: &PlayerVector) -> Position {
        if let Some(pos) = self.overrides.get(&player.player_id) {
            return *pos;
        }
        if let Some(pos) = player
            .position
            .as_deref()
            .and_then(|label| position_from_label(label, player.height_in, player.ast_pct))
        {
            return pos;
        }
        let (archetype, _) = dominant_archetype(&role_vector(player), player);
        if let Some(pos) = position_from_archetype(archetype, player.height_in) {
            return pos;
        }
        position_from_height(player.height_in)
    }
}

/// Which of the three lexical tokens a position string carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tokens {
    guard: bool,
    forward: bool,
    center: bool,
}

impl Tokens {
    fn scan(label: &str) -> Self {
        let lower = label.to_lowercase();
        Tokens {
            guard: lower.contains("guard"),
            forward: lower.contains("forward"),
            center: lower.contains("center"),
        }
    }
}

/// Height 0 means unknown and always passes.
fn within(height_in: f64, min: f64, max: f64) -> bool {
    height_in <= 0.0 || (min..=max).contains(&height_in)
}

/// Classify an externally supplied position string.
///
/// Returns `None` when the label is empty, unrecognized, or contradicted by
/// the player's height (e.g. a "Guard" taller than 82 inches).
pub fn position_from_label(label: &str, height_in: f64, ast_pct: f64) -> Option<Position> {
    if let Some(pos) = Position::from_str_pos(label) {
        return Some(pos);
    }
    let t = Tokens::scan(label);
    match (t.guard, t.forward, t.center) {
        (true, false, false) => within(height_in, 0.0, 82.0).then(|| {
            if ast_pct >= PG_ASSIST_RATE {
                Position::PG
            } else {
                Position::SG
            }
        }),
        (true, true, false) => within(height_in, 74.0, 83.0).then(|| {
            if height_in > 0.0 && height_in < 78.0 {
                Position::SG
            } else {
                Position::SF
            }
        }),
        (false, true, false) => within(height_in, 76.0, 86.0).then(|| {
            if height_in > 0.0 && height_in < 80.0 {
                Position::SF
            } else {
                Position::PF
            }
        }),
        (false, true, true) => within(height_in, 78.0, f64::MAX).then(|| {
            if height_in > 0.0 && height_in < 83.0 {
                Position::PF
            } else {
                Position::C
            }
        }),
        (false, false, true) => within(height_in, 79.0, f64::MAX).then_some(Position::C),
        _ => None,
    }
}

/// Map an archetype to its position family, rejecting implausible heights.
pub fn position_from_archetype(archetype: Archetype, height_in: f64) -> Option<Position> {
    match archetype {
        Archetype::Playmaker => (height_in < 82.0).then_some(Position::PG),
        Archetype::Shooter => (height_in < 82.0).then_some(Position::SG),
        Archetype::SwitchableWing => (76.0..=84.0).contains(&height_in).then_some(Position::SF),
        Archetype::StretchBig => (height_in >= 78.0).then_some(Position::PF),
        Archetype::RimProtector => (height_in >= 78.0).then_some(Position::C),
    }
}

/// Last-resort banding by height alone.
pub fn position_from_height(height_in: f64) -> Position {
    if height_in < 75.0 {
        Position::PG
    } else if height_in < 78.0 {
        Position::SG
    } else if height_in < 81.0 {
        Position::SF
    } else if height_in < 84.0 {
        Position::PF
    } else {
        Position::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Feature;

    fn labelled(label: &str, height: f64) -> PlayerVector {
        PlayerVector {
            position: Some(label.into()),
            ..PlayerVector::default()
        }
        .with(Feature::HeightIn, height)
    }

    #[test]
    fn override_table_wins() {
        let mut overrides = BTreeMap::new();
        overrides.insert(2544, Position::SF);
        let resolver = PositionResolver::new(overrides);

        let mut p = labelled("Forward", 81.0);
        p.player_id = 2544;
        assert_eq!(resolver.resolve(&p), Position::SF);

        p.player_id = 1;
        assert_eq!(resolver.resolve(&p), Position::PF);
    }

    #[test]
    fn canonical_labels_are_taken_verbatim() {
        assert_eq!(position_from_label("pf", 75.0, 0.0), Some(Position::PF));
        assert_eq!(position_from_label("C", 0.0, 0.0), Some(Position::C));
    }

    #[test]
    fn pure_guards_split_by_assist_rate() {
        assert_eq!(position_from_label("Guard", 75.0, 27.0), Some(Position::PG));
        assert_eq!(position_from_label("Guard", 75.0, 25.0), Some(Position::PG));
        assert_eq!(position_from_label("Guard", 77.0, 12.0), Some(Position::SG));
    }

    #[test]
    fn tall_guard_is_rejected() {
        assert_eq!(position_from_label("Guard", 83.0, 30.0), None);
    }

    #[test]
    fn compound_labels() {
        assert_eq!(position_from_label("Guard-Forward", 77.0, 0.0), Some(Position::SG));
        assert_eq!(position_from_label("Forward-Guard", 79.0, 0.0), Some(Position::SF));
        assert_eq!(position_from_label("Forward", 79.0, 0.0), Some(Position::SF));
        assert_eq!(position_from_label("Forward", 81.0, 0.0), Some(Position::PF));
        assert_eq!(position_from_label("Forward-Center", 82.0, 0.0), Some(Position::PF));
        assert_eq!(position_from_label("Center-Forward", 84.0, 0.0), Some(Position::C));
        assert_eq!(position_from_label("Center", 76.0, 0.0), None);
        assert_eq!(position_from_label("Unknown", 80.0, 0.0), None);
        assert_eq!(position_from_label("", 80.0, 0.0), None);
    }

    #[test]
    fn unknown_height_skips_validation() {
        assert_eq!(position_from_label("Guard", 0.0, 10.0), Some(Position::SG));
        assert_eq!(position_from_label("Forward", 0.0, 0.0), Some(Position::PF));
        assert_eq!(position_from_label("Center", 0.0, 0.0), Some(Position::C));
    }

    #[test]
    fn archetype_fallback_when_label_fails() {
        // A "Guard" at 84in is rejected; a big with strong blocks resolves via archetype.
        let mut p = labelled("Guard", 84.0);
        p.blk_pct = 5.0;
        p.rim_protect = 1.0;
        p.dreb_pct = 12.0;
        assert_eq!(PositionResolver::default().resolve(&p), Position::C);
    }

    #[test]
    fn archetype_family_is_height_gated() {
        assert_eq!(position_from_archetype(Archetype::Playmaker, 74.0), Some(Position::PG));
        assert_eq!(position_from_archetype(Archetype::Shooter, 83.0), None);
        assert_eq!(position_from_archetype(Archetype::SwitchableWing, 79.0), Some(Position::SF));
        assert_eq!(position_from_archetype(Archetype::SwitchableWing, 74.0), None);
        assert_eq!(position_from_archetype(Archetype::StretchBig, 77.0), None);
        assert_eq!(position_from_archetype(Archetype::RimProtector, 85.0), Some(Position::C));
    }

    #[test]
    fn height_banding() {
        assert_eq!(position_from_height(0.0), Position::PG);
        assert_eq!(position_from_height(74.9), Position::PG);
        assert_eq!(position_from_height(75.0), Position::SG);
        assert_eq!(position_from_height(78.0), Position::SF);
        assert_eq!(position_from_height(81.0), Position::PF);
        assert_eq!(position_from_height(84.0), Position::C);
    }

    #[test]
    fn resolution_is_deterministic() {
        let p = labelled("Forward-Guard", 80.0);
        let r = PositionResolver::default();
        assert_eq!(r.resolve(&p), r.resolve(&p));
    }
}
