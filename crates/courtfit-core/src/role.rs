// Role classification: five archetype scores and the dominant archetype.
//
// The dominant archetype is resolved by an ordered rule list. Order matters:
// the early threshold rules encode overrides for recognizable play styles and
// must fire before the height-banded tie-breaks.

use crate::normalize::normalize;
use crate::player::{Feature, PlayerVector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Height separating guards from wings (inches).
pub const WING_MIN_HEIGHT_IN: f64 = 78.0;
/// Height separating wings from bigs (inches).
pub const BIG_MIN_HEIGHT_IN: f64 = 82.0;

const THRESHOLD: f64 = 0.5;
const WING_THRESHOLD: f64 = 0.6;
const WING_MARGIN: f64 = 0.1;
const WING_TIEBREAK_MIN: f64 = 0.4;

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Shooter,
    Playmaker,
    RimProtector,
    StretchBig,
    SwitchableWing,
}

impl Archetype {
    /// Declaration order; also the argmax tie-break order.
    pub const ALL: [Archetype; 5] = [
        Archetype::Shooter,
        Archetype::Playmaker,
        Archetype::RimProtector,
        Archetype::StretchBig,
        Archetype::SwitchableWing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Shooter => "shooter",
            Archetype::Playmaker => "playmaker",
            Archetype::RimProtector => "rim_protector",
            Archetype::StretchBig => "stretch_big",
            Archetype::SwitchableWing => "switchable_wing",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Archetype scores, each in [0,1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleVector {
    pub shooter: f64,
    pub playmaker: f64,
    pub rim_protector: f64,
    pub stretch_big: f64,
    pub switchable_wing: f64,
}

impl RoleVector {
    pub fn get(&self, archetype: Archetype) -> f64 {
        match archetype {
            Archetype::Shooter => self.shooter,
            Archetype::Playmaker => self.playmaker,
            Archetype::RimProtector => self.rim_protector,
            Archetype::StretchBig => self.stretch_big,
            Archetype::SwitchableWing => self.switchable_wing,
        }
    }

    /// Highest-scoring archetype; ties resolve to the earlier one in [`Archetype::ALL`].
    pub fn argmax(&self) -> Archetype {
        let mut best = Archetype::Shooter;
        for archetype in Archetype::ALL {
            if self.get(archetype) > self.get(best) {
                best = archetype;
            }
        }
        best
    }

    /// Pick between two archetypes by raw score, favouring `first` on ties.
    fn prefer(&self, first: Archetype, second: Archetype) -> Archetype {
        if self.get(first) >= self.get(second) {
            first
        } else {
            second
        }
    }
}

// ---------------------------------------------------------------------------
// Role vector
// ---------------------------------------------------------------------------

/// Weighted sums of normalized features. Weights in each row sum to 1.0, so
/// every score stays in [0,1].
pub fn role_vector(player: &PlayerVector) -> RoleVector {
    let n = |f: Feature| normalize(f, player.get(f));

    let three = n(Feature::ThreeRate);
    let catch_shoot = n(Feature::CatchShoot);
    let pullup = n(Feature::Pullup);
    let ft = n(Feature::FtRate);
    let ast = n(Feature::AstPct);
    let tov = n(Feature::TovPct);
    let blk = n(Feature::BlkPct);
    let rim = n(Feature::RimProtect);
    let dreb = n(Feature::DrebPct);
    let height = n(Feature::HeightIn);
    let switchability = n(Feature::Switchability);
    let stl = n(Feature::StlPct);

    RoleVector {
        shooter: 0.35 * three + 0.25 * catch_shoot + 0.25 * pullup + 0.15 * ft,
        playmaker: 0.50 * ast + 0.30 * tov + 0.20 * pullup,
        rim_protector: 0.45 * blk + 0.30 * rim + 0.15 * dreb + 0.10 * height,
        stretch_big: 0.40 * three + 0.20 * catch_shoot + 0.20 * height + 0.20 * dreb,
        switchable_wing: 0.40 * switchability + 0.30 * stl + 0.15 * three + 0.15 * dreb,
    }
}

// ---------------------------------------------------------------------------
// Dominant archetype
// ---------------------------------------------------------------------------

type Decide = fn(&RoleVector, &PlayerVector) -> Option<Archetype>;

fn shooter_rule(rv: &RoleVector, p: &PlayerVector) -> Option<Archetype> {
    (rv.shooter >= THRESHOLD && (p.three_rate > 0.3 || p.catch_shoot > 0.4))
        .then_some(Archetype::Shooter)
}

fn playmaker_rule(rv: &RoleVector, p: &PlayerVector) -> Option<Archetype> {
    (rv.playmaker >= THRESHOLD && normalize(Feature::AstPct, p.ast_pct) > 0.25)
        .then_some(Archetype::Playmaker)
}

fn rim_protector_rule(rv: &RoleVector, p: &PlayerVector) -> Option<Archetype> {
    (p.height_in >= WING_MIN_HEIGHT_IN && rv.rim_protector >= THRESHOLD)
        .then_some(Archetype::RimProtector)
}

fn stretch_big_rule(rv: &RoleVector, p: &PlayerVector) -> Option<Archetype> {
    (p.height_in >= WING_MIN_HEIGHT_IN && rv.stretch_big >= THRESHOLD)
        .then_some(Archetype::StretchBig)
}

fn switchable_wing_rule(rv: &RoleVector, _p: &PlayerVector) -> Option<Archetype> {
    let wing = rv.switchable_wing;
    let clears_field = Archetype::ALL
        .iter()
        .filter(|a| **a != Archetype::SwitchableWing)
        .all(|a| wing - rv.get(*a) >= WING_MARGIN);
    (wing >= WING_THRESHOLD && clears_field).then_some(Archetype::SwitchableWing)
}

/// Height-banded guard/wing/big tie-break. Skipped when height is unknown.
fn height_band_rule(rv: &RoleVector, p: &PlayerVector) -> Option<Archetype> {
    let h = p.height_in;
    if h <= 0.0 {
        return None;
    }
    if h < WING_MIN_HEIGHT_IN {
        Some(rv.prefer(Archetype::Shooter, Archetype::Playmaker))
    } else if h >= BIG_MIN_HEIGHT_IN {
        Some(rv.prefer(Archetype::RimProtector, Archetype::StretchBig))
    } else if rv.switchable_wing >= WING_TIEBREAK_MIN {
        Some(Archetype::SwitchableWing)
    } else {
        Some(rv.prefer(Archetype::Shooter, Archetype::Playmaker))
    }
}

const DOMINANT_RULES: [Decide; 6] = [
    shooter_rule,
    playmaker_rule,
    rim_protector_rule,
    stretch_big_rule,
    switchable_wing_rule,
    height_band_rule,
];

/// Resolve the single dominant archetype and its strength (its raw score).
///
/// Rules are evaluated top to bottom; the first that fires wins. If none
/// fires the argmax of the role vector is used.
pub fn dominant_archetype(rv: &RoleVector, player: &PlayerVector) -> (Archetype, f64) {
    let archetype = DOMINANT_RULES
        .iter()
        .find_map(|rule| rule(rv, player))
        .unwrap_or_else(|| rv.argmax());
    (archetype, rv.get(archetype))
}
