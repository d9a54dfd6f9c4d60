// Player feature vectors and canonical basketball positions.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Feature names
// ---------------------------------------------------------------------------

/// Every numeric axis carried by a [`PlayerVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ThreeRate,
    FtRate,
    AstPct,
    TovPct,
    StlPct,
    BlkPct,
    DrebPct,
    Switchability,
    RimProtect,
    CatchShoot,
    Pullup,
    RimRate,
    Age,
    HeightIn,
    WeightLb,
}

impl Feature {
    pub const ALL: [Feature; 15] = [
        Feature::ThreeRate,
        Feature::FtRate,
        Feature::AstPct,
        Feature::TovPct,
        Feature::StlPct,
        Feature::BlkPct,
        Feature::DrebPct,
        Feature::Switchability,
        Feature::RimProtect,
        Feature::CatchShoot,
        Feature::Pullup,
        Feature::RimRate,
        Feature::Age,
        Feature::HeightIn,
        Feature::WeightLb,
    ];

    /// Column / key name used in CSV headers and JSON payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::ThreeRate => "three_rate",
            Feature::FtRate => "ft_rate",
            Feature::AstPct => "ast_pct",
            Feature::TovPct => "tov_pct",
            Feature::StlPct => "stl_pct",
            Feature::BlkPct => "blk_pct",
            Feature::DrebPct => "dreb_pct",
            Feature::Switchability => "switchability",
            Feature::RimProtect => "rim_protect",
            Feature::CatchShoot => "catch_shoot",
            Feature::Pullup => "pullup",
            Feature::RimRate => "rim_rate",
            Feature::Age => "age",
            Feature::HeightIn => "height_in",
            Feature::WeightLb => "weight_lb",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Counting stats (informational only)
// ---------------------------------------------------------------------------

/// Raw per-game counting stats. Used for the display label, never for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingStats {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fg3m: f64,
}

// ---------------------------------------------------------------------------
// Player vector
// ---------------------------------------------------------------------------

/// A single player's engineered feature vector.
///
/// Built once per player per request and never mutated by the engine.
/// Missing numeric fields deserialize as 0.0 so a partially populated
/// vector still scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerVector {
    pub three_rate: f64,
    pub ft_rate: f64,
    pub ast_pct: f64,
    pub tov_pct: f64,
    pub stl_pct: f64,
    pub blk_pct: f64,
    pub dreb_pct: f64,
    pub switchability: f64,
    pub rim_protect: f64,
    pub catch_shoot: f64,
    pub pullup: f64,
    pub rim_rate: f64,
    pub age: f64,
    pub height_in: f64,
    pub weight_lb: f64,
    /// Negative for synthetic / custom players.
    #[serde(rename = "PLAYER_ID")]
    pub player_id: i64,
    /// Position string as supplied by the data source ("Guard-Forward", "C", ...).
    #[serde(rename = "POSITION", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counting: Option<CountingStats>,
}

impl PlayerVector {
    /// Read a feature by name.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::ThreeRate => self.three_rate,
            Feature::FtRate => self.ft_rate,
            Feature::AstPct => self.ast_pct,
            Feature::TovPct => self.tov_pct,
            Feature::StlPct => self.stl_pct,
            Feature::BlkPct => self.blk_pct,
            Feature::DrebPct => self.dreb_pct,
            Feature::Switchability => self.switchability,
            Feature::RimProtect => self.rim_protect,
            Feature::CatchShoot => self.catch_shoot,
            Feature::Pullup => self.pullup,
            Feature::RimRate => self.rim_rate,
            Feature::Age => self.age,
            Feature::HeightIn => self.height_in,
            Feature::WeightLb => self.weight_lb,
        }
    }

    fn slot_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::ThreeRate => &mut self.three_rate,
            Feature::FtRate => &mut self.ft_rate,
            Feature::AstPct => &mut self.ast_pct,
            Feature::TovPct => &mut self.tov_pct,
            Feature::StlPct => &mut self.stl_pct,
            Feature::BlkPct => &mut self.blk_pct,
            Feature::DrebPct => &mut self.dreb_pct,
            Feature::Switchability => &mut self.switchability,
            Feature::RimProtect => &mut self.rim_protect,
            Feature::CatchShoot => &mut self.catch_shoot,
            Feature::Pullup => &mut self.pullup,
            Feature::RimRate => &mut self.rim_rate,
            Feature::Age => &mut self.age,
            Feature::HeightIn => &mut self.height_in,
            Feature::WeightLb => &mut self.weight_lb,
        }
    }

    /// Builder-style setter, mostly for fixtures and the feature builder.
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        *self.slot_mut(feature) = value;
        self
    }

    /// Per-feature arithmetic mean of a set of vectors.
    ///
    /// Non-numeric fields (id, position, counting stats) take their defaults.
    /// An empty slice yields the all-zero vector.
    pub fn centroid(vectors: &[PlayerVector]) -> PlayerVector {
        let mut centroid = PlayerVector::default();
        if vectors.is_empty() {
            return centroid;
        }
        let n = vectors.len() as f64;
        for feature in Feature::ALL {
            let sum: f64 = vectors.iter().map(|v| v.get(feature)).sum();
            *centroid.slot_mut(feature) = sum / n;
        }
        centroid
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Canonical five basketball positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
    ];

    /// Parse a canonical abbreviation ("PG", "sg", " C ").
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PG" => Some(Position::PG),
            "SG" => Some(Position::SG),
            "SF" => Some(Position::SF),
            "PF" => Some(Position::PF),
            "C" => Some(Position::C),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
        }
    }

    /// Row/column index into the 5x5 lineup matrices.
    pub fn index(&self) -> usize {
        match self {
            Position::PG => 0,
            Position::SG => 1,
            Position::SF => 2,
            Position::PF => 3,
            Position::C => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}
