// Final aggregation: upside, weighting, informational label, and the engine
// that wires every component together.

use crate::config::EngineConfig;
use crate::player::{CountingStats, PlayerVector, Position};
use crate::position::PositionResolver;
use crate::reference::ReferencePopulation;
use crate::role::{dominant_archetype, role_vector, Archetype};
use crate::roster::{lineup_synergy, role_match, team_redundancy, RosterSummary};
use crate::scheme::{scheme_fit_with, SchemeSettings, SchemeVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Component weights when scheme fit is considered. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitWeights {
    pub role_match: f64,
    pub scheme_fit: f64,
    pub lineup_synergy: f64,
    /// Applied to `100 - team_redundancy`.
    pub team_redundancy: f64,
    pub upside: f64,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            role_match: 0.30,
            scheme_fit: 0.20,
            lineup_synergy: 0.25,
            team_redundancy: 0.15,
            upside: 0.10,
        }
    }
}

impl FitWeights {
    pub fn total(&self) -> f64 {
        self.role_match + self.scheme_fit + self.lineup_synergy + self.team_redundancy + self.upside
    }

    /// Weights in effect for a call: without scheme fit, the other four are
    /// rescaled to sum to 1 (0.375 / 0.3125 / 0.1875 / 0.125 by default).
    pub fn effective(&self, consider_scheme_fit: bool) -> FitWeights {
        if consider_scheme_fit {
            return *self;
        }
        let rest = self.total() - self.scheme_fit;
        if rest <= 0.0 {
            return FitWeights {
                scheme_fit: 0.0,
                ..*self
            };
        }
        FitWeights {
            role_match: self.role_match / rest,
            scheme_fit: 0.0,
            lineup_synergy: self.lineup_synergy / rest,
            team_redundancy: self.team_redundancy / rest,
            upside: self.upside / rest,
        }
    }
}

// ---------------------------------------------------------------------------
// Upside
// ---------------------------------------------------------------------------

pub const NEUTRAL_UPSIDE: f64 = 50.0;
const UPSIDE_FLOOR: f64 = 20.0;

/// Age-derived ceiling proxy. Age 0 (unknown) is neutral.
pub fn upside(age: f64) -> f64 {
    if age.is_nan() || age <= 0.0 {
        return NEUTRAL_UPSIDE;
    }
    let value = if age <= 22.0 {
        100.0
    } else if age <= 30.0 {
        100.0 - 3.75 * (age - 22.0)
    } else if age <= 40.0 {
        70.0 - 4.0 * (age - 30.0)
    } else {
        30.0 - (age - 40.0)
    };
    value.max(UPSIDE_FLOOR)
}

// ---------------------------------------------------------------------------
// Informational label
// ---------------------------------------------------------------------------

/// Display label from raw per-game counting stats. Never feeds the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeLabel {
    #[serde(rename = "Primary Creator")]
    PrimaryCreator,
    #[serde(rename = "Volume Scorer")]
    VolumeScorer,
    #[serde(rename = "Floor General")]
    FloorGeneral,
    #[serde(rename = "Rim Anchor")]
    RimAnchor,
    #[serde(rename = "Glass Cleaner")]
    GlassCleaner,
    #[serde(rename = "Floor Spacer")]
    FloorSpacer,
    #[serde(rename = "Defensive Specialist")]
    DefensiveSpecialist,
    #[serde(rename = "Secondary Scorer")]
    SecondaryScorer,
    #[serde(rename = "Role Player")]
    RolePlayer,
}

impl ArchetypeLabel {
    pub fn label(&self) -> &'static str {
        match self {
            ArchetypeLabel::PrimaryCreator => "Primary Creator",
            ArchetypeLabel::VolumeScorer => "Volume Scorer",
            ArchetypeLabel::FloorGeneral => "Floor General",
            ArchetypeLabel::RimAnchor => "Rim Anchor",
            ArchetypeLabel::GlassCleaner => "Glass Cleaner",
            ArchetypeLabel::FloorSpacer => "Floor Spacer",
            ArchetypeLabel::DefensiveSpecialist => "Defensive Specialist",
            ArchetypeLabel::SecondaryScorer => "Secondary Scorer",
            ArchetypeLabel::RolePlayer => "Role Player",
        }
    }
}

impl fmt::Display for ArchetypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn primary_creator(s: &CountingStats) -> bool {
    s.pts >= 25.0 && s.ast >= 6.0
}

fn volume_scorer(s: &CountingStats) -> bool {
    s.pts >= 25.0
}

fn floor_general(s: &CountingStats) -> bool {
    s.ast >= 7.0
}

fn rim_anchor(s: &CountingStats) -> bool {
    s.reb >= 10.0 && s.blk >= 1.5
}

fn glass_cleaner(s: &CountingStats) -> bool {
    s.reb >= 10.0
}

fn floor_spacer(s: &CountingStats) -> bool {
    s.fg3m >= 2.5
}

fn defensive_specialist(s: &CountingStats) -> bool {
    s.stl + s.blk >= 2.5
}

fn secondary_scorer(s: &CountingStats) -> bool {
    s.pts >= 15.0
}

type LabelRule = (fn(&CountingStats) -> bool, ArchetypeLabel);

const LABEL_RULES: [LabelRule; 8] = [
    (primary_creator, ArchetypeLabel::PrimaryCreator),
    (volume_scorer, ArchetypeLabel::VolumeScorer),
    (floor_general, ArchetypeLabel::FloorGeneral),
    (rim_anchor, ArchetypeLabel::RimAnchor),
    (glass_cleaner, ArchetypeLabel::GlassCleaner),
    (floor_spacer, ArchetypeLabel::FloorSpacer),
    (defensive_specialist, ArchetypeLabel::DefensiveSpecialist),
    (secondary_scorer, ArchetypeLabel::SecondaryScorer),
];

/// First matching rule wins; no counting stats means Role Player.
pub fn archetype_label(counting: Option<&CountingStats>) -> ArchetypeLabel {
    counting
        .and_then(|stats| {
            LABEL_RULES
                .iter()
                .find(|(matches, _)| matches(stats))
                .map(|(_, label)| *label)
        })
        .unwrap_or(ArchetypeLabel::RolePlayer)
}

// ---------------------------------------------------------------------------
// Fit result
// ---------------------------------------------------------------------------

/// Output of one scoring call. Every numeric component is in [0,100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub fit_score: f64,
    pub role_match: f64,
    pub scheme_fit: f64,
    pub lineup_synergy: f64,
    /// 0 = complementary, 100 = fully overlapping. Inverted in `fit_score`.
    pub team_redundancy: f64,
    pub upside: f64,
    pub archetype: ArchetypeLabel,
    pub position: Position,
    pub role: Archetype,
    pub role_strength: f64,
}

impl FitResult {
    /// Human-readable band for the overall score.
    pub fn interpretation(&self) -> &'static str {
        interpret_score(self.fit_score)
    }
}

pub fn interpret_score(score: f64) -> &'static str {
    if score >= 90.0 {
        "Exceptional fit - Perfect match for the team"
    } else if score >= 80.0 {
        "Excellent fit - Great addition to the roster"
    } else if score >= 70.0 {
        "Good fit - Solid player for the team"
    } else if score >= 60.0 {
        "Decent fit - Could work with the right role"
    } else if score >= 50.0 {
        "Average fit - Mixed results expected"
    } else if score >= 40.0 {
        "Poor fit - Significant concerns about compatibility"
    } else {
        "Very poor fit - Not recommended for this team"
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The fit scoring engine.
///
/// Holds only immutable configuration and a read-only reference population,
/// so one engine can serve concurrent scoring calls.
#[derive(Debug, Clone)]
pub struct FitEngine<R> {
    weights: FitWeights,
    scheme: SchemeSettings,
    positions: PositionResolver,
    known_ages: BTreeMap<i64, f64>,
    reference: R,
}

impl<R: ReferencePopulation> FitEngine<R> {
    pub fn new(config: &EngineConfig, reference: R) -> Self {
        Self {
            weights: config.weights,
            scheme: config.scheme,
            positions: PositionResolver::new(config.position_overrides.clone()),
            known_ages: config.known_ages.clone(),
            reference,
        }
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }

    pub fn positions(&self) -> &PositionResolver {
        &self.positions
    }

    /// The player's age, filled from the known-age table when unknown.
    fn age_of(&self, player: &PlayerVector) -> f64 {
        if player.age > 0.0 {
            return player.age;
        }
        self.known_ages
            .get(&player.player_id)
            .copied()
            .unwrap_or(player.age)
    }

    /// Score one candidate against a scheme and an optional lineup.
    pub fn score(
        &self,
        player: &PlayerVector,
        scheme: &SchemeVector,
        roster: Option<&RosterSummary>,
        consider_scheme_fit: bool,
    ) -> FitResult {
        let role_match = role_match(player, roster);
        let scheme_fit = scheme_fit_with(
            player,
            scheme,
            &self.reference,
            consider_scheme_fit,
            &self.scheme,
        );
        let lineup_synergy = lineup_synergy(player, roster, &self.positions);
        let team_redundancy = team_redundancy(player, roster, &self.positions);
        let upside = upside(self.age_of(player));

        let w = self.weights.effective(consider_scheme_fit);
        let fit_score = (w.role_match * role_match
            + w.scheme_fit * scheme_fit
            + w.lineup_synergy * lineup_synergy
            + w.team_redundancy * (100.0 - team_redundancy)
            + w.upside * upside)
            .clamp(0.0, 100.0);

        let (role, role_strength) = dominant_archetype(&role_vector(player), player);
        let result = FitResult {
            fit_score,
            role_match,
            scheme_fit,
            lineup_synergy,
            team_redundancy,
            upside,
            archetype: archetype_label(player.counting.as_ref()),
            position: self.positions.resolve(player),
            role,
            role_strength,
        };
        debug!(
            player_id = player.player_id,
            fit = result.fit_score,
            role_match,
            scheme_fit,
            lineup_synergy,
            team_redundancy,
            upside,
            "scored candidate"
        );
        result
    }

    /// Score every candidate and order by fit score, best first. Ties keep
    /// input order.
    pub fn rank<'p>(
        &self,
        candidates: &'p [PlayerVector],
        scheme: &SchemeVector,
        roster: Option<&RosterSummary>,
        consider_scheme_fit: bool,
    ) -> Vec<(&'p PlayerVector, FitResult)> {
        let mut ranked: Vec<(&PlayerVector, FitResult)> = candidates
            .iter()
            .map(|p| (p, self.score(p, scheme, roster, consider_scheme_fit)))
            .collect();
        ranked.sort_by(|a, b| b.1.fit_score.total_cmp(&a.1.fit_score));
        ranked
    }
}
