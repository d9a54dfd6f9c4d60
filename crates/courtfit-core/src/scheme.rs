// Scheme fit: distance between a player and a team's schematic preferences.
//
// Each slider (0-100) is mapped onto a target stat value by interpolating
// between the reference population's 20th and 80th percentiles for the
// linked feature. Distances are taken on normalized values and combined
// with a weighted Gaussian kernel.

use crate::normalize::normalize;
use crate::player::{Feature, PlayerVector};
use crate::reference::ReferencePopulation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Returned when scheme fit is disabled or nothing overlaps.
pub const NEUTRAL_SCHEME_FIT: f64 = 50.0;

const LOW_QUANTILE: f64 = 0.20;
const HIGH_QUANTILE: f64 = 0.80;

// ---------------------------------------------------------------------------
// Scheme axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeAxis {
    Pace,
    ThreePointVolume,
    Switchability,
    RimPressure,
    BallMovement,
    OffGlass,
    DropVsSwitch,
    FoulAvoidance,
}

impl SchemeAxis {
    pub const ALL: [SchemeAxis; 8] = [
        SchemeAxis::Pace,
        SchemeAxis::ThreePointVolume,
        SchemeAxis::Switchability,
        SchemeAxis::RimPressure,
        SchemeAxis::BallMovement,
        SchemeAxis::OffGlass,
        SchemeAxis::DropVsSwitch,
        SchemeAxis::FoulAvoidance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchemeAxis::Pace => "pace",
            SchemeAxis::ThreePointVolume => "three_point_volume",
            SchemeAxis::Switchability => "switchability",
            SchemeAxis::RimPressure => "rim_pressure",
            SchemeAxis::BallMovement => "ball_movement",
            SchemeAxis::OffGlass => "off_glass",
            SchemeAxis::DropVsSwitch => "drop_vs_switch",
            SchemeAxis::FoulAvoidance => "foul_avoidance",
        }
    }

    /// Linked player feature and importance weight, if the axis is scored.
    pub fn mapping(&self) -> Option<AxisMapping> {
        let (feature, weight, inverted) = match self {
            SchemeAxis::ThreePointVolume => (Feature::ThreeRate, 1.2, false),
            SchemeAxis::Switchability => (Feature::Switchability, 1.0, false),
            SchemeAxis::RimPressure => (Feature::RimRate, 1.0, false),
            SchemeAxis::BallMovement => (Feature::AstPct, 0.8, false),
            SchemeAxis::OffGlass => (Feature::DrebPct, 0.6, false),
            // 0 = drop coverage (wants a rim protector), 100 = switch everything.
            SchemeAxis::DropVsSwitch => (Feature::RimProtect, 0.8, true),
            SchemeAxis::Pace | SchemeAxis::FoulAvoidance => return None,
        };
        Some(AxisMapping {
            feature,
            weight,
            inverted,
        })
    }
}

impl fmt::Display for SchemeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    pub feature: Feature,
    pub weight: f64,
    /// Slider runs against the feature (high slider = low target).
    pub inverted: bool,
}

// ---------------------------------------------------------------------------
// Scheme vector
// ---------------------------------------------------------------------------

/// A team's slider settings. Passed through from input untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeVector {
    pub axes: BTreeMap<SchemeAxis, f64>,
}

impl SchemeVector {
    /// Every axis set to the same slider value.
    pub fn uniform(value: f64) -> Self {
        Self {
            axes: SchemeAxis::ALL.into_iter().map(|a| (a, value)).collect(),
        }
    }

    pub fn with(mut self, axis: SchemeAxis, value: f64) -> Self {
        self.axes.insert(axis, value);
        self
    }

    pub fn get(&self, axis: SchemeAxis) -> Option<f64> {
        self.axes.get(&axis).copied()
    }
}

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

/// Kernel width and post-processing floors for the scheme score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeSettings {
    pub sigma: f64,
    /// No scheme score drops below this.
    pub floor: f64,
    /// Close matches are raised to at least this.
    pub boost_floor: f64,
    /// Mean absolute difference under which the boost applies.
    pub boost_threshold: f64,
}

impl Default for SchemeSettings {
    fn default() -> Self {
        Self {
            sigma: 0.6,
            floor: 30.0,
            boost_floor: 85.0,
            boost_threshold: 0.1,
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Target stat value for a slider: `p20 + t * (p80 - p20)`.
pub fn slider_target(slider: f64, p20: f64, p80: f64) -> f64 {
    let t = if slider.is_nan() {
        0.5
    } else {
        slider.clamp(0.0, 100.0) / 100.0
    };
    p20 + t * (p80 - p20)
}

/// Per-axis comparison, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDiff {
    pub axis: SchemeAxis,
    pub target: f64,
    pub diff: f64,
    pub weight: f64,
}

/// Normalized absolute differences for every scorable axis.
pub fn axis_diffs<R: ReferencePopulation + ?Sized>(
    player: &PlayerVector,
    scheme: &SchemeVector,
    reference: &R,
) -> Vec<AxisDiff> {
    scheme
        .axes
        .iter()
        .filter_map(|(&axis, &slider)| {
            let mapping = axis.mapping()?;
            let name = mapping.feature.name();
            let p20 = reference.quantile(name, LOW_QUANTILE)?;
            let p80 = reference.quantile(name, HIGH_QUANTILE)?;
            let slider = if mapping.inverted { 100.0 - slider } else { slider };
            let target = slider_target(slider, p20, p80);
            let have = normalize(mapping.feature, player.get(mapping.feature));
            let want = normalize(mapping.feature, target);
            Some(AxisDiff {
                axis,
                target,
                diff: (have - want).abs(),
                weight: mapping.weight,
            })
        })
        .collect()
}

/// Scheme fit in [0,100] with default settings.
pub fn scheme_fit<R: ReferencePopulation + ?Sized>(
    player: &PlayerVector,
    scheme: &SchemeVector,
    reference: &R,
    enabled: bool,
) -> f64 {
    scheme_fit_with(player, scheme, reference, enabled, &SchemeSettings::default())
}

pub fn scheme_fit_with<R: ReferencePopulation + ?Sized>(
    player: &PlayerVector,
    scheme: &SchemeVector,
    reference: &R,
    enabled: bool,
    settings: &SchemeSettings,
) -> f64 {
    if !enabled {
        return NEUTRAL_SCHEME_FIT;
    }
    let diffs = axis_diffs(player, scheme, reference);
    if diffs.is_empty() {
        debug!(player_id = player.player_id, "no scheme axes overlap; neutral fit");
        return NEUTRAL_SCHEME_FIT;
    }

    let weighted_sq: f64 = diffs.iter().map(|d| d.weight * d.diff * d.diff).sum();
    let mean_abs = diffs.iter().map(|d| d.diff).sum::<f64>() / diffs.len() as f64;

    let mut score = 100.0 * (-weighted_sq / (2.0 * settings.sigma * settings.sigma)).exp();
    score = score.max(settings.floor);
    if mean_abs < settings.boost_threshold {
        score = score.max(settings.boost_floor);
    }
    score.clamp(0.0, 100.0)
}
