// Feature engineering: season averages + bio -> PlayerVector.
//
// Rates are per-game count proxies scaled by fixed multipliers, not
// possession-based percentages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::player::{CountingStats, PlayerVector};
use crate::stats::{
    age_on, parse_height_to_inches, parse_weight_lb, ratio, SeasonAverages, DEFAULT_HEIGHT_IN,
};

const AST_MULTIPLIER: f64 = 5.0;
const TOV_MULTIPLIER: f64 = 5.0;
const STL_MULTIPLIER: f64 = 1.5;
const BLK_MULTIPLIER: f64 = 2.0;
const DREB_MULTIPLIER: f64 = 1.5;

const RIM_PROTECT_BLK_CAP: f64 = 2.5;
const CATCH_SHOOT_FG3M_CAP: f64 = 3.5;
const PULLUP_FG2M_CAP: f64 = 8.0;
const SWITCH_STL_CAP: f64 = 2.0;
const SWITCH_IDEAL_HEIGHT_IN: f64 = 79.0;
const SWITCH_HEIGHT_SPREAD_IN: f64 = 8.0;

/// A bio measurement listed either as text ("6-9", "250 lbs") or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listed {
    Number(f64),
    Text(String),
}

/// Biographical fields as supplied by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBio {
    pub position: Option<String>,
    pub height: Option<Listed>,
    pub weight: Option<Listed>,
    pub age: Option<f64>,
    pub birthdate: Option<String>,
}

impl PlayerBio {
    pub fn height_in(&self) -> f64 {
        match &self.height {
            Some(Listed::Number(n)) if n.is_finite() && *n > 0.0 => *n,
            Some(Listed::Text(s)) => parse_height_to_inches(s),
            _ => DEFAULT_HEIGHT_IN,
        }
    }

    /// Listed weight, 0.0 when unknown.
    pub fn weight_lb(&self) -> f64 {
        match &self.weight {
            Some(Listed::Number(n)) if n.is_finite() && *n > 0.0 => *n,
            Some(Listed::Text(s)) => parse_weight_lb(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Explicit age, else age derived from the birthdate, else 0 (unknown).
    pub fn age_on(&self, today: NaiveDate) -> f64 {
        if let Some(age) = self.age.filter(|a| a.is_finite() && *a > 0.0) {
            return age;
        }
        self.birthdate
            .as_deref()
            .map_or(0.0, |b| f64::from(age_on(b, today)))
    }
}

fn switchability(stl: f64, height_in: f64) -> f64 {
    let steal_part = (stl / SWITCH_STL_CAP).min(1.0);
    let size_part =
        (1.0 - (height_in - SWITCH_IDEAL_HEIGHT_IN).abs() / SWITCH_HEIGHT_SPREAD_IN).max(0.0);
    0.5 * steal_part + 0.5 * size_part
}

/// Engineer a player's feature vector from their season and bio.
///
/// `today` anchors birthdate-derived ages.
pub fn build_player_vector(
    player_id: i64,
    bio: &PlayerBio,
    season: &SeasonAverages,
    today: NaiveDate,
) -> PlayerVector {
    let height_in = bio.height_in();
    let fg2m = (season.fgm - season.fg3m).max(0.0);

    PlayerVector {
        three_rate: ratio(season.fg3a, season.fga),
        ft_rate: ratio(season.fta, season.fga),
        rim_rate: ratio((season.fga - season.fg3a).max(0.0), season.fga),
        ast_pct: season.ast * AST_MULTIPLIER,
        tov_pct: season.tov * TOV_MULTIPLIER,
        stl_pct: season.stl * STL_MULTIPLIER,
        blk_pct: season.blk * BLK_MULTIPLIER,
        dreb_pct: season.dreb * DREB_MULTIPLIER,
        rim_protect: (season.blk / RIM_PROTECT_BLK_CAP).min(1.0),
        catch_shoot: (season.fg3m / CATCH_SHOOT_FG3M_CAP).min(1.0),
        pullup: (fg2m / PULLUP_FG2M_CAP).min(1.0),
        switchability: switchability(season.stl, height_in),
        age: bio.age_on(today),
        height_in,
        weight_lb: bio.weight_lb(),
        player_id,
        position: bio.position.clone(),
        counting: Some(CountingStats {
            pts: season.pts,
            reb: season.reb,
            ast: season.ast,
            stl: season.stl,
            blk: season.blk,
            fg3m: season.fg3m,
        }),
    }
}
