// Feature normalization: raw per-game statistics to bounded [0,1] axes.

use crate::player::{Feature, PlayerVector};

/// Three-point attempt rate at or above this maps to 1.0.
pub const THREE_RATE_CAP: f64 = 0.5;
pub const AST_PCT_CAP: f64 = 30.0;
/// Turnover rate is inverted: 0 maps to 1.0, this ceiling and above to 0.0.
pub const TOV_PCT_CEILING: f64 = 15.0;
pub const BLK_PCT_CAP: f64 = 5.0;
pub const STL_PCT_CAP: f64 = 3.0;
pub const DREB_PCT_CAP: f64 = 12.0;
pub const FT_RATE_CAP: f64 = 0.4;
pub const HEIGHT_FLOOR_IN: f64 = 70.0;
pub const HEIGHT_CEIL_IN: f64 = 90.0;

/// The axes that carry a normalization rule, in the order used for
/// cosine-similarity vectors.
pub const NORMALIZED_FEATURES: [Feature; 12] = [
    Feature::ThreeRate,
    Feature::AstPct,
    Feature::TovPct,
    Feature::BlkPct,
    Feature::StlPct,
    Feature::DrebPct,
    Feature::FtRate,
    Feature::HeightIn,
    Feature::RimProtect,
    Feature::CatchShoot,
    Feature::Pullup,
    Feature::Switchability,
];

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Map a raw feature value into [0,1].
pub fn normalize(feature: Feature, raw: f64) -> f64 {
    match feature {
        Feature::ThreeRate => unit(raw / THREE_RATE_CAP),
        Feature::AstPct => unit(raw / AST_PCT_CAP),
        Feature::TovPct => unit(1.0 - raw / TOV_PCT_CEILING),
        Feature::BlkPct => unit(raw / BLK_PCT_CAP),
        Feature::StlPct => unit(raw / STL_PCT_CAP),
        Feature::DrebPct => unit(raw / DREB_PCT_CAP),
        Feature::FtRate => unit(raw / FT_RATE_CAP),
        Feature::HeightIn => unit((raw - HEIGHT_FLOOR_IN) / (HEIGHT_CEIL_IN - HEIGHT_FLOOR_IN)),
        // Already bounded upstream.
        Feature::RimProtect | Feature::CatchShoot | Feature::Pullup | Feature::Switchability => {
            unit(raw)
        }
        Feature::RimRate | Feature::Age | Feature::WeightLb => unit(raw),
    }
}

/// Name-keyed variant. Unknown names get the capped pass-through.
pub fn normalize_named(name: &str, raw: f64) -> f64 {
    match Feature::from_name(name) {
        Some(feature) => normalize(feature, raw),
        None => unit(raw),
    }
}

/// Normalize a player's twelve rule-bearing axes, in [`NORMALIZED_FEATURES`] order.
pub fn normalized_profile(player: &PlayerVector) -> [f64; 12] {
    NORMALIZED_FEATURES.map(|f| normalize(f, player.get(f)))
}
