// End-to-end scoring tests against the public courtfit-core API.

use chrono::NaiveDate;
use courtfit_core::config::parse_config;
use courtfit_core::role::Archetype;
use courtfit_core::scheme::scheme_fit;
use courtfit_core::{
    build_player_vector, season_averages, EngineConfig, Feature, FitEngine, GameLogLine,
    PlayerBio, PlayerVector, Position, ReferencePopulation, ReferenceTable, RosterSummary,
    SchemeAxis, SchemeVector,
};
use std::path::Path;

// ===========================================================================
// Test helpers
// ===========================================================================

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
const DEFAULT_ENGINE_TOML: &str = include_str!("../../../defaults/engine.toml");

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

fn small_table() -> ReferenceTable {
    ReferenceTable::load(&Path::new(FIXTURES).join("reference_small.csv")).unwrap()
}

fn shipped_config() -> EngineConfig {
    parse_config(DEFAULT_ENGINE_TOML, Path::new("defaults/engine.toml")).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

fn line(fgm: f64, fga: f64, fg3m: f64, fg3a: f64, ast: f64, reb: f64, blk: f64) -> GameLogLine {
    GameLogLine {
        FGM: fgm,
        FGA: fga,
        FG3M: fg3m,
        FG3A: fg3a,
        FTA: 3.0,
        FTM: 2.0,
        DREB: reb * 0.75,
        REB: reb,
        AST: ast,
        STL: 1.0,
        BLK: blk,
        TOV: 2.0,
        PTS: 2.0 * fgm + fg3m + 2.0,
        ..GameLogLine::default()
    }
}

fn built(id: i64, position: &str, height: &str, games: &[GameLogLine]) -> PlayerVector {
    let bio = PlayerBio {
        position: Some(position.into()),
        height: Some(courtfit_core::features::Listed::Text(height.into())),
        birthdate: Some("1999-02-10T00:00:00".into()),
        ..PlayerBio::default()
    };
    build_player_vector(id, &bio, &season_averages(games).unwrap(), today())
}

fn every_component_in_range(r: &courtfit_core::FitResult) -> bool {
    [
        r.fit_score,
        r.role_match,
        r.scheme_fit,
        r.lineup_synergy,
        r.team_redundancy,
        r.upside,
    ]
    .iter()
    .all(|v| (0.0..=100.0).contains(v))
}

// ===========================================================================
// Reference table
// ===========================================================================

#[test]
fn fixture_table_skips_bad_cells_per_column() {
    let table = small_table();
    assert_eq!(table.len(), 7);
    // "n/a" is dropped from three_rate only; ft_rate keeps all seven rows.
    assert_eq!(table.quantile("three_rate", 0.0), Some(0.10));
    assert_eq!(table.quantile("ft_rate", 1.0), Some(0.35));
    assert!(table.quantile("name", 0.5).is_none());
    assert!(table.quantile("usage_rate", 0.5).is_none());
}

#[test]
fn shipped_reference_population_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/reference_population.csv");
    let table = ReferenceTable::load(Path::new(path)).unwrap();
    assert!(table.len() >= 30);
    for feature in Feature::ALL {
        assert!(
            table.quantile(feature.name(), 0.5).is_some(),
            "missing column {feature}"
        );
    }
}

// ===========================================================================
// Scheme fit
// ===========================================================================

#[test]
fn midpoint_player_fits_midpoint_scheme() {
    let table = small_table();
    let mut player = PlayerVector::default();
    for feature in [
        Feature::ThreeRate,
        Feature::Switchability,
        Feature::RimRate,
        Feature::AstPct,
        Feature::DrebPct,
        Feature::RimProtect,
    ] {
        let p20 = table.quantile(feature.name(), 0.2).unwrap();
        let p80 = table.quantile(feature.name(), 0.8).unwrap();
        player = player.with(feature, (p20 + p80) / 2.0);
    }
    let scheme = SchemeVector::uniform(50.0);
    assert!(scheme_fit(&player, &scheme, &table, true) >= 85.0);
}

#[test]
fn scheme_without_mapped_axes_is_neutral() {
    let table = small_table();
    let scheme = SchemeVector::default()
        .with(SchemeAxis::Pace, 90.0)
        .with(SchemeAxis::FoulAvoidance, 10.0);
    let p = PlayerVector::default().with(Feature::ThreeRate, 0.5);
    assert_eq!(scheme_fit(&p, &scheme, &table, true), 50.0);
}

#[test]
fn shooter_prefers_a_spacing_scheme() {
    let table = small_table();
    let shooter = PlayerVector::default()
        .with(Feature::ThreeRate, 0.48)
        .with(Feature::CatchShoot, 0.8);
    let spacing = SchemeVector::default().with(SchemeAxis::ThreePointVolume, 100.0);
    let post = SchemeVector::default().with(SchemeAxis::ThreePointVolume, 0.0);
    assert!(
        scheme_fit(&shooter, &spacing, &table, true) > scheme_fit(&shooter, &post, &table, true)
    );
}

// ===========================================================================
// Full pipeline
// ===========================================================================

#[test]
fn game_logs_to_ranked_lineup_fit() {
    let engine = FitEngine::new(&shipped_config(), small_table());

    let guard_games = [line(8.0, 18.0, 3.0, 8.0, 7.0, 4.0, 0.2); 5];
    let big_games = [line(7.0, 11.0, 0.0, 0.0, 2.0, 11.0, 2.5); 5];
    let wing_games = [line(6.0, 13.0, 2.0, 6.0, 3.0, 6.0, 0.8); 5];

    let teammates = vec![
        built(101, "Guard", "6-2", &guard_games),
        built(102, "Guard-Forward", "6-6", &wing_games),
        built(103, "Forward", "6-8", &wing_games),
    ];
    let roster = RosterSummary::new(teammates);

    let candidates = vec![
        built(201, "Center", "7-0", &big_games),
        built(202, "Guard", "6-1", &guard_games),
    ];
    // An inside-out scheme: paint touches and drop coverage.
    let scheme = SchemeVector::default()
        .with(SchemeAxis::ThreePointVolume, 0.0)
        .with(SchemeAxis::Switchability, 50.0)
        .with(SchemeAxis::RimPressure, 100.0)
        .with(SchemeAxis::BallMovement, 0.0)
        .with(SchemeAxis::OffGlass, 100.0)
        .with(SchemeAxis::DropVsSwitch, 0.0);

    let ranked = engine.rank(&candidates, &scheme, Some(&roster), true);
    assert_eq!(ranked.len(), 2);
    for (_, result) in &ranked {
        assert!(every_component_in_range(result));
    }
    // The lineup lacks a big: the center complements it, the guard duplicates.
    assert_eq!(ranked[0].0.player_id, 201);
    assert_eq!(ranked[0].1.position, Position::C);
    assert_eq!(ranked[1].1.position, Position::PG);
    assert!(ranked[0].1.lineup_synergy > ranked[1].1.lineup_synergy);
    assert!(ranked[0].1.team_redundancy < ranked[1].1.team_redundancy);
    assert!(ranked[0].1.scheme_fit > ranked[1].1.scheme_fit);
    assert!(ranked[0].0.age > 0.0);
}

#[test]
fn scoring_is_idempotent() {
    let engine = FitEngine::new(&EngineConfig::default(), small_table());
    let p = built(7, "Forward", "6-9", &[line(6.0, 12.0, 1.0, 4.0, 2.0, 8.0, 1.0); 3]);
    let roster = RosterSummary::new(vec![p.clone()]);
    let scheme = SchemeVector::uniform(65.0);
    let a = engine.score(&p, &scheme, Some(&roster), true);
    let b = engine.score(&p, &scheme, Some(&roster), true);
    assert_eq!(a, b);
}

#[test]
fn four_same_position_teammates_zero_out_redundancy_term() {
    let engine = FitEngine::new(&EngineConfig::default(), ReferenceTable::default());
    let center = |id| PlayerVector {
        player_id: id,
        position: Some("C".into()),
        height_in: 84.0,
        ..PlayerVector::default()
    };
    let roster = RosterSummary::new((2..6).map(center).collect());
    let r = engine.score(&center(1), &SchemeVector::default(), Some(&roster), false);
    assert!(approx_eq(r.team_redundancy, 100.0, 1e-9));
    assert!(approx_eq(r.lineup_synergy, 0.0, 1e-9));
    // Identical profiles: role match 100, upside 50 (age unknown).
    assert!(approx_eq(r.role_match, 100.0, 1e-9));
    assert!(approx_eq(r.fit_score, 0.375 * 100.0 + 0.125 * 50.0, 1e-9));
}

// ===========================================================================
// Shipped configuration tables
// ===========================================================================

#[test]
fn shipped_overrides_and_known_ages_apply() {
    let engine = FitEngine::new(&shipped_config(), ReferenceTable::default());
    // Listed as a center with guard-like size: the override wins.
    let lebron = PlayerVector {
        player_id: 2544,
        position: Some("Center".into()),
        height_in: 81.0,
        ..PlayerVector::default()
    };
    let r = engine.score(&lebron, &SchemeVector::default(), None, false);
    assert_eq!(r.position, Position::SF);
    // Age 40 from the table: 70 - 4 * 10.
    assert!(approx_eq(r.upside, 30.0, 1e-9));

    let custom = PlayerVector {
        player_id: -1,
        ..lebron
    };
    let r = engine.score(&custom, &SchemeVector::default(), None, false);
    assert_eq!(r.upside, 50.0);
}

#[test]
fn dominant_role_is_reported() {
    let engine = FitEngine::new(&EngineConfig::default(), ReferenceTable::default());
    let big = PlayerVector {
        blk_pct: 5.0,
        rim_protect: 1.0,
        dreb_pct: 12.0,
        height_in: 85.0,
        ..PlayerVector::default()
    };
    let r = engine.score(&big, &SchemeVector::default(), None, false);
    assert_eq!(r.role, Archetype::RimProtector);
    assert_eq!(r.position, Position::C);
}
