// Season aggregation from game logs, plus bio field parsing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Height assumed when a listed height cannot be parsed (6'6").
pub const DEFAULT_HEIGHT_IN: f64 = 78.0;

// ---------------------------------------------------------------------------
// Game logs
// ---------------------------------------------------------------------------

/// One game's box score line, in the upstream column naming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct GameLogLine {
    pub MIN: f64,
    pub FGM: f64,
    pub FGA: f64,
    pub FG3M: f64,
    pub FG3A: f64,
    pub FTM: f64,
    pub FTA: f64,
    pub OREB: f64,
    pub DREB: f64,
    pub REB: f64,
    pub AST: f64,
    pub STL: f64,
    pub BLK: f64,
    pub TOV: f64,
    pub PF: f64,
    pub PTS: f64,
    pub PLUS_MINUS: f64,
}

/// Per-game season averages plus shooting percentages from totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonAverages {
    pub min: f64,
    pub fgm: f64,
    pub fga: f64,
    pub fg3m: f64,
    pub fg3a: f64,
    pub ftm: f64,
    pub fta: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub pts: f64,
    pub plus_minus: f64,
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub games_played: usize,
    /// Season sums of every game-log column.
    pub totals: GameLogLine,
}

/// `num / den`, or 0.0 when the denominator is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Aggregate a season's game log. Returns `None` for an empty log.
pub fn season_averages(games: &[GameLogLine]) -> Option<SeasonAverages> {
    if games.is_empty() {
        return None;
    }
    let total = games.iter().fold(GameLogLine::default(), |mut acc, g| {
        acc.MIN += g.MIN;
        acc.FGM += g.FGM;
        acc.FGA += g.FGA;
        acc.FG3M += g.FG3M;
        acc.FG3A += g.FG3A;
        acc.FTM += g.FTM;
        acc.FTA += g.FTA;
        acc.OREB += g.OREB;
        acc.DREB += g.DREB;
        acc.REB += g.REB;
        acc.AST += g.AST;
        acc.STL += g.STL;
        acc.BLK += g.BLK;
        acc.TOV += g.TOV;
        acc.PF += g.PF;
        acc.PTS += g.PTS;
        acc.PLUS_MINUS += g.PLUS_MINUS;
        acc
    });
    let n = games.len() as f64;

    Some(SeasonAverages {
        min: total.MIN / n,
        fgm: total.FGM / n,
        fga: total.FGA / n,
        fg3m: total.FG3M / n,
        fg3a: total.FG3A / n,
        ftm: total.FTM / n,
        fta: total.FTA / n,
        oreb: total.OREB / n,
        dreb: total.DREB / n,
        reb: total.REB / n,
        ast: total.AST / n,
        stl: total.STL / n,
        blk: total.BLK / n,
        tov: total.TOV / n,
        pf: total.PF / n,
        pts: total.PTS / n,
        plus_minus: total.PLUS_MINUS / n,
        fg_pct: ratio(total.FGM, total.FGA),
        fg3_pct: ratio(total.FG3M, total.FG3A),
        ft_pct: ratio(total.FTM, total.FTA),
        games_played: games.len(),
        totals: total,
    })
}

// ---------------------------------------------------------------------------
// Bio parsing
// ---------------------------------------------------------------------------

/// Parse "6-6", "6'6\"", "6 6" or plain inches ("78") into inches.
///
/// Unparsable input falls back to [`DEFAULT_HEIGHT_IN`].
pub fn parse_height_to_inches(raw: &str) -> f64 {
    let cleaned = raw
        .trim()
        .replace('\'', "-")
        .replace('"', "")
        .replace(' ', "-");
    let parts: Vec<&str> = cleaned.split('-').collect();

    // Empty parts ("6-", "6' 6") fail to parse and fall back.
    let parsed = match parts.as_slice() {
        [feet, inches, ..] => feet
            .parse::<u32>()
            .ok()
            .zip(inches.parse::<u32>().ok())
            .and_then(|(f, i)| f.checked_mul(12)?.checked_add(i))
            .map(f64::from),
        [inches] => inches.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0),
        [] => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("unparsable height '{}', assuming {} in", raw, DEFAULT_HEIGHT_IN);
        DEFAULT_HEIGHT_IN
    })
}

/// Parse a listed weight in pounds; "Unknown" and friends yield `None`.
pub fn parse_weight_lb(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches("lbs")
        .trim_end_matches("lb")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

/// Whole years between `birthdate` ("1988-03-14" or "1988-03-14T00:00:00")
/// and `today`. Unparsable input yields 0 (unknown); never negative.
pub fn age_on(birthdate: &str, today: NaiveDate) -> u32 {
    let date_part = birthdate.split('T').next().unwrap_or("").trim();
    let Ok(born) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
        if !date_part.is_empty() {
            warn!("failed to parse birthdate '{}'", birthdate);
        }
        return 0;
    };
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// [`age_on`] against the local calendar date.
pub fn age_today(birthdate: &str) -> u32 {
    age_on(birthdate, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn game(fgm: f64, fga: f64, fg3m: f64, fg3a: f64, ftm: f64, fta: f64, pts: f64) -> GameLogLine {
        GameLogLine {
            FGM: fgm,
            FGA: fga,
            FG3M: fg3m,
            FG3A: fg3a,
            FTM: ftm,
            FTA: fta,
            PTS: pts,
            ..GameLogLine::default()
        }
    }

    #[test]
    fn averages_and_percentages_from_totals() {
        let games = [
            game(10.0, 20.0, 2.0, 5.0, 4.0, 5.0, 26.0),
            game(6.0, 10.0, 0.0, 1.0, 0.0, 0.0, 12.0),
        ];
        let s = season_averages(&games).unwrap();
        assert_eq!(s.games_played, 2);
        assert!(approx_eq(s.fga, 15.0));
        assert!(approx_eq(s.pts, 19.0));
        // Percentages use season totals, not per-game means.
        assert!(approx_eq(s.fg_pct, 16.0 / 30.0));
        assert!(approx_eq(s.fg3_pct, 2.0 / 6.0));
        assert!(approx_eq(s.ft_pct, 0.8));
    }

    #[test]
    fn totals_and_plus_minus_are_kept() {
        let games = [
            GameLogLine {
                PLUS_MINUS: 9.0,
                ..game(10.0, 20.0, 2.0, 5.0, 4.0, 5.0, 26.0)
            },
            GameLogLine {
                PLUS_MINUS: -3.0,
                ..game(6.0, 10.0, 0.0, 1.0, 0.0, 0.0, 12.0)
            },
        ];
        let s = season_averages(&games).unwrap();
        assert!(approx_eq(s.plus_minus, 3.0));
        assert!(approx_eq(s.totals.PTS, 38.0));
        assert!(approx_eq(s.totals.FGA, 30.0));
        assert!(approx_eq(s.totals.PLUS_MINUS, 6.0));
    }

    #[test]
    fn zero_attempts_give_zero_percentages() {
        let s = season_averages(&[GameLogLine::default()]).unwrap();
        assert_eq!(s.fg_pct, 0.0);
        assert_eq!(s.fg3_pct, 0.0);
        assert_eq!(s.ft_pct, 0.0);
    }

    #[test]
    fn empty_log_has_no_season() {
        assert_eq!(season_averages(&[]), None);
    }

    #[test]
    fn height_formats() {
        assert_eq!(parse_height_to_inches("6-6"), 78.0);
        assert_eq!(parse_height_to_inches("6'9\""), 81.0);
        assert_eq!(parse_height_to_inches("6'9"), 81.0);
        assert_eq!(parse_height_to_inches("7 0"), 84.0);
        assert_eq!(parse_height_to_inches("75"), 75.0);
        assert_eq!(parse_height_to_inches("Unknown"), DEFAULT_HEIGHT_IN);
        assert_eq!(parse_height_to_inches(""), DEFAULT_HEIGHT_IN);
    }

    #[test]
    fn half_written_heights_fall_back() {
        assert_eq!(parse_height_to_inches("6-"), DEFAULT_HEIGHT_IN);
        assert_eq!(parse_height_to_inches("-6"), DEFAULT_HEIGHT_IN);
        assert_eq!(parse_height_to_inches("6' 6\""), DEFAULT_HEIGHT_IN);
    }

    #[test]
    fn oversized_feet_fall_back_instead_of_overflowing() {
        assert_eq!(parse_height_to_inches("400000000-0"), DEFAULT_HEIGHT_IN);
        assert_eq!(parse_height_to_inches("357913941-5"), DEFAULT_HEIGHT_IN);
        assert_eq!(parse_height_to_inches("99999999999-0"), DEFAULT_HEIGHT_IN);
    }

    #[test]
    fn weight_formats() {
        assert_eq!(parse_weight_lb("250"), Some(250.0));
        assert_eq!(parse_weight_lb("215 lbs"), Some(215.0));
        assert_eq!(parse_weight_lb("Unknown"), None);
    }

    #[test]
    fn age_counts_whole_years() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();
        assert_eq!(age_on("1988-03-14T00:00:00", today), 36);
        assert_eq!(age_on("1988-03-13", today), 37);
        assert_eq!(age_on("2030-01-01", today), 0);
        assert_eq!(age_on("not a date", today), 0);
        assert_eq!(age_on("", today), 0);
    }
}
