//! Scoring and ordering candidates.
//!
//! Every pass starts from the plain candidate list and recomputes all
//! annotations, so switching modes never sees another mode's values.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::aggregate::Candidate;
use super::baseline::{select_baseline, select_cospa_baseline};

/// How results are scored and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    /// Cheapest total cost first.
    Price,
    /// Highest guest rating first.
    Rating,
    /// Most money saved per extra minute of travel first.
    #[default]
    Cospa,
}

impl FromStr for RankMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(RankMode::Price),
            "rating" | "review" => Ok(RankMode::Rating),
            "cospa" => Ok(RankMode::Cospa),
            other => Err(format!("unknown rank mode: {other:?}")),
        }
    }
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RankMode::Price => "price",
            RankMode::Rating => "rating",
            RankMode::Cospa => "cospa",
        })
    }
}

/// Difference from the baseline, in the unit of the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Savings {
    /// Yen saved on total cost (negative when dearer).
    Money(i64),
    /// Rating points above the baseline (negative when lower).
    Rating(f64),
}

/// A candidate with the annotations of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub candidate: Candidate,

    /// Set in price and rating modes.
    pub savings: Option<Savings>,

    /// Cost-performance mode only; zero otherwise.
    pub saved_money: i64,
    pub extra_time: i64,
    pub cospa_index: i64,

    pub is_baseline: bool,
}

impl ScoredResult {
    fn plain(candidate: &Candidate) -> Self {
        Self {
            candidate: candidate.clone(),
            savings: None,
            saved_money: 0,
            extra_time: 0,
            cospa_index: 0,
            is_baseline: false,
        }
    }
}

/// Score and sort candidates for `mode`.
pub fn rank(candidates: &[Candidate], mode: RankMode, destination: &str) -> Vec<ScoredResult> {
    let mut results = annotate(candidates, mode, destination);
    match mode {
        RankMode::Price => results.sort_by_key(|r| r.candidate.total_cost),
        RankMode::Rating => results.sort_by(|a, b| {
            b.candidate
                .lodging
                .rating_or_zero()
                .total_cmp(&a.candidate.lodging.rating_or_zero())
        }),
        RankMode::Cospa => {
            if results.iter().any(|r| r.is_baseline) {
                results.sort_by(cospa_order);
            } else {
                results.sort_by_key(|r| r.candidate.total_cost);
            }
        }
    }
    results
}

/// Score candidates for `mode`, keeping their order.
pub fn annotate(candidates: &[Candidate], mode: RankMode, destination: &str) -> Vec<ScoredResult> {
    let mut results: Vec<ScoredResult> = candidates.iter().map(ScoredResult::plain).collect();
    let Some(baseline) = select_baseline(candidates, destination) else {
        return results;
    };

    match mode {
        RankMode::Price => {
            let base = baseline.total_cost as i64;
            for r in &mut results {
                r.savings = Some(Savings::Money(base - r.candidate.total_cost as i64));
                r.is_baseline = r.candidate.id == baseline.id;
            }
        }
        RankMode::Rating => {
            let base = baseline.lodging.rating_or_zero();
            for r in &mut results {
                r.savings = Some(Savings::Rating(r.candidate.lodging.rating_or_zero() - base));
                r.is_baseline = r.candidate.id == baseline.id;
            }
        }
        RankMode::Cospa => {
            let Some(anchor) = select_cospa_baseline(candidates, baseline) else {
                return results;
            };
            let base_cost = anchor.price_with_round_trip() as i64;
            let base_time = i64::from(anchor.travel_minutes());

            for r in &mut results {
                let is_baseline = r.candidate.id == anchor.id;
                let mut travel = i64::from(r.candidate.travel_minutes());
                // A tie with the baseline counts as one minute slower.
                if !is_baseline && travel == base_time {
                    travel += 1;
                }

                r.saved_money = base_cost - r.candidate.price_with_round_trip() as i64;
                r.extra_time = travel - base_time;
                r.cospa_index = if r.extra_time > 0 {
                    round_half_up(r.saved_money as f64 / r.extra_time as f64)
                } else {
                    0
                };
                r.is_baseline = is_baseline;
            }
        }
    }

    results
}

// Baseline first, then by descending index. Candidates no slower than
// the baseline share index zero and go by descending saved money.
fn cospa_order(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.is_baseline
        .cmp(&a.is_baseline)
        .then(b.cospa_index.cmp(&a.cospa_index))
        .then_with(|| {
            if a.extra_time <= 0 && b.extra_time <= 0 {
                b.saved_money.cmp(&a.saved_money)
            } else {
                Ordering::Equal
            }
        })
}

fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fare;
    use crate::planner::baseline::test_support::candidate;

    fn baseline_count(results: &[ScoredResult]) -> usize {
        results.iter().filter(|r| r.is_baseline).count()
    }

    #[test]
    fn parse_modes() {
        assert_eq!("price".parse::<RankMode>(), Ok(RankMode::Price));
        assert_eq!(" Review ".parse::<RankMode>(), Ok(RankMode::Rating));
        assert_eq!("cospa".parse::<RankMode>(), Ok(RankMode::Cospa));
        assert!("cheap".parse::<RankMode>().is_err());
        assert_eq!(RankMode::default(), RankMode::Cospa);
    }

    #[test]
    fn price_mode_sorts_and_measures_savings() {
        let candidates = vec![
            candidate(0, "Dest", 9_000, 0),
            candidate(0, "Near", 6_000, 3),
            candidate(1, "Dest", 8_000, 0),
        ];
        let results = rank(&candidates, RankMode::Price, "Dest");

        let costs: Vec<_> = results.iter().map(|r| r.candidate.total_cost).collect();
        assert_eq!(costs, vec![6_000, 8_000, 9_000]);
        assert_eq!(results[0].savings, Some(Savings::Money(2_000)));
        assert_eq!(results[1].savings, Some(Savings::Money(0)));
        assert!(results[1].is_baseline);
        assert_eq!(results[2].savings, Some(Savings::Money(-1_000)));
        assert_eq!(baseline_count(&results), 1);
    }

    #[test]
    fn rating_mode_sorts_descending_with_missing_as_zero() {
        let mut a = candidate(0, "Dest", 9_000, 0);
        a.lodging.rating = Some(3.5);
        let b = candidate(1, "Dest", 5_000, 0);
        let mut c = candidate(0, "Near", 6_000, 3);
        c.lodging.rating = Some(4.5);
        let results = rank(&[a, b, c], RankMode::Rating, "Dest");

        let ratings: Vec<_> = results
            .iter()
            .map(|r| r.candidate.lodging.rating_or_zero())
            .collect();
        assert_eq!(ratings, vec![4.5, 3.5, 0.0]);

        // The cheapest at the destination is the baseline, unrated.
        assert!(results[2].is_baseline);
        assert_eq!(results[0].savings, Some(Savings::Rating(4.5)));
        assert_eq!(results[2].savings, Some(Savings::Rating(0.0)));
    }

    #[test]
    fn baseline_falls_back_to_nearest_group() {
        let candidates = vec![
            candidate(0, "Far", 3_000, 12),
            candidate(0, "Near", 7_000, 4),
            candidate(1, "Near", 6_500, 4),
        ];
        for mode in [RankMode::Price, RankMode::Rating] {
            let results = rank(&candidates, mode, "Dest");
            let baseline: Vec<_> = results.iter().filter(|r| r.is_baseline).collect();
            assert_eq!(baseline.len(), 1);
            assert_eq!(baseline[0].candidate.group, "Near");
            assert_eq!(baseline[0].candidate.lodging.price, 6_500);
        }
    }

    #[test]
    fn cospa_tie_is_nudged_by_a_minute() {
        let mut base = candidate(0, "Dest", 5_000, 0);
        base.walk_minutes = 10;
        let mut cheaper = candidate(0, "Near", 4_000, 10);
        cheaper.fare = Fare::new(300, 300);

        let results = rank(&[base, cheaper], RankMode::Cospa, "Dest");

        assert!(results[0].is_baseline);
        assert_eq!(results[0].saved_money, 0);
        assert_eq!(results[0].extra_time, 0);
        assert_eq!(results[0].cospa_index, 0);

        let other = &results[1];
        assert_eq!(other.saved_money, 400);
        assert_eq!(other.extra_time, 1);
        assert_eq!(other.cospa_index, 400);
    }

    #[test]
    fn cospa_baseline_sorts_first_and_index_descends() {
        let base = candidate(0, "Dest", 10_000, 0);
        let a = candidate(0, "A", 8_000, 10); // 2000 / 10 = 200
        let b = candidate(0, "B", 7_000, 5); // 3000 / 5 = 600
        let c = candidate(0, "C", 12_000, 4); // -2000 / 4 = -500
        let results = rank(&[a, base, c, b], RankMode::Cospa, "Dest");

        let groups: Vec<_> = results.iter().map(|r| r.candidate.group.as_str()).collect();
        assert_eq!(groups, vec!["Dest", "B", "A", "C"]);
        let indices: Vec<_> = results.iter().map(|r| r.cospa_index).collect();
        assert_eq!(indices, vec![0, 600, 200, -500]);
    }

    #[test]
    fn cospa_faster_than_baseline_orders_by_savings() {
        let mut base = candidate(0, "Dest", 10_000, 0);
        base.walk_minutes = 20;
        let mut small = candidate(0, "Small", 9_500, 5); // saves 500, 15 min faster
        small.walk_minutes = 0;
        let mut large = candidate(0, "Large", 7_000, 10); // saves 3000, 10 min faster
        large.walk_minutes = 0;
        let dear = candidate(0, "Dear", 11_000, 8); // costs 1000 more, 12 min faster

        let results = rank(&[dear, small, base, large], RankMode::Cospa, "Dest");

        let groups: Vec<_> = results.iter().map(|r| r.candidate.group.as_str()).collect();
        assert_eq!(groups, vec!["Dest", "Large", "Small", "Dear"]);
        assert!(results[1..].iter().all(|r| r.cospa_index == 0 && r.extra_time < 0));
        let saved: Vec<_> = results.iter().map(|r| r.saved_money).collect();
        assert_eq!(saved, vec![0, 3_000, 500, -1_000]);
    }

    #[test]
    fn cospa_baseline_is_fastest_in_anchor_group() {
        let mut cheap = candidate(0, "Dest", 5_000, 0);
        cheap.walk_minutes = 12;
        let mut close = candidate(1, "Dest", 7_000, 0);
        close.walk_minutes = 2;
        let results = rank(&[cheap, close], RankMode::Cospa, "Dest");

        assert!(results[0].is_baseline);
        assert_eq!(results[0].candidate.lodging.price, 7_000);
        // 2000 saved for 10 extra minutes.
        assert_eq!(results[1].cospa_index, 200);
    }

    #[test]
    fn cospa_rounds_half_up() {
        let base = candidate(0, "Dest", 10_000, 0);
        let up = candidate(0, "Up", 9_995, 2); // 2.5
        let down = candidate(0, "Down", 10_005, 2); // -2.5
        let results = annotate(&[base, up, down], RankMode::Cospa, "Dest");

        assert_eq!(results[1].cospa_index, 3);
        assert_eq!(results[2].cospa_index, -2);
    }

    #[test]
    fn annotate_keeps_insertion_order() {
        let candidates = vec![
            candidate(0, "Near", 9_000, 3),
            candidate(0, "Dest", 6_000, 0),
            candidate(1, "Near", 4_000, 3),
        ];
        let results = annotate(&candidates, RankMode::Price, "Dest");

        let ids: Vec<_> = results.iter().map(|r| &r.candidate.id).collect();
        let expected: Vec<_> = candidates.iter().map(|c| &c.id).collect();
        assert_eq!(ids, expected);
        assert!(results[1].is_baseline);
        assert_eq!(results[2].savings, Some(Savings::Money(2_000)));
    }

    #[test]
    fn mode_switch_recomputes_from_scratch() {
        let candidates = vec![candidate(0, "Dest", 6_000, 0), candidate(0, "Near", 4_000, 3)];
        let cospa = rank(&candidates, RankMode::Cospa, "Dest");
        assert!(cospa.iter().any(|r| r.cospa_index != 0));

        let price = rank(&candidates, RankMode::Price, "Dest");
        assert!(price.iter().all(|r| r.cospa_index == 0 && r.extra_time == 0));
    }

    #[test]
    fn empty_input_has_no_baseline() {
        for mode in [RankMode::Price, RankMode::Rating, RankMode::Cospa] {
            assert!(rank(&[], mode, "Dest").is_empty());
        }
    }
}
