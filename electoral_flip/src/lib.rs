mod config;
pub mod builder;
pub mod knapsack;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeMap, HashMap, HashSet};

pub use crate::config::*;
pub use crate::knapsack::{efficiency_order, minimize_flips};

// **** Unit classification ****

/// Finds the winning bucket of a unit, with the votes of the winner and of the runner-up.
///
/// Exact ties are resolved in favor of D, then R, then O.
pub fn classify_unit(d_votes: u64, r_votes: u64, t_votes: u64) -> Classification {
    if d_votes >= r_votes && d_votes >= t_votes {
        Classification {
            winner: Party::Democratic,
            winner_votes: d_votes,
            runner_up_votes: r_votes.max(t_votes),
        }
    } else if r_votes >= d_votes && r_votes >= t_votes {
        Classification {
            winner: Party::Republican,
            winner_votes: r_votes,
            runner_up_votes: d_votes.max(t_votes),
        }
    } else {
        Classification {
            winner: Party::Other,
            winner_votes: t_votes,
            runner_up_votes: d_votes.max(r_votes),
        }
    }
}

pub fn classify(unit: &UnitResult) -> ClassifiedUnit {
    ClassifiedUnit {
        unit: unit.clone(),
        classification: classify_unit(unit.d_votes, unit.r_votes, unit.t_votes),
    }
}

// **** Year aggregation ****

pub fn majority_threshold(total_ev: u32, rule: MajorityRule) -> u32 {
    match rule {
        MajorityRule::HalfPlusOne => total_ev / 2 + 1,
        MajorityRule::Fixed(x) => x,
    }
}

/// Electoral votes won by each party, the national winner and the runner-up.
///
/// Ties between parties go to D, then R, then O. When neither of the two other
/// parties won any electoral vote, the runner-up is whichever of D and R did not win.
pub fn summarize_year(year: u32, units: &[ClassifiedUnit], rules: &FlipRules) -> YearSummary {
    let mut ev_by_party: [u32; 3] = [0; 3];
    let mut total_ev: u32 = 0;
    for cu in units.iter() {
        let ev = cu.unit.electoral_votes;
        total_ev = total_ev.saturating_add(ev);
        let slot = &mut ev_by_party[cu.classification.winner.index()];
        *slot = slot.saturating_add(ev);
    }

    let winner_party = top_party(&ev_by_party, None);
    let winner_ev = ev_by_party[winner_party.index()];

    let runner_candidate = top_party(&ev_by_party, Some(winner_party));
    let (runner_party, runner_ev) = if ev_by_party[runner_candidate.index()] > 0 {
        (runner_candidate, ev_by_party[runner_candidate.index()])
    } else if winner_party == Party::Democratic {
        (Party::Republican, 0)
    } else {
        (Party::Democratic, 0)
    };

    YearSummary {
        year,
        total_ev,
        ev_by_party,
        winner_party,
        winner_ev,
        runner_party,
        runner_ev,
        majority_threshold: majority_threshold(total_ev, rules.majority_rule),
    }
}

fn top_party(ev_by_party: &[u32; 3], excluded: Option<Party>) -> Party {
    let mut best: Option<Party> = None;
    for p in Party::ALL {
        if Some(p) == excluded {
            continue;
        }
        match best {
            Some(b) if ev_by_party[p.index()] <= ev_by_party[b.index()] => {}
            _ => best = Some(p),
        }
    }
    // There are always at least two parties to pick from.
    best.unwrap_or(Party::Democratic)
}

// **** Flip costs ****

/// The smallest number of votes to move from the winner of the unit to its
/// runner-up for the runner-up to come out strictly ahead.
///
/// This uses the margin against the local runner-up, even when a scenario
/// hands the unit to another party. In three-way races this underestimates
/// the cost of flipping to a party that came third locally.
pub fn votes_to_flip(c: &Classification) -> u64 {
    (c.winner_votes - c.runner_up_votes) / 2 + 1
}

/// The units offered to the knapsack for a mode, in input order.
///
/// * classic: every unit not already held by the runner-up.
/// * no_majority: only the units held by the winner.
///
/// Units without electoral votes are never offered.
pub fn flip_candidates(
    units: &[ClassifiedUnit],
    summary: &YearSummary,
    mode: FlipMode,
) -> Vec<FlipCandidate> {
    units
        .iter()
        .filter(|cu| cu.unit.electoral_votes > 0)
        .filter(|cu| match mode {
            FlipMode::Classic => cu.classification.winner != summary.runner_party,
            FlipMode::NoMajority => cu.classification.winner == summary.winner_party,
        })
        .map(|cu| FlipCandidate {
            abbr: cu.unit.abbr.clone(),
            electoral_votes: cu.unit.electoral_votes,
            votes_to_flip: votes_to_flip(&cu.classification),
            total_votes: cu.unit.total_votes,
            current_winner: cu.classification.winner,
        })
        .collect()
}

/// The electoral votes that need to change hands for a mode.
pub fn target_ev(summary: &YearSummary, mode: FlipMode) -> u32 {
    match mode {
        FlipMode::Classic => summary
            .majority_threshold
            .saturating_sub(summary.runner_ev),
        FlipMode::NoMajority => summary
            .winner_ev
            .saturating_sub(summary.majority_threshold.saturating_sub(1)),
    }
}

// **** Orchestration ****

/// Runs both scenarios for the units of a single year.
///
/// The units are expected to all belong to `year` and to have distinct identifiers.
pub fn analyze_year(year: u32, units: &[UnitResult], rules: &FlipRules) -> YearAnalysis {
    let classified: Vec<ClassifiedUnit> = units.iter().map(classify).collect();
    let summary = summarize_year(year, &classified, rules);
    let total_popular_votes: u64 = units
        .iter()
        .fold(0u64, |acc, u| acc.saturating_add(u.total_votes));
    debug!("analyze_year: {} summary: {:?}", year, summary);

    let run_mode = |mode: FlipMode| -> FlipSolution {
        let cands = flip_candidates(&classified, &summary, mode);
        let target = target_ev(&summary, mode);
        debug!(
            "analyze_year: {} {}: {} candidates, target {} ev",
            year,
            mode,
            cands.len(),
            target
        );
        minimize_flips(&cands, target)
    };
    let classic = run_mode(FlipMode::Classic);
    let no_majority = run_mode(FlipMode::NoMajority);

    info!(
        "Year {}: {} {} - {} {} (need {}), classic: {} votes in {} units, no majority: {} votes in {} units",
        year,
        summary.winner_party,
        summary.winner_ev,
        summary.runner_party,
        summary.runner_ev,
        summary.majority_threshold,
        classic.min_votes(),
        classic.chosen_units.len(),
        no_majority.min_votes(),
        no_majority.chosen_units.len()
    );

    YearAnalysis {
        summary,
        total_popular_votes,
        classic,
        no_majority,
    }
}

/// The electoral votes of the winner and of the runner-up once the flips of a
/// solution are applied, every flipped unit going to the runner-up.
pub fn tally_after_flips(summary: &YearSummary, solution: &FlipSolution) -> (u32, u32) {
    let lost_by_winner: u32 = solution
        .chosen_units
        .iter()
        .filter(|c| c.current_winner == summary.winner_party)
        .map(|c| c.electoral_votes)
        .sum();
    (
        summary.winner_ev - lost_by_winner,
        summary.runner_ev + solution.achieved_ev,
    )
}

/// The votes moved by a scenario as a percentage of all the votes cast that year.
pub fn pct_of_national_votes(analysis: &YearAnalysis, mode: FlipMode, decimals: u32) -> f64 {
    match analysis.solution(mode).total_cost {
        Some(cost) if analysis.total_popular_votes > 0 => round_to(
            100.0 * (cost as f64) / (analysis.total_popular_votes as f64),
            decimals,
        ),
        _ => 0.0,
    }
}

/// The results for all the years, in ascending year order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlipReport {
    pub years: Vec<YearAnalysis>,
    pub rules: FlipRules,
}

impl FlipReport {
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.years
            .iter()
            .map(|ya| {
                let s = &ya.summary;
                SummaryRow {
                    year: s.year,
                    winner_party: s.winner_party,
                    winner_ev: s.winner_ev,
                    runner_party: s.runner_party,
                    runner_ev: s.runner_ev,
                    need: s.majority_threshold,
                    classic_min_votes: ya.classic.min_votes(),
                    classic_ev: ya.classic.achieved_ev,
                    classic_states: ya.classic.chosen_units.len(),
                    no_majority_min_votes: ya.no_majority.min_votes(),
                    no_majority_ev: ya.no_majority.achieved_ev,
                    no_majority_states: ya.no_majority.chosen_units.len(),
                    total_ev: s.total_ev,
                }
            })
            .collect()
    }

    /// The chosen units, year by year, classic mode first.
    pub fn detail_rows(&self) -> Vec<DetailRow> {
        let mut res: Vec<DetailRow> = Vec::new();
        for ya in self.years.iter() {
            for mode in FlipMode::ALL {
                for c in ya.solution(mode).chosen_units.iter() {
                    res.push(DetailRow {
                        year: ya.summary.year,
                        mode,
                        abbr: c.abbr.clone(),
                        ev: c.electoral_votes,
                        votes_to_flip: c.votes_to_flip,
                        pct_of_state_votes: c.pct_of_unit_votes(self.rules.pct_decimals),
                    });
                }
            }
        }
        res
    }
}

/// Checks the structural soundness of the input: every unit has an identifier,
/// no identifier appears twice in the same year, and the totals of each year
/// stay within range.
pub fn check_units(units: &[UnitResult]) -> Result<(), FlipErrors> {
    let mut seen: HashSet<(u32, &str)> = HashSet::new();
    // year -> (electoral votes, popular votes)
    let mut totals: HashMap<u32, (u64, u64)> = HashMap::new();
    for u in units.iter() {
        let (ev, votes) = totals.entry(u.year).or_insert((0, 0));
        *ev += u.electoral_votes as u64;
        if *ev > MAX_ELECTORAL_VOTES {
            return Err(FlipErrors::ElectoralVotesOutOfRange {
                year: u.year,
                total: *ev,
            });
        }
        *votes = match votes.checked_add(u.total_votes) {
            Some(x) => x,
            None => {
                return Err(FlipErrors::VotesOutOfRange {
                    year: u.year,
                    abbr: u.abbr.clone(),
                })
            }
        };
        if u.abbr.trim().is_empty() {
            return Err(FlipErrors::EmptyUnitName { year: u.year });
        }
        if !seen.insert((u.year, u.abbr.as_str())) {
            return Err(FlipErrors::DuplicateUnit {
                year: u.year,
                abbr: u.abbr.clone(),
            });
        }
    }
    Ok(())
}

/// Runs the flip analysis for every year present in the units.
///
/// Arguments:
/// * `units` the results of all the units, for any number of years, in any order
/// * `rules` the parameters of the analysis
///
/// Fails without computing anything if the input is structurally unsound.
pub fn run_flip_analysis(
    units: &[UnitResult],
    rules: &FlipRules,
) -> Result<FlipReport, FlipErrors> {
    info!(
        "Processing {:?} units, rules: {:?}",
        units.len(),
        rules
    );
    check_units(units)?;

    let mut by_year: BTreeMap<u32, Vec<UnitResult>> = BTreeMap::new();
    for u in units.iter() {
        by_year.entry(u.year).or_default().push(u.clone());
    }

    let years: Vec<YearAnalysis> = by_year
        .iter()
        .map(|(year, year_units)| analyze_year(*year, year_units, rules))
        .collect();
    Ok(FlipReport {
        years,
        rules: rules.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn unit(year: u32, abbr: &str, d: u64, r: u64, t: u64, ev: u32) -> UnitResult {
        UnitResult {
            year,
            abbr: abbr.to_string(),
            d_votes: d,
            r_votes: r,
            t_votes: t,
            total_votes: d + r + t,
            electoral_votes: ev,
        }
    }

    #[test]
    fn classifier_priority() {
        let c = classify_unit(10, 5, 3);
        assert_eq!(c.winner, Party::Democratic);
        assert_eq!((c.winner_votes, c.runner_up_votes), (10, 5));

        let c = classify_unit(4, 9, 7);
        assert_eq!(c.winner, Party::Republican);
        assert_eq!((c.winner_votes, c.runner_up_votes), (9, 7));

        let c = classify_unit(4, 9, 12);
        assert_eq!(c.winner, Party::Other);
        assert_eq!((c.winner_votes, c.runner_up_votes), (12, 9));
    }

    #[test]
    fn classifier_ties() {
        assert_eq!(classify_unit(5, 5, 5).winner, Party::Democratic);
        assert_eq!(classify_unit(5, 5, 1).winner, Party::Democratic);
        assert_eq!(classify_unit(1, 5, 5).winner, Party::Republican);
        assert_eq!(classify_unit(5, 1, 5).winner, Party::Democratic);
        assert_eq!(classify_unit(0, 0, 0).winner, Party::Democratic);
        let c = classify_unit(7, 7, 0);
        assert_eq!((c.winner_votes, c.runner_up_votes), (7, 7));
        assert_eq!(votes_to_flip(&c), 1);
    }

    #[test]
    fn classifier_consistency() {
        for d in 0..6u64 {
            for r in 0..6u64 {
                for t in 0..6u64 {
                    let c = classify_unit(d, r, t);
                    assert!(c.winner_votes >= c.runner_up_votes);
                    let expected = if d >= r && d >= t {
                        Party::Democratic
                    } else if r >= t {
                        Party::Republican
                    } else {
                        Party::Other
                    };
                    assert_eq!(c.winner, expected, "{} {} {}", d, r, t);
                    let mut all = vec![d, r, t];
                    all.sort_unstable();
                    assert_eq!((c.winner_votes, c.runner_up_votes), (all[2], all[1]));
                }
            }
        }
    }

    #[test]
    fn flip_cost_formula() {
        assert_eq!(votes_to_flip(&classify_unit(100, 90, 0)), 6);
        assert_eq!(votes_to_flip(&classify_unit(100, 91, 0)), 5);
        assert_eq!(votes_to_flip(&classify_unit(0, 0, 0)), 1);
        // Three-way race: the margin is against the local runner-up.
        assert_eq!(votes_to_flip(&classify_unit(10, 100, 80)), 11);
    }

    #[test]
    fn majority_arithmetic() {
        assert_eq!(majority_threshold(538, MajorityRule::HalfPlusOne), 270);
        assert_eq!(majority_threshold(537, MajorityRule::HalfPlusOne), 269);
        assert_eq!(majority_threshold(0, MajorityRule::HalfPlusOne), 1);
        assert_eq!(majority_threshold(531, MajorityRule::Fixed(270)), 270);
    }

    #[test]
    fn summary_of_a_year() {
        let units: Vec<ClassifiedUnit> = vec![
            unit(2000, "A", 10, 20, 0, 10),
            unit(2000, "B", 20, 10, 0, 7),
            unit(2000, "C", 1, 2, 30, 4),
            unit(2000, "D", 1, 50, 0, 0),
        ]
        .iter()
        .map(classify)
        .collect();
        let s = summarize_year(2000, &units, &FlipRules::DEFAULT_RULES);
        assert_eq!(s.total_ev, 21);
        assert_eq!(s.ev_by_party, [7, 10, 4]);
        assert_eq!((s.winner_party, s.winner_ev), (Party::Republican, 10));
        assert_eq!((s.runner_party, s.runner_ev), (Party::Democratic, 7));
        assert_eq!(s.majority_threshold, 11);
        assert_eq!(s.ev_of(Party::Other), 4);
    }

    #[test]
    fn summary_default_runner() {
        let rules = FlipRules::DEFAULT_RULES;
        let units: Vec<ClassifiedUnit> = vec![unit(1820, "A", 5, 0, 0, 3)]
            .iter()
            .map(classify)
            .collect();
        let s = summarize_year(1820, &units, &rules);
        assert_eq!((s.winner_party, s.runner_party, s.runner_ev), (Party::Democratic, Party::Republican, 0));

        let units: Vec<ClassifiedUnit> = vec![unit(1820, "A", 0, 5, 0, 3), unit(1820, "B", 0, 0, 9, 0)]
            .iter()
            .map(classify)
            .collect();
        let s = summarize_year(1820, &units, &rules);
        assert_eq!((s.winner_party, s.runner_party, s.runner_ev), (Party::Republican, Party::Democratic, 0));

        let units: Vec<ClassifiedUnit> = vec![unit(1912, "A", 0, 0, 5, 3)]
            .iter()
            .map(classify)
            .collect();
        let s = summarize_year(1912, &units, &rules);
        assert_eq!((s.winner_party, s.runner_party), (Party::Other, Party::Democratic));
    }

    #[test]
    fn summary_party_ties() {
        let units: Vec<ClassifiedUnit> = vec![unit(1, "A", 0, 9, 0, 5), unit(1, "B", 9, 0, 0, 5)]
            .iter()
            .map(classify)
            .collect();
        let s = summarize_year(1, &units, &FlipRules::DEFAULT_RULES);
        assert_eq!((s.winner_party, s.runner_party), (Party::Democratic, Party::Republican));
        assert_eq!((s.winner_ev, s.runner_ev, s.majority_threshold), (5, 5, 6));
    }

    #[test]
    fn candidate_sets() {
        let units: Vec<ClassifiedUnit> = vec![
            unit(2000, "A", 10, 20, 0, 10),
            unit(2000, "B", 20, 10, 0, 7),
            unit(2000, "C", 1, 2, 30, 4),
            unit(2000, "D", 1, 50, 0, 0),
        ]
        .iter()
        .map(classify)
        .collect();
        let s = summarize_year(2000, &units, &FlipRules::DEFAULT_RULES);

        let classic = flip_candidates(&units, &s, FlipMode::Classic);
        let names: Vec<&str> = classic.iter().map(|c| c.abbr.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(classic[0].votes_to_flip, 6);
        assert_eq!(classic[1].current_winner, Party::Other);

        let no_maj = flip_candidates(&units, &s, FlipMode::NoMajority);
        let names: Vec<&str> = no_maj.iter().map(|c| c.abbr.as_str()).collect();
        assert_eq!(names, vec!["A"]);

        assert_eq!(target_ev(&s, FlipMode::Classic), 4);
        assert_eq!(target_ev(&s, FlipMode::NoMajority), 0);
    }

    #[test]
    fn two_party_year() {
        init();
        let units = vec![
            unit(2016, "AA", 100, 110, 5, 10),
            unit(2016, "BB", 100, 104, 0, 6),
            unit(2016, "CC", 200, 100, 0, 8),
            unit(2016, "DD", 50, 60, 0, 4),
        ];
        let ya = analyze_year(2016, &units, &FlipRules::DEFAULT_RULES);
        let s = &ya.summary;
        assert_eq!((s.winner_party, s.winner_ev), (Party::Republican, 20));
        assert_eq!((s.runner_party, s.runner_ev), (Party::Democratic, 8));
        assert_eq!(s.majority_threshold, 15);
        assert_eq!(ya.total_popular_votes, 215 + 204 + 300 + 110);

        // Needs 7 more: AA costs 6, BB costs 3, DD costs 6.
        assert_eq!(ya.classic.target_ev, 7);
        assert_eq!(ya.classic.total_cost, Some(6));
        assert_eq!(ya.classic.achieved_ev, 10);
        // Needs 6 away from the winner: BB alone does it.
        assert_eq!(ya.no_majority.target_ev, 6);
        assert_eq!(ya.no_majority.total_cost, Some(3));
        let names: Vec<&str> = ya
            .no_majority
            .chosen_units
            .iter()
            .map(|c| c.abbr.as_str())
            .collect();
        assert_eq!(names, vec!["BB"]);

        assert_eq!(tally_after_flips(s, &ya.classic), (10, 18));
        assert_eq!(tally_after_flips(s, &ya.no_majority), (14, 14));
        assert_eq!(pct_of_national_votes(&ya, FlipMode::Classic, 3), 0.724);
    }

    #[test]
    fn degenerate_years() {
        let ya = analyze_year(1788, &[], &FlipRules::DEFAULT_RULES);
        assert_eq!(ya.summary.total_ev, 0);
        assert_eq!(ya.summary.majority_threshold, 1);
        // The runner-up needs one elector but there is nothing to flip.
        assert_eq!(ya.classic.min_votes(), -1);
        assert_eq!(ya.no_majority.min_votes(), 0);

        let units = vec![unit(1789, "A", 10, 0, 0, 0)];
        let ya = analyze_year(1789, &units, &FlipRules::DEFAULT_RULES);
        assert_eq!(ya.no_majority.total_cost, Some(0));
        assert!(ya.no_majority.chosen_units.is_empty());
    }

    #[test]
    fn report_rows() {
        init();
        let units = vec![
            unit(2020, "AA", 100, 110, 0, 10),
            unit(2016, "BB", 100, 104, 0, 6),
            unit(2016, "CC", 200, 100, 0, 8),
            unit(2020, "BB", 0, 0, 0, 6),
            unit(2016, "DD", 50, 60, 0, 4),
        ];
        let report = run_flip_analysis(&units, &FlipRules::DEFAULT_RULES).unwrap();
        let years: Vec<u32> = report.years.iter().map(|y| y.summary.year).collect();
        assert_eq!(years, vec![2016, 2020]);

        let rows = report.summary_rows();
        assert_eq!(rows.len(), 2);
        let r = &rows[0];
        assert_eq!((r.winner_party, r.winner_ev), (Party::Republican, 10));
        assert_eq!((r.runner_party, r.runner_ev), (Party::Democratic, 8));
        assert_eq!(r.need, 10);
        assert_eq!(r.total_ev, 18);
        assert_eq!((r.classic_min_votes, r.classic_ev, r.classic_states), (3, 6, 1));
        assert_eq!((r.no_majority_min_votes, r.no_majority_ev), (3, 6));

        let details = report.detail_rows();
        for d in details.iter() {
            assert!(d.pct_of_state_votes >= 0.0);
        }
        assert_eq!(
            details.iter().filter(|d| d.year == 2016).count(),
            r.classic_states + r.no_majority_states
        );
        let first = &details[0];
        assert_eq!(first.mode, FlipMode::Classic);
    }

    #[test]
    fn percentages() {
        let c = FlipCandidate {
            abbr: "X".to_string(),
            electoral_votes: 3,
            votes_to_flip: 1,
            total_votes: 3,
            current_winner: Party::Democratic,
        };
        assert_eq!(c.pct_of_unit_votes(3), 33.333);
        // Exact ties round to the even digit.
        let c1600 = FlipCandidate {
            total_votes: 1600,
            ..c.clone()
        };
        assert_eq!(c1600.pct_of_unit_votes(3), 0.062);
        let c800 = FlipCandidate {
            total_votes: 800,
            ..c.clone()
        };
        assert_eq!(c800.pct_of_unit_votes(3), 0.125);
        assert_eq!(c800.pct_of_unit_votes(2), 0.12);
        let c = FlipCandidate {
            total_votes: 0,
            ..c
        };
        assert_eq!(c.pct_of_unit_votes(3), 0.0);
    }

    #[test]
    fn duplicate_units_are_fatal() {
        let units = vec![unit(2020, "OH", 1, 2, 0, 18), unit(2020, "OH", 3, 2, 0, 18)];
        let res = run_flip_analysis(&units, &FlipRules::DEFAULT_RULES);
        assert_eq!(
            res,
            Err(FlipErrors::DuplicateUnit {
                year: 2020,
                abbr: "OH".to_string()
            })
        );
        // Same name in different years is fine.
        let units = vec![unit(2016, "OH", 1, 2, 0, 18), unit(2020, "OH", 3, 2, 0, 18)];
        assert!(run_flip_analysis(&units, &FlipRules::DEFAULT_RULES).is_ok());

        let units = vec![unit(2020, " ", 1, 2, 0, 18)];
        assert_eq!(
            run_flip_analysis(&units, &FlipRules::DEFAULT_RULES),
            Err(FlipErrors::EmptyUnitName { year: 2020 })
        );
    }

    #[test]
    fn oversized_years_are_fatal() {
        let units = vec![
            unit(2020, "AA", 1, 2, 0, 3_000_000_000),
            unit(2020, "BB", 2, 1, 0, 3_000_000_000),
        ];
        assert_eq!(
            run_flip_analysis(&units, &FlipRules::DEFAULT_RULES),
            Err(FlipErrors::ElectoralVotesOutOfRange {
                year: 2020,
                total: 3_000_000_000
            })
        );
        // Within u32, but too large for the minimizer.
        let units = vec![unit(2020, "AA", 1, 2, 0, 1_000_000_000)];
        assert!(matches!(
            run_flip_analysis(&units, &FlipRules::DEFAULT_RULES),
            Err(FlipErrors::ElectoralVotesOutOfRange { year: 2020, .. })
        ));
        // The limit applies per year.
        let units = vec![
            unit(2016, "AA", 1, 2, 0, 60_000),
            unit(2020, "AA", 2, 1, 0, 60_000),
        ];
        assert!(run_flip_analysis(&units, &FlipRules::DEFAULT_RULES).is_ok());

        let mut big = unit(2020, "BB", 2, 1, 0, 3);
        big.total_votes = u64::MAX;
        let units = vec![unit(2020, "AA", 1, 2, 0, 3), big];
        assert_eq!(
            run_flip_analysis(&units, &FlipRules::DEFAULT_RULES),
            Err(FlipErrors::VotesOutOfRange {
                year: 2020,
                abbr: "BB".to_string()
            })
        );
    }

    #[test]
    fn summaries_saturate() {
        let units = vec![
            unit(2020, "AA", 1, 2, 0, u32::MAX),
            unit(2020, "BB", 1, 2, 0, 5),
        ];
        let classified: Vec<ClassifiedUnit> = units.iter().map(classify).collect();
        let s = summarize_year(2020, &classified, &FlipRules::DEFAULT_RULES);
        assert_eq!(s.total_ev, u32::MAX);
        assert_eq!(s.winner_ev, u32::MAX);
    }

    #[test]
    fn reproducible() {
        let units = vec![
            unit(2000, "A", 10, 12, 0, 3),
            unit(2000, "B", 10, 12, 0, 3),
            unit(2000, "C", 10, 12, 0, 3),
            unit(2000, "D", 50, 12, 0, 5),
        ];
        let r1 = run_flip_analysis(&units, &FlipRules::DEFAULT_RULES).unwrap();
        let mut rev = units.clone();
        rev.reverse();
        let r2 = run_flip_analysis(&rev, &FlipRules::DEFAULT_RULES).unwrap();
        assert_eq!(r1.summary_rows(), r2.summary_rows());
        assert_eq!(r1.detail_rows(), r2.detail_rows());
    }
}
