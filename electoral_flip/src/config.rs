// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The three vote buckets tracked for every unit.
///
/// The declaration order (D, R, O) is also the order used to break exact ties,
/// both when picking the winner of a unit and when ranking parties by electoral votes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Party {
    Democratic,
    Republican,
    /// All the third-party and write-in votes.
    Other,
}

impl Party {
    /// All the parties, in tie-break order.
    pub const ALL: [Party; 3] = [Party::Democratic, Party::Republican, Party::Other];

    /// The one-letter code used in the output tables.
    pub fn code(&self) -> &'static str {
        match self {
            Party::Democratic => "D",
            Party::Republican => "R",
            Party::Other => "O",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Party::Democratic => 0,
            Party::Republican => 1,
            Party::Other => 2,
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The result of one electoral unit (a state, or a congressional district
/// for the states that split their electoral votes) for one election year.
///
/// `total_votes` is taken as given and not re-derived from the three buckets:
/// upstream totals may include ballots that were not counted for any bucket.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnitResult {
    pub year: u32,
    pub abbr: String,
    pub d_votes: u64,
    pub r_votes: u64,
    pub t_votes: u64,
    pub total_votes: u64,
    pub electoral_votes: u32,
}

// ******** Output data structures *********

/// The outcome of a single unit.
///
/// Invariant: `winner_votes >= runner_up_votes`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Classification {
    pub winner: Party,
    pub winner_votes: u64,
    pub runner_up_votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ClassifiedUnit {
    pub unit: UnitResult,
    pub classification: Classification,
}

/// The electoral bookkeeping of one year.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearSummary {
    pub year: u32,
    pub total_ev: u32,
    /// Indexed in the order of `Party::ALL`.
    pub ev_by_party: [u32; 3],
    pub winner_party: Party,
    pub winner_ev: u32,
    pub runner_party: Party,
    pub runner_ev: u32,
    pub majority_threshold: u32,
}

impl YearSummary {
    pub fn ev_of(&self, party: Party) -> u32 {
        self.ev_by_party[party.index()]
    }
}

/// The two counterfactual scenarios.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum FlipMode {
    /// Flip enough units to the runner-up for it to reach a majority.
    Classic,
    /// Take enough units away from the winner for nobody to hold a majority.
    NoMajority,
}

impl FlipMode {
    pub const ALL: [FlipMode; 2] = [FlipMode::Classic, FlipMode::NoMajority];

    pub fn label(&self) -> &'static str {
        match self {
            FlipMode::Classic => "classic",
            FlipMode::NoMajority => "no_majority",
        }
    }
}

impl Display for FlipMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A unit offered to the knapsack for a given mode.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlipCandidate {
    pub abbr: String,
    pub electoral_votes: u32,
    pub votes_to_flip: u64,
    pub total_votes: u64,
    pub current_winner: Party,
}

impl FlipCandidate {
    /// The share of the unit's own votes that would need to move, in percent.
    ///
    /// Returns 0.0 when the unit has no recorded votes.
    pub fn pct_of_unit_votes(&self, decimals: u32) -> f64 {
        if self.total_votes == 0 {
            return 0.0;
        }
        let pct = 100.0 * (self.votes_to_flip as f64) / (self.total_votes as f64);
        round_to(pct, decimals)
    }
}

/// The cheapest set of flips found for one year and one mode.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlipSolution {
    /// The requested electoral votes (after clamping at zero).
    pub target_ev: u32,
    /// `None` when the target cannot be reached with the candidates on offer.
    pub total_cost: Option<u64>,
    /// The electoral votes delivered by `chosen_units`. It can overshoot the target.
    pub achieved_ev: u32,
    pub chosen_units: Vec<FlipCandidate>,
}

impl FlipSolution {
    pub fn is_reachable(&self) -> bool {
        self.total_cost.is_some()
    }

    /// The cost as written in the output tables: -1 stands for an unreachable target.
    pub fn min_votes(&self) -> i64 {
        match self.total_cost {
            Some(c) => c as i64,
            None => -1,
        }
    }
}

/// Everything computed for one year.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearAnalysis {
    pub summary: YearSummary,
    /// Sum of `total_votes` over all the units of the year.
    pub total_popular_votes: u64,
    pub classic: FlipSolution,
    pub no_majority: FlipSolution,
}

impl YearAnalysis {
    pub fn solution(&self, mode: FlipMode) -> &FlipSolution {
        match mode {
            FlipMode::Classic => &self.classic,
            FlipMode::NoMajority => &self.no_majority,
        }
    }
}

/// One row of the summary table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryRow {
    pub year: u32,
    pub winner_party: Party,
    pub winner_ev: u32,
    pub runner_party: Party,
    pub runner_ev: u32,
    pub need: u32,
    pub classic_min_votes: i64,
    pub classic_ev: u32,
    pub classic_states: usize,
    pub no_majority_min_votes: i64,
    pub no_majority_ev: u32,
    pub no_majority_states: usize,
    pub total_ev: u32,
}

/// One row of the detail table.
#[derive(PartialEq, Debug, Clone)]
pub struct DetailRow {
    pub year: u32,
    pub mode: FlipMode,
    pub abbr: String,
    pub ev: u32,
    pub votes_to_flip: u64,
    pub pct_of_state_votes: f64,
}

/// Errors that prevent the analysis from running at all.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FlipErrors {
    /// The same unit appears twice in the same year.
    DuplicateUnit { year: u32, abbr: String },
    /// A unit without an identifier.
    EmptyUnitName { year: u32 },
    /// The electoral votes of a year add up to more than `MAX_ELECTORAL_VOTES`.
    ElectoralVotesOutOfRange { year: u32, total: u64 },
    /// The popular votes of a unit or of a year do not fit in a count.
    VotesOutOfRange { year: u32, abbr: String },
}

/// Upper bound on the electoral votes of a single year. The minimizer allocates
/// tables proportional to this number.
pub const MAX_ELECTORAL_VOTES: u64 = 100_000;

impl Error for FlipErrors {}

impl Display for FlipErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlipErrors::DuplicateUnit { year, abbr } => {
                write!(f, "unit {} appears more than once in year {}", abbr, year)
            }
            FlipErrors::EmptyUnitName { year } => {
                write!(f, "a unit of year {} has an empty identifier", year)
            }
            FlipErrors::ElectoralVotesOutOfRange { year, total } => write!(
                f,
                "year {} has {} electoral votes, more than the {} supported",
                year, total, MAX_ELECTORAL_VOTES
            ),
            FlipErrors::VotesOutOfRange { year, abbr } => {
                write!(f, "too many popular votes for unit {} in year {}", abbr, year)
            }
        }
    }
}

// ********* Configuration **********

/// How many electoral votes constitute a majority.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MajorityRule {
    /// `floor(total_ev / 2) + 1`, recomputed for every year.
    HalfPlusOne,
    /// The same threshold for every year, whatever the total.
    Fixed(u32),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FlipRules {
    pub majority_rule: MajorityRule,
    /// Decimal places kept in the percentages of the detail table.
    pub pct_decimals: u32,
}

impl FlipRules {
    pub const DEFAULT_RULES: FlipRules = FlipRules {
        majority_rule: MajorityRule::HalfPlusOne,
        pct_decimals: 3,
    };
}

/// Rounds to a number of decimal places on the exact binary value, ties to even.
/// 0.0625 becomes 0.062, not 0.063.
pub(crate) fn round_to(x: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, x)
        .parse()
        .unwrap_or_else(|_| {
            let scale = 10f64.powi(decimals as i32);
            (x * scale).round_ties_even() / scale
        })
}
