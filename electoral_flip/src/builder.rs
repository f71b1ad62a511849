pub use crate::config::*;

use std::collections::HashSet;

use crate::{run_flip_analysis, FlipReport};

/// A builder for adding unit results.
///
/// Structural problems (a unit seen twice in the same year) are reported
/// as soon as the offending unit is added.
///
/// ```
/// pub use electoral_flip::builder::Builder;
/// pub use electoral_flip::FlipRules;
/// # use electoral_flip::FlipErrors;
///
/// let mut builder = Builder::new(&FlipRules::DEFAULT_RULES)?;
///
/// builder.add_unit_simple(2000, "FL", 2912253, 2912790, 138067, 25)?;
/// builder.add_unit_simple(2000, "NH", 266348, 273559, 22198, 4)?;
///
/// let report = builder.run()?;
/// assert_eq!(report.summary_rows().len(), 1);
///
/// # Ok::<(), FlipErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: FlipRules,
    pub(crate) _units: Vec<UnitResult>,
    _seen: HashSet<(u32, String)>,
}

impl Builder {
    pub fn new(rules: &FlipRules) -> Result<Builder, FlipErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _units: Vec::new(),
            _seen: HashSet::new(),
        })
    }

    /// Adds a unit whose total is the sum of the three buckets.
    pub fn add_unit_simple(
        &mut self,
        year: u32,
        abbr: &str,
        d_votes: u64,
        r_votes: u64,
        t_votes: u64,
        electoral_votes: u32,
    ) -> Result<(), FlipErrors> {
        let total_votes = d_votes
            .checked_add(r_votes)
            .and_then(|x| x.checked_add(t_votes))
            .ok_or_else(|| FlipErrors::VotesOutOfRange {
                year,
                abbr: abbr.to_string(),
            })?;
        self.add_unit(&UnitResult {
            year,
            abbr: abbr.to_string(),
            d_votes,
            r_votes,
            t_votes,
            total_votes,
            electoral_votes,
        })
    }

    pub fn add_unit(&mut self, unit: &UnitResult) -> Result<(), FlipErrors> {
        if unit.abbr.trim().is_empty() {
            return Err(FlipErrors::EmptyUnitName { year: unit.year });
        }
        if !self._seen.insert((unit.year, unit.abbr.clone())) {
            return Err(FlipErrors::DuplicateUnit {
                year: unit.year,
                abbr: unit.abbr.clone(),
            });
        }
        self._units.push(unit.clone());
        Ok(())
    }

    pub fn units(&self) -> &[UnitResult] {
        &self._units
    }

    pub fn run(&self) -> Result<FlipReport, FlipErrors> {
        run_flip_analysis(&self._units, &self._rules)
    }
}
