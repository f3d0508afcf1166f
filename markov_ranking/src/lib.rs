mod config;
mod matrix;
mod stationary;

pub mod builder;
pub mod manual;
pub mod quick_start;

use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

// **** Private structures ****

/// Position of an option in the first ranking of the table.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct OptionId(usize);

/// The option set shared by all the rankings, as declared by the first one.
#[derive(Eq, PartialEq, Debug, Clone)]
struct OptionIndex {
    names: Vec<String>,
    ids: HashMap<String, OptionId>,
}

impl OptionIndex {
    /// Builds the option set out of the first ranking, which must not contain duplicates
    /// or unnamed options.
    fn from_first(first: &[String]) -> Result<OptionIndex, RankingErrors> {
        if first.is_empty() {
            return Err(RankingErrors::EmptyInput);
        }
        let mut ids: HashMap<String, OptionId> = HashMap::new();
        for (idx, name) in first.iter().enumerate() {
            if is_blank(name) {
                return Err(RankingErrors::RowContentMismatch {
                    row: 0,
                    name: name.clone(),
                });
            }
            if ids.insert(name.clone(), OptionId(idx)).is_some() {
                return Err(RankingErrors::InconsistentRanking {
                    row: 0,
                    name: name.clone(),
                });
            }
        }
        Ok(OptionIndex {
            names: first.to_vec(),
            ids,
        })
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    /// Converts a ranking into option ids, checking that it is a permutation of the option set.
    ///
    /// The duplicate check is done for every row, and does not rely on the length check.
    fn encode(&self, row: usize, order: &[String]) -> Result<Vec<OptionId>, RankingErrors> {
        if order.len() != self.len() {
            return Err(RankingErrors::RowLengthMismatch {
                row,
                expected: self.len(),
                found: order.len(),
            });
        }
        let mut seen: HashSet<OptionId> = HashSet::new();
        let mut res: Vec<OptionId> = Vec::with_capacity(order.len());
        for name in order.iter() {
            let oid = *self
                .ids
                .get(name)
                .filter(|_| !is_blank(name))
                .ok_or_else(|| RankingErrors::RowContentMismatch {
                    row,
                    name: name.clone(),
                })?;
            if !seen.insert(oid) {
                return Err(RankingErrors::InconsistentRanking {
                    row,
                    name: name.clone(),
                });
            }
            res.push(oid);
        }
        Ok(res)
    }
}

// A blank cell in a survey export is a missing choice, never an option.
fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

struct CheckResult {
    options: OptionIndex,
    orders: Vec<Vec<OptionId>>,
}

// Rows are numbered from 0, in the order of the table.
fn checks(table: &[PreferenceOrder]) -> Result<CheckResult, RankingErrors> {
    debug!("checks: table size: {:?}", table.len());
    let first = table.first().ok_or(RankingErrors::EmptyInput)?;
    let options = OptionIndex::from_first(first)?;
    let mut orders: Vec<Vec<OptionId>> = Vec::with_capacity(table.len());
    for (row, order) in table.iter().enumerate() {
        orders.push(options.encode(row, order)?);
    }
    debug!("checks: options: {:?}", options.names);
    Ok(CheckResult { options, orders })
}

/// Ranks the options of a table of full preference rankings.
///
/// Every ranking must be a permutation of the first one. The scores are the stationary
/// distribution of the Markov chain built out of the pairwise preferences; they sum to 1.
/// The options are returned in the order of the first ranking, not sorted by score.
///
/// A table with a single option has the trivial score of 1 for this option.
///
/// Arguments:
/// * `table` the rankings, one per respondent, most preferred option first
/// * `rules` the settings of the stationary solver
///
/// ```
/// use markov_ranking::*;
///
/// let table: Vec<PreferenceOrder> = vec![
///     vec!["A".to_string(), "B".to_string()],
///     vec!["A".to_string(), "B".to_string()],
///     vec!["B".to_string(), "A".to_string()],
/// ];
/// let res = run_ranking(&table, &RankingRules::DEFAULT_RULES)?;
/// assert_eq!(res.scores[0].0, "A");
/// assert!(res.scores[0].1 > res.scores[1].1);
/// # Ok::<(), RankingErrors>(())
/// ```
pub fn run_ranking(
    table: &[PreferenceOrder],
    rules: &RankingRules,
) -> Result<RankingResult, RankingErrors> {
    info!(
        "Processing {:?} rankings, rules: {:?}",
        table.len(),
        rules
    );

    let cr: CheckResult = checks(table)?;
    {
        for (idx, name) in cr.options.names.iter().enumerate() {
            info!("Option: {}: {}", idx + 1, name);
        }
    }

    let tally = matrix::pairwise_tally(&cr.orders, cr.options.len());
    debug!("run_ranking: tally: {:?}", tally);

    // Nothing to rank against: the only option gets all the weight.
    if cr.options.len() == 1 {
        info!("Only one option, it gets the whole distribution");
        return Ok(assemble(&cr.options.names, &[1.0], table.len(), tally, 0));
    }

    let transitions = matrix::transition_matrix(&tally)?;
    debug!("run_ranking: transitions: {:?}", transitions);

    let state = stationary::solve(&transitions, rules)?;
    info!(
        "Stationary distribution found after {} iterations",
        state.iterations
    );

    Ok(assemble(
        &cr.options.names,
        &state.distribution,
        table.len(),
        tally,
        state.iterations,
    ))
}

fn assemble(
    names: &[String],
    distribution: &[f64],
    num_respondents: usize,
    tally: TallyMatrix,
    iterations: u32,
) -> RankingResult {
    let scores: Vec<(String, f64)> = names
        .iter()
        .cloned()
        .zip(distribution.iter().cloned())
        .collect();
    for (name, score) in scores.iter() {
        info!("{:>10.6} {}", score, name);
    }
    RankingResult {
        scores,
        num_respondents,
        tally,
        iterations,
    }
}
