pub use crate::config::*;

use crate::{run_ranking, OptionIndex};

/// A builder for adding rankings one at a time.
///
/// Every ranking is checked as soon as it is added, against the first one, so that readers
/// can stop at the first invalid row.
///
/// ```
/// pub use markov_ranking::builder::Builder;
/// pub use markov_ranking::RankingRules;
/// # use markov_ranking::RankingErrors;
///
/// let mut builder = Builder::new(&RankingRules::DEFAULT_RULES)?;
///
/// builder.add_ranking(&["Anna".to_string(), "Bob".to_string()])?;
/// builder.add_ranking(&["Bob".to_string(), "Anna".to_string()])?;
/// assert!(builder.add_ranking(&["Anna".to_string(), "Clara".to_string()]).is_err());
///
/// let res = builder.run()?;
/// assert_eq!(res.num_respondents, 2);
///
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: RankingRules,
    pub(crate) _options: Option<OptionIndex>,
    pub(crate) _rankings: Vec<PreferenceOrder>,
}

impl Builder {
    pub fn new(rules: &RankingRules) -> Result<Builder, RankingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _options: None,
            _rankings: Vec::new(),
        })
    }

    /// Adds the full ranking of one respondent, most preferred option first.
    ///
    /// The first ranking defines the options. A rejected ranking is not added.
    pub fn add_ranking(&mut self, options: &[String]) -> Result<(), RankingErrors> {
        let row = self._rankings.len();
        match &self._options {
            Some(index) => {
                index.encode(row, options)?;
            }
            None => {
                self._options = Some(OptionIndex::from_first(options)?);
            }
        }
        self._rankings.push(options.to_vec());
        Ok(())
    }

    pub fn num_rankings(&self) -> usize {
        self._rankings.len()
    }

    pub fn run(&self) -> Result<RankingResult, RankingErrors> {
        run_ranking(&self._rankings, &self._rules)
    }
}
