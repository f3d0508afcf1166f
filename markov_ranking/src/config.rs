// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One respondent's full ranking, from the most preferred option to the least preferred.
pub type PreferenceOrder = Vec<String>;

// ******** Output data structures *********

/// Pairwise counts between the options.
///
/// The matrix is indexed as `[loser][winner]`: the entry `(i, j)` with `i != j` counts how many
/// respondents ranked `j` above `i`. The diagonal entry `(w, w)` accumulates all the pairwise
/// wins of `w` across the table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyMatrix {
    pub counts: Vec<Vec<u64>>,
}

impl TallyMatrix {
    pub fn num_options(&self) -> usize {
        self.counts.len()
    }

    /// The number of pairwise wins accumulated by the option at this index.
    pub fn wins(&self, option: usize) -> u64 {
        self.counts[option][option]
    }

    /// How many respondents preferred `winner` over `loser`.
    pub fn preferred(&self, winner: usize, loser: usize) -> u64 {
        self.counts[loser][winner]
    }
}

/// A column-stochastic matrix, indexed as `[destination][source]`.
#[derive(PartialEq, Debug, Clone)]
pub struct TransitionMatrix {
    pub probs: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    pub fn num_options(&self) -> usize {
        self.probs.len()
    }

    pub fn column_sum(&self, source: usize) -> f64 {
        self.probs.iter().map(|row| row[source]).sum()
    }

    /// Applies the matrix once to a distribution over the options.
    pub fn apply(&self, dist: &[f64]) -> Vec<f64> {
        self.probs
            .iter()
            .map(|row| row.iter().zip(dist.iter()).map(|(p, d)| p * d).sum())
            .collect()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankingResult {
    /// The score of each option, in the order of the first ranking of the table.
    /// The scores sum to 1.
    pub scores: Vec<(String, f64)>,
    pub num_respondents: usize,
    pub tally: TallyMatrix,
    /// Number of iterations of the solver (0 for the direct methods).
    pub iterations: u32,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// No respondent, or no option in the first ranking.
    EmptyInput,
    /// The ranking at this row names the same option twice.
    InconsistentRanking { row: usize, name: String },
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The ranking at this row names an option that is not in the first ranking.
    RowContentMismatch { row: usize, name: String },
    /// The transition column of this option does not sum to 1 (or the option never
    /// took part in any comparison).
    DegenerateColumn { option: usize },
    NoStationaryState { iterations: u32 },
    /// The chain has several closed classes, hence several stationary distributions.
    MultipleStationaryStates { classes: Vec<Vec<usize>> },
    InvalidStationaryState { entry: usize, value: f64 },
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::EmptyInput => write!(f, "no ranking to process"),
            RankingErrors::InconsistentRanking { row, name } => {
                write!(f, "ranking {} lists option {:?} more than once", row, name)
            }
            RankingErrors::RowLengthMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "ranking {} has {} options, expected {}",
                row, found, expected
            ),
            RankingErrors::RowContentMismatch { row, name } => {
                write!(f, "ranking {} contains unknown option {:?}", row, name)
            }
            RankingErrors::DegenerateColumn { option } => {
                write!(f, "transition column for option {} does not sum to 1", option)
            }
            RankingErrors::NoStationaryState { iterations } => write!(
                f,
                "no stationary distribution found (after {} iterations)",
                iterations
            ),
            RankingErrors::MultipleStationaryStates { classes } => write!(
                f,
                "the preferences split into {} disconnected blocs: {:?}",
                classes.len(),
                classes
            ),
            RankingErrors::InvalidStationaryState { entry, value } => write!(
                f,
                "invalid stationary distribution: entry {} is {}",
                entry, value
            ),
        }
    }
}

// ********* Configuration **********

/// How the stationary distribution gets computed.
///
/// - PowerIteration repeatedly applies the transition matrix to the uniform
/// distribution until it stops moving. It is the default.
///
/// - DirectSolve computes the eigenvector for the eigenvalue 1 by solving the
/// linear system `(M - I) x = 0` completed with `sum(x) = 1`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StationaryMethod {
    PowerIteration,
    DirectSolve,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RankingRules {
    pub stationary_method: StationaryMethod,
    /// Convergence threshold of the power iteration, on the largest change of an entry.
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl RankingRules {
    pub const DEFAULT_RULES: RankingRules = RankingRules {
        stationary_method: StationaryMethod::PowerIteration,
        tolerance: 1e-12,
        max_iterations: 100_000,
    };
}

impl Default for RankingRules {
    fn default() -> Self {
        RankingRules::DEFAULT_RULES
    }
}
