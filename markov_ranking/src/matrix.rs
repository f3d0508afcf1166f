use log::debug;

use crate::config::*;
use crate::OptionId;

/// Counts the pairwise preferences of all the rankings.
///
/// For every pair of positions in a ranking, the better option gets one count against the
/// worse one in `[worse][better]`, and one count on its own diagonal.
pub(crate) fn pairwise_tally(orders: &[Vec<OptionId>], num_options: usize) -> TallyMatrix {
    let mut counts: Vec<Vec<u64>> = vec![vec![0; num_options]; num_options];
    for order in orders.iter() {
        for (pos, better) in order.iter().enumerate() {
            for worse in order[pos + 1..].iter() {
                counts[worse.0][better.0] += 1;
                counts[better.0][better.0] += 1;
            }
        }
    }
    TallyMatrix { counts }
}

/// Builds the column-stochastic transition matrix out of the tally.
///
/// The tally is transposed, so that the column of an option describes where its
/// weight flows: to itself in proportion of its wins, and to every option that
/// was preferred over it.
pub(crate) fn transition_matrix(tally: &TallyMatrix) -> Result<TransitionMatrix, RankingErrors> {
    let n = tally.num_options();
    let mut probs: Vec<Vec<f64>> = vec![vec![0.0; n]; n];
    for source in 0..n {
        let total: u64 = tally.counts[source].iter().sum();
        if total == 0 {
            return Err(RankingErrors::DegenerateColumn { option: source });
        }
        for (dest, row) in probs.iter_mut().enumerate() {
            let weight = if dest == source {
                tally.wins(source)
            } else {
                tally.preferred(dest, source)
            };
            row[source] = weight as f64 / total as f64;
        }
    }
    debug!("transition_matrix: {:?}", probs);
    Ok(TransitionMatrix { probs })
}
