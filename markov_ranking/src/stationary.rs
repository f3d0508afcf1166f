use log::{debug, warn};

use crate::config::*;

// Largest residual |Mx - x| accepted for an eigenvalue of 1.
const EIGENVALUE_TOLERANCE: f64 = 1e-6;
// Smallest pivot of the direct solve before the system is considered singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

#[derive(PartialEq, Debug, Clone)]
pub(crate) struct StationaryState {
    pub(crate) distribution: Vec<f64>,
    pub(crate) iterations: u32,
}

/// Finds the unique stationary distribution of a column-stochastic matrix.
pub(crate) fn solve(
    m: &TransitionMatrix,
    rules: &RankingRules,
) -> Result<StationaryState, RankingErrors> {
    if let Some(option) =
        (0..m.num_options()).find(|&j| (m.column_sum(j) - 1.0).abs() > EIGENVALUE_TOLERANCE)
    {
        return Err(RankingErrors::DegenerateColumn { option });
    }

    let classes = closed_classes(m);
    debug!("solve: closed classes: {:?}", classes);
    if classes.len() > 1 {
        return Err(RankingErrors::MultipleStationaryStates { classes });
    }

    let (raw, iterations) = match rules.stationary_method {
        StationaryMethod::PowerIteration => {
            power_iteration(m, rules.tolerance, rules.max_iterations)?
        }
        StationaryMethod::DirectSolve => (direct_solve(m)?, 0),
    };
    let distribution = normalize_distribution(&raw)?;

    let residual = m
        .apply(&distribution)
        .iter()
        .zip(distribution.iter())
        .map(|(x1, x0)| (x1 - x0).abs())
        .fold(0.0_f64, f64::max);
    debug!("solve: residual: {:?}", residual);
    if residual > EIGENVALUE_TOLERANCE {
        return Err(RankingErrors::NoStationaryState { iterations });
    }

    Ok(StationaryState {
        distribution,
        iterations,
    })
}

/// The communicating classes that no transition leaves, each sorted by option index.
///
/// A stochastic matrix has one stationary distribution per closed class.
fn closed_classes(m: &TransitionMatrix) -> Vec<Vec<usize>> {
    let n = m.num_options();
    // reach[i][j]: the weight of i can eventually flow to j.
    let mut reach: Vec<Vec<bool>> = (0..n)
        .map(|i| (0..n).map(|j| i == j || m.probs[j][i] > 0.0).collect())
        .collect();
    for k in 0..n {
        for i in 0..n {
            if reach[i][k] {
                for j in 0..n {
                    if reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }
    }

    let mut classes: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let closed = (0..n).all(|j| !reach[i][j] || reach[j][i]);
        let class: Vec<usize> = (0..n).filter(|&j| reach[i][j] && reach[j][i]).collect();
        // Only record a class once, from its smallest member.
        if closed && class.first() == Some(&i) {
            classes.push(class);
        }
    }
    classes
}

fn power_iteration(
    m: &TransitionMatrix,
    tolerance: f64,
    max_iterations: u32,
) -> Result<(Vec<f64>, u32), RankingErrors> {
    let n = m.num_options();
    let mut dist: Vec<f64> = vec![1.0 / n as f64; n];
    for iteration in 1..=max_iterations {
        let next = normalize_distribution(&m.apply(&dist))?;
        let max_change = next
            .iter()
            .zip(dist.iter())
            .map(|(new, old)| (new - old).abs())
            .fold(0.0_f64, f64::max);
        dist = next;
        if max_change < tolerance {
            debug!(
                "power_iteration: converged after {} iterations: {:?}",
                iteration, dist
            );
            return Ok((dist, iteration));
        }
    }
    warn!(
        "power_iteration: no convergence after {} iterations: {:?}",
        max_iterations, dist
    );
    Err(RankingErrors::NoStationaryState {
        iterations: max_iterations,
    })
}

/// Solves `(M - I) x = 0` with the last equation replaced by `sum(x) = 1`.
///
/// Gaussian elimination with partial pivoting. The system is singular exactly when the
/// eigenvalue 1 does not have a unique eigenvector.
fn direct_solve(m: &TransitionMatrix) -> Result<Vec<f64>, RankingErrors> {
    let n = m.num_options();
    // Augmented matrix [A | b]
    let mut a: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut row: Vec<f64> = (0..n)
                .map(|j| m.probs[i][j] - if i == j { 1.0 } else { 0.0 })
                .collect();
            row.push(0.0);
            row
        })
        .collect();
    a[n - 1] = vec![1.0; n + 1];

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() < PIVOT_TOLERANCE {
            debug!("direct_solve: singular system at column {}", col);
            return Err(RankingErrors::NoStationaryState { iterations: 0 });
        }
        a.swap(col, pivot_row);
        for r in col + 1..n {
            let factor = a[r][col] / a[col][col];
            if factor != 0.0 {
                for c in col..=n {
                    let pivot_value = a[col][c];
                    a[r][c] -= factor * pivot_value;
                }
            }
        }
    }

    let mut x: Vec<f64> = vec![0.0; n];
    for i in (0..n).rev() {
        let rest: f64 = (i + 1..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (a[i][n] - rest) / a[i][i];
    }
    debug!("direct_solve: {:?}", x);
    Ok(x)
}

/// Rescales a vector to sum to 1.
///
/// Entries must be finite and of the same sign, up to some numerical noise that gets
/// clamped to 0.
fn normalize_distribution(raw: &[f64]) -> Result<Vec<f64>, RankingErrors> {
    if let Some((entry, &value)) = raw.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(RankingErrors::InvalidStationaryState { entry, value });
    }
    // An eigenvector is only defined up to its sign.
    let total: f64 = raw.iter().sum();
    let sign = if total < 0.0 { -1.0 } else { 1.0 };
    let mut res: Vec<f64> = raw.iter().map(|x| x * sign).collect();
    if let Some((entry, &value)) = res
        .iter()
        .enumerate()
        .find(|(_, x)| **x < -EIGENVALUE_TOLERANCE)
    {
        return Err(RankingErrors::InvalidStationaryState { entry, value });
    }
    for x in res.iter_mut() {
        if *x < 0.0 {
            *x = 0.0;
        }
    }
    let total: f64 = res.iter().sum();
    if total <= 0.0 {
        return Err(RankingErrors::InvalidStationaryState {
            entry: 0,
            value: total,
        });
    }
    for x in res.iter_mut() {
        *x /= total;
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(probs: &[&[f64]]) -> TransitionMatrix {
        TransitionMatrix {
            probs: probs.iter().map(|r| r.to_vec()).collect(),
        }
    }

    fn reference() -> TransitionMatrix {
        let s = 1.0 / 6.0;
        matrix(&[
            &[4.0 * s, 2.0 * s, 2.0 * s],
            &[s, 4.0 * s, 3.0 * s],
            &[s, 0.0, s],
        ])
    }

    #[test]
    fn power_iteration_reference() {
        let state = solve(&reference(), &RankingRules::DEFAULT_RULES).unwrap();
        let expected = [0.5, 0.4, 0.1];
        for (x, e) in state.distribution.iter().zip(expected.iter()) {
            assert!((x - e).abs() < 1e-9, "{:?}", state.distribution);
        }
        assert!(state.iterations > 0);
    }

    #[test]
    fn direct_solve_reference() {
        let rules = RankingRules {
            stationary_method: StationaryMethod::DirectSolve,
            ..RankingRules::DEFAULT_RULES
        };
        let state = solve(&reference(), &rules).unwrap();
        let expected = [0.5, 0.4, 0.1];
        for (x, e) in state.distribution.iter().zip(expected.iter()) {
            assert!((x - e).abs() < 1e-9, "{:?}", state.distribution);
        }
        assert_eq!(state.iterations, 0);
    }

    #[test]
    fn absorbing_option() {
        // B always flows to A, A keeps everything.
        let m = matrix(&[&[1.0, 1.0], &[0.0, 0.0]]);
        assert_eq!(closed_classes(&m), vec![vec![0]]);
        let state = solve(&m, &RankingRules::DEFAULT_RULES).unwrap();
        assert!((state.distribution[0] - 1.0).abs() < 1e-12);
        assert_eq!(state.distribution[1], 0.0);
    }

    #[test]
    fn not_column_stochastic() {
        let m = matrix(&[&[0.5, 1.0], &[0.0, 0.0]]);
        assert_eq!(
            solve(&m, &RankingRules::DEFAULT_RULES),
            Err(RankingErrors::DegenerateColumn { option: 0 })
        );
    }

    #[test]
    fn complete_rankings_have_one_closed_class() {
        use crate::matrix::{pairwise_tally, transition_matrix};
        use crate::OptionId;
        // Two groups with disjoint favorites still compare every pair.
        let orders: Vec<Vec<OptionId>> = [[0, 1, 2, 3], [2, 3, 0, 1], [0, 1, 2, 3], [2, 3, 0, 1]]
            .iter()
            .map(|r| r.iter().map(|x| OptionId(*x)).collect())
            .collect();
        let m = transition_matrix(&pairwise_tally(&orders, 4)).unwrap();
        assert_eq!(closed_classes(&m).len(), 1);
        assert!(solve(&m, &RankingRules::DEFAULT_RULES).is_ok());
    }

    #[test]
    fn disconnected_blocs() {
        // {0, 1} and {2, 3} never exchange any weight.
        let m = matrix(&[
            &[0.5, 0.5, 0.0, 0.0],
            &[0.5, 0.5, 0.0, 0.0],
            &[0.0, 0.0, 0.5, 0.5],
            &[0.0, 0.0, 0.5, 0.5],
        ]);
        for method in [StationaryMethod::PowerIteration, StationaryMethod::DirectSolve] {
            let rules = RankingRules {
                stationary_method: method,
                ..RankingRules::DEFAULT_RULES
            };
            assert_eq!(
                solve(&m, &rules),
                Err(RankingErrors::MultipleStationaryStates {
                    classes: vec![vec![0, 1], vec![2, 3]]
                })
            );
        }
    }

    #[test]
    fn iteration_budget() {
        let m = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let rules = RankingRules {
            max_iterations: 50,
            ..RankingRules::DEFAULT_RULES
        };
        // Periodic, but the uniform start is already stationary.
        assert!(solve(&m, &rules).is_ok());
        assert_eq!(
            power_iteration(&m, 1e-12, 0),
            Err(RankingErrors::NoStationaryState { iterations: 0 })
        );
    }

    #[test]
    fn direct_solve_singular() {
        let m = matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert_eq!(
            direct_solve(&m),
            Err(RankingErrors::NoStationaryState { iterations: 0 })
        );
    }

    #[test]
    fn normalize_flips_sign() {
        let res = normalize_distribution(&[-1.0, -3.0]).unwrap();
        assert_eq!(res, vec![0.25, 0.75]);
    }

    #[test]
    fn normalize_clamps_noise() {
        let res = normalize_distribution(&[1.0, -1e-15]).unwrap();
        assert_eq!(res, vec![1.0, 0.0]);
    }

    #[test]
    fn normalize_rejects_mixed_signs() {
        assert_eq!(
            normalize_distribution(&[0.6, -0.2, 0.6]),
            Err(RankingErrors::InvalidStationaryState {
                entry: 1,
                value: -0.2
            })
        );
        assert!(matches!(
            normalize_distribution(&[f64::NAN, 1.0]),
            Err(RankingErrors::InvalidStationaryState { entry: 0, .. })
        ));
    }
}
