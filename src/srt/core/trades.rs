use crate::types::solution::{Solution, VenueOperation};

/// Nets each venue's two decision vectors into at most one directed trade.
///
/// Three independent noise filters run finest to coarsest before netting: a
/// venue is dropped when its activation magnitude is below `epsilon`, when
/// both decision vectors are within `epsilon` of the zero vector, or when the
/// largest-magnitude component of `lambda - delta` is below `epsilon`. For
/// every survivor the sign of the net vector's first component selects the
/// flow direction. Re-running this over an already-clean solution removes
/// nothing further.
pub fn net_trades(solution: &Solution, epsilon: f64) -> Vec<Option<VenueOperation>> {
    let mut trades = Vec::with_capacity(solution.venue_count());
    for i in 0..solution.venue_count() {
        let delta = solution.deltas[i];
        let lambda = solution.lambdas[i];
        if solution.etas[i].abs() < epsilon {
            trades.push(None);
            continue;
        }
        if delta[0].abs().max(delta[1].abs()) < epsilon && lambda[0].abs().max(lambda[1].abs()) < epsilon {
            trades.push(None);
            continue;
        }
        let net = [lambda[0] - delta[0], lambda[1] - delta[1]];
        if net[0].abs().max(net[1].abs()) < epsilon {
            trades.push(None);
            continue;
        }
        let [a, b] = solution.venue_tokens[i];
        if net[0] < 0.0 {
            // leg 0 flows into the venue
            trades.push(Some(VenueOperation { venue: i, token_in: a, amount_in: -net[0], token_out: b, amount_out: net[1] }));
        } else if net[0] > 0.0 {
            trades.push(Some(VenueOperation { venue: i, token_in: b, amount_in: -net[1], token_out: a, amount_out: net[0] }));
        } else {
            trades.push(None);
        }
    }
    trades
}

#[cfg(test)]
mod tests {
    use ndarray::Array1;

    use crate::types::solution::{Solution, SolverStatus};

    use super::net_trades;

    fn solution(deltas: Vec<[f64; 2]>, lambdas: Vec<[f64; 2]>, etas: Vec<f64>) -> Solution {
        let venue_tokens = (0..deltas.len()).map(|i| [2 * i, 2 * i + 1]).collect();
        Solution::new(SolverStatus::Optimal, deltas, lambdas, etas, Array1::zeros(4), venue_tokens).unwrap()
    }

    #[test]
    fn test_noise_filters() {
        let sol = solution(
            vec![[10.0, 0.0], [5.0, 0.0], [1e-9, 0.0], [3.0, 0.0]],
            vec![[0.0, 9.0], [0.0, 4.0], [0.0, 1e-9], [0.0, 2.5]],
            vec![1.0, 1e-9, 1.0, 1.0],
        );
        let trades = net_trades(&sol, 1e-5);
        assert!(trades[0].is_some());
        assert!(trades[1].is_none(), "activation below epsilon must drop the venue");
        assert!(trades[2].is_none(), "near-zero decision vectors must drop the venue");
        assert!(trades[3].is_some());
    }

    #[test]
    fn test_direction_from_first_component() {
        let sol = solution(vec![[10.0, 0.0], [0.0, 7.0]], vec![[0.0, 9.0], [6.0, 0.0]], vec![1.0, 1.0]);
        let trades = net_trades(&sol, 1e-5);
        let first = trades[0].as_ref().unwrap();
        assert_eq!((first.token_in, first.token_out), (0, 1));
        assert!((first.amount_in - 10.0).abs() < 1e-12);
        assert!((first.amount_out - 9.0).abs() < 1e-12);
        // positive first component: leg 1 flows in
        let second = trades[1].as_ref().unwrap();
        assert_eq!((second.token_in, second.token_out), (3, 2));
        assert!((second.amount_in - 7.0).abs() < 1e-12);
        assert!((second.amount_out - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let noisy = solution(
            vec![[10.0, 0.0], [1e-8, 0.0], [0.0, 4.0]],
            vec![[0.0, 9.0], [0.0, 1e-8], [3.5, 0.0]],
            vec![1.0, 1e-7, 0.8],
        );
        let first_pass = net_trades(&noisy, 1e-5);

        // zeroing what the first pass dropped is exactly the cleanup the
        // extractor applies internally
        let mut deltas = noisy.deltas.clone();
        let mut lambdas = noisy.lambdas.clone();
        let mut etas = noisy.etas.clone();
        for (i, trade) in first_pass.iter().enumerate() {
            if trade.is_none() {
                deltas[i] = [0.0, 0.0];
                lambdas[i] = [0.0, 0.0];
                etas[i] = 0.0;
            }
        }
        let second_pass = net_trades(&solution(deltas, lambdas, etas), 1e-5);
        assert_eq!(first_pass, second_pass);
    }
}
