use serde::Serialize;

use crate::error::{Result, RouterError};
use crate::types::solution::VenueOperation;
use crate::utils::constants::MAX_DECOMPOSITION_STEPS;

/// One balance of the execution tree: `amount` of `token` held at this point
/// of the plan. `venue` is the venue whose trade produced the balance, absent
/// at the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    pub token: usize,
    pub amount: f64,
    pub venue: Option<usize>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Execution tree over an arena of integer-indexed nodes; index 0 is the
/// root. A fork is one balance feeding several trades; a join is the same
/// token reappearing at a greater depth, which is how cyclic trade graphs
/// are represented without back-edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTree {
    pub nodes: Vec<RouteNode>,
}

impl RouteTree {
    pub fn root(&self) -> &RouteNode {
        &self.nodes[0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// ASCII rendering of the tree, one `coin=amount/token` line per node.
    /// Diagnostic only, not part of the routing contract.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, String, bool)> = vec![(0, String::new(), true)];
        while let Some((index, prefix, last)) = stack.pop() {
            let node = &self.nodes[index];
            if index == 0 {
                out.push_str(&format!("coin={}/{}\n", node.amount, node.token));
            } else {
                let branch = if last { "└── " } else { "├── " };
                out.push_str(&format!("{}{}coin={}/{} venue={}\n", prefix, branch, node.amount, node.token, node.venue.unwrap_or_default()));
            }
            let child_prefix = if index == 0 {
                String::new()
            } else if last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            for (k, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), k == node.children.len() - 1));
            }
        }
        out
    }
}

struct Frame {
    node: usize,
    candidates: Vec<usize>,
    next: usize,
}

/// Decomposes a flat set of net trades into a token-balance-conserving
/// execution tree rooted at `(source, amount_in)`.
///
/// Greedy first-fit worklist: at a node holding token T the trades sourced
/// from T are visited by descending input amount, venue index breaking ties,
/// and accepted whenever T's outstanding inflow still covers them. A child's
/// whole subtree is expanded before the parent's next candidate, so cycles
/// fold into joins at greater depth and unspent balances end as burn leaves.
/// The per-token counters are the sole cross-branch conservation mechanism;
/// there is no backtracking and no shape optimality claim.
pub fn decompose(trades: &[VenueOperation], source: usize, amount_in: f64, token_count: usize, epsilon: f64) -> Result<RouteTree> {
    let mut inflow = vec![0.0f64; token_count];
    let mut outflow = vec![0.0f64; token_count];
    for trade in trades {
        inflow[trade.token_in] += trade.amount_in;
        outflow[trade.token_out] += trade.amount_out;
    }

    let mut nodes = vec![RouteNode { token: source, amount: amount_in, venue: None, parent: None, children: Vec::new() }];
    let mut stack = vec![Frame { node: 0, candidates: candidates_for(trades, source), next: 0 }];
    let mut steps = 0usize;

    while let Some(top) = stack.last_mut() {
        if top.next >= top.candidates.len() {
            stack.pop();
            continue;
        }
        let pick = top.candidates[top.next];
        top.next += 1;
        let parent = top.node;

        steps += 1;
        if steps > MAX_DECOMPOSITION_STEPS {
            return Err(RouterError::IterationCap(MAX_DECOMPOSITION_STEPS));
        }

        let trade = &trades[pick];
        // capacity already claimed by an earlier branch sharing this token
        if inflow[trade.token_in] - trade.amount_in < -epsilon {
            continue;
        }
        inflow[trade.token_in] -= trade.amount_in;
        outflow[trade.token_out] -= trade.amount_out;

        let child = nodes.len();
        nodes.push(RouteNode { token: trade.token_out, amount: trade.amount_out, venue: Some(trade.venue), parent: Some(parent), children: Vec::new() });
        nodes[parent].children.push(child);
        stack.push(Frame { node: child, candidates: candidates_for(trades, trade.token_out), next: 0 });
    }

    Ok(RouteTree { nodes })
}

/// Trades sourced from `token`, largest input first, venue index as the
/// reproducible tiebreak.
fn candidates_for(trades: &[VenueOperation], token: usize) -> Vec<usize> {
    let mut picks: Vec<usize> = (0..trades.len()).filter(|&i| trades[i].token_in == token).collect();
    picks.sort_by(|&x, &y| trades[y].amount_in.total_cmp(&trades[x].amount_in).then(trades[x].venue.cmp(&trades[y].venue)));
    picks
}
