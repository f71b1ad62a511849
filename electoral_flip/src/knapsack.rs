/*!
Minimum-cost selection of units to flip.

This is a 0/1 knapsack turned around: instead of maximizing value under a
weight budget, it minimizes the popular votes flipped (the cost) subject to a
minimum number of electoral votes (the weight).

The items are processed in a fixed order, given by [`efficiency_order`].
When several subsets reach the same minimal cost, this order decides which one
is reported, so it is part of the contract of [`minimize_flips`].
*/

use log::debug;
use std::cmp::Ordering;

use crate::config::*;

/// The processing order of the knapsack items: ascending popular votes needed
/// per electoral vote, then ascending unit identifier.
///
/// Weights of zero are counted as one for this ratio.
pub fn efficiency_order(a: &FlipCandidate, b: &FlipCandidate) -> Ordering {
    // Cross-multiplied to compare the ratios exactly.
    let wa = a.electoral_votes.max(1) as u128;
    let wb = b.electoral_votes.max(1) as u128;
    let lhs = (a.votes_to_flip as u128) * wb;
    let rhs = (b.votes_to_flip as u128) * wa;
    lhs.cmp(&rhs).then_with(|| a.abbr.cmp(&b.abbr))
}

/// Finds the cheapest subset of `candidates` whose electoral votes add up to at
/// least `target_ev`.
///
/// * a target of zero is met by flipping nothing, at no cost.
/// * a target above the sum of all the electoral votes is unreachable: the
///   solution has no cost and no units.
///
/// Exceeding the target is allowed, and is sometimes cheaper than meeting it
/// exactly. The chosen units are listed in reverse processing order.
pub fn minimize_flips(candidates: &[FlipCandidate], target_ev: u32) -> FlipSolution {
    if target_ev == 0 {
        return FlipSolution {
            target_ev,
            total_cost: Some(0),
            achieved_ev: 0,
            chosen_units: vec![],
        };
    }

    let max_ev: u64 = candidates.iter().map(|c| c.electoral_votes as u64).sum();
    if (target_ev as u64) > max_ev {
        debug!(
            "minimize_flips: target {} above the {} electoral votes on offer",
            target_ev, max_ev
        );
        return unreachable_solution(target_ev);
    }
    let capacity = max_ev as usize;
    let width = capacity + 1;

    let mut items: Vec<&FlipCandidate> = candidates.iter().collect();
    items.sort_by(|a, b| efficiency_order(a, b));

    // best[v]: cheapest way to collect exactly v electoral votes.
    let mut best: Vec<Option<u64>> = vec![None; width];
    best[0] = Some(0);
    // improved[idx * width + v]: item idx lowered best[v] when it was processed.
    let mut improved: Vec<bool> = vec![false; items.len() * width];

    for (idx, item) in items.iter().enumerate() {
        let weight = item.electoral_votes as usize;
        if weight == 0 {
            continue;
        }
        // Descending so that each item is used at most once.
        for v in (weight..=capacity).rev() {
            if let Some(base) = best[v - weight] {
                let cand = base.saturating_add(item.votes_to_flip);
                let better = match best[v] {
                    Some(cur) => cand < cur,
                    None => true,
                };
                if better {
                    best[v] = Some(cand);
                    improved[idx * width + v] = true;
                }
            }
        }
    }

    // Smallest cost over every capacity at or above the target. The first one wins on ties.
    let mut best_v: Option<(usize, u64)> = None;
    for (v, cost) in best.iter().enumerate().skip(target_ev as usize) {
        if let Some(c) = cost {
            if best_v.map_or(true, |(_, bc)| *c < bc) {
                best_v = Some((v, *c));
            }
        }
    }

    let (achieved, cost) = match best_v {
        Some(x) => x,
        None => return unreachable_solution(target_ev),
    };

    // Walk back the improvements, from the last processed item to the first.
    let mut chosen_units: Vec<FlipCandidate> = Vec::new();
    let mut cur = achieved;
    for idx in (0..items.len()).rev() {
        if cur == 0 {
            break;
        }
        if improved[idx * width + cur] {
            let item = items[idx];
            debug!(
                "minimize_flips: picking {} ({} ev, {} votes)",
                item.abbr, item.electoral_votes, item.votes_to_flip
            );
            chosen_units.push(item.clone());
            cur -= item.electoral_votes as usize;
        }
    }
    debug_assert_eq!(cur, 0, "Incomplete reconstruction of the flip set");

    FlipSolution {
        target_ev,
        total_cost: Some(cost),
        achieved_ev: achieved as u32,
        chosen_units,
    }
}

fn unreachable_solution(target_ev: u32) -> FlipSolution {
    FlipSolution {
        target_ev,
        total_cost: None,
        achieved_ev: 0,
        chosen_units: vec![],
    }
}
