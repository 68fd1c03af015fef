use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::MatchingConfig;
use crate::graph::{ConstraintGraph, Pairing};
use crate::greedy::greedy_matching;
use crate::hopcroft_karp::{maximum_matching, SolveOutcome};
use crate::model::{ForbiddenEdge, Matching, Participant};
use crate::seed::{attempt_seed, receiver_seed};
use crate::shuffle::seeded_shuffle;

/// An augmenting-path result with more than `givers / 3` reciprocal givers is
/// compared against the avoiding greedy solver.
const RECIPROCAL_RETRY_DIVISOR: usize = 3;

/// Draw a complete matching with the default settings.
///
/// Returns `None` when no complete matching exists under the constraints (or
/// none was found). The same inputs and seed always give the same matching.
pub fn generate_matching(
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    generate_matching_with(&MatchingConfig::default(), givers, receivers, forbidden, seed)
}

/// Draw a complete matching.
///
/// With `avoid_reciprocal`, up to `max_attempts` seeded attempts look for a
/// matching with as few mutual pairs as possible. A single pass with the
/// original seed runs when minimization is off or no attempt completed.
pub fn generate_matching_with(
    config: &MatchingConfig,
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    if config.avoid_reciprocal {
        if let Some(matching) = minimize_reciprocal(config, givers, receivers, forbidden, seed) {
            return Some(matching);
        }
        info!(
            seed = %seed,
            attempts = config.max_attempts,
            "no attempt produced a complete matching, trying a single pass"
        );
    }

    single_pass(config, givers, receivers, forbidden, seed)
}

/// Graph over both lists shuffled for `seed`. Receivers get their own
/// derived seed so the two orders do not line up.
fn build_attempt_graph(
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> ConstraintGraph {
    let givers = seeded_shuffle(givers, seed);
    let receivers = seeded_shuffle(receivers, &receiver_seed(seed));
    ConstraintGraph::build(&givers, &receivers, forbidden)
}

fn minimize_reciprocal(
    config: &MatchingConfig,
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    let mut best: Option<(usize, Matching)> = None;

    for attempt in 0..config.max_attempts {
        let attempt_seed = attempt_seed(seed, attempt);
        let graph = build_attempt_graph(givers, receivers, forbidden, &attempt_seed);

        if let Some(giver) = graph.first_stranded() {
            debug!(attempt, giver = %giver, "skipping attempt, giver has no admissible receiver");
            continue;
        }

        let pairing = solve_preferring_fewer_reciprocals(&graph);
        if pairing.len() != graph.giver_count() {
            debug!(
                attempt,
                matched = pairing.len(),
                givers = graph.giver_count(),
                "attempt left givers unmatched"
            );
            continue;
        }

        let reciprocal = pairing.reciprocal_count();
        if reciprocal == 0 {
            info!(attempt, seed = %attempt_seed, "matching without reciprocal pairs found");
            return Some(graph.to_matching(&pairing));
        }

        if best.as_ref().map_or(true, |(min, _)| reciprocal < *min) {
            info!(attempt, reciprocal, "best matching so far");
            best = Some((reciprocal, graph.to_matching(&pairing)));
        }
    }

    let (reciprocal, matching) = best?;
    info!(
        reciprocal,
        attempts = config.max_attempts,
        "keeping best matching, reciprocal pairs could not all be avoided"
    );
    Some(matching)
}

/// Augmenting-path solve with the greedy solver as second opinion.
///
/// The greedy result replaces a perfect one only when it is complete too and
/// has strictly fewer reciprocal givers.
fn solve_preferring_fewer_reciprocals(graph: &ConstraintGraph) -> Pairing {
    prefer_fewer_reciprocals(graph, maximum_matching(graph))
}

fn prefer_fewer_reciprocals(graph: &ConstraintGraph, outcome: SolveOutcome) -> Pairing {
    let givers = graph.giver_count();
    if !outcome.is_perfect(givers) {
        return greedy_matching(graph, true);
    }

    let pairing = outcome.pairing;
    let reciprocal = pairing.reciprocal_count();
    if reciprocal * RECIPROCAL_RETRY_DIVISOR > givers {
        let alternative = greedy_matching(graph, true);
        if alternative.len() == givers && alternative.reciprocal_count() < reciprocal {
            return alternative;
        }
    }
    pairing
}

fn single_pass(
    config: &MatchingConfig,
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    let graph = build_attempt_graph(givers, receivers, forbidden, seed);

    if let Some(giver) = graph.first_stranded() {
        warn!(seed = %seed, giver = %giver, "draw infeasible, giver has no admissible receiver");
        return None;
    }

    debug!(
        givers = graph.giver_count(),
        forbidden = forbidden.len(),
        "constraint graph built"
    );
    for &g in graph.givers() {
        debug!(giver = %graph.id(g), options = graph.options(g).len(), "admissible receivers");
    }

    let started = Instant::now();
    let outcome = maximum_matching(&graph);
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        matched = outcome.pairing.len(),
        phases = outcome.phases,
        "augmenting-path search finished"
    );

    let total = graph.giver_count();
    let pairing = if outcome.is_perfect(total) {
        outcome.pairing
    } else {
        let pairing = greedy_matching(&graph, config.avoid_reciprocal);
        debug!(matched = pairing.len(), "greedy fallback finished");
        pairing
    };

    if pairing.len() != total {
        warn!(
            seed = %seed,
            matched = pairing.len(),
            givers = total,
            "draw infeasible, no complete matching"
        );
        return None;
    }

    Some(graph.to_matching(&pairing))
}
