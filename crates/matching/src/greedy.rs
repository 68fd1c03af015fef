use crate::graph::{ConstraintGraph, Pairing};

/// Most-constrained-first greedy assignment.
///
/// Givers are taken in ascending order of option count (stable, so ties keep
/// graph order) and each takes the first unused receiver among its options.
/// Best effort only: it can miss a perfect matching that exists.
///
/// With `avoid_reciprocal`, receivers that would close a mutual pair are
/// deferred and only taken when no other unused receiver is left: one already
/// giving to this giver, or one still unassigned whose only unused option is
/// this giver. The first check also covers receivers that are already
/// assigned, so the same seed can give a different result than a greedy pass
/// that only inspects unassigned receivers.
pub fn greedy_matching(graph: &ConstraintGraph, avoid_reciprocal: bool) -> Pairing {
    let mut order: Vec<usize> = graph.givers().to_vec();
    order.sort_by_key(|&g| graph.options(g).len());

    let mut pairing = Pairing::new(graph.node_count());
    let mut used = vec![false; graph.node_count()];

    for giver in order {
        let options = graph.options(giver);
        let preferred: Vec<usize> = if avoid_reciprocal {
            options
                .iter()
                .copied()
                .filter(|&r| !would_reciprocate(graph, &pairing, &used, giver, r))
                .collect()
        } else {
            Vec::new()
        };

        let choice = preferred
            .iter()
            .chain(options)
            .copied()
            .find(|&r| !used[r]);

        if let Some(receiver) = choice {
            pairing.assign(giver, receiver);
            used[receiver] = true;
        }
    }

    pairing
}

/// Assigning `giver -> receiver` closes, or will be forced to close, a mutual pair.
fn would_reciprocate(
    graph: &ConstraintGraph,
    pairing: &Pairing,
    used: &[bool],
    giver: usize,
    receiver: usize,
) -> bool {
    let Some(receiver_options) = graph.giver_options(receiver) else {
        return false;
    };
    match pairing.receiver_of(receiver) {
        Some(target) => target == giver,
        None => {
            receiver_options.contains(&giver)
                && !receiver_options
                    .iter()
                    .any(|&other| other != giver && !used[other])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForbiddenEdge, Participant};

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id)).collect()
    }

    #[test]
    fn most_constrained_goes_first() {
        // In input order a would take x and strand b.
        let givers = people(&["a", "b"]);
        let receivers = people(&["x", "y"]);
        let forbidden = vec![ForbiddenEdge::new("b", "y")];
        let graph = ConstraintGraph::build(&givers, &receivers, &forbidden);
        let pairing = greedy_matching(&graph, false);
        let m = graph.to_matching(&pairing);
        assert_eq!(m["b"], "x");
        assert_eq!(m["a"], "y");
    }

    #[test]
    fn plain_greedy_can_strand_last_giver() {
        let p = people(&["a", "b", "c"]);
        let graph = ConstraintGraph::build(&p, &p, &[]);
        let pairing = greedy_matching(&graph, false);
        let m = graph.to_matching(&pairing);
        assert_eq!(m["a"], "b");
        assert_eq!(m["b"], "a");
        assert!(!m.contains_key("c"));
    }

    #[test]
    fn avoiding_greedy_builds_a_cycle() {
        // b skips a because a already gives to b, even though a is assigned.
        let p = people(&["a", "b", "c"]);
        let graph = ConstraintGraph::build(&p, &p, &[]);
        let pairing = greedy_matching(&graph, true);
        let m = graph.to_matching(&pairing);
        assert_eq!(m["a"], "b");
        assert_eq!(m["b"], "c");
        assert_eq!(m["c"], "a");
        assert_eq!(pairing.reciprocal_count(), 0);
    }

    #[test]
    fn defers_receiver_that_would_be_forced_back() {
        // b can only give to a. Without avoidance a then takes b and closes
        // the pair; with it a goes to c.
        let p = people(&["a", "b", "c"]);
        let forbidden = vec![ForbiddenEdge::new("b", "c")];
        let graph = ConstraintGraph::build(&p, &p, &forbidden);

        let plain = graph.to_matching(&greedy_matching(&graph, false));
        assert_eq!(plain["b"], "a");

        let avoiding = greedy_matching(&graph, true);
        let m = graph.to_matching(&avoiding);
        assert_eq!(m["b"], "a");
        assert_eq!(m["a"], "c");
        assert_eq!(m["c"], "b");
        assert_eq!(avoiding.reciprocal_count(), 0);
    }

    #[test]
    fn falls_back_to_deferred_receiver() {
        // a's only option would be forced back to a; it is still taken.
        let p = people(&["a", "b"]);
        let graph = ConstraintGraph::build(&p, &p, &[]);
        let pairing = greedy_matching(&graph, true);
        assert_eq!(pairing.len(), 2);
        assert_eq!(pairing.reciprocal_count(), 2);
    }

    #[test]
    fn receiver_only_nodes_never_deferred() {
        let givers = people(&["a"]);
        let receivers = people(&["x"]);
        let graph = ConstraintGraph::build(&givers, &receivers, &[]);
        let m = graph.to_matching(&greedy_matching(&graph, true));
        assert_eq!(m["a"], "x");
    }
}
