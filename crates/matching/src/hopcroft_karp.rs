//! Maximum bipartite matching (Hopcroft-Karp).
//!
//! Each phase layers the graph breadth-first from the free givers, then runs
//! layered depth-first searches to flip vertex-disjoint augmenting paths.
//! Phases repeat until no augmenting path is left.

use std::collections::VecDeque;

use tracing::error;

use crate::graph::{ConstraintGraph, Pairing};

const INFINITY: u32 = u32::MAX;

/// Result of one solver run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub pairing: Pairing,
    /// BFS/DFS phases executed.
    pub phases: usize,
    /// The phase cap was hit; the pairing must not be trusted.
    pub capped: bool,
}

impl SolveOutcome {
    /// Every one of `givers` is matched and the run ended normally.
    pub fn is_perfect(&self, givers: usize) -> bool {
        !self.capped && self.pairing.len() == givers
    }
}

struct Solver<'g> {
    graph: &'g ConstraintGraph,
    pair_giver: Vec<Option<usize>>,
    pair_receiver: Vec<Option<usize>>,
    dist: Vec<u32>,
    /// Distance of the free-receiver layer.
    dist_free: u32,
}

impl<'g> Solver<'g> {
    fn new(graph: &'g ConstraintGraph) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            pair_giver: vec![None; n],
            pair_receiver: vec![None; n],
            dist: vec![INFINITY; n],
            dist_free: INFINITY,
        }
    }

    /// Layer the graph from the free givers. True when a free receiver is reachable.
    fn bfs(&mut self) -> bool {
        let graph = self.graph;
        let mut queue = VecDeque::new();

        for &u in graph.givers() {
            if self.pair_giver[u].is_none() {
                self.dist[u] = 0;
                queue.push_back(u);
            } else {
                self.dist[u] = INFINITY;
            }
        }
        self.dist_free = INFINITY;

        while let Some(u) = queue.pop_front() {
            if self.dist[u] >= self.dist_free {
                continue;
            }
            for &v in graph.options(u) {
                match self.pair_receiver[v] {
                    None => self.dist_free = self.dist[u] + 1,
                    Some(w) if self.dist[w] == INFINITY => {
                        self.dist[w] = self.dist[u] + 1;
                        queue.push_back(w);
                    }
                    Some(_) => {}
                }
            }
        }

        self.dist_free != INFINITY
    }

    /// Follow the layering from `u` to a free receiver and flip the path.
    fn dfs(&mut self, u: usize, depth: usize) -> bool {
        // Layers strictly increase along a path, so depth never exceeds the
        // giver count unless the layering is corrupt.
        if depth > self.graph.giver_count() {
            return false;
        }

        let graph = self.graph;
        let next = self.dist[u].saturating_add(1);

        for &v in graph.options(u) {
            let found = match self.pair_receiver[v] {
                None => self.dist_free == next,
                Some(w) => self.dist[w] == next && self.dfs(w, depth + 1),
            };
            if found {
                self.pair_giver[u] = Some(v);
                self.pair_receiver[v] = Some(u);
                return true;
            }
        }

        // dead end for the rest of this phase
        self.dist[u] = INFINITY;
        false
    }
}

/// Maximum matching over `graph`.
///
/// The phase count is capped at `givers²`; Hopcroft-Karp needs far fewer, so
/// hitting the cap means a defect and the outcome is reported as `capped`.
pub fn maximum_matching(graph: &ConstraintGraph) -> SolveOutcome {
    let max_phases = graph.giver_count().saturating_mul(graph.giver_count());
    maximum_matching_capped(graph, max_phases)
}

/// [`maximum_matching`] with an explicit phase cap.
pub(crate) fn maximum_matching_capped(graph: &ConstraintGraph, max_phases: usize) -> SolveOutcome {
    let mut solver = Solver::new(graph);
    let mut phases = 0;
    let mut capped = false;

    while solver.bfs() {
        phases += 1;
        if phases > max_phases {
            error!(
                phases,
                givers = graph.giver_count(),
                "augmenting-path search exceeded its phase cap, giving up"
            );
            capped = true;
            break;
        }

        for &u in graph.givers() {
            if solver.pair_giver[u].is_none() {
                solver.dfs(u, 0);
            }
        }
    }

    SolveOutcome {
        pairing: Pairing::from_giver_pairs(solver.pair_giver),
        phases,
        capped,
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
    fn two_people_swap() {
        let p = people(&["a", "b"]);
        let graph = ConstraintGraph::build(&p, &p, &[]);
        let outcome = maximum_matching(&graph);
        assert!(outcome.is_perfect(2));
        let m = graph.to_matching(&outcome.pairing);
        assert_eq!(m["a"], "b");
        assert_eq!(m["b"], "a");
    }

    #[test]
    fn needs_augmenting_path() {
        // Walking options in order, a takes x first; b can only use x,
        // so the second phase has to move a over to y.
        let givers = people(&["a", "b"]);
        let receivers = people(&["x", "y"]);
        let forbidden = vec![ForbiddenEdge::new("b", "y")];
        let graph = ConstraintGraph::build(&givers, &receivers, &forbidden);
        let outcome = maximum_matching(&graph);
        assert!(outcome.is_perfect(2));
        assert!(outcome.phases >= 2);
        let m = graph.to_matching(&outcome.pairing);
        assert_eq!(m["a"], "y");
        assert_eq!(m["b"], "x");
    }

    #[test]
    fn finds_derangement_when_constrained() {
        let p = people(&["a", "b", "c", "d"]);
        let forbidden = vec![
            ForbiddenEdge::new("a", "b"),
            ForbiddenEdge::new("a", "c"),
            ForbiddenEdge::new("b", "c"),
            ForbiddenEdge::new("c", "a"),
        ];
        let graph = ConstraintGraph::build(&p, &p, &forbidden);
        let outcome = maximum_matching(&graph);
        assert!(outcome.is_perfect(4));
        let m = graph.to_matching(&outcome.pairing);
        assert_eq!(m["a"], "d");
        for (g, r) in &m {
            assert_ne!(g, r);
            assert!(!forbidden.contains(&ForbiddenEdge::new(g.as_str(), r.as_str())));
        }
    }

    #[test]
    fn reports_maximum_when_not_perfect() {
        // b and c can only give to a
        let p = people(&["a", "b", "c"]);
        let forbidden = vec![ForbiddenEdge::new("b", "c"), ForbiddenEdge::new("c", "b")];
        let graph = ConstraintGraph::build(&p, &p, &forbidden);
        let outcome = maximum_matching(&graph);
        assert!(!outcome.capped);
        assert_eq!(outcome.pairing.len(), 2);
        assert!(!outcome.is_perfect(3));
    }

    #[test]
    fn phase_cap_marks_outcome_untrusted() {
        // a -> b, b -> a in phase one; c needs a second phase
        let p = people(&["a", "b", "c"]);
        let graph = ConstraintGraph::build(&p, &p, &[]);

        let outcome = maximum_matching_capped(&graph, 1);
        assert!(outcome.capped);
        assert_eq!(outcome.phases, 2);
        assert_eq!(outcome.pairing.len(), 2);
        assert!(!outcome.is_perfect(3));

        let outcome = maximum_matching_capped(&graph, 0);
        assert!(outcome.capped);
        assert!(outcome.pairing.is_empty());

        let uncapped = maximum_matching(&graph);
        assert!(!uncapped.capped);
        assert!(uncapped.is_perfect(3));
    }

    #[test]
    fn empty_graph() {
        let graph = ConstraintGraph::build(&[], &[], &[]);
        let outcome = maximum_matching(&graph);
        assert_eq!(outcome.phases, 0);
        assert!(outcome.is_perfect(0));
    }

    #[test]
    fn stranded_giver_left_unmatched() {
        let p = vec![Participant::in_couple("a", "k"), Participant::in_couple("b", "k")];
        let graph = ConstraintGraph::build(&p, &p, &[]);
        let outcome = maximum_matching(&graph);
        assert!(outcome.pairing.is_empty());
        assert!(!outcome.is_perfect(2));
    }
}
