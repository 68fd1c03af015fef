use std::collections::{HashMap, HashSet};

use crate::model::{ForbiddenEdge, Matching, Participant};

/// Admissible giver -> receiver edges.
///
/// Ids are interned into node indices shared by both sides, so "receiver r as
/// a giver" is a plain index lookup. Givers and each giver's options keep the
/// order of the input lists: the solvers walk them in that order, which is
/// what makes a seeded shuffle reproduce the same matching.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    givers: Vec<usize>,
    /// Per node; `None` when the node is not a giver.
    options: Vec<Option<Vec<usize>>>,
}

impl ConstraintGraph {
    /// Admit every giver -> receiver edge except self, couple and forbidden edges.
    ///
    /// Every giver gets an entry, empty when nothing is admissible. Repeated
    /// ids keep their first occurrence.
    pub fn build(
        givers: &[Participant],
        receivers: &[Participant],
        forbidden: &[ForbiddenEdge],
    ) -> Self {
        let forbidden: HashSet<(&str, &str)> = forbidden
            .iter()
            .map(|e| (e.giver_id.as_str(), e.receiver_id.as_str()))
            .collect();

        let mut graph = Self::default();

        let mut seen = HashSet::new();
        let receivers: Vec<(usize, &Participant)> = receivers
            .iter()
            .filter(|r| seen.insert(r.id.as_str()))
            .map(|r| (graph.intern(&r.id), r))
            .collect();

        for giver in givers {
            let g = graph.intern(&giver.id);
            if graph.options[g].is_some() {
                continue;
            }

            let admissible: Vec<usize> = receivers
                .iter()
                .filter(|(_, receiver)| {
                    giver.id != receiver.id
                        && !giver.is_couple_of(receiver)
                        && !forbidden.contains(&(giver.id.as_str(), receiver.id.as_str()))
                })
                .map(|(r, _)| *r)
                .collect();

            graph.options[g] = Some(admissible);
            graph.givers.push(g);
        }

        graph
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&node) = self.index.get(id) {
            return node;
        }
        let node = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), node);
        self.options.push(None);
        node
    }

    /// Total interned ids (givers and receivers).
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn giver_count(&self) -> usize {
        self.givers.len()
    }

    /// Giver nodes in input order.
    pub fn givers(&self) -> &[usize] {
        &self.givers
    }

    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    pub fn node(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Admissible receivers of `node`; empty when `node` is not a giver.
    pub fn options(&self, node: usize) -> &[usize] {
        self.giver_options(node).unwrap_or(&[])
    }

    /// Like [`options`](Self::options) but tells non-givers apart.
    pub fn giver_options(&self, node: usize) -> Option<&[usize]> {
        self.options[node].as_deref()
    }

    /// First giver (in input order) with no admissible receiver.
    pub fn first_stranded(&self) -> Option<&str> {
        self.givers
            .iter()
            .find(|&&g| self.options(g).is_empty())
            .map(|&g| self.id(g))
    }

    pub fn to_matching(&self, pairing: &Pairing) -> Matching {
        self.givers
            .iter()
            .filter_map(|&g| {
                pairing
                    .receiver_of(g)
                    .map(|r| (self.id(g).to_string(), self.id(r).to_string()))
            })
            .collect()
    }
}

/// Giver -> receiver assignment over graph nodes, possibly partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    by_giver: Vec<Option<usize>>,
    len: usize,
}

impl Pairing {
    pub fn new(node_count: usize) -> Self {
        Self {
            by_giver: vec![None; node_count],
            len: 0,
        }
    }

    pub fn from_giver_pairs(by_giver: Vec<Option<usize>>) -> Self {
        let len = by_giver.iter().filter(|p| p.is_some()).count();
        Self { by_giver, len }
    }

    /// Number of givers assigned.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn receiver_of(&self, giver: usize) -> Option<usize> {
        self.by_giver.get(giver).copied().flatten()
    }

    pub fn assign(&mut self, giver: usize, receiver: usize) {
        if self.by_giver[giver].replace(receiver).is_none() {
            self.len += 1;
        }
    }

    /// Givers `g` with `pairing[pairing[g]] == g`. A mutual pair counts twice.
    pub fn reciprocal_count(&self) -> usize {
        self.by_giver
            .iter()
            .enumerate()
            .filter(|(g, r)| r.is_some_and(|r| self.receiver_of(r) == Some(*g)))
            .count()
    }
}
