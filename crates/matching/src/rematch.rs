use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::MatchingConfig;
use crate::engine::generate_matching_with;
use crate::model::{ForbiddenEdge, Matching, Participant};
use crate::seed::rematch_seed;

/// Redraw only `givers_to_redo`, keeping every other assignment.
///
/// Returns the merged complete matching, or `None` when the freed receivers
/// cannot be redistributed under the constraints or a redone giver is missing
/// from `all_givers`. On `None` nothing of the
/// rematch may be applied.
pub fn partial_rematch(
    existing: &Matching,
    givers_to_redo: &[String],
    all_givers: &[Participant],
    all_receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    partial_rematch_with(
        &MatchingConfig::default(),
        existing,
        givers_to_redo,
        all_givers,
        all_receivers,
        forbidden,
        seed,
    )
}

pub fn partial_rematch_with(
    config: &MatchingConfig,
    existing: &Matching,
    givers_to_redo: &[String],
    all_givers: &[Participant],
    all_receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
    seed: &str,
) -> Option<Matching> {
    let redo: HashSet<&str> = givers_to_redo.iter().map(String::as_str).collect();

    let mut merged = existing.clone();
    let mut freed = HashSet::new();
    let mut removed = Vec::new();
    for giver in givers_to_redo {
        if let Some(receiver) = merged.remove(giver) {
            freed.insert(receiver);
            removed.push(giver.as_str());
        }
    }

    let retained: HashSet<&str> = merged.values().map(String::as_str).collect();

    let rematch_givers: Vec<Participant> = all_givers
        .iter()
        .filter(|g| redo.contains(g.id.as_str()))
        .cloned()
        .collect();

    // Every freed giver must be redrawn.
    if let Some(giver) = removed
        .iter()
        .find(|id| !rematch_givers.iter().any(|g| g.id == **id))
    {
        warn!(giver = %giver, "rematch giver is not among the givers, refusing");
        return None;
    }

    let pool: Vec<Participant> = all_receivers
        .iter()
        .filter(|r| !retained.contains(r.id.as_str()) || freed.contains(&r.id))
        .cloned()
        .collect();

    // Receivers kept by untouched givers are off limits for the redrawn ones.
    let mut constraints = forbidden.to_vec();
    for receiver in merged.values() {
        for giver in &rematch_givers {
            constraints.push(ForbiddenEdge::new(giver.id.as_str(), receiver.as_str()));
        }
    }

    debug!(
        givers = rematch_givers.len(),
        pool = pool.len(),
        retained = merged.len(),
        "partial rematch"
    );

    let Some(redrawn) =
        generate_matching_with(config, &rematch_givers, &pool, &constraints, &rematch_seed(seed))
    else {
        warn!(seed = %seed, givers = rematch_givers.len(), "no valid rematch under current constraints");
        return None;
    };

    merged.extend(redrawn);
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id)).collect()
    }

    fn matching(pairs: &[(&str, &str)]) -> Matching {
        pairs
            .iter()
            .map(|(g, r)| (g.to_string(), r.to_string()))
            .collect()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_giver_gets_the_only_free_receiver() {
        // With everyone else kept, 1 can only get its old receiver back.
        let p = people(&["1", "2", "3"]);
        let existing = matching(&[("1", "2"), ("2", "3"), ("3", "1")]);
        let m = partial_rematch(&existing, &ids(&["1"]), &p, &p, &[], "x").unwrap();
        assert_eq!(m, existing);
    }

    #[test]
    fn redraws_two_givers_of_a_cycle() {
        let p = people(&["1", "2", "3", "4", "5"]);
        let existing = matching(&[("1", "2"), ("2", "3"), ("3", "4"), ("4", "5"), ("5", "1")]);
        let m = partial_rematch(&existing, &ids(&["1", "3"]), &p, &p, &[], "x").unwrap();
        assert_eq!(
            m,
            matching(&[("1", "4"), ("2", "3"), ("3", "2"), ("4", "5"), ("5", "1")])
        );
    }

    #[test]
    fn untouched_assignments_survive() {
        let p = people(&["1", "2", "3", "4", "5", "6"]);
        let existing = matching(&[
            ("1", "2"),
            ("2", "3"),
            ("3", "4"),
            ("4", "5"),
            ("5", "6"),
            ("6", "1"),
        ]);
        let redo = ids(&["2", "5"]);
        let m = partial_rematch(&existing, &redo, &p, &p, &[], "keep").unwrap();
        assert_eq!(m.len(), 6);
        for (g, r) in &existing {
            if !redo.contains(g) {
                assert_eq!(&m[g], r);
            }
        }
        let mut receivers: Vec<&String> = m.values().collect();
        receivers.sort();
        receivers.dedup();
        assert_eq!(receivers.len(), 6);
        assert!(m.iter().all(|(g, r)| g != r));
    }

    #[test]
    fn infeasible_rematch_returns_none() {
        // 1 may not take 2 back and nothing else is free.
        let p = people(&["1", "2", "3"]);
        let existing = matching(&[("1", "2"), ("2", "3"), ("3", "1")]);
        let forbidden = vec![ForbiddenEdge::new("1", "2")];
        assert_eq!(partial_rematch(&existing, &ids(&["1"]), &p, &p, &forbidden, "x"), None);
    }

    #[test]
    fn unknown_redo_ids_are_ignored() {
        let p = people(&["1", "2", "3"]);
        let existing = matching(&[("1", "2"), ("2", "3"), ("3", "1")]);
        let m = partial_rematch(&existing, &ids(&["zz"]), &p, &p, &[], "x").unwrap();
        assert_eq!(m, existing);
    }

    #[test]
    fn redo_giver_outside_giver_list_returns_none() {
        let givers = people(&["2", "3"]);
        let receivers = people(&["1", "2", "3"]);
        let existing = matching(&[("1", "2"), ("2", "3"), ("3", "1")]);
        assert_eq!(
            partial_rematch(&existing, &ids(&["1"]), &givers, &receivers, &[], "x"),
            None
        );
    }
}
