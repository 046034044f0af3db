use std::collections::HashSet;

/// Ids to create and ids to drop so the rendered set matches the live one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
}

/// Diff rendered effect ids against live ones. `added` keeps live order,
/// `removed` keeps rendered order.
pub fn reconcile_ids(rendered: &[u64], live: &[u64]) -> Reconciled {
    let rendered_set: HashSet<u64> = rendered.iter().copied().collect();
    let live_set: HashSet<u64> = live.iter().copied().collect();
    Reconciled {
        added: live
            .iter()
            .copied()
            .filter(|id| !rendered_set.contains(id))
            .collect(),
        removed: rendered
            .iter()
            .copied()
            .filter(|id| !live_set.contains(id))
            .collect(),
    }
}
