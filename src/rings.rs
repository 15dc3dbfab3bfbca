//! Cycle basis of a molecular graph.
//!
//! Uses Paton's spanning-tree method: grow a depth-first spanning tree from
//! each component root and close one cycle per non-tree edge. The result has
//! `|E| - |V| + #components` cycles, each listed as nodes in ring order.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::molecule::AsMolGraph;

/// Return a cycle basis of `mol`, one node-id list per independent cycle.
///
/// Roots are taken in ascending id order so the basis is deterministic.
pub fn cycle_basis<G: AsMolGraph + ?Sized>(mol: &G) -> Vec<Vec<usize>> {
    let g = mol.mol_graph();
    let mut unvisited: BTreeSet<usize> = g.node_ids().into_iter().collect();
    let mut cycles = Vec::new();

    while let Some(root) = unvisited.pop_first() {
        let mut stack = vec![root];
        let mut pred: HashMap<usize, usize> = HashMap::from([(root, root)]);
        // For each tree node, the neighbors whose edge to it is already used.
        let mut used: HashMap<usize, HashSet<usize>> = HashMap::from([(root, HashSet::new())]);

        while let Some(z) = stack.pop() {
            for nbr in g.neighbors(z) {
                if !used.contains_key(&nbr) {
                    // New node: extend the spanning tree.
                    pred.insert(nbr, z);
                    stack.push(nbr);
                    used.insert(nbr, HashSet::from([z]));
                } else if !used[&z].contains(&nbr) {
                    // Non-tree edge z-nbr: walk up from z until reaching a
                    // node adjacent to nbr through a used edge.
                    let closing = &used[&nbr];
                    let mut cycle = vec![nbr, z];
                    let mut p = pred[&z];
                    while !closing.contains(&p) {
                        cycle.push(p);
                        p = pred[&p];
                    }
                    cycle.push(p);
                    cycles.push(cycle);
                    if let Some(set) = used.get_mut(&nbr) {
                        set.insert(z);
                    }
                }
            }
        }

        for n in pred.keys() {
            unvisited.remove(n);
        }
    }

    cycles
}

/// Return `true` iff `u` and `v` are consecutive in `cycle` (wrapping
/// around), i.e. the bond `u`-`v` is part of the ring.
pub fn cycle_contains_bond(cycle: &[usize], u: usize, v: usize) -> bool {
    let n = cycle.len();
    n > 2
        && (0..n).any(|i| {
            let (a, b) = (cycle[i], cycle[(i + 1) % n]);
            (a == u && b == v) || (a == v && b == u)
        })
}

/// Size of the smallest cycle of `basis` containing the bond `u`-`v`.
pub fn smallest_ring_containing(basis: &[Vec<usize>], u: usize, v: usize) -> Option<usize> {
    basis
        .iter()
        .filter(|cycle| cycle_contains_bond(cycle, u, v))
        .map(Vec::len)
        .min()
}
