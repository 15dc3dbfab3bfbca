//! Enumerate simple paths with an exact number of edges.
//!
//! A path from `s` to `e` and its reverse describe the same structure, so a
//! path is only reported from the end with the smaller node id: a complete
//! path is accepted iff its end id is greater than its start id. That rule is
//! the only deduplication; two different chains between the same endpoints
//! are both kept. The final edge of an accepted path must carry a non-zero
//! bond order, while intermediate edges may have any order.

use std::convert::Infallible;

use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::{
    error::{Error, Result},
    molecule::{AsMolGraph, Index, MolGraph},
};

/// Return every simple path of exactly `n` edges as a list of `n + 1` node
/// ids. For `n == 0` every node is its own path.
pub fn simple_paths<G: AsMolGraph + ?Sized>(mol: &G, n: usize) -> Vec<Vec<usize>> {
    let mut paths = Vec::new();
    let walked = walk::<Infallible>(mol.mol_graph(), n, |path| {
        paths.push(path);
        Ok(())
    });
    match walked {
        Ok(()) => paths,
        Err(never) => match never {},
    }
}

/// Like [`simple_paths`], but fails once more than `limit` paths have been
/// found. Useful on densely cyclic graphs where the path count explodes.
pub fn simple_paths_bounded<G: AsMolGraph + ?Sized>(
    mol: &G,
    n: usize,
    limit: usize,
) -> Result<Vec<Vec<usize>>> {
    let mut paths = Vec::new();
    walk(mol.mol_graph(), n, |path| {
        if paths.len() == limit {
            return Err(Error::PathLimitExceeded(limit));
        }
        paths.push(path);
        Ok(())
    })?;
    Ok(paths)
}

/// Number of paths [`simple_paths`] would return.
pub fn count_simple_paths<G: AsMolGraph + ?Sized>(mol: &G, n: usize) -> usize {
    let mut count = 0;
    let walked = walk::<Infallible>(mol.mol_graph(), n, |_| {
        count += 1;
        Ok(())
    });
    match walked {
        Ok(()) => count,
        Err(never) => match never {},
    }
}

/// Neighbors of every node, sorted by node id, flagged with whether the
/// connecting bond is active (non-zero order).
fn sorted_adjacency(g: &MolGraph) -> Vec<Vec<(NodeIndex<Index>, bool)>> {
    g.graph()
        .node_indices()
        .map(|ix| {
            let mut adj: Vec<_> = g
                .graph()
                .edges(ix)
                .map(|e| {
                    let other = if e.source() == ix { e.target() } else { e.source() };
                    (other, e.weight().is_active())
                })
                .collect();
            adj.sort_unstable_by_key(|(n, _)| g.id_of(*n));
            adj
        })
        .collect()
}

/// Depth-first walk from every start node in ascending id order, handing each
/// accepted path to `accept`.
fn walk<E>(
    g: &MolGraph,
    n: usize,
    mut accept: impl FnMut(Vec<usize>) -> std::result::Result<(), E>,
) -> std::result::Result<(), E> {
    let mut starts: Vec<NodeIndex<Index>> = g.graph().node_indices().collect();
    starts.sort_unstable_by_key(|ix| g.id_of(*ix));

    if n == 0 {
        for s in starts {
            accept(vec![g.id_of(s)])?;
        }
        return Ok(());
    }

    let adjacency = sorted_adjacency(g);
    for start in starts {
        let start_id = g.id_of(start);

        // The current path and, per path node, how far through its neighbor
        // list the search has progressed.
        let mut path = vec![start];
        let mut cursors = vec![0usize];

        while let (Some(&last), Some(cursor)) = (path.last(), cursors.last_mut()) {
            let Some(&(next, active)) = adjacency[last.index()].get(*cursor) else {
                path.pop();
                cursors.pop();
                continue;
            };
            *cursor += 1;

            if path.contains(&next) {
                continue;
            }

            if path.len() == n {
                // Adding `next` completes a path of n edges.
                let end_id = g.id_of(next);
                if active && end_id > start_id {
                    let mut ids: Vec<usize> = path.iter().map(|ix| g.id_of(*ix)).collect();
                    ids.push(end_id);
                    accept(ids)?;
                }
            } else {
                path.push(next);
                cursors.push(0);
            }
        }
    }
    Ok(())
}
