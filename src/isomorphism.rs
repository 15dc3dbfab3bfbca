//! Attribute-aware subgraph matching with a VF3-style state space search.
//!
//! Matching is non-induced: every pattern bond must map onto a target bond
//! of the same order, but extra target bonds among the matched atoms are
//! allowed. Atoms match on atomic number. A missing atomic number compares
//! as carbon and a missing bond order compares as a single bond.
//!
//! Embeddings are collapsed to the set of target node ids they cover, so
//! symmetric re-mappings of the same atoms are reported once.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use bit_set::BitSet;
use petgraph::{graph::NodeIndex, visit::EdgeRef};
use serde::Serialize;

use crate::molecule::{AsMolGraph, Atom, Bond, Index, MGraph, CARBON};

type Node = NodeIndex<Index>;

fn atom_key(atom: &Atom) -> u32 {
    atom.atom_number().unwrap_or(CARBON)
}

fn bond_key(bond: &Bond) -> f64 {
    bond.order().unwrap_or(1.0)
}

struct VF3State<'a> {
    pattern: &'a MGraph,
    target: &'a MGraph,
    pattern_map: Vec<Option<Node>>,
    target_map: Vec<Option<Node>>,
    pattern_depths: Vec<Option<usize>>,
    target_depths: Vec<Option<usize>>,
    depth: usize,
}

impl<'a> VF3State<'a> {
    fn new(pattern: &'a MGraph, target: &'a MGraph) -> Self {
        VF3State {
            pattern_map: vec![None; pattern.node_count()],
            target_map: vec![None; target.node_count()],
            pattern_depths: vec![None; pattern.node_count()],
            target_depths: vec![None; target.node_count()],
            depth: 0,
            pattern,
            target,
        }
    }

    fn is_consistent(&self, pattern_node: Node, target_node: Node) -> bool {
        self.semantic_rule(pattern_node, target_node)
            && self.core_rule(pattern_node, target_node)
            && self.frontier_rule(pattern_node, target_node)
            && self.remainder_rule(pattern_node, target_node)
    }

    fn semantic_rule(&self, pattern_node: Node, target_node: Node) -> bool {
        atom_key(&self.pattern[pattern_node]) == atom_key(&self.target[target_node])
    }

    /// Every bond from `pattern_node` to an already mapped node must exist,
    /// with the same order, between their images.
    fn core_rule(&self, pattern_node: Node, target_node: Node) -> bool {
        self.pattern.edges(pattern_node).all(|edge| {
            let neighbor = if edge.source() == pattern_node {
                edge.target()
            } else {
                edge.source()
            };
            let Some(neighbor_in_target) = self.pattern_map[neighbor.index()] else {
                return true;
            };
            self.target
                .find_edge(target_node, neighbor_in_target)
                .is_some_and(|e| bond_key(&self.target[e]) == bond_key(edge.weight()))
        })
    }

    fn frontier_rule(&self, pattern_node: Node, target_node: Node) -> bool {
        let card_pattern = self
            .pattern
            .neighbors(pattern_node)
            .filter(|n| {
                self.pattern_depths[n.index()].is_some() && self.pattern_map[n.index()].is_none()
            })
            .count();

        let card_target = self
            .target
            .neighbors(target_node)
            .filter(|n| {
                self.target_depths[n.index()].is_some() && self.target_map[n.index()].is_none()
            })
            .count();

        card_target >= card_pattern
    }

    fn remainder_rule(&self, pattern_node: Node, target_node: Node) -> bool {
        let card_pattern = self
            .pattern
            .neighbors(pattern_node)
            .filter(|n| self.pattern_map[n.index()].is_none())
            .count();

        let card_target = self
            .target
            .neighbors(target_node)
            .filter(|n| self.target_map[n.index()].is_none())
            .count();

        card_target >= card_pattern
    }

    fn pop_mapping(&mut self, pattern_node: Node, target_node: Node) {
        self.pattern_map[pattern_node.index()] = None;
        self.target_map[target_node.index()] = None;
        let depth = self.depth;
        for d in self.pattern_depths.iter_mut().chain(self.target_depths.iter_mut()) {
            if d.is_some_and(|at| at >= depth) {
                *d = None;
            }
        }
        self.depth -= 1;
    }

    fn push_mapping(&mut self, pattern_node: Node, target_node: Node) {
        self.pattern_map[pattern_node.index()] = Some(target_node);
        self.target_map[target_node.index()] = Some(pattern_node);
        self.depth += 1;
        let depth = self.depth;

        let (pattern, target) = (self.pattern, self.target);
        for n in std::iter::once(pattern_node).chain(pattern.neighbors(pattern_node)) {
            self.pattern_depths[n.index()].get_or_insert(depth);
        }
        for n in std::iter::once(target_node).chain(target.neighbors(target_node)) {
            self.target_depths[n.index()].get_or_insert(depth);
        }
    }

    /// Candidate pairs for the next mapping: the first unmapped pattern node
    /// on the frontier against every unmapped target node on the frontier,
    /// or, when the pattern frontier is empty, the first unmapped pattern
    /// node against every unmapped target node.
    fn generate_pairs(&self) -> Vec<(Node, Node)> {
        let pattern_frontier = self.pattern.node_indices().find(|n| {
            self.pattern_map[n.index()].is_none() && self.pattern_depths[n.index()].is_some()
        });

        if let Some(u) = pattern_frontier {
            self.target
                .node_indices()
                .filter(|n| {
                    self.target_map[n.index()].is_none() && self.target_depths[n.index()].is_some()
                })
                .map(|t| (u, t))
                .collect()
        } else {
            let Some(u) = self
                .pattern
                .node_indices()
                .find(|n| self.pattern_map[n.index()].is_none())
            else {
                return Vec::new();
            };
            self.target
                .node_indices()
                .filter(|n| self.target_map[n.index()].is_none())
                .map(|t| (u, t))
                .collect()
        }
    }

    /// Return `true` as soon as one complete mapping is found.
    fn search(&mut self) -> bool {
        if self.depth == self.pattern.node_count() {
            return true;
        }
        for (pattern_node, target_node) in self.generate_pairs() {
            if self.is_consistent(pattern_node, target_node) {
                self.push_mapping(pattern_node, target_node);
                if self.search() {
                    return true;
                }
                self.pop_mapping(pattern_node, target_node);
            }
        }
        false
    }

    fn bitset_from_current_mapping(&self) -> BitSet {
        BitSet::from_iter(
            self.target_map
                .iter()
                .enumerate()
                .filter_map(|(ix, n)| n.map(|_| ix)),
        )
    }

    fn all_subgraphs(&mut self) -> Vec<BitSet> {
        let mut isomorphisms = vec![];
        if self.depth == self.pattern.node_count() {
            isomorphisms.push(self.bitset_from_current_mapping());
        } else {
            for (pattern_node, target_node) in self.generate_pairs() {
                if self.is_consistent(pattern_node, target_node) {
                    self.push_mapping(pattern_node, target_node);
                    isomorphisms.append(&mut self.all_subgraphs());
                    self.pop_mapping(pattern_node, target_node);
                }
            }
        }
        isomorphisms
    }
}

/// Identifies a pattern in the output of [`match_patterns`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum PatternKey {
    /// The pattern's name.
    Label(String),
    /// The pattern's position among the inputs, for unnamed patterns.
    Index(usize),
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKey::Label(label) => f.write_str(label),
            PatternKey::Index(ix) => write!(f, "{ix}"),
        }
    }
}

fn too_large<T, P>(target: &T, pattern: &P) -> bool
where
    T: AsMolGraph + ?Sized,
    P: AsMolGraph + ?Sized,
{
    let (target, pattern) = (target.mol_graph(), pattern.mol_graph());
    pattern.atom_count() > target.atom_count() || pattern.bond_count() > target.bond_count()
}

/// Node-id sets of `target` covered by an embedding of `pattern`.
///
/// Each set is listed in ascending id order and the sets are sorted.
pub fn match_pattern<T, P>(target: &T, pattern: &P) -> Vec<Vec<usize>>
where
    T: AsMolGraph + ?Sized,
    P: AsMolGraph + ?Sized,
{
    if too_large(target, pattern) {
        return Vec::new();
    }
    let target = target.mol_graph();
    let mut state = VF3State::new(pattern.mol_graph().graph(), target.graph());

    let matches: BTreeSet<Vec<usize>> = state
        .all_subgraphs()
        .into_iter()
        .map(|bits| {
            let mut ids: Vec<usize> = bits
                .iter()
                .map(|ix| target.id_of(NodeIndex::new(ix)))
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();
    matches.into_iter().collect()
}

/// Return `true` iff `pattern` embeds in `target` at least once.
pub fn has_match<T, P>(target: &T, pattern: &P) -> bool
where
    T: AsMolGraph + ?Sized,
    P: AsMolGraph + ?Sized,
{
    !too_large(target, pattern)
        && VF3State::new(pattern.mol_graph().graph(), target.mol_graph().graph()).search()
}

/// Match every pattern against `target`.
///
/// Patterns are keyed by [`AsMolGraph::label`] when they have one, else by
/// their position in `patterns`. Every pattern gets an entry, empty when it
/// does not match. Patterns sharing a label share an entry.
pub fn match_patterns<'a, T, P, I>(
    target: &T,
    patterns: I,
) -> BTreeMap<PatternKey, Vec<Vec<usize>>>
where
    T: AsMolGraph + ?Sized,
    P: AsMolGraph + ?Sized + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut found: BTreeMap<PatternKey, BTreeSet<Vec<usize>>> = BTreeMap::new();
    for (ix, pattern) in patterns.into_iter().enumerate() {
        let key = pattern
            .label()
            .map_or(PatternKey::Index(ix), |label| PatternKey::Label(label.to_string()));
        found
            .entry(key)
            .or_default()
            .extend(match_pattern(target, pattern));
    }
    found
        .into_iter()
        .map(|(key, sets)| (key, sets.into_iter().collect()))
        .collect()
}
