//! Attributed graph representation of a molecule.
//!
//! Nodes are atoms keyed by caller-chosen, stable integer ids; edges are bonds
//! carrying a numeric bond order. Both carry an open set of extra attributes.
//! Descriptor functions accept anything implementing [`AsMolGraph`], so a bare
//! [`MolGraph`] and a named [`Molecule`] are interchangeable.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
};

use petgraph::{
    graph::{Graph, NodeIndex},
    visit::EdgeRef,
    Undirected,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub(crate) type Index = u32;
pub(crate) type MGraph = Graph<Atom, Bond, Undirected, Index>;

/// Open attribute map attached to atoms, bonds, and graphs.
pub type Attributes = BTreeMap<String, Value>;

/// Atomic number of hydrogen.
pub const HYDROGEN: u32 = 1;
/// Atomic number of carbon.
pub const CARBON: u32 = 6;

/// The nodes of a [`MolGraph`].
///
/// `atom_number` and `position` are optional so that incomplete graphs can be
/// represented; computations that need them fail with
/// [`Error::MissingAttribute`] instead of substituting defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    atom_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Vec<f64>>,
    #[serde(flatten)]
    attrs: Attributes,
}

impl Atom {
    /// Construct an [`Atom`] of atomic number `atom_number` without a position.
    pub fn new(atom_number: u32) -> Self {
        Self {
            atom_number: Some(atom_number),
            ..Default::default()
        }
    }

    /// Return this atom with its position set to `position`.
    pub fn with_position(mut self, position: impl Into<Vec<f64>>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Return this atom with the extra attribute `key` set to `value`.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn atom_number(&self) -> Option<u32> {
        self.atom_number
    }

    pub fn position(&self) -> Option<&[f64]> {
        self.position.as_deref()
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atom_number == Some(HYDROGEN)
    }
}

/// The edges of a [`MolGraph`].
///
/// A bond order of `0` marks an edge that is structurally present but
/// chemically inactive; such edges are skipped by anything that counts bonds.
/// `None` means the bond order attribute is absent altogether.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    #[serde(rename = "bond_order", default, skip_serializing_if = "Option::is_none")]
    order: Option<f64>,
    #[serde(flatten)]
    attrs: Attributes,
}

impl Bond {
    /// Construct a [`Bond`] of order `order`.
    pub fn new(order: f64) -> Self {
        Self {
            order: Some(order),
            attrs: Attributes::new(),
        }
    }

    /// Return this bond with the extra attribute `key` set to `value`.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn order(&self) -> Option<f64> {
        self.order
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Return `true` iff this bond has a present, non-zero order.
    pub fn is_active(&self) -> bool {
        self.order.is_some_and(|o| o != 0.0)
    }
}

/// An undirected, loopless graph of [`Atom`]s joined by [`Bond`]s.
///
/// Node ids are assigned by the caller and never renumbered. Operations that
/// need to ignore hydrogens work on the snapshot returned by
/// [`MolGraph::without_hydrogens`], so the original graph is never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphRecord", into = "GraphRecord")]
pub struct MolGraph {
    graph: MGraph,
    index_of: HashMap<usize, NodeIndex<Index>>,
    id_of: Vec<usize>,
    metadata: Attributes,
}

impl MolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a list of atoms and a list of bonds.
    pub fn from_parts(
        atoms: impl IntoIterator<Item = (usize, Atom)>,
        bonds: impl IntoIterator<Item = (usize, usize, Bond)>,
    ) -> Result<Self> {
        let mut g = Self::new();
        for (id, atom) in atoms {
            g.add_atom(id, atom)?;
        }
        g.extend_bonds(bonds)?;
        Ok(g)
    }

    /// Add `atom` under node id `id`.
    pub fn add_atom(&mut self, id: usize, atom: Atom) -> Result<()> {
        if self.index_of.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }
        let ix = self.graph.add_node(atom);
        self.index_of.insert(id, ix);
        self.id_of.push(id);
        Ok(())
    }

    /// Add a bond between existing nodes `u` and `v`. Adding a bond that
    /// already exists replaces its attributes.
    pub fn add_bond(&mut self, u: usize, v: usize, bond: Bond) -> Result<()> {
        if u == v {
            return Err(Error::SelfLoop(u));
        }
        let a = self.node_index(u).ok_or(Error::UnknownNode(u))?;
        let b = self.node_index(v).ok_or(Error::UnknownNode(v))?;
        self.graph.update_edge(a, b, bond);
        Ok(())
    }

    /// Add every bond of an edge list, e.g. the output of bond inference.
    pub fn extend_bonds(
        &mut self,
        bonds: impl IntoIterator<Item = (usize, usize, Bond)>,
    ) -> Result<()> {
        for (u, v, bond) in bonds {
            self.add_bond(u, v, bond)?;
        }
        Ok(())
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.index_of.contains_key(&id)
    }

    /// Return all node ids in ascending order.
    pub fn node_ids(&self) -> Vec<usize> {
        let mut ids = self.id_of.clone();
        ids.sort_unstable();
        ids
    }

    /// Iterate over `(id, atom)` pairs in insertion order.
    pub fn atoms(&self) -> impl Iterator<Item = (usize, &Atom)> + '_ {
        self.graph
            .node_indices()
            .map(|ix| (self.id_of[ix.index()], &self.graph[ix]))
    }

    pub fn atom(&self, id: usize) -> Option<&Atom> {
        self.node_index(id).map(|ix| &self.graph[ix])
    }

    /// Iterate over `(u, v, bond)` triples in insertion order.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize, &Bond)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                self.id_of[e.source().index()],
                self.id_of[e.target().index()],
                e.weight(),
            )
        })
    }

    pub fn bond(&self, u: usize, v: usize) -> Option<&Bond> {
        let e = self.graph.find_edge(self.node_index(u)?, self.node_index(v)?)?;
        self.graph.edge_weight(e)
    }

    /// Return the neighbors of `id` in ascending id order (empty if `id` is
    /// not in the graph).
    pub fn neighbors(&self, id: usize) -> Vec<usize> {
        let Some(ix) = self.node_index(id) else {
            return Vec::new();
        };
        let mut out: Vec<usize> = self
            .graph
            .neighbors(ix)
            .map(|n| self.id_of[n.index()])
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of bonds incident to `id`, whatever their order.
    pub fn degree(&self, id: usize) -> usize {
        self.node_index(id)
            .map_or(0, |ix| self.graph.neighbors(ix).count())
    }

    /// Position of node `id`; fails if the node has none.
    pub fn position(&self, id: usize) -> Result<&[f64]> {
        self.atom(id)
            .ok_or(Error::UnknownNode(id))?
            .position()
            .ok_or_else(|| Error::missing(id, "position"))
    }

    /// Atomic number of node `id`; fails if the node has none.
    pub fn atom_number(&self, id: usize) -> Result<u32> {
        self.atom(id)
            .ok_or(Error::UnknownNode(id))?
            .atom_number()
            .ok_or_else(|| Error::missing(id, "atom_number"))
    }

    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Set `key` to `value` unless the graph already carries a value for it.
    pub fn set_default_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.entry(key.into()).or_insert_with(|| value.into());
    }

    /// The `name` metadata entry, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }

    /// Return a new graph with every hydrogen atom and its bonds removed.
    ///
    /// Node ids, attributes, and metadata are carried over unchanged.
    pub fn without_hydrogens(&self) -> MolGraph {
        let mut depleted = MolGraph {
            metadata: self.metadata.clone(),
            ..Default::default()
        };
        for (id, atom) in self.atoms().filter(|(_, a)| !a.is_hydrogen()) {
            let ix = depleted.graph.add_node(atom.clone());
            depleted.index_of.insert(id, ix);
            depleted.id_of.push(id);
        }
        for (u, v, bond) in self.bonds() {
            if let (Some(a), Some(b)) = (depleted.node_index(u), depleted.node_index(v)) {
                depleted.graph.add_edge(a, b, bond.clone());
            }
        }
        depleted
    }

    /// Return `true` iff any atom is a hydrogen.
    pub fn has_hydrogens(&self) -> bool {
        self.graph.node_weights().any(Atom::is_hydrogen)
    }

    /// Hydrogen-free view: `self` when there are no hydrogens, else the copy
    /// made by [`MolGraph::without_hydrogens`].
    pub fn heavy_atoms(&self) -> Cow<'_, MolGraph> {
        if self.has_hydrogens() {
            Cow::Owned(self.without_hydrogens())
        } else {
            Cow::Borrowed(self)
        }
    }

    pub(crate) fn graph(&self) -> &MGraph {
        &self.graph
    }

    pub(crate) fn node_index(&self, id: usize) -> Option<NodeIndex<Index>> {
        self.index_of.get(&id).copied()
    }

    pub(crate) fn id_of(&self, ix: NodeIndex<Index>) -> usize {
        self.id_of[ix.index()]
    }
}

/// A [`MolGraph`] together with a name.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    name: String,
    graph: MolGraph,
}

impl Molecule {
    pub fn new(name: impl Into<String>, graph: MolGraph) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }

    /// Wrap `graph`, taking the name from its `name` metadata or falling
    /// back to `fallback`.
    pub fn from_graph(graph: MolGraph, fallback: &str) -> Self {
        let name = graph.name().unwrap_or(fallback).to_string();
        Self { name, graph }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &MolGraph {
        &self.graph
    }
}

/// Anything that exposes an attributed molecular graph.
pub trait AsMolGraph {
    fn mol_graph(&self) -> &MolGraph;

    /// Name used to key per-molecule results, if any.
    fn label(&self) -> Option<&str> {
        self.mol_graph().name()
    }
}

impl AsMolGraph for MolGraph {
    fn mol_graph(&self) -> &MolGraph {
        self
    }
}

impl<T: AsMolGraph + ?Sized> AsMolGraph for &T {
    fn mol_graph(&self) -> &MolGraph {
        (**self).mol_graph()
    }

    fn label(&self) -> Option<&str> {
        (**self).label()
    }
}

impl AsMolGraph for Molecule {
    fn mol_graph(&self) -> &MolGraph {
        &self.graph
    }

    fn label(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Serialized form of a [`MolGraph`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphRecord {
    #[serde(default)]
    metadata: Attributes,
    #[serde(default)]
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<BondRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AtomRecord {
    id: usize,
    #[serde(flatten)]
    atom: Atom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BondRecord {
    u: usize,
    v: usize,
    #[serde(flatten)]
    bond: Bond,
}

impl TryFrom<GraphRecord> for MolGraph {
    type Error = Error;
    fn try_from(record: GraphRecord) -> Result<Self> {
        let mut g = MolGraph::from_parts(
            record.atoms.into_iter().map(|a| (a.id, a.atom)),
            record.bonds.into_iter().map(|b| (b.u, b.v, b.bond)),
        )?;
        g.metadata = record.metadata;
        Ok(g)
    }
}

impl From<MolGraph> for GraphRecord {
    fn from(g: MolGraph) -> Self {
        let bonds = g
            .bonds()
            .map(|(u, v, bond)| BondRecord {
                u,
                v,
                bond: bond.clone(),
            })
            .collect();
        let atoms = g
            .atoms()
            .map(|(id, atom)| AtomRecord {
                id,
                atom: atom.clone(),
            })
            .collect();
        GraphRecord {
            metadata: g.metadata,
            atoms,
            bonds,
        }
    }
}
