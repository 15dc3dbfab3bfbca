//! Per-molecule descriptor summaries.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;

use crate::{
    error::Result,
    flexibility::flexibility,
    molecule::AsMolGraph,
    shape::{shape_indices, KierOptions, ShapeIndices},
};

/// Counts, shape indices, and flexibility of one molecule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub name: String,
    pub atoms: usize,
    pub bonds: usize,
    pub shape: ShapeIndices,
    pub flexibility: f64,
}

/// Compute the [`Report`] of `mol`. Unnamed molecules get an empty name.
pub fn describe<G: AsMolGraph + ?Sized>(mol: &G, options: KierOptions) -> Result<Report> {
    let g = mol.mol_graph();
    Ok(Report {
        name: mol.label().unwrap_or_default().to_string(),
        atoms: g.atom_count(),
        bonds: g.bond_count(),
        shape: shape_indices(g, options)?,
        flexibility: flexibility(g)?,
    })
}

/// [`describe`] every molecule of `mols` in parallel.
///
/// Results are in input order; a failure affects only its own molecule.
pub fn describe_all<G>(mols: &[G], options: KierOptions) -> Vec<Result<Report>>
where
    G: AsMolGraph + Sync,
{
    mols.par_iter().map(|mol| describe(mol, options)).collect()
}
