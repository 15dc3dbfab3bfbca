// Error type shared by every module
pub mod error;

// Periodic table and covalent radii
pub mod elements;

// Molecule definition: attributed graph, hydrogen depletion, JSON format
pub mod molecule;

// Simple paths of fixed length
pub mod paths;

// Lengths, angles, and dihedrals from positions
pub mod geometry;

// Named geometry parsers and their registry
pub mod parser;

// Cycle basis
pub mod rings;

// Kier shape indices and Shannon entropy
pub mod shape;

// Bond-rigidity based flexibility score
pub mod flexibility;

// Subgraph matching
pub mod isomorphism;

// Batch descriptor reports
pub mod report;

// Python library
#[cfg(feature = "python")]
pub mod python;

pub use error::{Error, Result};
pub use molecule::{AsMolGraph, Atom, Bond, MolGraph, Molecule};
