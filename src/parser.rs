//! Named geometry parsers: extract labelled bond lengths, bond angles, and
//! dihedral angles from a molecular graph with positions.
//!
//! Parsers live in an explicit [`ParserRegistry`] owned by the caller, which
//! starts either empty or with the three built-in parsers and can be extended
//! with [`ParserRegistry::register`].

use std::{collections::BTreeMap, fmt, str::FromStr};

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    geometry::{bond_angle, bond_length, dihedral_angle},
    molecule::{AsMolGraph, MolGraph},
    paths::simple_paths,
};

/// Name reserved for selecting every registered parser.
pub const ALL: &str = "all";

/// One geometric quantity, labelled by the node ids that define it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub atoms: Vec<usize>,
    pub value: f64,
}

impl Measurement {
    pub fn new(atoms: Vec<usize>, value: f64) -> Self {
        Self { atoms, value }
    }
}

/// The built-in geometry parsers.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum GeometryParser {
    /// One bond length per bond, labelled `(u, v)`.
    Bonds,
    /// One bond angle per path of two bonds, labelled `(end, center, end)`.
    Angles,
    /// One dihedral angle per path of three bonds, labelled in path order.
    Dihedrals,
}

impl GeometryParser {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryParser::Bonds => "bonds",
            GeometryParser::Angles => "angles",
            GeometryParser::Dihedrals => "dihedrals",
        }
    }

    /// Run this parser on `mol`.
    pub fn parse<G: AsMolGraph + ?Sized>(&self, mol: &G) -> Result<Vec<Measurement>> {
        match self {
            GeometryParser::Bonds => parse_bonds(mol),
            GeometryParser::Angles => parse_angles(mol),
            GeometryParser::Dihedrals => parse_dihedrals(mol),
        }
    }
}

impl fmt::Display for GeometryParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryParser {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        GeometryParser::value_variants()
            .iter()
            .find(|p| p.name() == s)
            .copied()
            .ok_or_else(|| Error::UnregisteredParser(s.to_string()))
    }
}

/// Bond length of every bond, in insertion order.
pub fn parse_bonds<G: AsMolGraph + ?Sized>(mol: &G) -> Result<Vec<Measurement>> {
    let g = mol.mol_graph();
    g.bonds()
        .map(|(u, v, _)| {
            let length = bond_length(g.position(u)?, g.position(v)?)?;
            Ok(Measurement::new(vec![u, v], length))
        })
        .collect()
}

/// Bond angle at the middle atom of every path of two bonds.
pub fn parse_angles<G: AsMolGraph + ?Sized>(mol: &G) -> Result<Vec<Measurement>> {
    let g = mol.mol_graph();
    simple_paths(g, 2)
        .into_iter()
        .map(|path| {
            let angle = bond_angle(
                g.position(path[1])?,
                g.position(path[0])?,
                g.position(path[2])?,
            )?;
            Ok(Measurement::new(path, angle))
        })
        .collect()
}

/// Dihedral angle of every path of three bonds.
pub fn parse_dihedrals<G: AsMolGraph + ?Sized>(mol: &G) -> Result<Vec<Measurement>> {
    let g = mol.mol_graph();
    simple_paths(g, 3)
        .into_iter()
        .map(|path| {
            let angle = dihedral_angle(
                g.position(path[0])?,
                g.position(path[1])?,
                g.position(path[2])?,
                g.position(path[3])?,
            )?;
            Ok(Measurement::new(path, angle))
        })
        .collect()
}

/// A registered parser.
pub type ParserFn = Box<dyn Fn(&MolGraph) -> Result<Vec<Measurement>> + Send + Sync>;

/// Which parsers to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
    All,
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        if name == ALL {
            Selection::All
        } else {
            Selection::One(name.to_string())
        }
    }
}

impl From<GeometryParser> for Selection {
    fn from(parser: GeometryParser) -> Self {
        Selection::One(parser.name().to_string())
    }
}

impl<S: AsRef<str>> From<&[S]> for Selection {
    fn from(names: &[S]) -> Self {
        Selection::Many(names.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl From<Vec<String>> for Selection {
    fn from(names: Vec<String>) -> Self {
        Selection::Many(names)
    }
}

/// Parsers by name.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, ParserFn>,
}

impl ParserRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `bonds`, `angles`, and `dihedrals` parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for parser in GeometryParser::value_variants() {
            let parser = *parser;
            registry.parsers.insert(
                parser.name().to_string(),
                Box::new(move |g: &MolGraph| parser.parse(g)),
            );
        }
        registry
    }

    /// Register `parser` under `name`. Names are unique and `"all"` is
    /// reserved.
    pub fn register<F>(&mut self, name: impl Into<String>, parser: F) -> Result<()>
    where
        F: Fn(&MolGraph) -> Result<Vec<Measurement>> + Send + Sync + 'static,
    {
        let name = name.into();
        if name == ALL {
            return Err(Error::unsupported("parser name", name));
        }
        if self.parsers.contains_key(&name) {
            return Err(Error::DuplicateParser(name));
        }
        self.parsers.insert(name, Box::new(parser));
        Ok(())
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parsers.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Run the parser registered as `name` on `mol`.
    pub fn run<G: AsMolGraph + ?Sized>(&self, name: &str, mol: &G) -> Result<Vec<Measurement>> {
        let parser = self
            .parsers
            .get(name)
            .ok_or_else(|| Error::UnregisteredParser(name.to_string()))?;
        parser(mol.mol_graph())
    }

    /// Run every selected parser on `mol`, keyed by parser name.
    ///
    /// All names are checked before anything runs.
    pub fn parse<G: AsMolGraph + ?Sized>(
        &self,
        mol: &G,
        selection: impl Into<Selection>,
    ) -> Result<BTreeMap<String, Vec<Measurement>>> {
        let names: Vec<String> = match selection.into() {
            Selection::One(name) => vec![name],
            Selection::Many(names) => names,
            Selection::All => self.parsers.keys().cloned().collect(),
        };
        if let Some(unknown) = names.iter().find(|n| !self.contains(n)) {
            return Err(Error::UnregisteredParser(unknown.clone()));
        }

        names
            .into_iter()
            .map(|name| {
                let result = self.run(&name, mol)?;
                Ok((name, result))
            })
            .collect()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}
