//! Kier shape indices and Shannon entropy of a molecular graph.
//!
//! The kappa indices compare the number of paths of length `m` in a molecule
//! with the extremes possible for its atom count; see Kier, *Quant. Struct.
//! Act. Relat.* 4 (1985) and 8 (1989). The optional alpha correction accounts
//! for atoms that are larger or smaller than an sp3 carbon.

use std::{borrow::Cow, collections::BTreeMap, str::FromStr};

use clap::ValueEnum;
use log::warn;
use serde::Serialize;

use crate::{
    elements::covalent_radius,
    error::{Error, Result},
    geometry::bond_length,
    molecule::{AsMolGraph, MolGraph, CARBON},
    paths::count_simple_paths,
    rings::cycle_basis,
};

/// Length of an sp3 carbon-carbon bond in Angstrom.
pub const SP3_CC_BOND_LENGTH: f64 = 1.535;

/// Kier's hybridization radii keyed by (atomic number, number of neighbors).
const KIER_RADII: &[((u32, usize), f64)] = &[
    ((6, 4), 0.77),
    ((6, 3), 0.67),
    ((6, 2), 0.6),
    ((7, 3), 0.74),
    ((7, 2), 0.62),
    ((7, 1), 0.55),
    ((8, 2), 0.74),
    ((8, 1), 0.62),
    ((9, 1), 0.72),
    ((15, 5), 1.1),
    ((15, 4), 1.1),
    ((15, 3), 1.1),
    ((15, 2), 1.0),
    ((15, 1), 0.95),
    ((16, 4), 1.04),
    ((16, 3), 1.04),
    ((16, 2), 1.04),
    ((16, 1), 0.94),
    ((17, 1), 0.99),
    ((35, 1), 1.14),
    ((53, 1), 1.33),
];

const SP3_CARBON_RADIUS: f64 = 0.77;

fn kier_radius(atom_number: u32, degree: usize) -> Option<f64> {
    KIER_RADII
        .iter()
        .find(|(key, _)| *key == (atom_number, degree))
        .map(|(_, r)| *r)
}

/// How the alpha correction is computed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum AlphaMode {
    /// Sum over heavy atoms of `r(atom) / r(C) - 1` using covalent radii.
    #[default]
    #[value(alias = "a")]
    AtomicRadius,
    /// Sum over bonds of `length / 1.535 - 1`; needs positions.
    #[value(alias = "b")]
    BondLength,
    /// Kier's original hybridization-radius table. Also discards hydrogens
    /// before computing kappa and phi.
    Legacy,
}

impl FromStr for AlphaMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a" | "atomic-radius" => Ok(AlphaMode::AtomicRadius),
            "b" | "bond-length" => Ok(AlphaMode::BondLength),
            "legacy" => Ok(AlphaMode::Legacy),
            _ => Err(Error::unsupported("alpha mode", s)),
        }
    }
}

/// Options shared by the kappa and phi descriptors.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct KierOptions {
    /// Apply the alpha correction.
    pub alpha: bool,
    /// Alpha flavour; [`AlphaMode::Legacy`] also drops hydrogens even when
    /// `alpha` is off.
    pub mode: AlphaMode,
}

impl KierOptions {
    pub fn with_alpha(mode: AlphaMode) -> Self {
        Self { alpha: true, mode }
    }
}

/// Working graph for kappa/phi: hydrogen-free in legacy mode only.
fn kier_graph(g: &MolGraph, options: KierOptions) -> Cow<'_, MolGraph> {
    if options.mode == AlphaMode::Legacy {
        g.heavy_atoms()
    } else {
        Cow::Borrowed(g)
    }
}

/// Alpha correction of `mol`, ignoring hydrogens.
pub fn kier_alpha<G: AsMolGraph + ?Sized>(mol: &G, mode: AlphaMode) -> Result<f64> {
    let g = mol.mol_graph().heavy_atoms();

    match mode {
        AlphaMode::AtomicRadius => {
            let carbon = covalent_radius(CARBON)?;
            g.atoms().try_fold(0.0, |acc, (id, atom)| {
                let z = atom.atom_number().ok_or_else(|| Error::missing(id, "atom_number"))?;
                Ok(acc + covalent_radius(z)? / carbon - 1.0)
            })
        }
        AlphaMode::BondLength => g.bonds().try_fold(0.0, |acc, (u, v, _)| {
            let length = bond_length(g.position(u)?, g.position(v)?)?;
            Ok(acc + length / SP3_CC_BOND_LENGTH - 1.0)
        }),
        AlphaMode::Legacy => {
            warn!("legacy alpha mode is only meant for uncharged, non-radical molecules");
            g.atoms().try_fold(0.0, |acc, (id, atom)| {
                let z = atom.atom_number().ok_or_else(|| Error::missing(id, "atom_number"))?;
                let degree = g.degree(id);
                let radius = kier_radius(z, degree).unwrap_or_else(|| {
                    warn!(
                        "no Kier radius for atomic number {z} with {degree} neighbors, \
                         using sp3 carbon"
                    );
                    SP3_CARBON_RADIUS
                });
                Ok(acc + radius / SP3_CARBON_RADIUS - 1.0)
            })
        }
    }
}

/// Shannon entropy (base 10) of the heavy-atom types of `mol`, where an atom
/// type is the pair (atomic number, number of heavy neighbors).
pub fn shannon_entropy<G: AsMolGraph + ?Sized>(mol: &G) -> Result<f64> {
    let g = mol.mol_graph().heavy_atoms();
    let num_atoms = g.atom_count();
    if num_atoms == 0 {
        return Ok(0.0);
    }

    let mut types: BTreeMap<(u32, usize), usize> = BTreeMap::new();
    for (id, atom) in g.atoms() {
        let z = atom.atom_number().ok_or_else(|| Error::missing(id, "atom_number"))?;
        *types.entry((z, g.degree(id))).or_default() += 1;
    }

    let mut entropy = 0.0;
    for count in types.values() {
        let freq = *count as f64 / num_atoms as f64;
        entropy -= freq * freq.log10();
    }
    Ok(entropy)
}

/// Kier kappa shape index of order `m` (0 to 3).
///
/// Order 0 is the Shannon entropy scaled by the atom count. Orders 1 to 3
/// count paths of one, two, and three bonds respectively, so zero-order
/// bonds never count as bonds. Order 3 logs a caveat about three-membered
/// rings, but only when the cycle basis actually contains one.
pub fn kier_kappa<G: AsMolGraph + ?Sized>(mol: &G, m: u32, options: KierOptions) -> Result<f64> {
    if m > 3 {
        return Err(Error::unsupported("kappa order", m));
    }

    let g = kier_graph(mol.mol_graph(), options);
    let alpha = if options.alpha {
        kier_alpha(&*g, options.mode)?
    } else {
        0.0
    };
    let num_atoms = g.atom_count();
    let a = num_atoms as f64 + alpha;

    let (numerator, p) = match m {
        0 => return Ok(shannon_entropy(&*g)? * num_atoms as f64),
        1 => (a * (a - 1.0).powi(2), count_simple_paths(&*g, 1)),
        2 => ((a - 1.0) * (a - 2.0).powi(2), count_simple_paths(&*g, 2)),
        _ => {
            if num_atoms < 3 {
                return Err(Error::TooFewAtoms {
                    required: 3,
                    found: num_atoms,
                });
            }
            if cycle_basis(&*g).iter().any(|ring| ring.len() == 3) {
                warn!("kappa-3 may be unreliable for molecules with three-membered rings");
            }
            let numerator = if num_atoms % 2 == 0 {
                (a - 3.0) * (a - 2.0).powi(2)
            } else {
                (a - 1.0) * (a - 3.0).powi(2)
            };
            (numerator, count_simple_paths(&*g, 3))
        }
    };

    let denominator = (p as f64 + alpha).powi(2);
    if denominator == 0.0 {
        return Err(Error::DegenerateDescriptor(format!(
            "kappa-{m} of a graph with no paths of length {m}"
        )));
    }
    Ok(numerator / denominator)
}

/// Kier flexibility index phi = kappa1 * kappa2 / A.
pub fn kier_phi<G: AsMolGraph + ?Sized>(mol: &G, options: KierOptions) -> Result<f64> {
    let g = kier_graph(mol.mol_graph(), options);
    let num_atoms = g.atom_count();
    if num_atoms == 0 {
        return Err(Error::DegenerateDescriptor(
            "phi of a graph without atoms".to_string(),
        ));
    }
    let k1 = kier_kappa(&*g, 1, options)?;
    let k2 = kier_kappa(&*g, 2, options)?;
    Ok(k1 * k2 / num_atoms as f64)
}

/// All shape descriptors of one molecule. Indices that are undefined for the
/// molecule (too few atoms or no paths) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeIndices {
    pub alpha: Option<f64>,
    pub kappa0: f64,
    pub kappa1: Option<f64>,
    pub kappa2: Option<f64>,
    pub kappa3: Option<f64>,
    pub phi: Option<f64>,
    pub shannon: f64,
}

fn defined(value: Result<f64>) -> Result<Option<f64>> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(Error::DegenerateDescriptor(_) | Error::TooFewAtoms { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Compute every shape descriptor of `mol` with the same options.
pub fn shape_indices<G: AsMolGraph + ?Sized>(
    mol: &G,
    options: KierOptions,
) -> Result<ShapeIndices> {
    let g = mol.mol_graph();
    let alpha = if options.alpha {
        Some(kier_alpha(&*kier_graph(g, options), options.mode)?)
    } else {
        None
    };
    Ok(ShapeIndices {
        alpha,
        kappa0: kier_kappa(g, 0, options)?,
        kappa1: defined(kier_kappa(g, 1, options))?,
        kappa2: defined(kier_kappa(g, 2, options))?,
        kappa3: defined(kier_kappa(g, 3, options))?,
        phi: defined(kier_phi(g, options))?,
        shannon: shannon_entropy(g)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::{fixtures, Atom, Bond, Molecule, HYDROGEN};
    use approx::assert_relative_eq;

    /// Heavy-atom ethanol skeleton C-C-O.
    fn ethanol() -> MolGraph {
        MolGraph::from_parts(
            [(0, Atom::new(6)), (1, Atom::new(6)), (2, Atom::new(8))],
            [(0, 1, Bond::new(1.0)), (1, 2, Bond::new(1.0))],
        )
        .unwrap()
    }

    #[test]
    fn pentane_kappas() {
        let g = fixtures::chain(5);
        let opts = KierOptions::default();
        assert_relative_eq!(kier_kappa(&g, 1, opts).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(kier_kappa(&g, 2, opts).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(kier_kappa(&g, 3, opts).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(kier_phi(&g, opts).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn cyclohexane_kappas() {
        let g = fixtures::ring(6, CARBON);
        let opts = KierOptions::default();
        assert_relative_eq!(kier_kappa(&g, 1, opts).unwrap(), 150.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(kier_kappa(&g, 2, opts).unwrap(), 80.0 / 36.0, epsilon = 1e-12);
        assert_relative_eq!(kier_kappa(&g, 3, opts).unwrap(), 48.0 / 36.0, epsilon = 1e-12);
    }

    #[test]
    fn entropy() {
        assert_eq!(shannon_entropy(&fixtures::ring(6, CARBON)).unwrap(), 0.0);
        assert_eq!(shannon_entropy(&MolGraph::new()).unwrap(), 0.0);

        let expected = -(0.4f64 * 0.4f64.log10() + 0.6f64 * 0.6f64.log10());
        let g = fixtures::chain(5);
        assert_relative_eq!(shannon_entropy(&g).unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(
            kier_kappa(&g, 0, KierOptions::default()).unwrap(),
            5.0 * expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn entropy_ignores_hydrogens() {
        // Both carbons become (6, 1) once hydrogens are gone.
        assert_eq!(shannon_entropy(&fixtures::ethane()).unwrap(), 0.0);
    }

    #[test]
    fn alpha_modes() {
        let g = ethanol();
        assert_relative_eq!(
            kier_alpha(&g, AlphaMode::AtomicRadius).unwrap(),
            0.66 / 0.76 - 1.0,
            epsilon = 1e-12
        );
        // C(1 neighbor) is not tabulated and falls back to sp3 carbon.
        assert_relative_eq!(
            kier_alpha(&g, AlphaMode::Legacy).unwrap(),
            (0.6 / 0.77 - 1.0) + (0.62 / 0.77 - 1.0),
            epsilon = 1e-12
        );
        assert!(matches!(
            kier_alpha(&g, AlphaMode::BondLength),
            Err(Error::MissingAttribute { .. })
        ));
    }

    #[test]
    fn bond_length_alpha() {
        let g = MolGraph::from_parts(
            [
                (0, Atom::new(6).with_position([0.0, 0.0, 0.0])),
                (1, Atom::new(6).with_position([SP3_CC_BOND_LENGTH, 0.0, 0.0])),
                (2, Atom::new(6).with_position([SP3_CC_BOND_LENGTH, 2.0 * SP3_CC_BOND_LENGTH, 0.0])),
            ],
            [(0, 1, Bond::new(1.0)), (1, 2, Bond::new(1.0))],
        )
        .unwrap();
        assert_relative_eq!(kier_alpha(&g, AlphaMode::BondLength).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn alpha_enters_kappa() {
        let g = ethanol();
        let alpha: f64 = 0.66 / 0.76 - 1.0;
        let a = 3.0 + alpha;
        assert_relative_eq!(
            kier_kappa(&g, 1, KierOptions::with_alpha(AlphaMode::AtomicRadius)).unwrap(),
            a * (a - 1.0).powi(2) / (2.0 + alpha).powi(2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn legacy_mode_drops_hydrogens() {
        let g = fixtures::ethane();
        let plain = KierOptions::default();
        let legacy = KierOptions {
            alpha: false,
            mode: AlphaMode::Legacy,
        };
        assert_relative_eq!(kier_kappa(&g, 1, plain).unwrap(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(kier_kappa(&g, 1, legacy).unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(g.atom_count(), 8);
    }

    #[test]
    fn wrapper_and_graph_agree() {
        let g = fixtures::ethane();
        let mol = Molecule::new("ethane", g.clone());
        for mode in [AlphaMode::AtomicRadius, AlphaMode::Legacy] {
            for alpha in [false, true] {
                let opts = KierOptions { alpha, mode };
                for m in 1..=3 {
                    assert_eq!(kier_kappa(&mol, m, opts), kier_kappa(&g, m, opts));
                }
            }
        }
        assert_eq!(shannon_entropy(&mol), shannon_entropy(&g));
    }

    #[test]
    fn rejected_parameters() {
        let g = fixtures::chain(2);
        let opts = KierOptions::default();
        assert_eq!(
            kier_kappa(&g, 4, opts),
            Err(Error::unsupported("kappa order", 4))
        );
        assert_eq!(
            kier_kappa(&g, 3, opts),
            Err(Error::TooFewAtoms {
                required: 3,
                found: 2
            })
        );
        assert!(matches!(
            kier_kappa(&g, 2, opts),
            Err(Error::DegenerateDescriptor(_))
        ));
        assert_eq!("a".parse(), Ok(AlphaMode::AtomicRadius));
        assert_eq!("legacy".parse(), Ok(AlphaMode::Legacy));
        assert!("c".parse::<AlphaMode>().is_err());
    }

    #[test]
    fn kappa_three_with_three_ring() {
        // Methylcyclopropane: the ring branch still yields a value.
        let mut g = fixtures::ring(3, CARBON);
        g.add_atom(3, Atom::new(CARBON)).unwrap();
        g.add_bond(0, 3, Bond::new(1.0)).unwrap();
        assert_eq!(cycle_basis(&g).len(), 1);
        let opts = KierOptions::default();
        assert_relative_eq!(kier_kappa(&g, 3, opts).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_order_bonds_are_not_counted() {
        // Propane whose second bond is present but inactive.
        let mut g = fixtures::chain(3);
        g.add_bond(1, 2, Bond::new(0.0)).unwrap();
        let opts = KierOptions::default();
        assert_relative_eq!(kier_kappa(&g, 1, opts).unwrap(), 12.0, epsilon = 1e-12);
        assert!(matches!(
            kier_kappa(&g, 2, opts),
            Err(Error::DegenerateDescriptor(_))
        ));
    }

    #[test]
    fn missing_atom_number() {
        let mut g = fixtures::chain(2);
        g.add_atom(2, Atom::default()).unwrap();
        g.add_bond(1, 2, Bond::new(1.0)).unwrap();
        assert!(matches!(
            shannon_entropy(&g),
            Err(Error::MissingAttribute { node: 2, .. })
        ));
        assert!(kier_alpha(&g, AlphaMode::AtomicRadius).is_err());
    }

    #[test]
    fn summary() {
        let g = fixtures::chain(2);
        let s = shape_indices(&g, KierOptions::default()).unwrap();
        assert_eq!(s.kappa1, Some(2.0));
        assert_eq!(s.kappa2, None);
        assert_eq!(s.kappa3, None);
        assert_eq!(s.phi, None);
        assert_eq!(s.alpha, None);

        let mut g = fixtures::chain(4);
        g.add_atom(9, Atom::new(HYDROGEN)).unwrap();
        g.add_bond(0, 9, Bond::new(1.0)).unwrap();
        let s = shape_indices(&g, KierOptions::with_alpha(AlphaMode::Legacy)).unwrap();
        assert!(s.alpha.is_some());
        assert!(s.kappa3.is_some());
    }
}
