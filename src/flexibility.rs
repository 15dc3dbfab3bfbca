//! Flexibility score: root-mean-square bond rigidity over the heavy-atom
//! skeleton.
//!
//! Each bond scores the product of a branching factor, a hybridization
//! factor, a bond-order factor, and a ring factor. Acyclic single bonds
//! score highest; double bonds and ring bonds score near zero.

use log::warn;

use crate::{
    error::Result,
    molecule::{AsMolGraph, MolGraph, CARBON},
    rings::{cycle_basis, smallest_ring_containing},
};

/// Hybridization factor of one bond endpoint.
fn hybridization(g: &MolGraph, id: usize) -> Result<f64> {
    if g.atom_number(id)? == CARBON && g.degree(id) < 4 {
        Ok(0.5)
    } else {
        Ok(1.0)
    }
}

/// Near 0 for bond order 2, near 1 for orders 1 and 3.
fn bond_order_factor(order: f64) -> f64 {
    1.0 - (-4.0 * (order - 2.0).powi(6)).exp()
}

/// 1 outside rings, smaller for bonds in smaller rings.
fn ring_factor(ring_size: Option<usize>) -> f64 {
    match ring_size {
        Some(k) => 0.5 * (1.0 - (-0.06 * k as f64).exp()),
        None => 1.0,
    }
}

/// Flexibility score of `mol`, ignoring hydrogens.
///
/// Bonds with no order or order `0` are skipped and do not count towards
/// the mean. A graph whose bonds carry no order at all scores `0.0`.
pub fn flexibility<G: AsMolGraph + ?Sized>(mol: &G) -> Result<f64> {
    let g = mol.mol_graph().heavy_atoms();

    if g.bonds().all(|(_, _, bond)| bond.order().is_none()) {
        warn!("no bond orders found, flexibility is 0");
        return Ok(0.0);
    }

    let basis = cycle_basis(&*g);
    let mut sum = 0.0;
    let mut considered = 0usize;

    for (u, v, bond) in g.bonds() {
        let Some(order) = bond.order().filter(|o| *o != 0.0) else {
            continue;
        };
        let branch = 2.0 / ((g.degree(u) * g.degree(v)) as f64).sqrt();
        let hyb = hybridization(&g, u)? * hybridization(&g, v)?;
        let ring = ring_factor(smallest_ring_containing(&basis, u, v));

        let val = branch * ring * bond_order_factor(order) * hyb;
        sum += val * val;
        considered += 1;
    }

    if considered == 0 {
        return Ok(0.0);
    }
    Ok((sum / considered as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        molecule::{fixtures, Atom, Bond},
    };
    use approx::assert_relative_eq;

    const SINGLE: f64 = 0.981_684_361_111_265_8; // 1 - exp(-4)

    #[test]
    fn propane() {
        // Both bonds join a terminal carbon to the middle one.
        let expected = 2.0 / 2f64.sqrt() * 0.25 * SINGLE;
        assert_relative_eq!(
            flexibility(&fixtures::chain(3)).unwrap(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn hydrogens_are_ignored() {
        let expected = 2.0 * 0.25 * SINGLE;
        assert_relative_eq!(
            flexibility(&fixtures::ethane()).unwrap(),
            expected,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            flexibility(&fixtures::ethane()).unwrap(),
            flexibility(&fixtures::chain(2)).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn double_bonds_are_rigid() {
        let mut g = fixtures::chain(2);
        g.add_bond(0, 1, Bond::new(2.0)).unwrap();
        assert_eq!(flexibility(&g).unwrap(), 0.0);
    }

    #[test]
    fn kekule_ring() {
        let mut g = fixtures::ring(6, CARBON);
        for i in (0..6).step_by(2) {
            g.add_bond(i, i + 1, Bond::new(2.0)).unwrap();
        }
        let single = 0.25 * ring_factor(Some(6)) * SINGLE;
        assert_relative_eq!(
            flexibility(&g).unwrap(),
            single / 2f64.sqrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn invariant_under_relabelling() {
        // Methylcyclopentene with a nitrogen in the ring.
        let atoms = [CARBON, CARBON, CARBON, 7, CARBON, CARBON];
        let bonds = [
            (0, 1, 1.0),
            (1, 2, 2.0),
            (2, 3, 1.0),
            (3, 4, 1.0),
            (4, 0, 1.0),
            (0, 5, 1.0),
        ];
        let build = |perm: &[usize]| {
            MolGraph::from_parts(
                atoms
                    .iter()
                    .enumerate()
                    .map(|(i, z)| (perm[i], Atom::new(*z))),
                bonds
                    .iter()
                    .map(|&(u, v, o)| (perm[u], perm[v], Bond::new(o))),
            )
            .unwrap()
        };

        let reference = flexibility(&build(&[0, 1, 2, 3, 4, 5])).unwrap();
        assert!(reference > 0.0);
        for perm in [[5, 4, 3, 2, 1, 0], [12, 40, 3, 7, 21, 0], [2, 0, 5, 1, 3, 4]] {
            assert_relative_eq!(
                flexibility(&build(&perm)).unwrap(),
                reference,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn inactive_bonds_are_skipped() {
        let mut g = fixtures::chain(3);
        g.add_atom(3, Atom::new(CARBON)).unwrap();
        g.add_bond(2, 3, Bond::new(0.0)).unwrap();
        // The zero-order bond still counts towards degrees.
        let expected = ((2.0 / 2f64.sqrt()).powi(2) + 1.0) / 2.0;
        assert_relative_eq!(
            flexibility(&g).unwrap(),
            expected.sqrt() * 0.25 * SINGLE,
            max_relative = 1e-12
        );
    }

    #[test]
    fn missing_orders_give_zero() {
        assert_eq!(flexibility(&MolGraph::new()).unwrap(), 0.0);

        let g = MolGraph::from_parts(
            (0..3).map(|i| (i, Atom::new(CARBON))),
            [(0, 1, Bond::default()), (1, 2, Bond::default())],
        )
        .unwrap();
        assert_eq!(flexibility(&g).unwrap(), 0.0);
    }

    #[test]
    fn missing_atom_number_fails() {
        let mut g = fixtures::chain(2);
        g.add_atom(2, Atom::default()).unwrap();
        g.add_bond(1, 2, Bond::new(1.0)).unwrap();
        assert!(matches!(
            flexibility(&g),
            Err(Error::MissingAttribute { attribute: "atom_number", .. })
        ));
    }
}
