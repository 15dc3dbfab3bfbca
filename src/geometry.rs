//! Bond lengths, bond angles, and dihedral angles from atom positions.
//!
//! Positions are plain coordinate slices. Lengths and angles work in any
//! dimension as long as all inputs agree; dihedrals need 3-vectors.

use crate::error::{Error, Result};

fn check_dims(name: &str, vectors: &[&[f64]]) -> Result<()> {
    let dims: Vec<usize> = vectors.iter().map(|v| v.len()).collect();
    if dims.windows(2).any(|w| w[0] != w[1]) {
        return Err(Error::InvalidGeometry(format!(
            "{name}: position vectors have different dimensions {dims:?}"
        )));
    }
    Ok(())
}

fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn cross(a: &[f64], b: &[f64]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Subtract from `v` its component along the unit vector `axis`.
fn reject(v: &[f64], axis: &[f64]) -> Vec<f64> {
    let along = dot(v, axis);
    v.iter().zip(axis).map(|(x, a)| x - along * a).collect()
}

/// Euclidean distance between two positions.
pub fn bond_length(p1: &[f64], p2: &[f64]) -> Result<f64> {
    check_dims("bond length", &[p1, p2])?;
    Ok(norm(&sub(p1, p2)))
}

/// Angle in degrees, in `[0, 180]`, between the bonds `center`-`p1` and
/// `center`-`p2`.
///
/// Coincident points (identical outer positions, or an outer atom sitting on
/// the center) give `0.0`.
pub fn bond_angle(center: &[f64], p1: &[f64], p2: &[f64]) -> Result<f64> {
    check_dims("bond angle", &[center, p1, p2])?;
    if p1 == p2 {
        return Ok(0.0);
    }

    let b1 = sub(center, p1);
    let b2 = sub(center, p2);
    let (l1, l2) = (norm(&b1), norm(&b2));
    if l1 == 0.0 || l2 == 0.0 {
        return Ok(0.0);
    }

    // Clamp to absorb rounding just outside [-1, 1].
    let cosine = (dot(&b1, &b2) / (l1 * l2)).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Weighted mean of `positions`; equal weights when `weights` is `None`.
pub fn center_of_mass(positions: &[&[f64]], weights: Option<&[f64]>) -> Result<Vec<f64>> {
    let Some(first) = positions.first() else {
        return Err(Error::InvalidGeometry(
            "center of mass: no positions".to_string(),
        ));
    };
    check_dims("center of mass", positions)?;

    let unit = vec![1.0; positions.len()];
    let weights = weights.unwrap_or(&unit);
    if weights.len() != positions.len() {
        return Err(Error::InvalidGeometry(format!(
            "center of mass: {} positions but {} weights",
            positions.len(),
            weights.len()
        )));
    }
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(Error::InvalidGeometry(
            "center of mass: weights sum to zero".to_string(),
        ));
    }

    let mut center = vec![0.0; first.len()];
    for (p, w) in positions.iter().zip(weights) {
        for (c, x) in center.iter_mut().zip(p.iter()) {
            *c += w * x;
        }
    }
    Ok(center.into_iter().map(|c| c / total).collect())
}

/// Signed dihedral angle in degrees, in `[0, 360)`, of the chain
/// `p1`-`p2`-`p3`-`p4` about the central bond `p2`-`p3`.
///
/// A planar trans chain gives `180.0`, a planar cis chain gives `0.0`.
pub fn dihedral_angle(p1: &[f64], p2: &[f64], p3: &[f64], p4: &[f64]) -> Result<f64> {
    check_dims("dihedral angle", &[p1, p2, p3, p4])?;
    if p1.len() != 3 {
        return Err(Error::InvalidGeometry(format!(
            "dihedral angle: needs 3-dimensional positions, got {}",
            p1.len()
        )));
    }

    let outer_1 = sub(p1, p2);
    let center = sub(p3, p2);
    let outer_2 = sub(p4, p3);

    let center_length = norm(&center);
    if center_length == 0.0 {
        return Err(Error::InvalidGeometry(
            "dihedral angle: central bond has zero length".to_string(),
        ));
    }
    let axis: Vec<f64> = center.iter().map(|c| c / center_length).collect();

    // Project both outer bonds onto the plane perpendicular to the central
    // bond; the dihedral is the signed angle between the projections.
    let v = reject(&outer_1, &axis);
    let w = reject(&outer_2, &axis);
    let x = dot(&v, &w);
    let y = dot(&cross(&axis, &v), &w);

    let angle = y.atan2(x).to_degrees();
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    // Wrapping a tiny negative angle can round up to exactly 360, and a
    // negative zero should read as zero.
    if angle >= 360.0 || angle == 0.0 {
        Ok(0.0)
    } else {
        Ok(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn length() {
        assert_abs_diff_eq!(
            bond_length(&[0.0, 0.0, 0.0], &[1.0, 2.0, 2.0]).unwrap(),
            3.0,
            epsilon = 1e-12
        );
        assert!(matches!(
            bond_length(&[0.0, 0.0, 0.0], &[1.0, 2.0]),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn right_angle() {
        let angle = bond_angle(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(angle, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn straight_and_degenerate_angles() {
        let straight = bond_angle(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[-2.0, 0.0, 0.0]).unwrap();
        assert_abs_diff_eq!(straight, 180.0, epsilon = 1e-9);

        let same = bond_angle(&[0.0, 0.0, 0.0], &[1.0, 1.0, 0.0], &[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(same, 0.0);

        let on_center = bond_angle(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(on_center, 0.0);
        let both = bond_angle(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(both, 0.0);
        assert!(matches!(
            bond_angle(&[0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn angle_in_two_dimensions() {
        let angle = bond_angle(&[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(angle, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn centroid() {
        let positions: [&[f64]; 3] = [&[0.0, 0.0, 0.0], &[2.0, 0.0, 0.0], &[1.0, 3.0, 0.0]];
        let center = center_of_mass(&positions, None).unwrap();
        assert_abs_diff_eq!(center[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(center[1], 1.0, epsilon = 1e-12);

        let weighted = center_of_mass(&positions[..2], Some(&[3.0, 1.0][..])).unwrap();
        assert_abs_diff_eq!(weighted[0], 0.5, epsilon = 1e-12);

        assert!(center_of_mass(&positions, Some(&[1.0][..])).is_err());
        assert!(center_of_mass(&[], None).is_err());
        let ragged: [&[f64]; 2] = [&[0.0, 0.0], &[1.0, 0.0, 0.0]];
        assert!(center_of_mass(&ragged, None).is_err());
        assert!(center_of_mass(&positions[..2], Some(&[1.0, -1.0][..])).is_err());
    }

    #[test]
    fn trans_and_cis() {
        let (p1, p2, p3) = ([0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);

        let trans = dihedral_angle(&p1, &p2, &p3, &[1.0, -1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(trans, 180.0, epsilon = 1e-9);

        let cis = dihedral_angle(&p1, &p2, &p3, &[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(cis, 0.0);
        assert!(cis.is_sign_positive());
    }

    #[test]
    fn dihedral_sign_and_wrap() {
        let (p1, p2, p3) = ([0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);

        let plus = dihedral_angle(&p1, &p2, &p3, &[1.0, 0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(plus, 90.0, epsilon = 1e-9);

        // The mirror image wraps from -90 to 270.
        let minus = dihedral_angle(&p1, &p2, &p3, &[1.0, 0.0, -1.0]).unwrap();
        assert_abs_diff_eq!(minus, 270.0, epsilon = 1e-9);

        // Just below zero wraps to just below 360, never to 360 itself.
        let almost = dihedral_angle(&p1, &p2, &p3, &[1.0, 1.0, -1e-9]).unwrap();
        assert!(almost > 359.0 && almost < 360.0);
    }

    #[test]
    fn dihedral_rejects_bad_input() {
        let o = [0.0, 0.0, 0.0];
        let x = [1.0, 0.0, 0.0];
        assert!(matches!(
            dihedral_angle(&x, &o, &o, &x),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            dihedral_angle(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 0.0], &[1.0, 1.0]),
            Err(Error::InvalidGeometry(_))
        ));
    }
}
