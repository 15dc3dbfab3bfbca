//! Periodic table with single-bond covalent radii.
//!
//! Radii are the Cordero et al. (2008) values in Angstrom, tabulated up to
//! curium; heavier elements have no radius.

use std::{fmt::Display, str::FromStr};

use crate::error::{Error, Result};

/// Thrown by [`Element::from_str`] if the string does not represent a valid
/// chemical element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseElementError;

macro_rules! periodic_table {
    ( $(($element:ident, $name:literal, $radius:expr),)* ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        /// Represents a chemical element, in atomic number order.
        pub enum Element {
            $( $element, )*
        }

        const ELEMENTS: &[Element] = &[ $( Element::$element, )* ];
        const COVALENT_RADII: &[Option<f64>] = &[ $( $radius, )* ];

        impl Display for Element {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match &self {
                    $( Element::$element => write!(f, "{}", $name), )*
                }
            }
        }

        impl FromStr for Element {
            type Err = ParseElementError;
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Element::$element), )*
                    _ => Err(ParseElementError),
                }
            }
        }
    };
}

periodic_table!(
    (Hydrogen, "H", Some(0.31)),
    (Helium, "He", Some(0.28)),
    (Lithium, "Li", Some(1.3)),
    (Beryllium, "Be", Some(0.96)),
    (Boron, "B", Some(0.84)),
    (Carbon, "C", Some(0.76)),
    (Nitrogen, "N", Some(0.71)),
    (Oxygen, "O", Some(0.66)),
    (Fluorine, "F", Some(0.57)),
    (Neon, "Ne", Some(0.58)),
    (Sodium, "Na", Some(1.7)),
    (Magnesium, "Mg", Some(1.4)),
    (Aluminum, "Al", Some(1.2)),
    (Silicon, "Si", Some(1.1)),
    (Phosphorus, "P", Some(1.1)),
    (Sulfur, "S", Some(1.1)),
    (Chlorine, "Cl", Some(1.0)),
    (Argon, "Ar", Some(1.1)),
    (Potassium, "K", Some(2.0)),
    (Calcium, "Ca", Some(1.8)),
    (Scandium, "Sc", Some(1.7)),
    (Titanium, "Ti", Some(1.6)),
    (Vanadium, "V", Some(1.5)),
    (Chromium, "Cr", Some(1.4)),
    (Manganese, "Mn", Some(1.4)),
    (Iron, "Fe", Some(1.3)),
    (Cobalt, "Co", Some(1.3)),
    (Nickel, "Ni", Some(1.2)),
    (Copper, "Cu", Some(1.3)),
    (Zinc, "Zn", Some(1.2)),
    (Gallium, "Ga", Some(1.2)),
    (Germanium, "Ge", Some(1.2)),
    (Arsenic, "As", Some(1.2)),
    (Selenium, "Se", Some(1.2)),
    (Bromine, "Br", Some(1.2)),
    (Krypton, "Kr", Some(1.2)),
    (Rubidium, "Rb", Some(2.2)),
    (Strontium, "Sr", Some(1.9)),
    (Yttrium, "Y", Some(1.9)),
    (Zirconium, "Zr", Some(1.8)),
    (Niobium, "Nb", Some(1.6)),
    (Molybdenum, "Mo", Some(1.5)),
    (Technetium, "Tc", Some(1.5)),
    (Ruthenium, "Ru", Some(1.5)),
    (Rhodium, "Rh", Some(1.4)),
    (Palladium, "Pd", Some(1.4)),
    (Silver, "Ag", Some(1.4)),
    (Cadmium, "Cd", Some(1.4)),
    (Indium, "In", Some(1.4)),
    (Tin, "Sn", Some(1.4)),
    (Antimony, "Sb", Some(1.4)),
    (Tellurium, "Te", Some(1.4)),
    (Iodine, "I", Some(1.4)),
    (Xenon, "Xe", Some(1.4)),
    (Cesium, "Cs", Some(2.4)),
    (Barium, "Ba", Some(2.1)),
    (Lanthanum, "La", Some(2.1)),
    (Cerium, "Ce", Some(2.0)),
    (Praseodymium, "Pr", Some(2.0)),
    (Neodymium, "Nd", Some(2.0)),
    (Promethium, "Pm", Some(2.0)),
    (Samarium, "Sm", Some(2.0)),
    (Europium, "Eu", Some(2.0)),
    (Gadolinium, "Gd", Some(2.0)),
    (Terbium, "Tb", Some(1.9)),
    (Dysprosium, "Dy", Some(1.9)),
    (Holmium, "Ho", Some(1.9)),
    (Erbium, "Er", Some(1.9)),
    (Thulium, "Tm", Some(1.9)),
    (Ytterbium, "Yb", Some(1.9)),
    (Lutetium, "Lu", Some(1.9)),
    (Hafnium, "Hf", Some(1.8)),
    (Tantalum, "Ta", Some(1.7)),
    (Wolfram, "W", Some(1.6)),
    (Rhenium, "Re", Some(1.5)),
    (Osmium, "Os", Some(1.4)),
    (Iridium, "Ir", Some(1.4)),
    (Platinum, "Pt", Some(1.4)),
    (Gold, "Au", Some(1.4)),
    (Mercury, "Hg", Some(1.3)),
    (Thallium, "Tl", Some(1.4)),
    (Lead, "Pb", Some(1.5)),
    (Bismuth, "Bi", Some(1.5)),
    (Polonium, "Po", Some(1.4)),
    (Astatine, "At", Some(1.5)),
    (Radon, "Rn", Some(1.5)),
    (Francium, "Fr", Some(2.6)),
    (Radium, "Ra", Some(2.2)),
    (Actinium, "Ac", Some(2.1)),
    (Thorium, "Th", Some(2.1)),
    (Protactinium, "Pa", Some(2.0)),
    (Uranium, "U", Some(2.0)),
    (Neptunium, "Np", Some(1.9)),
    (Plutonium, "Pu", Some(1.9)),
    (Americium, "Am", Some(1.8)),
    (Curium, "Cm", Some(1.7)),
    (Berkelium, "Bk", None),
    (Californium, "Cf", None),
    (Einsteinium, "Es", None),
    (Fermium, "Fm", None),
    (Mendelevium, "Md", None),
    (Nobelium, "No", None),
    (Lawrencium, "Lr", None),
    (Rutherfordium, "Rf", None),
    (Dubnium, "Db", None),
    (Seaborgium, "Sg", None),
    (Bohrium, "Bh", None),
    (Hassium, "Hs", None),
    (Meitnerium, "Mt", None),
    (Darmstadtium, "Ds", None),
    (Roentgenium, "Rg", None),
    (Copernicium, "Cn", None),
    (Nihonium, "Nh", None),
    (Flerovium, "Fl", None),
    (Moscovium, "Mc", None),
    (Livermorium, "Lv", None),
    (Tennessine, "Ts", None),
    (Oganesson, "Og", None),
);

impl Element {
    /// Return the element with atomic number `z`, if there is one.
    pub fn from_atomic_number(z: u32) -> Option<Self> {
        let ix = usize::try_from(z).ok()?.checked_sub(1)?;
        ELEMENTS.get(ix).copied()
    }

    /// Return this element's atomic number.
    pub fn atomic_number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Return this element's covalent radius in Angstrom, if tabulated.
    pub fn covalent_radius(&self) -> Option<f64> {
        COVALENT_RADII[*self as usize]
    }
}

/// Covalent radius of the element with atomic number `z`.
pub fn covalent_radius(z: u32) -> Result<f64> {
    Element::from_atomic_number(z)
        .and_then(|e| e.covalent_radius())
        .ok_or(Error::MissingRadius(z))
}
