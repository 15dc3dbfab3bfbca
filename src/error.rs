//! Error type shared by every descriptor computation.
//!
//! Everything in this crate is synchronous and pure, so errors are raised to
//! the immediate caller and never retried. Degenerate-but-defined inputs
//! (coincident points in a bond angle, graphs without bond orders in the
//! flexibility score) are not errors and return a number instead.

use thiserror::Error;

/// Errors raised while building a [`MolGraph`](crate::molecule::MolGraph) or
/// computing descriptors on one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Position vectors of different dimensionality, or a geometry that has
    /// no defined value (e.g. a zero-length central bond in a dihedral).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An option value the computation does not know about, such as a kappa
    /// order outside 0..=3 or an unknown alpha mode.
    #[error("unsupported {parameter} '{value}'")]
    UnsupportedParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value, as given.
        value: String,
    },

    /// A node lacks an attribute the computation requires.
    #[error("node {node} has no '{attribute}' attribute")]
    MissingAttribute {
        /// Id of the node.
        node: usize,
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// No covalent radius is tabulated for this element.
    #[error("no covalent radius tabulated for atomic number {0}")]
    MissingRadius(u32),

    /// A geometry parser was requested by a name nobody registered.
    #[error("no geometry parser registered under '{0}'")]
    UnregisteredParser(String),

    /// A geometry parser was registered twice under the same name.
    #[error("geometry parser '{0}' is already registered")]
    DuplicateParser(String),

    /// A node id was added twice.
    #[error("node {0} already exists")]
    DuplicateNode(usize),

    /// A bond or lookup referenced a node id that is not in the graph.
    #[error("node {0} does not exist")]
    UnknownNode(usize),

    /// A bond connecting a node to itself.
    #[error("bond from node {0} to itself")]
    SelfLoop(usize),

    /// The graph is too small for the requested descriptor.
    #[error("needs at least {required} atoms, got {found}")]
    TooFewAtoms {
        /// Minimum atom count.
        required: usize,
        /// Atom count of the graph.
        found: usize,
    },

    /// A descriptor formula would divide by zero.
    #[error("degenerate descriptor: {0}")]
    DegenerateDescriptor(String),

    /// Path enumeration produced more paths than the caller allowed.
    #[error("path enumeration exceeded the limit of {0} paths")]
    PathLimitExceeded(usize),
}

impl Error {
    pub(crate) fn unsupported(parameter: &'static str, value: impl ToString) -> Self {
        Self::UnsupportedParameter {
            parameter,
            value: value.to_string(),
        }
    }

    pub(crate) fn missing(node: usize, attribute: &'static str) -> Self {
        Self::MissingAttribute { node, attribute }
    }
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
