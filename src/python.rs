use std::collections::BTreeMap;

use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{
    error::Error,
    flexibility as flex,
    molecule::MolGraph,
    parser::{ParserRegistry, Selection},
    shape::{self, AlphaMode, KierOptions},
};

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Parse a molecular graph from its JSON form.
fn graph_from_json(graph: &str) -> PyResult<MolGraph> {
    serde_json::from_str(graph).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn kier_options(alpha: bool, mode: &str) -> PyResult<KierOptions> {
    Ok(KierOptions {
        alpha,
        mode: mode.parse::<AlphaMode>()?,
    })
}

#[pyfunction]
#[pyo3(signature = (graph, m, alpha=false, mode="atomic-radius"))]
fn kier_kappa(graph: &str, m: u32, alpha: bool, mode: &str) -> PyResult<f64> {
    let g = graph_from_json(graph)?;
    Ok(shape::kier_kappa(&g, m, kier_options(alpha, mode)?)?)
}

#[pyfunction]
#[pyo3(signature = (graph, alpha=false, mode="atomic-radius"))]
fn kier_phi(graph: &str, alpha: bool, mode: &str) -> PyResult<f64> {
    let g = graph_from_json(graph)?;
    Ok(shape::kier_phi(&g, kier_options(alpha, mode)?)?)
}

#[pyfunction]
fn shannon_entropy(graph: &str) -> PyResult<f64> {
    Ok(shape::shannon_entropy(&graph_from_json(graph)?)?)
}

#[pyfunction]
fn flexibility(graph: &str) -> PyResult<f64> {
    Ok(flex::flexibility(&graph_from_json(graph)?)?)
}

/// Run the named geometry parsers (or `"all"`) and return
/// `{parser: [(atoms, value), ...]}`.
#[pyfunction]
#[pyo3(signature = (graph, parsers=vec!["all".to_string()]))]
fn parse_geometry(
    graph: &str,
    parsers: Vec<String>,
) -> PyResult<BTreeMap<String, Vec<(Vec<usize>, f64)>>> {
    let g = graph_from_json(graph)?;
    let selection = match parsers.as_slice() {
        [one] => Selection::from(one.as_str()),
        _ => Selection::from(parsers),
    };
    let parsed = ParserRegistry::with_defaults().parse(&g, selection)?;
    Ok(parsed
        .into_iter()
        .map(|(name, measurements)| {
            let values = measurements.into_iter().map(|m| (m.atoms, m.value)).collect();
            (name, values)
        })
        .collect())
}

/// Python module `chemgraph`. Its name has to stay equal to `lib.name` in
/// `Cargo.toml` for the import to resolve.
#[pymodule]
#[pyo3(name = "chemgraph")]
fn _chemgraph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(kier_kappa, m)?)?;
    m.add_function(wrap_pyfunction!(kier_phi, m)?)?;
    m.add_function(wrap_pyfunction!(shannon_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(flexibility, m)?)?;
    m.add_function(wrap_pyfunction!(parse_geometry, m)?)?;

    Ok(())
}
