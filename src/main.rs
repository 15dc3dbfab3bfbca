use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chemgraph::{
    flexibility::flexibility,
    isomorphism::match_patterns,
    molecule::{MolGraph, Molecule},
    parser::{ParserRegistry, Selection},
    report::describe_all,
    shape::{AlphaMode, KierOptions},
};
use clap::{Args, Parser, Subcommand};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

#[derive(Args, Debug)]
struct Input {
    /// Molecular graphs in JSON format
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bond lengths, bond angles, and dihedral angles
    Geometry {
        #[command(flatten)]
        input: Input,

        /// Parser to run; repeat for several, or `all`
        #[arg(short, long, default_value = "all")]
        parser: Vec<String>,
    },
    /// Kier shape indices, Shannon entropy, and flexibility
    Shape {
        #[command(flatten)]
        input: Input,

        /// Apply the alpha correction
        #[arg(short, long)]
        alpha: bool,

        /// Alpha flavour [default: atomic-radius]
        #[arg(short, long)]
        mode: Option<AlphaMode>,
    },
    /// Flexibility score
    Flex {
        #[command(flatten)]
        input: Input,
    },
    /// Occurrences of pattern graphs
    Match {
        #[command(flatten)]
        input: Input,

        /// Pattern graph in JSON format; repeat for several
        #[arg(short, long, required = true)]
        pattern: Vec<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Read a graph, naming it after the file when it carries no name.
fn load(path: &Path) -> Result<Molecule> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let graph: MolGraph = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid molecular graph", path.display()))?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    Ok(Molecule::from_graph(graph, stem))
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<Molecule>> {
    paths.par_iter().map(|p| load(p)).collect()
}

fn join_ids(ids: &[usize]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("-")
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn geometry<W: Write>(
    out: &mut csv::Writer<W>,
    mols: &[Molecule],
    parsers: Vec<String>,
) -> Result<()> {
    let registry = ParserRegistry::with_defaults();
    let selection = match parsers.as_slice() {
        [one] => Selection::from(one.as_str()),
        _ => Selection::from(parsers),
    };

    let results = mols
        .par_iter()
        .map(|mol| {
            registry
                .parse(mol, selection.clone())
                .with_context(|| format!("geometry of {}", mol.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    out.write_record(["molecule", "parser", "atoms", "value"])?;
    for (mol, parsed) in mols.iter().zip(results) {
        for (parser, measurements) in parsed {
            for m in measurements {
                out.write_record([
                    mol.name(),
                    parser.as_str(),
                    join_ids(&m.atoms).as_str(),
                    m.value.to_string().as_str(),
                ])?;
            }
        }
    }
    Ok(())
}

fn shape<W: Write>(
    out: &mut csv::Writer<W>,
    mols: &[Molecule],
    options: KierOptions,
) -> Result<()> {
    out.write_record([
        "molecule",
        "atoms",
        "bonds",
        "alpha",
        "kappa0",
        "kappa1",
        "kappa2",
        "kappa3",
        "phi",
        "shannon",
        "flexibility",
    ])?;
    for (mol, report) in mols.iter().zip(describe_all(mols, options)) {
        let r = report.with_context(|| format!("descriptors of {}", mol.name()))?;
        out.write_record([
            r.name,
            r.atoms.to_string(),
            r.bonds.to_string(),
            cell(r.shape.alpha),
            r.shape.kappa0.to_string(),
            cell(r.shape.kappa1),
            cell(r.shape.kappa2),
            cell(r.shape.kappa3),
            cell(r.shape.phi),
            r.shape.shannon.to_string(),
            r.flexibility.to_string(),
        ])?;
    }
    Ok(())
}

fn flex<W: Write>(out: &mut csv::Writer<W>, mols: &[Molecule]) -> Result<()> {
    let scores = mols
        .par_iter()
        .map(|mol| flexibility(mol).with_context(|| format!("flexibility of {}", mol.name())))
        .collect::<Result<Vec<_>>>()?;

    out.write_record(["molecule", "flexibility"])?;
    for (mol, score) in mols.iter().zip(scores) {
        out.write_record([mol.name(), score.to_string().as_str()])?;
    }
    Ok(())
}

fn find<W: Write>(
    out: &mut csv::Writer<W>,
    mols: &[Molecule],
    patterns: &[Molecule],
) -> Result<()> {
    let found: Vec<_> = mols
        .par_iter()
        .map(|mol| match_patterns(mol, patterns))
        .collect();

    out.write_record(["molecule", "pattern", "atoms"])?;
    for (mol, matches) in mols.iter().zip(found) {
        for (pattern, sets) in matches {
            for atoms in sets {
                out.write_record([
                    mol.name(),
                    pattern.to_string().as_str(),
                    join_ids(&atoms).as_str(),
                ])?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut out = csv::Writer::from_writer(io::stdout().lock());
    match cli.command {
        Command::Geometry { input, parser } => {
            geometry(&mut out, &load_all(&input.paths)?, parser)?
        }
        Command::Shape { input, alpha, mode } => {
            let options = KierOptions {
                alpha,
                mode: mode.unwrap_or_default(),
            };
            shape(&mut out, &load_all(&input.paths)?, options)?
        }
        Command::Flex { input } => flex(&mut out, &load_all(&input.paths)?)?,
        Command::Match { input, pattern } => {
            find(&mut out, &load_all(&input.paths)?, &load_all(&pattern)?)?
        }
    }
    out.flush()?;
    Ok(())
}
