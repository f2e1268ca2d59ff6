use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toric::algebra::{determinant, format_matrix, Poly};
use toric::{special, IVec, ToricDivisor};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod scenario;

use provenance::{write_sidecar, Payload};
use scenario::{read_json, PolytopeFile, VarietyFile};

#[derive(Parser)]
#[command(name = "toric")]
#[command(about = "Lattice points, section degrees and the worked lifting example")]
struct Cmd {
    /// Log debug events from the library (to stderr)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Lattice points of a polytope with their facet distance vectors
    Points {
        /// JSON file `{"vertices": [[..]], "normals": [[..]]}`
        #[arg(long)]
        input: PathBuf,
    },
    /// Multidegree of a homogeneous section
    Degree {
        /// JSON polytope file with optional class_map and indeterminates
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        section: String,
    },
    /// Partition matrix and determinant of the worked lifting example
    Lift {
        /// Use seeded random integer coefficients instead of symbols
        #[arg(long)]
        seed: Option<u64>,
        /// Coefficients are drawn from [-bound, bound]; any u32 is exact
        #[arg(long, default_value_t = 9)]
        bound: u32,
        /// Write the JSON summary here (plus a provenance sidecar)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Points { input } => points(&input),
        Action::Degree { input, section } => degree(&input, &section),
        Action::Lift { seed, bound, out } => lift(seed, bound, out.as_deref()),
    }
}

#[derive(Serialize)]
struct PointRow {
    point: Vec<i64>,
    distances: Vec<i64>,
}

fn to_vec(v: &IVec) -> Vec<i64> {
    v.iter().copied().collect()
}

fn points(input: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), "points");
    let polytope = read_json::<PolytopeFile>(input)?.build()?;
    let rows = polytope
        .lattice_points()
        .map(|m| {
            Ok(PointRow {
                distances: to_vec(&polytope.facet_distances_from_point(&m)?),
                point: to_vec(&m),
            })
        })
        .collect::<toric::Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn degree(input: &Path, section: &str) -> Result<()> {
    tracing::info!(input = %input.display(), section, "degree");
    let variety = read_json::<VarietyFile>(input)?.build()?;
    let poly: Poly = section
        .parse()
        .with_context(|| format!("parsing section {section:?}"))?;
    let degree = variety.degree_of(&poly)?;
    let doc = serde_json::json!({
        "section": poly.to_string(),
        "degree": to_vec(&degree),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

#[derive(Serialize)]
struct LiftReport {
    seed: Option<u64>,
    divisors: Vec<Vec<i64>>,
    restricted_divisors: Vec<Vec<i64>>,
    class_of_sum: Vec<i64>,
    section_degrees: Vec<Option<Vec<i64>>>,
    /// Coefficients of `F_1 .. F_3` over the restricted indeterminates.
    restricted_sections: Vec<BTreeMap<String, String>>,
    restricted_lattice_points: Vec<Vec<Vec<i64>>>,
    matrix: String,
    determinant_terms: usize,
    exponent_keys: Vec<Vec<u32>>,
    multidegree: Option<Vec<i64>>,
    determinant: String,
}

fn coeffs(ds: &[ToricDivisor]) -> Vec<Vec<i64>> {
    ds.iter().map(|d| to_vec(d.prime_divisor_coeffs())).collect()
}

fn lift(seed: Option<u64>, bound: u32, out: Option<&Path>) -> Result<()> {
    tracing::info!(seed = ?seed, bound, out = ?out, "lift");
    let ex = special::lifting_example()?;
    let sections = match seed {
        Some(s) => ex.random_sections(&mut StdRng::seed_from_u64(s), bound)?,
        None => ex.generic_sections()?,
    };

    let d = &ex.divisors;
    let class_of_sum = d[1].add(&d[2])?.add(&d[3])?.equiv_class()?;
    // a seeded section may vanish and then has no degree
    let section_degrees = sections
        .iter()
        .map(|f| {
            (!f.is_zero())
                .then(|| ex.variety.degree_of(f).map(|c| to_vec(&c)))
                .transpose()
        })
        .collect::<toric::Result<Vec<_>>>()?;
    let restricted_sections: Vec<BTreeMap<String, String>> = sections[1..]
        .iter()
        .map(|f| {
            f.coefficients_in(ex.restricted.indeterminates())
                .into_iter()
                .map(|(k, c)| (format!("{k:?}"), c.to_string()))
                .collect()
        })
        .collect();
    let restricted_lattice_points: Vec<Vec<Vec<i64>>> = ex.restricted_divisors[1..]
        .iter()
        .map(|d| {
            d.polytope()
                .map(|p| p.lattice_points().map(|m| to_vec(&m)).collect())
                .unwrap_or_default()
        })
        .collect();

    let matrix = ex.elimination_matrix(&sections)?;
    let det = determinant(&matrix).context("determinant of the partition matrix")?;
    let exponent_keys: Vec<Vec<u32>> = det
        .coefficients_in(ex.restricted.indeterminates())
        .into_keys()
        .collect();
    let multidegree = if det.is_zero() {
        None
    } else {
        Some(to_vec(&ex.variety.degree_of(&det)?))
    };
    tracing::info!(terms = det.num_terms(), "determinant");

    let report = LiftReport {
        seed,
        divisors: coeffs(&ex.divisors),
        restricted_divisors: coeffs(&ex.restricted_divisors),
        class_of_sum: to_vec(&class_of_sum),
        section_degrees,
        restricted_sections,
        restricted_lattice_points,
        matrix: format_matrix(&matrix),
        determinant_terms: det.num_terms(),
        exponent_keys,
        multidegree,
        determinant: det.to_string(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            let params = serde_json::json!({ "bound": bound, "partition": ex.partition });
            let sidecar = write_sidecar(path, Payload::new("lift", params).with_seed(seed))?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "wrote");
        }
        None => println!("{json}"),
    }
    Ok(())
}
