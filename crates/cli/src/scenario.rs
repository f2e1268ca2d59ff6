//! JSON scenario files read by the `points` and `degree` subcommands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use toric::algebra::Symbol;
use toric::{IVec, Polytope, ToricVariety, VarietyCfg};

/// `{"vertices": [[..]], "normals": [[..]]}`
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolytopeFile {
    pub vertices: Vec<Vec<i64>>,
    pub normals: Vec<Vec<i64>>,
}

/// A polytope plus the optional variety settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VarietyFile {
    #[serde(flatten)]
    pub polytope: PolytopeFile,
    #[serde(default)]
    pub class_map: Option<Vec<Vec<i64>>>,
    #[serde(default)]
    pub indeterminate_prefix: Option<String>,
    #[serde(default)]
    pub indeterminates: Option<Vec<String>>,
}

pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

impl PolytopeFile {
    pub fn build(&self) -> Result<Polytope> {
        Ok(Polytope::new(
            vectors(&self.vertices),
            vectors(&self.normals),
        )?)
    }
}

impl VarietyFile {
    pub fn build(&self) -> Result<Arc<ToricVariety>> {
        let mut cfg = VarietyCfg::default();
        if let Some(prefix) = &self.indeterminate_prefix {
            cfg = cfg.with_prefix(prefix.clone());
        }
        if let Some(names) = &self.indeterminates {
            cfg = cfg.with_indeterminates(names.iter().map(Symbol::new).collect());
        }
        if let Some(rows) = &self.class_map {
            cfg = cfg.with_class_map(class_map_from_rows(rows)?);
        }
        Ok(ToricVariety::new(self.polytope.build()?, cfg)?)
    }
}

fn vectors(rows: &[Vec<i64>]) -> Vec<IVec> {
    rows.iter().map(|r| IVec::from_vec(r.clone())).collect()
}

fn class_map_from_rows(rows: &[Vec<i64>]) -> Result<DMatrix<i64>> {
    let ncols = match rows.first() {
        Some(r) => r.len(),
        None => bail!("class_map has no rows"),
    };
    if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        bail!("class_map row {i} has {} entries, expected {ncols}", r.len());
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        ncols,
        rows.iter().flatten().copied(),
    ))
}
