//! Square matrices of polynomials and their exact determinant.

use nalgebra::DMatrix;

use super::poly::Poly;
use crate::error::{Result, ToricError};

/// Dense matrix with polynomial entries.
pub type PolyMatrix = DMatrix<Poly>;

/// `rows × cols` matrix of zero polynomials.
pub fn zeros(rows: usize, cols: usize) -> PolyMatrix {
    DMatrix::from_element(rows, cols, Poly::zero())
}

/// Exact determinant by cofactor expansion.
///
/// Errors: `Construction` for a non-square matrix, `Overflow` when a product
/// of entries has an exponent beyond `u32`.
///
/// Polynomial entries rule out pivoting by division, so we expand along the
/// row with the most zero entries at each level and skip zero cofactors.
/// Worst case is O(n!) ring operations; elimination matrices built by
/// `ToricVariety::partition_matrix` are small and sparse.
pub fn determinant(m: &PolyMatrix) -> Result<Poly> {
    if !m.is_square() {
        return Err(ToricError::construction(format!(
            "determinant of a non-square {}x{} matrix",
            m.nrows(),
            m.ncols()
        )));
    }
    let rows: Vec<usize> = (0..m.nrows()).collect();
    let cols: Vec<usize> = (0..m.ncols()).collect();
    let det = laplace(m, &rows, &cols)?;
    tracing::trace!(dim = m.nrows(), terms = det.num_terms(), "determinant");
    Ok(det)
}

fn laplace(m: &PolyMatrix, rows: &[usize], cols: &[usize]) -> Result<Poly> {
    match rows.len() {
        0 => return Ok(Poly::one()),
        1 => return Ok(m[(rows[0], cols[0])].clone()),
        2 => {
            let (r0, r1) = (rows[0], rows[1]);
            let (c0, c1) = (cols[0], cols[1]);
            let main = m[(r0, c0)].try_mul(&m[(r1, c1)])?;
            let anti = m[(r0, c1)].try_mul(&m[(r1, c0)])?;
            return Ok(main - anti);
        }
        _ => {}
    }

    let pivot_pos = (0..rows.len())
        .max_by_key(|&i| cols.iter().filter(|&&c| m[(rows[i], c)].is_zero()).count())
        .unwrap_or(0);
    let pivot_row = rows[pivot_pos];
    let minor_rows: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != pivot_pos)
        .map(|(_, &r)| r)
        .collect();

    let mut det = Poly::zero();
    for (k, &c) in cols.iter().enumerate() {
        let entry = &m[(pivot_row, c)];
        if entry.is_zero() {
            continue;
        }
        let minor_cols: Vec<usize> = cols
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != k)
            .map(|(_, &c)| c)
            .collect();
        let minor = laplace(m, &minor_rows, &minor_cols)?;
        if minor.is_zero() {
            continue;
        }
        let term = entry.try_mul(&minor)?;
        if (pivot_pos + k) % 2 == 0 {
            det += term;
        } else {
            det = det - term;
        }
    }
    Ok(det)
}

/// Render as `Matrix([[a, b], [c, d]])`.
pub fn format_matrix(m: &PolyMatrix) -> String {
    let rows: Vec<String> = m
        .row_iter()
        .map(|row| {
            let entries: Vec<String> = row.iter().map(|p| p.to_string()).collect();
            format!("[{}]", entries.join(", "))
        })
        .collect();
    format!("Matrix([{}])", rows.join(", "))
}
