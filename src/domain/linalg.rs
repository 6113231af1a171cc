//! Small dense linear algebra for N×N covariance matrices (N ≤ ~10).

use crate::domain::error::FrontierError;

/// Row-major square matrix.
pub type Matrix = Vec<Vec<f64>>;

/// Pivots smaller than this fraction of the largest absolute entry are
/// treated as zero.
const SINGULAR_TOLERANCE: f64 = 1e-12;

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn mat_vec(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    mat.iter().map(|row| dot(row, v)).collect()
}

/// xᵀ M y
pub fn quad_form(x: &[f64], mat: &[Vec<f64>], y: &[f64]) -> f64 {
    dot(x, &mat_vec(mat, y))
}

/// Inverse via Gauss-Jordan elimination with partial pivoting.
pub fn invert(mat: &[Vec<f64>]) -> Result<Matrix, FrontierError> {
    let n = mat.len();
    if n == 0 {
        return Err(FrontierError::SingularCovariance {
            reason: "empty matrix".into(),
        });
    }
    if mat.iter().any(|row| row.len() != n) {
        return Err(FrontierError::SingularCovariance {
            reason: format!("matrix is not {n}x{n}"),
        });
    }
    if mat.iter().flatten().any(|v| !v.is_finite()) {
        return Err(FrontierError::SingularCovariance {
            reason: "matrix has non-finite entries".into(),
        });
    }

    let scale = mat.iter().flatten().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Err(FrontierError::SingularCovariance {
            reason: "matrix is all zeros".into(),
        });
    }

    let mut aug: Matrix = mat
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = Vec::with_capacity(2 * n);
            r.extend_from_slice(row);
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..n {
        let (max_row, max_val) = (col..n)
            .map(|row| (row, aug[row][col].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if max_val <= SINGULAR_TOLERANCE * scale {
            return Err(FrontierError::SingularCovariance {
                reason: format!("pivot {max_val:e} in column {col} is effectively zero"),
            });
        }

        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for cell in aug[col].iter_mut() {
            *cell /= pivot;
        }

        let pivot_row = aug[col].clone();
        for (row, cells) in aug.iter_mut().enumerate() {
            if row == col {
                continue;
            }
            let factor = cells[col];
            if factor == 0.0 {
                continue;
            }
            for (cell, pv) in cells.iter_mut().zip(&pivot_row) {
                *cell -= factor * pv;
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}
