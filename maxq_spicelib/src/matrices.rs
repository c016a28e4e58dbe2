//! 3x3 matrix arithmetic.

use maxq_std::{Context, Result};

use crate::errhnd::{r#return, signal};
use crate::vectors::{vdot, vnorm, vscl};
use crate::{Matrix3, Vector3};

pub fn ident() -> Matrix3 {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

pub fn mequ(m: &Matrix3) -> Matrix3 {
    *m
}

pub fn xpose(m: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, x) in row.iter_mut().enumerate() {
            *x = m[j][i];
        }
    }
    out
}

/// `m1 * m2`
pub fn mxm(m1: &Matrix3, m2: &Matrix3) -> Matrix3 {
    let cols = xpose(m2);
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = vdot(&m1[i], &cols[j]);
        }
    }
    out
}

/// `m1 * m2ᵀ`
pub fn mxmt(m1: &Matrix3, m2: &Matrix3) -> Matrix3 {
    mxm(m1, &xpose(m2))
}

/// `m1ᵀ * m2`
pub fn mtxm(m1: &Matrix3, m2: &Matrix3) -> Matrix3 {
    mxm(&xpose(m1), m2)
}

pub fn mxv(m: &Matrix3, v: &Vector3) -> Vector3 {
    [vdot(&m[0], v), vdot(&m[1], v), vdot(&m[2], v)]
}

/// `mᵀ * v`
pub fn mtxv(m: &Matrix3, v: &Vector3) -> Vector3 {
    mxv(&xpose(m), v)
}

pub fn det(m: &Matrix3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
        - m[0][1] * (m[1][0] * m[2][2] - m[2][0] * m[1][2])
        + m[0][2] * (m[1][0] * m[2][1] - m[2][0] * m[1][1])
}

pub fn trace(m: &Matrix3) -> f64 {
    m[0][0] + m[1][1] + m[2][2]
}

/// Inverse by cofactors. A singular matrix gives the zero matrix.
pub fn invert(m: &Matrix3) -> Matrix3 {
    let d = det(m);
    if d == 0.0 {
        return [[0.0; 3]; 3];
    }
    let cof = |r1: usize, r2: usize, c1: usize, c2: usize| m[r1][c1] * m[r2][c2] - m[r2][c1] * m[r1][c2];
    let adj = [
        [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
        [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
        [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
    ];
    adj.map(|row| row.map(|x| x / d))
}

/// Inverse of a matrix whose columns are orthogonal but not necessarily unit
/// length. Signals `SPICE(ZEROLENGTHCOLUMN)` if a column is zero.
pub fn invort(ctx: &mut Context, m: &Matrix3) -> Result<Matrix3> {
    if r#return(ctx) {
        return Ok([[0.0; 3]; 3]);
    }

    let mut out = xpose(m);
    for (i, row) in out.iter_mut().enumerate() {
        let n = vnorm(row);
        if n == 0.0 {
            signal(
                ctx,
                "INVORT",
                "SPICE(ZEROLENGTHCOLUMN)",
                &format!("Column {} of the input matrix has norm zero.", i + 1),
            )?;
            return Ok([[0.0; 3]; 3]);
        }
        *row = vscl(1.0 / (n * n), row);
    }
    Ok(out)
}

/// Whether `m` is a rotation matrix: columns of unit length within `ntol`, and
/// determinant within `dtol` of 1. Negative tolerances are never satisfied.
pub fn isrot(m: &Matrix3, ntol: f64, dtol: f64) -> bool {
    if ntol < 0.0 || dtol < 0.0 {
        return false;
    }
    let cols = xpose(m);
    let norms = cols.map(|c| vnorm(&c));
    if norms.iter().any(|&n| (n - 1.0).abs() > ntol || n == 0.0) {
        return false;
    }
    let unit = cols.map(|c| {
        let n = vnorm(&c);
        vscl(1.0 / n, &c)
    });
    (det(&unit) - 1.0).abs() <= dtol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, failed, getsms};
    use approx::assert_abs_diff_eq;

    const M: Matrix3 = [[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]];

    fn flat(m: &Matrix3) -> Vec<f64> {
        m.iter().flatten().copied().collect()
    }

    #[test]
    fn products() {
        assert_eq!(mxm(&M, &ident()), M);
        assert_eq!(mxv(&M, &[1.0, 1.0, 1.0]), [6.0, 5.0, 11.0]);
        assert_eq!(mtxv(&M, &[1.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
        assert_eq!(mxmt(&ident(), &M), xpose(&M));
        assert_eq!(mtxm(&M, &ident()), xpose(&M));
        assert_eq!(mequ(&M), M);
        assert_eq!(trace(&M), 2.0);
        assert_eq!(det(&M), 1.0);
    }

    #[test]
    fn inverses() {
        let inv = invert(&M);
        assert_abs_diff_eq!(
            flat(&inv).as_slice(),
            [-24.0, 18.0, 5.0, 20.0, -15.0, -4.0, -5.0, 4.0, 1.0].as_slice(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(flat(&mxm(&M, &inv)).as_slice(), flat(&ident()).as_slice(), epsilon = 1e-12);
        assert_eq!(invert(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]), [[0.0; 3]; 3]);
    }

    #[test]
    fn orthogonal_inverse() {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();

        let m = [[2.0, 0.0, 0.0], [0.0, 0.0, -3.0], [0.0, 1.0, 0.0]];
        let inv = invort(&mut ctx, &m).unwrap();
        assert_abs_diff_eq!(flat(&mxm(&inv, &m)).as_slice(), flat(&ident()).as_slice(), epsilon = 1e-15);

        let m = [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(invort(&mut ctx, &m).unwrap(), [[0.0; 3]; 3]);
        assert!(failed(&ctx));
        assert_eq!(getsms(&mut ctx), "SPICE(ZEROLENGTHCOLUMN)");
    }

    #[test]
    fn rotation_check() {
        assert!(isrot(&ident(), 1e-12, 1e-12));
        assert!(!isrot(&[[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], 0.1, 0.1));
        assert!(!isrot(&M, 0.1, 0.1));
        assert!(!isrot(&ident(), -1.0, 0.1));
        assert!(!isrot(&[[0.0; 3]; 3], 0.1, 0.1));
    }
}
