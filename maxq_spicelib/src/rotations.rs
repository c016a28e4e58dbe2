//! Rotation matrices, quaternions, Euler angles and axis/angle pairs.
//!
//! [`rotate`] builds *frame* rotations: `rotate(θ, 3)` maps vectors into a frame
//! rotated by `θ` about +Z, which is the same as rotating vectors by `-θ`. By
//! contrast [`axisar`] and [`q2m`] build matrices that rotate vectors by the given
//! angle.

use maxq_std::{Context, Result};

use crate::errhnd::{chkin, chkout, errint, failed, r#return, setmsg, sigerr, signal};
use crate::matrices::{ident, isrot, mxm, mxv};
use crate::vectors::{ucrss, vcrss, vdot, vhat, vnorm, vrotv, vzero};
use crate::{Matrix3, Quaternion, Vector3};

/// Column norm and determinant tolerance used when checking rotation inputs
const ROT_TOL: f64 = 0.1;

/// Frame rotation of `angle` radians about axis `iaxis` (1, 2 or 3; other values
/// are taken modulo 3).
pub fn rotate(angle: f64, iaxis: i32) -> Matrix3 {
    const INDEXS: [usize; 5] = [2, 0, 1, 2, 0];
    let tmp = iaxis.rem_euclid(3) as usize;
    let (i1, i2, i3) = (INDEXS[tmp], INDEXS[tmp + 1], INDEXS[tmp + 2]);
    let (s, c) = angle.sin_cos();

    let mut out = [[0.0; 3]; 3];
    out[i1][i1] = 1.0;
    out[i2][i2] = c;
    out[i2][i3] = s;
    out[i3][i2] = -s;
    out[i3][i3] = c;
    out
}

/// `rotate(angle, iaxis) * m`
pub fn rotmat(m: &Matrix3, angle: f64, iaxis: i32) -> Matrix3 {
    mxm(&rotate(angle, iaxis), m)
}

/// `rotate(angle, iaxis) * v`
pub fn rotvec(v: &Vector3, angle: f64, iaxis: i32) -> Vector3 {
    mxv(&rotate(angle, iaxis), v)
}

/// Matrix that rotates vectors by `angle` about `axis`. A zero axis gives the
/// identity.
pub fn axisar(axis: &Vector3, angle: f64) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for j in 0..3 {
        let mut e = [0.0; 3];
        e[j] = 1.0;
        let col = vrotv(&e, axis, angle);
        for i in 0..3 {
            out[i][j] = col[i];
        }
    }
    out
}

/// Rotation axis and angle (in `[0, π]`) of a rotation matrix. The identity
/// gives the +Z axis and angle 0.
pub fn raxisa(ctx: &mut Context, matrix: &Matrix3) -> Result<(Vector3, f64)> {
    if r#return(ctx) {
        return Ok(([0.0; 3], 0.0));
    }
    chkin(ctx, "RAXISA")?;

    let q = m2q(ctx, matrix)?;
    if failed(ctx) {
        chkout(ctx, "RAXISA")?;
        return Ok(([0.0; 3], 0.0));
    }

    let v = [q[1], q[2], q[3]];
    let out = if vzero(&v) {
        ([0.0, 0.0, 1.0], 0.0)
    } else {
        (vhat(&v), 2.0 * vnorm(&v).atan2(q[0]))
    };

    chkout(ctx, "RAXISA")?;
    Ok(out)
}

/// Rotation matrix for a quaternion. The quaternion need not be unit length; a
/// zero quaternion gives the identity.
pub fn q2m(q: &Quaternion) -> Matrix3 {
    let l2 = q.iter().map(|x| x * x).sum::<f64>();
    if l2 == 0.0 {
        return ident();
    }
    let sharpn = 2.0 / l2;
    let [q0, q1, q2, q3] = *q;
    [
        [
            1.0 - sharpn * (q2 * q2 + q3 * q3),
            sharpn * (q1 * q2 - q0 * q3),
            sharpn * (q1 * q3 + q0 * q2),
        ],
        [
            sharpn * (q1 * q2 + q0 * q3),
            1.0 - sharpn * (q1 * q1 + q3 * q3),
            sharpn * (q2 * q3 - q0 * q1),
        ],
        [
            sharpn * (q1 * q3 - q0 * q2),
            sharpn * (q2 * q3 + q0 * q1),
            1.0 - sharpn * (q1 * q1 + q2 * q2),
        ],
    ]
}

/// Unit quaternion for a rotation matrix, with non-negative scalar part.
/// Signals `SPICE(NOTAROTATION)` if the matrix is not a rotation.
pub fn m2q(ctx: &mut Context, r: &Matrix3) -> Result<Quaternion> {
    if r#return(ctx) {
        return Ok([0.0; 4]);
    }
    if !isrot(r, ROT_TOL, ROT_TOL) {
        signal(
            ctx,
            "M2Q",
            "SPICE(NOTAROTATION)",
            "Input matrix was not a rotation.",
        )?;
        return Ok([0.0; 4]);
    }

    let tr = r[0][0] + r[1][1] + r[2][2];
    let diag = [r[0][0], r[1][1], r[2][2]];
    let mut q = if tr >= diag[0] && tr >= diag[1] && tr >= diag[2] {
        let q0 = 0.5 * (1.0 + tr).sqrt();
        let f = 0.25 / q0;
        [q0, (r[2][1] - r[1][2]) * f, (r[0][2] - r[2][0]) * f, (r[1][0] - r[0][1]) * f]
    } else if diag[0] >= diag[1] && diag[0] >= diag[2] {
        let q1 = 0.5 * (1.0 + r[0][0] - r[1][1] - r[2][2]).sqrt();
        let f = 0.25 / q1;
        [(r[2][1] - r[1][2]) * f, q1, (r[0][1] + r[1][0]) * f, (r[0][2] + r[2][0]) * f]
    } else if diag[1] >= diag[2] {
        let q2 = 0.5 * (1.0 - r[0][0] + r[1][1] - r[2][2]).sqrt();
        let f = 0.25 / q2;
        [(r[0][2] - r[2][0]) * f, (r[0][1] + r[1][0]) * f, q2, (r[1][2] + r[2][1]) * f]
    } else {
        let q3 = 0.5 * (1.0 - r[0][0] - r[1][1] + r[2][2]).sqrt();
        let f = 0.25 / q3;
        [(r[1][0] - r[0][1]) * f, (r[0][2] + r[2][0]) * f, (r[1][2] + r[2][1]) * f, q3]
    };

    if q[0] < 0.0 {
        q = q.map(|x| -x);
    }
    Ok(q)
}

/// Quaternion product, such that `q2m(qxq(a, b)) == q2m(a) * q2m(b)`
pub fn qxq(q1: &Quaternion, q2: &Quaternion) -> Quaternion {
    let v1 = [q1[1], q1[2], q1[3]];
    let v2 = [q2[1], q2[2], q2[3]];
    let cross = vcrss(&v1, &v2);
    let s = q1[0] * q2[0] - vdot(&v1, &v2);
    [
        s,
        q1[0] * v2[0] + q2[0] * v1[0] + cross[0],
        q1[0] * v2[1] + q2[0] * v1[1] + cross[1],
        q1[0] * v2[2] + q2[0] * v1[2] + cross[2],
    ]
}

fn check_axes(ctx: &mut Context, module: &str, axis3: i32, axis2: i32, axis1: i32) -> Result<bool> {
    let in_range = [axis3, axis2, axis1].iter().all(|a| (1..=3).contains(a));
    if in_range && axis2 != axis1 && axis2 != axis3 {
        return Ok(true);
    }
    chkin(ctx, module)?;
    setmsg(
        ctx,
        "Axis numbers are #, #, #. The values must be in the range 1-3 and the middle axis must differ from its neighbours.",
    );
    errint(ctx, "#", axis3 as i64);
    errint(ctx, "#", axis2 as i64);
    errint(ctx, "#", axis1 as i64);
    sigerr(ctx, "SPICE(BADAXISNUMBERS)")?;
    chkout(ctx, module)?;
    Ok(false)
}

/// `rotate(angle3, axis3) * rotate(angle2, axis2) * rotate(angle1, axis1)`
pub fn eul2m(
    ctx: &mut Context,
    angle3: f64,
    angle2: f64,
    angle1: f64,
    axis3: i32,
    axis2: i32,
    axis1: i32,
) -> Result<Matrix3> {
    if r#return(ctx) {
        return Ok([[0.0; 3]; 3]);
    }
    if !check_axes(ctx, "EUL2M", axis3, axis2, axis1)? {
        return Ok([[0.0; 3]; 3]);
    }

    let m = rotate(angle1, axis1);
    let m = rotmat(&m, angle2, axis2);
    Ok(rotmat(&m, angle3, axis3))
}

/// Axis sequences that [`m2eul`] solves directly
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Canonical {
    Zxz,
    Zyz,
    Zyx,
    Zxy,
}

/// Factor a rotation into Euler angles `(angle3, angle2, angle1)` for the given
/// axis sequence, inverting [`eul2m`].
///
/// Angles 3 and 1 are in `[-π, π]`. Angle 2 is in `[0, π]` when `axis3 == axis1`
/// and in `[-π/2, π/2]` otherwise. When the factorisation is degenerate, angle 1
/// is set to zero.
///
/// The general case is reduced to one of four canonical sequences by relabelling
/// the axes with an even permutation `P`: for a rotation `R`, `P R Pᵀ` has the
/// same angles about the relabelled axes.
pub fn m2eul(
    ctx: &mut Context,
    r: &Matrix3,
    axis3: i32,
    axis2: i32,
    axis1: i32,
) -> Result<(f64, f64, f64)> {
    if r#return(ctx) {
        return Ok((0.0, 0.0, 0.0));
    }
    if !check_axes(ctx, "M2EUL", axis3, axis2, axis1)? {
        return Ok((0.0, 0.0, 0.0));
    }
    if !isrot(r, ROT_TOL, ROT_TOL) {
        signal(
            ctx,
            "M2EUL",
            "SPICE(NOTAROTATION)",
            "Input matrix was not a rotation.",
        )?;
        return Ok((0.0, 0.0, 0.0));
    }

    let a = (axis3 - 1) as usize;
    let b = (axis2 - 1) as usize;
    let c = if axis3 == axis1 { 3 - a - b } else { (axis1 - 1) as usize };

    // perm[i] is the canonical index of original axis i
    let even = |p: &[usize; 3]| (p[1] + 3 - p[0]) % 3 == 1 && (p[2] + 3 - p[1]) % 3 == 1;
    let mut perm = [0usize; 3];
    let canonical = if axis3 == axis1 {
        perm[a] = 2;
        perm[b] = 0;
        perm[c] = 1;
        if even(&perm) {
            Canonical::Zxz
        } else {
            perm[b] = 1;
            perm[c] = 0;
            Canonical::Zyz
        }
    } else {
        perm[a] = 2;
        perm[b] = 1;
        perm[c] = 0;
        if even(&perm) {
            Canonical::Zyx
        } else {
            perm[b] = 0;
            perm[c] = 1;
            Canonical::Zxy
        }
    };

    let mut m = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            m[perm[i]][perm[j]] = r[i][j];
        }
    }

    Ok(match canonical {
        Canonical::Zxz => {
            let s2 = m[0][2].hypot(m[1][2]);
            let angle2 = s2.atan2(m[2][2]);
            if s2 == 0.0 {
                ((m[2][2] * m[0][1]).atan2(m[0][0]), angle2, 0.0)
            } else {
                (m[0][2].atan2(m[1][2]), angle2, m[2][0].atan2(-m[2][1]))
            }
        }
        Canonical::Zyz => {
            let s2 = m[0][2].hypot(m[1][2]);
            let angle2 = s2.atan2(m[2][2]);
            if s2 == 0.0 {
                (m[0][1].atan2(m[1][1]), angle2, 0.0)
            } else {
                (m[1][2].atan2(-m[0][2]), angle2, m[2][1].atan2(m[2][0]))
            }
        }
        Canonical::Zyx => {
            let c2 = m[0][0].hypot(m[1][0]);
            let angle2 = m[2][0].atan2(c2);
            if c2 == 0.0 {
                (m[0][1].atan2(m[1][1]), angle2, 0.0)
            } else {
                ((-m[1][0]).atan2(m[0][0]), angle2, (-m[2][1]).atan2(m[2][2]))
            }
        }
        Canonical::Zxy => {
            let c2 = m[0][1].hypot(m[1][1]);
            let angle2 = (-m[2][1]).atan2(c2);
            if c2 == 0.0 {
                ((-m[1][0]).atan2(m[0][0]), angle2, 0.0)
            } else {
                (m[0][1].atan2(m[1][1]), angle2, m[2][0].atan2(m[2][2]))
            }
        }
    })
}

/// Frame transformation defined by two vectors: axis `indexa` of the new frame
/// lies along `axdef`, and `plndef` lies in the half-plane spanned by that axis
/// and positive axis `indexp`.
pub fn twovec(
    ctx: &mut Context,
    axdef: &Vector3,
    indexa: i32,
    plndef: &Vector3,
    indexp: i32,
) -> Result<Matrix3> {
    if r#return(ctx) {
        return Ok([[0.0; 3]; 3]);
    }

    if !(1..=3).contains(&indexa) || !(1..=3).contains(&indexp) || indexa == indexp {
        chkin(ctx, "TWOVEC")?;
        setmsg(
            ctx,
            "The definition indices must lie in the range from 1 to 3 and must differ. The value of INDEXA is #. The value of INDEXP is #.",
        );
        errint(ctx, "#", indexa as i64);
        errint(ctx, "#", indexp as i64);
        sigerr(ctx, "SPICE(BADINDEX)")?;
        chkout(ctx, "TWOVEC")?;
        return Ok([[0.0; 3]; 3]);
    }

    if vzero(&vcrss(axdef, plndef)) {
        signal(
            ctx,
            "TWOVEC",
            "SPICE(DEPENDENTVECTORS)",
            "The input vectors AXDEF and PLNDEF are linearly dependent.",
        )?;
        return Ok([[0.0; 3]; 3]);
    }

    let i1 = (indexa - 1) as usize;
    let i2 = (i1 + 1) % 3;
    let i3 = (i1 + 2) % 3;
    let mut out = [[0.0; 3]; 3];
    out[i1] = vhat(axdef);
    if (indexp - 1) as usize == i2 {
        out[i3] = ucrss(axdef, plndef);
        out[i2] = ucrss(&out[i3], axdef);
    } else {
        out[i2] = ucrss(plndef, axdef);
        out[i3] = ucrss(axdef, &out[i2]);
    }
    Ok(out)
}
