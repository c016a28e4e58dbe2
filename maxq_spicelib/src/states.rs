//! State transformation matrices: 6x6 matrices that map position and velocity
//! between frames that rotate relative to each other.
//!
//! A state transformation has the block form
//!
//! ```text
//! | R       0 |
//! | dR/dt   R |
//! ```
//!
//! where `R` is the rotation between the frames at the epoch of interest.

use maxq_std::{Context, Result};

use crate::errhnd::{failed, r#return};
use crate::matrices::{det, invert, mtxm, mxm, mxv, xpose};
use crate::rotations::{eul2m, m2eul, rotate};
use crate::{Matrix3, Matrix6, Vector3};

fn blocks(xform: &Matrix6) -> (Matrix3, Matrix3) {
    let mut rot = [[0.0; 3]; 3];
    let mut drotdt = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            rot[i][j] = xform[i][j];
            drotdt[i][j] = xform[i + 3][j];
        }
    }
    (rot, drotdt)
}

fn assemble(rot: &Matrix3, drotdt: &Matrix3) -> Matrix6 {
    let mut out = [[0.0; 6]; 6];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = rot[i][j];
            out[i + 3][j] = drotdt[i][j];
            out[i + 3][j + 3] = rot[i][j];
        }
    }
    out
}

/// `[v×]`, the matrix of the cross product with `v`
fn cross_matrix(v: &Vector3) -> Matrix3 {
    [[0.0, -v[2], v[1]], [v[2], 0.0, -v[0]], [-v[1], v[0], 0.0]]
}

/// State transformation from a rotation and the angular velocity of the
/// rotating frame, expressed in the frame being rotated from
pub fn rav2xf(rot: &Matrix3, av: &Vector3) -> Matrix6 {
    let omega = cross_matrix(av);
    let mut drotdt = mxm(rot, &omega);
    for row in &mut drotdt {
        for x in row.iter_mut() {
            *x = -*x;
        }
    }
    assemble(rot, &drotdt)
}

/// Rotation and angular velocity of a state transformation, inverting [`rav2xf`]
pub fn xf2rav(xform: &Matrix6) -> (Matrix3, Vector3) {
    let (rot, drotdt) = blocks(xform);
    // Rᵀ dR/dt is minus the cross product matrix of the angular velocity
    let omega = mtxm(&rot, &drotdt);
    (rot, [omega[1][2], omega[2][0], omega[0][1]])
}

/// Inverse of a state transformation
pub fn invstm(xform: &Matrix6) -> Matrix6 {
    let (rot, drotdt) = blocks(xform);
    assemble(&xpose(&rot), &xpose(&drotdt))
}

/// Derivative of [`rotate`] with respect to the angle
fn drotate(angle: f64, iaxis: i32) -> Matrix3 {
    const INDEXS: [usize; 5] = [2, 0, 1, 2, 0];
    let tmp = iaxis.rem_euclid(3) as usize;
    let (i2, i3) = (INDEXS[tmp + 1], INDEXS[tmp + 2]);
    let (s, c) = angle.sin_cos();

    let mut out = [[0.0; 3]; 3];
    out[i2][i2] = -s;
    out[i2][i3] = c;
    out[i3][i2] = -c;
    out[i3][i3] = -s;
    out
}

/// Partial derivatives of the Euler rotation with respect to each angle
fn euler_partials(angles: [f64; 3], axes: [i32; 3]) -> [Matrix3; 3] {
    let [a3, a2, a1] = angles;
    let [x3, x2, x1] = axes;
    let (r3, r2, r1) = (rotate(a3, x3), rotate(a2, x2), rotate(a1, x1));
    [
        mxm(&mxm(&drotate(a3, x3), &r2), &r1),
        mxm(&mxm(&r3, &drotate(a2, x2)), &r1),
        mxm(&mxm(&r3, &r2), &drotate(a1, x1)),
    ]
}

fn inner(m1: &Matrix3, m2: &Matrix3) -> f64 {
    (0..3)
        .flat_map(|i| (0..3).map(move |j| (i, j)))
        .map(|(i, j)| m1[i][j] * m2[i][j])
        .sum()
}

/// State transformation from Euler angles and their rates. `eulang` is
/// `[angle3, angle2, angle1, rate3, rate2, rate1]`, with the rotation as in
/// [`eul2m`].
pub fn eul2xf(ctx: &mut Context, eulang: &[f64; 6], axisa: i32, axisb: i32, axisc: i32) -> Result<Matrix6> {
    if r#return(ctx) {
        return Ok([[0.0; 6]; 6]);
    }
    let rot = eul2m(ctx, eulang[0], eulang[1], eulang[2], axisa, axisb, axisc)?;
    if failed(ctx) {
        return Ok([[0.0; 6]; 6]);
    }

    let partials = euler_partials([eulang[0], eulang[1], eulang[2]], [axisa, axisb, axisc]);
    let mut drotdt = [[0.0; 3]; 3];
    for (partial, rate) in partials.iter().zip(&eulang[3..]) {
        for i in 0..3 {
            for j in 0..3 {
                drotdt[i][j] += partial[i][j] * rate;
            }
        }
    }
    Ok(assemble(&rot, &drotdt))
}

/// Euler angles and rates of a state transformation, inverting [`eul2xf`].
/// The flag is false when the angles are degenerate (the outer axes line up);
/// then angle 1 and its rate are set to zero.
pub fn xf2eul(
    ctx: &mut Context,
    xform: &Matrix6,
    axisa: i32,
    axisb: i32,
    axisc: i32,
) -> Result<([f64; 6], bool)> {
    if r#return(ctx) {
        return Ok(([0.0; 6], false));
    }
    let (rot, drotdt) = blocks(xform);
    let (a3, a2, a1) = m2eul(ctx, &rot, axisa, axisb, axisc)?;
    if failed(ctx) {
        return Ok(([0.0; 6], false));
    }

    // Least squares fit of the rates to dR/dt over the partial derivatives
    let d = euler_partials([a3, a2, a1], [axisa, axisb, axisc]);
    let mut g = [[0.0; 3]; 3];
    let mut rhs = [0.0; 3];
    for i in 0..3 {
        rhs[i] = inner(&d[i], &drotdt);
        for j in 0..3 {
            g[i][j] = inner(&d[i], &d[j]);
        }
    }

    if det(&g).abs() > 1e-10 {
        let rates = mxv(&invert(&g), &rhs);
        return Ok(([a3, a2, a1, rates[0], rates[1], rates[2]], true));
    }

    let det2 = g[0][0] * g[1][1] - g[0][1] * g[1][0];
    let (r3, r2) = if det2 == 0.0 {
        (0.0, 0.0)
    } else {
        (
            (g[1][1] * rhs[0] - g[0][1] * rhs[1]) / det2,
            (g[0][0] * rhs[1] - g[1][0] * rhs[0]) / det2,
        )
    };
    Ok(([a3, a2, a1, r3, r2, 0.0], false))
}
