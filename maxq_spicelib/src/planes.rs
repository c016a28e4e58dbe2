//! Planes, and projections onto planes and lines.

use maxq_std::{Context, Result};

use crate::Vector3;
use crate::errhnd::{r#return, signal};
use crate::vectors::{unorm, vadd, vcrss, vdot, vdist, vhat, vminus, vproj, vscl, vsub, vzero};

/// Plane `{x : normal · x = constant}`, with a unit normal and non-negative
/// constant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub constant: f64,
}

impl Plane {
    fn canonical(normal: Vector3, constant: f64) -> Self {
        if constant < 0.0 {
            Self { normal: vminus(&normal), constant: -constant }
        } else {
            Self { normal, constant }
        }
    }
}

/// Plane from a normal vector and constant
pub fn nvc2pl(ctx: &mut Context, normal: &Vector3, constant: f64) -> Result<Plane> {
    if r#return(ctx) {
        return Ok(Plane::default());
    }
    let (n, mag) = unorm(normal);
    if mag == 0.0 {
        signal(ctx, "NVC2PL", "SPICE(ZEROVECTOR)", "Normal vector is the zero vector.")?;
        return Ok(Plane::default());
    }
    Ok(Plane::canonical(n, constant / mag))
}

/// Plane from a normal vector and a point in the plane
pub fn nvp2pl(ctx: &mut Context, normal: &Vector3, point: &Vector3) -> Result<Plane> {
    if r#return(ctx) {
        return Ok(Plane::default());
    }
    let n = vhat(normal);
    if vzero(&n) {
        signal(ctx, "NVP2PL", "SPICE(ZEROVECTOR)", "Plane's normal must be non-zero.")?;
        return Ok(Plane::default());
    }
    Ok(Plane::canonical(n, vdot(point, &n)))
}

/// Plane from a point and two spanning vectors
pub fn psv2pl(ctx: &mut Context, point: &Vector3, span1: &Vector3, span2: &Vector3) -> Result<Plane> {
    if r#return(ctx) {
        return Ok(Plane::default());
    }
    let n = vhat(&vcrss(span1, span2));
    if vzero(&n) {
        signal(
            ctx,
            "PSV2PL",
            "SPICE(DEGENERATECASE)",
            "Spanning vectors are parallel.",
        )?;
        return Ok(Plane::default());
    }
    Ok(Plane::canonical(n, vdot(point, &n)))
}

/// `(normal, constant)`
pub fn pl2nvc(plane: &Plane) -> (Vector3, f64) {
    (plane.normal, plane.constant)
}

/// `(normal, point)`, where the point is the one closest to the origin
pub fn pl2nvp(plane: &Plane) -> (Vector3, Vector3) {
    (plane.normal, vscl(plane.constant, &plane.normal))
}

/// `(point, span1, span2)`: the point closest to the origin, and an orthonormal
/// pair of spanning vectors with `span1 × span2 = normal`.
pub fn pl2psv(plane: &Plane) -> (Vector3, Vector3, Vector3) {
    let n = plane.normal;
    let point = vscl(plane.constant, &n);

    // Cross with the axis least aligned with the normal
    let k = (0..3)
        .min_by(|&a, &b| n[a].abs().total_cmp(&n[b].abs()))
        .unwrap_or(0);
    let mut e = [0.0; 3];
    e[k] = 1.0;
    let span1 = vhat(&vcrss(&n, &e));
    let span2 = vcrss(&n, &span1);
    (point, span1, span2)
}

/// Orthogonal projection of `vin` onto `plane`
pub fn vprjp(vin: &Vector3, plane: &Plane) -> Vector3 {
    let d = vdot(&plane.normal, vin) - plane.constant;
    vsub(vin, &vscl(d, &plane.normal))
}

/// Point on the line through `linpt` along `lindir` nearest to `point`, and its
/// distance
pub fn nplnpt(
    ctx: &mut Context,
    linpt: &Vector3,
    lindir: &Vector3,
    point: &Vector3,
) -> Result<(Vector3, f64)> {
    if r#return(ctx) {
        return Ok(([0.0; 3], 0.0));
    }
    if vzero(lindir) {
        signal(ctx, "NPLNPT", "SPICE(ZEROVECTOR)", "Direction vector is the zero vector.")?;
        return Ok(([0.0; 3], 0.0));
    }
    let pnear = vadd(linpt, &vproj(&vsub(point, linpt), lindir));
    Ok((pnear, vdist(&pnear, point)))
}
