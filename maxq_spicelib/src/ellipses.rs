//! Ellipses in three dimensions, given by a centre and a pair of orthogonal
//! semi-axis vectors.

use maxq_std::{Context, Result};

use crate::Vector3;
use crate::errhnd::{r#return, signal};
use crate::planes::Plane;
use crate::vectors::{vdist, vdot, vhat, vlcom, vlcom3, vnorm, vperp, vsub, vzero};

/// Ellipse `center + cos(t) semi_major + sin(t) semi_minor`. The semi-axes are
/// orthogonal and `|semi_major| >= |semi_minor|`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ellipse {
    pub center: Vector3,
    pub semi_major: Vector3,
    pub semi_minor: Vector3,
}

/// Ellipse from a centre and two generating vectors, which need not be
/// orthogonal or independent. The points are `center + cos(t) vec1 + sin(t) vec2`.
pub fn cgv2el(center: &Vector3, vec1: &Vector3, vec2: &Vector3) -> Ellipse {
    // Rotating the parameter by `theta` makes the generators orthogonal; this
    // choice of `theta` puts the longer one first
    let a = vdot(vec1, vec1);
    let b = vdot(vec2, vec2);
    let c = vdot(vec1, vec2);
    let theta = 0.5 * (2.0 * c).atan2(a - b);
    let (s, co) = theta.sin_cos();
    Ellipse {
        center: *center,
        semi_major: vlcom(co, vec1, s, vec2),
        semi_minor: vlcom(-s, vec1, co, vec2),
    }
}

/// `(center, semi_major, semi_minor)`
pub fn el2cgv(ellipse: &Ellipse) -> (Vector3, Vector3, Vector3) {
    (ellipse.center, ellipse.semi_major, ellipse.semi_minor)
}

fn check_ellipse(ctx: &mut Context, module: &str, ellipse: &Ellipse) -> Result<bool> {
    if vzero(&ellipse.semi_major) || vzero(&ellipse.semi_minor) {
        signal(
            ctx,
            module,
            "SPICE(DEGENERATECASE)",
            "The ellipse has a semi-axis of zero length.",
        )?;
        return Ok(false);
    }
    Ok(true)
}

/// Intersection of an ellipse and a plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EllipsePlaneHit {
    None,
    One(Vector3),
    Two(Vector3, Vector3),
    /// The ellipse lies in the plane
    Coplanar,
}

/// Where `ellipse` meets `plane`. When there are two points, the first is the
/// one reached first going round the ellipse from the semi-major axis towards
/// the semi-minor axis.
pub fn inelpl(ctx: &mut Context, ellipse: &Ellipse, plane: &Plane) -> Result<EllipsePlaneHit> {
    if r#return(ctx) {
        return Ok(EllipsePlaneHit::None);
    }
    if !check_ellipse(ctx, "INELPL", ellipse)? {
        return Ok(EllipsePlaneHit::None);
    }

    // n · (center + cos t u + sin t v) = constant, scaled so the semi-major
    // axis has unit length
    let scale = vnorm(&ellipse.semi_major);
    let n = plane.normal;
    let alpha = vdot(&n, &ellipse.semi_major) / scale;
    let beta = vdot(&n, &ellipse.semi_minor) / scale;
    let d = (plane.constant - vdot(&n, &ellipse.center)) / scale;

    let r = alpha.hypot(beta);
    if r == 0.0 {
        return Ok(if d == 0.0 { EllipsePlaneHit::Coplanar } else { EllipsePlaneHit::None });
    }
    if d.abs() > r {
        return Ok(EllipsePlaneHit::None);
    }

    let phi = beta.atan2(alpha);
    let delta = (d / r).clamp(-1.0, 1.0).acos();
    let point = |t: f64| {
        let (s, c) = t.sin_cos();
        vlcom3(1.0, &ellipse.center, c, &ellipse.semi_major, s, &ellipse.semi_minor)
    };
    if delta == 0.0 {
        return Ok(EllipsePlaneHit::One(point(phi)));
    }

    let (mut t1, mut t2) = (phi - delta, phi + delta);
    if t1 < 0.0 {
        t1 += std::f64::consts::TAU;
    }
    if t2 < 0.0 {
        t2 += std::f64::consts::TAU;
    }
    if t2 < t1 {
        std::mem::swap(&mut t1, &mut t2);
    }
    Ok(EllipsePlaneHit::Two(point(t1), point(t2)))
}

/// Orthogonal projection of an ellipse onto a plane
pub fn pjelpl(ellipse: &Ellipse, plane: &Plane) -> Ellipse {
    let n = plane.normal;
    let offset = vdot(&n, &ellipse.center) - plane.constant;
    let center = vlcom(1.0, &ellipse.center, -offset, &n);
    cgv2el(
        &center,
        &vperp(&ellipse.semi_major, &n),
        &vperp(&ellipse.semi_minor, &n),
    )
}

/// Nearest point to `(x, y)` on the ellipse `(x/a)² + (y/b)² = 1`, for
/// `a >= b > 0` and `x, y >= 0`
pub(crate) fn nearest_on_ellipse(a: f64, b: f64, x: f64, y: f64) -> (f64, f64) {
    if y > 0.0 {
        if x > 0.0 {
            let z0 = x / a;
            let z1 = y / b;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return (x, y);
            }
            let r0 = (a / b) * (a / b);
            let s = ellipse_root(r0, z0, z1, g);
            (r0 * x / (s + r0), y / (s + 1.0))
        } else {
            (0.0, b)
        }
    } else {
        let numer = a * x;
        let denom = a * a - b * b;
        if numer < denom {
            let xde = numer / denom;
            (a * xde, b * (1.0 - xde * xde).sqrt())
        } else {
            (a, 0.0)
        }
    }
}

/// Root of `(r0 z0 / (s + r0))² + (z1 / (s + 1))² = 1`, by bisection
fn ellipse_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = s0;
    for _ in 0..2200 {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

/// Nearest point on `ellipse` to `point`, and the distance between them
pub fn npelpt(ctx: &mut Context, point: &Vector3, ellipse: &Ellipse) -> Result<(Vector3, f64)> {
    if r#return(ctx) {
        return Ok(([0.0; 3], 0.0));
    }
    if !check_ellipse(ctx, "NPELPT", ellipse)? {
        return Ok(([0.0; 3], 0.0));
    }

    let a = vnorm(&ellipse.semi_major);
    let b = vnorm(&ellipse.semi_minor);
    let (major, minor, a, b) = if a >= b {
        (ellipse.semi_major, ellipse.semi_minor, a, b)
    } else {
        (ellipse.semi_minor, ellipse.semi_major, b, a)
    };
    let u = vhat(&major);
    let v = vhat(&minor);

    let rel = vsub(point, &ellipse.center);
    let x = vdot(&rel, &u);
    let y = vdot(&rel, &v);
    let (px, py) = nearest_on_ellipse(a, b, x.abs(), y.abs());
    let pnear = vlcom3(1.0, &ellipse.center, px.copysign(x), &u, py.copysign(y), &v);
    Ok((pnear, vdist(&pnear, point)))
}
