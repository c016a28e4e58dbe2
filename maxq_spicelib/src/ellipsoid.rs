//! Triaxial ellipsoids centred on the origin, with semi-axes along the
//! coordinate axes.

use maxq_std::{Context, Result};

use crate::Vector3;
use crate::ellipses::{cgv2el, nearest_on_ellipse, npelpt};
use crate::errhnd::{chkin, chkout, errdp, failed, r#return, setmsg, sigerr, signal};
use crate::planes::{Plane, pl2psv};
use crate::vectors::{vadd, vdist, vdot, vhat, vlcom, vminus, vnorm, vperp, vscl, vsub, vzero};

fn check_axes(ctx: &mut Context, module: &str, a: f64, b: f64, c: f64) -> Result<bool> {
    if a > 0.0 && b > 0.0 && c > 0.0 {
        return Ok(true);
    }
    chkin(ctx, module)?;
    setmsg(ctx, "The ellipsoid axis lengths are #, #, #. All must be positive.");
    errdp(ctx, "#", a);
    errdp(ctx, "#", b);
    errdp(ctx, "#", c);
    sigerr(ctx, "SPICE(BADAXISLENGTH)")?;
    chkout(ctx, module)?;
    Ok(false)
}

/// First intersection of the ray from `positn` along `u` with the ellipsoid
/// surface. A ray starting inside the ellipsoid gives the exit point. `None` if
/// the ray misses.
pub fn surfpt(
    ctx: &mut Context,
    positn: &Vector3,
    u: &Vector3,
    a: f64,
    b: f64,
    c: f64,
) -> Result<Option<Vector3>> {
    if r#return(ctx) {
        return Ok(None);
    }
    if !check_axes(ctx, "SURFPT", a, b, c)? {
        return Ok(None);
    }
    if vzero(u) {
        signal(
            ctx,
            "SURFPT",
            "SPICE(ZEROVECTOR)",
            "The input ray direction is the zero vector.",
        )?;
        return Ok(None);
    }

    // Work on the unit sphere
    let p = [positn[0] / a, positn[1] / b, positn[2] / c];
    let d = vhat(&[u[0] / a, u[1] / b, u[2] / c]);

    let bq = vdot(&p, &d);
    let cq = vdot(&p, &p) - 1.0;
    let disc = bq * bq - cq;
    if disc < 0.0 {
        return Ok(None);
    }
    let t = if cq > 0.0 {
        let t = -bq - disc.sqrt();
        if t < 0.0 {
            return Ok(None);
        }
        t
    } else {
        -bq + disc.sqrt()
    };

    let hit = vadd(&p, &vscl(t, &d));
    Ok(Some([hit[0] * a, hit[1] * b, hit[2] * c]))
}

/// Outward unit normal at a surface point
pub fn surfnm(ctx: &mut Context, a: f64, b: f64, c: f64, point: &Vector3) -> Result<Vector3> {
    if r#return(ctx) {
        return Ok([0.0; 3]);
    }
    if !check_axes(ctx, "SURFNM", a, b, c)? {
        return Ok([0.0; 3]);
    }

    let n = vhat(&[point[0] / (a * a), point[1] / (b * b), point[2] / (c * c)]);
    if vzero(&n) {
        signal(
            ctx,
            "SURFNM",
            "SPICE(DEGENERATECASE)",
            "The input point is the origin, which has no surface normal.",
        )?;
        return Ok([0.0; 3]);
    }
    Ok(n)
}

/// Nearest point to `y` on the ellipsoid with semi-axes `e`, for
/// `e[0] >= e[1] >= e[2] > 0` and non-negative coordinates
fn nearest_on_ellipsoid(e: [f64; 3], y: [f64; 3]) -> [f64; 3] {
    if y[2] > 0.0 {
        if y[1] > 0.0 {
            if y[0] > 0.0 {
                let z = [y[0] / e[0], y[1] / e[1], y[2] / e[2]];
                let g = vdot(&z, &z) - 1.0;
                if g == 0.0 {
                    return y;
                }
                let r = [(e[0] / e[2]).powi(2), (e[1] / e[2]).powi(2)];
                let s = ellipsoid_root(r, z, g);
                [r[0] * y[0] / (s + r[0]), r[1] * y[1] / (s + r[1]), y[2] / (s + 1.0)]
            } else {
                let (x1, x2) = nearest_on_ellipse(e[1], e[2], y[1], y[2]);
                [0.0, x1, x2]
            }
        } else if y[0] > 0.0 {
            let (x0, x2) = nearest_on_ellipse(e[0], e[2], y[0], y[2]);
            [x0, 0.0, x2]
        } else {
            [0.0, 0.0, e[2]]
        }
    } else {
        let denom = [e[0] * e[0] - e[2] * e[2], e[1] * e[1] - e[2] * e[2]];
        let numer = [e[0] * y[0], e[1] * y[1]];
        if numer[0] < denom[0] && numer[1] < denom[1] {
            let xde = [numer[0] / denom[0], numer[1] / denom[1]];
            let discr = 1.0 - xde[0] * xde[0] - xde[1] * xde[1];
            if discr > 0.0 {
                return [e[0] * xde[0], e[1] * xde[1], e[2] * discr.sqrt()];
            }
        }
        let (x0, x1) = nearest_on_ellipse(e[0], e[1], y[0], y[1]);
        [x0, x1, 0.0]
    }
}

/// Root of `Σ (r_i z_i / (s + r_i))² = 1` (with `r_2 = 1`), by bisection
fn ellipsoid_root(r: [f64; 2], z: [f64; 3], g: f64) -> f64 {
    let n = [r[0] * z[0], r[1] * z[1]];
    let mut s0 = z[2] - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { vnorm(&[n[0], n[1], z[2]]) - 1.0 };
    let mut s = s0;
    for _ in 0..2200 {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio = [n[0] / (s + r[0]), n[1] / (s + r[1]), z[2] / (s + 1.0)];
        let g = vdot(&ratio, &ratio) - 1.0;
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

/// Nearest point on the ellipsoid surface to `positn`, and the altitude of
/// `positn` above it. The altitude is negative inside the ellipsoid.
pub fn nearpt(ctx: &mut Context, positn: &Vector3, a: f64, b: f64, c: f64) -> Result<(Vector3, f64)> {
    if r#return(ctx) {
        return Ok(([0.0; 3], 0.0));
    }
    if !check_axes(ctx, "NEARPT", a, b, c)? {
        return Ok(([0.0; 3], 0.0));
    }

    // Solve with the axes in decreasing order, in the first octant
    let axes = [a, b, c];
    let mut order = [0, 1, 2];
    order.sort_by(|&i, &j| axes[j].total_cmp(&axes[i]));
    let e = order.map(|i| axes[i]);
    let y = order.map(|i| positn[i].abs());
    let x = nearest_on_ellipsoid(e, y);

    let mut npoint = [0.0; 3];
    for (k, &i) in order.iter().enumerate() {
        npoint[i] = x[k].copysign(positn[i]);
    }
    let scaled = [positn[0] / a, positn[1] / b, positn[2] / c];
    let dist = vdist(&npoint, positn);
    let alt = if vdot(&scaled, &scaled) < 1.0 { -dist } else { dist };
    Ok((npoint, alt))
}

/// Nearest point on the ellipsoid surface to the line through `linept` along
/// `linedr`, and the distance between them. A line that meets the surface
/// gives an intersection point and distance zero.
pub fn npedln(
    ctx: &mut Context,
    a: f64,
    b: f64,
    c: f64,
    linept: &Vector3,
    linedr: &Vector3,
) -> Result<(Vector3, f64)> {
    if r#return(ctx) {
        return Ok(([0.0; 3], 0.0));
    }
    if !check_axes(ctx, "NPEDLN", a, b, c)? {
        return Ok(([0.0; 3], 0.0));
    }
    if vzero(linedr) {
        signal(
            ctx,
            "NPEDLN",
            "SPICE(ZEROVECTOR)",
            "The line direction is the zero vector.",
        )?;
        return Ok(([0.0; 3], 0.0));
    }

    for dir in [*linedr, vminus(linedr)] {
        if let Some(hit) = surfpt(ctx, linept, &dir, a, b, c)? {
            return Ok((hit, 0.0));
        }
    }

    // Otherwise the nearest point lies on the limb seen along the line: the
    // points whose surface normal is perpendicular to it
    let scaled = vhat(&[linedr[0] / a, linedr[1] / b, linedr[2] / c]);
    let (_, e1, e2) = pl2psv(&Plane { normal: scaled, constant: 0.0 });
    let u = [a * e1[0], b * e1[1], c * e1[2]];
    let v = [a * e2[0], b * e2[1], c * e2[2]];

    // Projected along the line, the line becomes a point and the limb an
    // ellipse with generators `pu` and `pv`
    let dir = vhat(linedr);
    let pu = vperp(&u, &dir);
    let pv = vperp(&v, &dir);
    let target = vperp(linept, &dir);
    let (pnear, _) = npelpt(ctx, &target, &cgv2el(&[0.0; 3], &pu, &pv))?;
    if failed(ctx) {
        return Ok(([0.0; 3], 0.0));
    }

    // Parameter of the projected point, carried back to the limb
    let g = [vdot(&pu, &pu), vdot(&pu, &pv), vdot(&pv, &pv)];
    let det = g[0] * g[2] - g[1] * g[1];
    if det == 0.0 {
        signal(
            ctx,
            "NPEDLN",
            "SPICE(DEGENERATECASE)",
            "The limb of the ellipsoid projects to a line segment.",
        )?;
        return Ok(([0.0; 3], 0.0));
    }
    let (ru, rv) = (vdot(&pu, &pnear), vdot(&pv, &pnear));
    let cos = (g[2] * ru - g[1] * rv) / det;
    let sin = (g[0] * rv - g[1] * ru) / det;
    let h = cos.hypot(sin);
    let point = vlcom(cos / h, &u, sin / h, &v);
    let dist = vnorm(&vperp(&vsub(&point, linept), &dir));
    Ok((point, dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, failed, getsms, reset};
    use approx::assert_abs_diff_eq;

    fn ctx<'a>() -> Context<'a> {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();
        ctx
    }

    #[test]
    fn ray_intersections() {
        let mut ctx = ctx();
        let (a, b, c) = (1.0, 2.0, 3.0);

        let hit = surfpt(&mut ctx, &[2.0, 0.0, 0.0], &[-1.0, 0.0, 0.0], a, b, c).unwrap();
        assert_abs_diff_eq!(hit.unwrap().as_slice(), [1.0, 0.0, 0.0].as_slice(), epsilon = 1e-15);

        let hit = surfpt(&mut ctx, &[0.0, 0.0, 10.0], &[0.0, 0.0, -1.0], a, b, c).unwrap();
        assert_abs_diff_eq!(hit.unwrap().as_slice(), [0.0, 0.0, 3.0].as_slice(), epsilon = 1e-14);

        // From inside, the exit point
        let hit = surfpt(&mut ctx, &[0.0; 3], &[0.0, 1.0, 0.0], a, b, c).unwrap();
        assert_abs_diff_eq!(hit.unwrap().as_slice(), [0.0, 2.0, 0.0].as_slice(), epsilon = 1e-15);

        // Pointing away, and missing
        assert_eq!(surfpt(&mut ctx, &[2.0, 0.0, 0.0], &[1.0, 0.0, 0.0], a, b, c).unwrap(), None);
        assert_eq!(surfpt(&mut ctx, &[2.0, 0.0, 0.0], &[0.0, 1.0, 0.0], a, b, c).unwrap(), None);
        assert!(!failed(&ctx));
    }

    #[test]
    fn normals() {
        let mut ctx = ctx();
        let n = surfnm(&mut ctx, 1.0, 2.0, 3.0, &[0.0, 2.0, 0.0]).unwrap();
        assert_eq!(n, [0.0, 1.0, 0.0]);

        let (a, b) = (2.0, 1.0);
        let x = 2f64.sqrt();
        let n = surfnm(&mut ctx, a, b, 1.0, &[x, x / 2.0, 0.0]).unwrap();
        let expect = vhat(&[x / 4.0, x / 2.0, 0.0]);
        assert_abs_diff_eq!(n.as_slice(), expect.as_slice(), epsilon = 1e-15);
    }

    #[test]
    fn errors() {
        let mut ctx = ctx();
        surfpt(&mut ctx, &[2.0, 0.0, 0.0], &[-1.0, 0.0, 0.0], 1.0, 0.0, 1.0).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(BADAXISLENGTH)");
        reset(&mut ctx);
        surfpt(&mut ctx, &[2.0, 0.0, 0.0], &[0.0; 3], 1.0, 1.0, 1.0).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(ZEROVECTOR)");
        reset(&mut ctx);
        surfnm(&mut ctx, -1.0, 1.0, 1.0, &[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(BADAXISLENGTH)");
        reset(&mut ctx);
        surfnm(&mut ctx, 1.0, 1.0, 1.0, &[0.0; 3]).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(DEGENERATECASE)");
        reset(&mut ctx);
        nearpt(&mut ctx, &[1.0, 0.0, 0.0], 1.0, 1.0, 0.0).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(BADAXISLENGTH)");
        reset(&mut ctx);
        npedln(&mut ctx, 1.0, 1.0, 1.0, &[2.0, 0.0, 0.0], &[0.0; 3]).unwrap();
        assert_eq!(getsms(&mut ctx), "SPICE(ZEROVECTOR)");
    }

    /// Checks that `p` is on the surface and `q - p` is along the normal there
    fn assert_normal_offset(p: &Vector3, q: &Vector3, a: f64, b: f64, c: f64) {
        let level = (p[0] / a).powi(2) + (p[1] / b).powi(2) + (p[2] / c).powi(2);
        assert_abs_diff_eq!(level, 1.0, epsilon = 1e-12);
        let normal = [p[0] / (a * a), p[1] / (b * b), p[2] / (c * c)];
        let offset = vsub(q, p);
        let cross = crate::vectors::vcrss(&vhat(&normal), &offset);
        assert_abs_diff_eq!(vnorm(&cross), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn nearest_to_point() {
        let mut ctx = ctx();

        let (p, alt) = nearpt(&mut ctx, &[3.0, 0.0, 0.0], 1.0, 1.0, 1.0).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [1.0, 0.0, 0.0].as_slice(), epsilon = 1e-15);
        assert_abs_diff_eq!(alt, 2.0, epsilon = 1e-15);

        let (p, alt) = nearpt(&mut ctx, &[0.0, 0.0, -5.0], 3.0, 2.0, 1.0).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [0.0, 0.0, -1.0].as_slice(), epsilon = 1e-15);
        assert_abs_diff_eq!(alt, 4.0, epsilon = 1e-15);

        let (p, alt) = nearpt(&mut ctx, &[0.0, 0.0, 0.5], 3.0, 2.0, 1.0).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [0.0, 0.0, 1.0].as_slice(), epsilon = 1e-15);
        assert_abs_diff_eq!(alt, -0.5, epsilon = 1e-15);

        // The centre is nearest to the ends of the shortest axis
        let (p, alt) = nearpt(&mut ctx, &[0.0; 3], 1.0, 2.0, 3.0).unwrap();
        assert_abs_diff_eq!(p[0].abs(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(alt, -1.0, epsilon = 1e-15);

        for (q, (a, b, c)) in [
            ([1.0, 1.0, 1.0], (1.0, 2.0, 3.0)),
            ([-2.0, -3.0, 4.0], (1.0, 2.0, 3.0)),
            ([6000.0, -1000.0, 7000.0], (6378.0, 6378.0, 6357.0)),
            ([0.2, 0.1, -0.3], (1.0, 2.0, 3.0)),
        ] {
            let (p, alt) = nearpt(&mut ctx, &q, a, b, c).unwrap();
            assert_normal_offset(&p, &q, a, b, c);
            assert_abs_diff_eq!(alt.abs(), vdist(&p, &q), epsilon = 1e-9);
        }
        assert!(!failed(&ctx));
    }

    #[test]
    fn nearest_to_line() {
        let mut ctx = ctx();

        let (p, d) = npedln(&mut ctx, 1.0, 1.0, 1.0, &[2.0, 0.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [1.0, 0.0, 0.0].as_slice(), epsilon = 1e-14);
        assert_abs_diff_eq!(d, 1.0, epsilon = 1e-14);

        let (p, d) = npedln(&mut ctx, 2.0, 1.0, 1.0, &[4.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [2.0, 0.0, 0.0].as_slice(), epsilon = 1e-14);
        assert_abs_diff_eq!(d, 2.0, epsilon = 1e-14);

        // Lines through the ellipsoid, in either direction
        let (p, d) = npedln(&mut ctx, 1.0, 1.0, 1.0, &[0.0, 0.0, 5.0], &[0.0, 0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(p.as_slice(), [0.0, 0.0, 1.0].as_slice(), epsilon = 1e-14);
        assert_eq!(d, 0.0);

        // No sampled surface point is closer to a skew line
        let (a, b, c) = (3.0, 2.0, 1.0);
        let (linept, linedr) = ([4.0, 1.0, 2.0], [1.0, -1.0, 0.5]);
        let (p, d) = npedln(&mut ctx, a, b, c, &linept, &linedr).unwrap();
        assert!(d > 0.0);
        let level = (p[0] / a).powi(2) + (p[1] / b).powi(2) + (p[2] / c).powi(2);
        assert_abs_diff_eq!(level, 1.0, epsilon = 1e-12);
        let dir = vhat(&linedr);
        for i in 0..40 {
            for j in 0..20 {
                let lon = i as f64 * std::f64::consts::TAU / 40.0;
                let lat = (j as f64 / 19.0 - 0.5) * std::f64::consts::PI;
                let q = [a * lat.cos() * lon.cos(), b * lat.cos() * lon.sin(), c * lat.sin()];
                let dq = vnorm(&vperp(&vsub(&q, &linept), &dir));
                assert!(dq >= d - 1e-9, "{q:?} is closer than {p:?}");
            }
        }
        assert!(!failed(&ctx));
    }
}
