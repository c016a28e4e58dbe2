//! Three-dimensional vector arithmetic.

use crate::{Matrix3, Vector3};

pub fn vadd(v1: &Vector3, v2: &Vector3) -> Vector3 {
    [v1[0] + v2[0], v1[1] + v2[1], v1[2] + v2[2]]
}

pub fn vsub(v1: &Vector3, v2: &Vector3) -> Vector3 {
    [v1[0] - v2[0], v1[1] - v2[1], v1[2] - v2[2]]
}

pub fn vscl(s: f64, v: &Vector3) -> Vector3 {
    [s * v[0], s * v[1], s * v[2]]
}

pub fn vdot(v1: &Vector3, v2: &Vector3) -> f64 {
    v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2]
}

pub fn vcrss(v1: &Vector3, v2: &Vector3) -> Vector3 {
    [
        v1[1] * v2[2] - v1[2] * v2[1],
        v1[2] * v2[0] - v1[0] * v2[2],
        v1[0] * v2[1] - v1[1] * v2[0],
    ]
}

/// Unit cross product. The inputs are scaled first to avoid overflow. A zero
/// result stays zero.
pub fn ucrss(v1: &Vector3, v2: &Vector3) -> Vector3 {
    let max1 = v1.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    let max2 = v2.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if max1 == 0.0 || max2 == 0.0 {
        return [0.0; 3];
    }
    vhat(&vcrss(&vscl(1.0 / max1, v1), &vscl(1.0 / max2, v2)))
}

/// Euclidean norm, computed without intermediate overflow
pub fn vnorm(v: &Vector3) -> f64 {
    let max = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if max == 0.0 {
        0.0
    } else {
        let s = vscl(1.0 / max, v);
        max * vdot(&s, &s).sqrt()
    }
}

/// Unit vector in the direction of `v`, or the zero vector if `v` is zero
pub fn vhat(v: &Vector3) -> Vector3 {
    let n = vnorm(v);
    if n == 0.0 { [0.0; 3] } else { vscl(1.0 / n, v) }
}

/// Unit vector and norm
pub fn unorm(v: &Vector3) -> (Vector3, f64) {
    (vhat(v), vnorm(v))
}

pub fn vminus(v: &Vector3) -> Vector3 {
    [-v[0], -v[1], -v[2]]
}

pub fn vequ(v: &Vector3) -> Vector3 {
    *v
}

pub fn vzero(v: &Vector3) -> bool {
    v.iter().all(|&x| x == 0.0)
}

pub fn vdist(v1: &Vector3, v2: &Vector3) -> f64 {
    vnorm(&vsub(v1, v2))
}

/// Angle between two vectors in radians, 0 if either is zero
pub fn vsep(v1: &Vector3, v2: &Vector3) -> f64 {
    let u1 = vhat(v1);
    let u2 = vhat(v2);
    if vzero(&u1) || vzero(&u2) {
        return 0.0;
    }
    if vdot(&u1, &u2) > 0.0 {
        2.0 * (0.5 * vnorm(&vsub(&u1, &u2))).asin()
    } else if vdot(&u1, &u2) < 0.0 {
        std::f64::consts::PI - 2.0 * (0.5 * vnorm(&vadd(&u1, &u2))).asin()
    } else {
        std::f64::consts::FRAC_PI_2
    }
}

/// Relative difference `|v1 - v2| / max(|v1|, |v2|)`
pub fn vrel(v1: &Vector3, v2: &Vector3) -> f64 {
    let denom = vnorm(v1).max(vnorm(v2));
    if denom == 0.0 {
        0.0
    } else {
        vdist(v1, v2) / denom
    }
}

/// `a*v1 + b*v2`
pub fn vlcom(a: f64, v1: &Vector3, b: f64, v2: &Vector3) -> Vector3 {
    vadd(&vscl(a, v1), &vscl(b, v2))
}

/// `a*v1 + b*v2 + c*v3`
pub fn vlcom3(a: f64, v1: &Vector3, b: f64, v2: &Vector3, c: f64, v3: &Vector3) -> Vector3 {
    vadd(&vlcom(a, v1, b, v2), &vscl(c, v3))
}

/// Projection of `a` onto `b`; zero if `b` is zero
pub fn vproj(a: &Vector3, b: &Vector3) -> Vector3 {
    let bb = vdot(b, b);
    if bb == 0.0 {
        [0.0; 3]
    } else {
        vscl(vdot(a, b) / bb, b)
    }
}

/// Component of `a` perpendicular to `b`
pub fn vperp(a: &Vector3, b: &Vector3) -> Vector3 {
    if vzero(b) {
        return *a;
    }
    // Scale to keep the projection well conditioned
    let max = a.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if max == 0.0 {
        return [0.0; 3];
    }
    let sa = vscl(1.0 / max, a);
    vscl(max, &vsub(&sa, &vproj(&sa, &vhat(b))))
}

/// Rotate `v` about `axis` by `theta` radians (right-handed)
pub fn vrotv(v: &Vector3, axis: &Vector3, theta: f64) -> Vector3 {
    let k = vhat(axis);
    if vzero(&k) {
        return *v;
    }
    let (s, c) = theta.sin_cos();
    let kxv = vcrss(&k, v);
    let kdv = vdot(&k, v);
    vlcom3(c, v, s, &kxv, kdv * (1.0 - c), &k)
}

/// `v1ᵀ M v2`
pub fn vtmv(v1: &Vector3, m: &Matrix3, v2: &Vector3) -> f64 {
    (0..3)
        .map(|i| v1[i] * vdot(&m[i], v2))
        .sum()
}

pub fn vpack(x: f64, y: f64, z: f64) -> Vector3 {
    [x, y, z]
}

pub fn vupack(v: &Vector3) -> (f64, f64, f64) {
    (v[0], v[1], v[2])
}
