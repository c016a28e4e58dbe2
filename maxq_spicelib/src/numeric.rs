//! Interpolation, root finding, searching and sorting.

use maxq_std::{Context, Result};

use crate::errhnd::{chkin, chkout, errint, r#return, setmsg, sigerr, signal};

/// Signals unless there is at least one abscissa, they are distinct, and there
/// are `per_node` ordinates for each
fn check_nodes(
    ctx: &mut Context,
    module: &str,
    xvals: &[f64],
    yvals: &[f64],
    per_node: usize,
) -> Result<bool> {
    let n = xvals.len();
    if n == 0 {
        signal(ctx, module, "SPICE(BADARRAYSIZE)", "Array size must be positive; was 0.")?;
        return Ok(false);
    }
    if yvals.len() != n * per_node {
        chkin(ctx, module)?;
        setmsg(ctx, "XVALS has # elements, so YVALS must have #; it has #.");
        errint(ctx, "#", n as i64);
        errint(ctx, "#", (n * per_node) as i64);
        errint(ctx, "#", yvals.len() as i64);
        sigerr(ctx, "SPICE(SIZEMISMATCH)")?;
        chkout(ctx, module)?;
        return Ok(false);
    }
    for i in 0..n {
        for j in i + 1..n {
            if xvals[i] == xvals[j] {
                chkin(ctx, module)?;
                setmsg(ctx, "XVALS(#) = XVALS(#).");
                errint(ctx, "#", (i + 1) as i64);
                errint(ctx, "#", (j + 1) as i64);
                sigerr(ctx, "SPICE(DIVIDEBYZERO)")?;
                chkout(ctx, module)?;
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Evaluate the Lagrange polynomial through `(xvals[i], yvals[i])` and its
/// derivative at `x`. Returns `(p, dp)`.
pub fn lgrind(ctx: &mut Context, xvals: &[f64], yvals: &[f64], x: f64) -> Result<(f64, f64)> {
    if r#return(ctx) {
        return Ok((0.0, 0.0));
    }
    if !check_nodes(ctx, "LGRIND", xvals, yvals, 1)? {
        return Ok((0.0, 0.0));
    }

    // Neville's algorithm, carrying the derivative alongside
    let n = xvals.len();
    let mut p = yvals.to_vec();
    let mut dp = vec![0.0; n];
    for j in 1..n {
        for i in 0..n - j {
            let denom = xvals[i] - xvals[i + j];
            let c1 = x - xvals[i + j];
            let c2 = xvals[i] - x;
            dp[i] = (c1 * dp[i] + c2 * dp[i + 1] + p[i] - p[i + 1]) / denom;
            p[i] = (c1 * p[i] + c2 * p[i + 1]) / denom;
        }
    }
    Ok((p[0], dp[0]))
}

/// Evaluate the Hermite polynomial matching values and first derivatives at
/// each abscissa, and its derivative, at `x`. `yvals` interleaves them:
/// `[f(x0), f'(x0), f(x1), f'(x1), ...]`. Returns `(p, dp)`.
pub fn hrmint(ctx: &mut Context, xvals: &[f64], yvals: &[f64], x: f64) -> Result<(f64, f64)> {
    if r#return(ctx) {
        return Ok((0.0, 0.0));
    }
    if !check_nodes(ctx, "HRMINT", xvals, yvals, 2)? {
        return Ok((0.0, 0.0));
    }

    // Newton divided differences over the abscissas, each taken twice
    let m = 2 * xvals.len();
    let z: Vec<f64> = (0..m).map(|i| xvals[i / 2]).collect();
    let mut d: Vec<f64> = (0..m).map(|i| yvals[2 * (i / 2)]).collect();
    for j in 1..m {
        for i in (j..m).rev() {
            d[i] = if j == 1 && i % 2 == 1 {
                yvals[i]
            } else {
                (d[i] - d[i - 1]) / (z[i] - z[i - j])
            };
        }
    }

    let mut p = d[m - 1];
    let mut dp = 0.0;
    for k in (0..m - 1).rev() {
        dp = dp * (x - z[k]) + p;
        p = p * (x - z[k]) + d[k];
    }
    Ok((p, dp))
}

/// Roots of `a x² + b x + c`, as `(real, imaginary)` pairs. Complex roots come
/// as a conjugate pair with the positive imaginary part first; real roots are
/// in decreasing order. A linear equation gives its root twice.
pub fn rquad(ctx: &mut Context, a: f64, b: f64, c: f64) -> Result<([f64; 2], [f64; 2])> {
    if r#return(ctx) {
        return Ok(([0.0; 2], [0.0; 2]));
    }

    if a == 0.0 && b == 0.0 {
        signal(
            ctx,
            "RQUAD",
            "SPICE(DEGENERATECASE)",
            "Both 1st and 2nd degree coefficients are zero.",
        )?;
        return Ok(([0.0; 2], [0.0; 2]));
    }

    if a == 0.0 {
        let root = [-c / b, 0.0];
        return Ok((root, root));
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let re = -b / (2.0 * a);
        let im = ((-disc).sqrt() / (2.0 * a)).abs();
        return Ok(([re, im], [re, -im]));
    }

    let s = disc.sqrt();
    let q = -0.5 * (b + b.signum() * s);
    let (r1, r2) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };
    Ok(([r1.max(r2), 0.0], [r1.min(r2), 0.0]))
}

/// Index of `value` in an array sorted in increasing order
pub fn bsrchd(value: f64, array: &[f64]) -> Option<usize> {
    array.binary_search_by(|x| x.total_cmp(&value)).ok()
}

/// Sort in increasing order
pub fn shelld(array: &mut [f64]) {
    array.sort_by(f64::total_cmp);
}
