//! Conversions between rectangular, latitudinal, spherical, cylindrical, RA/Dec,
//! azimuth/elevation, geodetic and planetographic coordinates. Angles are radians.

use std::f64::consts::{FRAC_PI_2, TAU};

use maxq_std::{Context, Result};

use crate::Vector3;
use crate::bodies::bods2c;
use crate::errhnd::{chkin, chkout, errch, errdp, errint, r#return, setmsg, sigerr};
use crate::pool::{self, PoolValues};

fn longitude(x: f64, y: f64) -> f64 {
    if x == 0.0 && y == 0.0 { 0.0 } else { y.atan2(x) }
}

fn positive_longitude(x: f64, y: f64) -> f64 {
    let lon = longitude(x, y);
    if lon < 0.0 { lon + TAU } else { lon }
}

/// Rectangular to `(radius, longitude, latitude)`
pub fn reclat(rect: &Vector3) -> (f64, f64, f64) {
    let [x, y, z] = *rect;
    let big = x.abs().max(y.abs()).max(z.abs());
    if big == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let (sx, sy, sz) = (x / big, y / big, z / big);
    let radius = big * (sx * sx + sy * sy + sz * sz).sqrt();
    let lat = z.atan2(x.hypot(y));
    (radius, longitude(x, y), lat)
}

pub fn latrec(radius: f64, lon: f64, lat: f64) -> Vector3 {
    [
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    ]
}

/// Rectangular to `(radius, colatitude, longitude)`
pub fn recsph(rect: &Vector3) -> (f64, f64, f64) {
    let (radius, lon, _) = reclat(rect);
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let colat = rect[0].hypot(rect[1]).atan2(rect[2]);
    (radius, colat, lon)
}

pub fn sphrec(radius: f64, colat: f64, lon: f64) -> Vector3 {
    [
        radius * colat.sin() * lon.cos(),
        radius * colat.sin() * lon.sin(),
        radius * colat.cos(),
    ]
}

/// Rectangular to `(radius, longitude, z)`, with longitude in `[0, 2π)`
pub fn reccyl(rect: &Vector3) -> (f64, f64, f64) {
    (rect[0].hypot(rect[1]), positive_longitude(rect[0], rect[1]), rect[2])
}

pub fn cylrec(r: f64, lon: f64, z: f64) -> Vector3 {
    [r * lon.cos(), r * lon.sin(), z]
}

/// Rectangular to `(range, right ascension, declination)`, with right ascension in
/// `[0, 2π)`
pub fn recrad(rect: &Vector3) -> (f64, f64, f64) {
    let (range, _, dec) = reclat(rect);
    (range, positive_longitude(rect[0], rect[1]), dec)
}

pub fn radrec(range: f64, ra: f64, dec: f64) -> Vector3 {
    latrec(range, ra, dec)
}

/// Rectangular to `(range, azimuth, elevation)`, with azimuth in `[0, 2π)`.
/// Azimuth increases counterclockwise about +Z when `azccw`, clockwise
/// otherwise. Elevation is positive toward +Z when `elplsz`.
pub fn recazl(rect: &Vector3, azccw: bool, elplsz: bool) -> (f64, f64, f64) {
    let (range, _, el) = reclat(rect);
    let [x, y, _] = *rect;
    let az = if azccw {
        positive_longitude(x, y)
    } else {
        positive_longitude(x, -y)
    };
    (range, az, if elplsz { el } else { -el })
}

pub fn azlrec(range: f64, az: f64, el: f64, azccw: bool, elplsz: bool) -> Vector3 {
    let lon = if azccw { az } else { -az };
    let lat = if elplsz { el } else { -el };
    latrec(range, lon, lat)
}

/// Latitudinal to `(radius, longitude, z)`
pub fn latcyl(radius: f64, lon: f64, lat: f64) -> (f64, f64, f64) {
    (radius * lat.cos(), lon, radius * lat.sin())
}

/// Cylindrical to `(radius, longitude, latitude)`
pub fn cyllat(r: f64, lon: f64, z: f64) -> (f64, f64, f64) {
    let radius = r.hypot(z);
    let lat = if radius == 0.0 { 0.0 } else { z.atan2(r) };
    (radius, lon, lat)
}

/// Latitudinal to `(radius, colatitude, longitude)`
pub fn latsph(radius: f64, lon: f64, lat: f64) -> (f64, f64, f64) {
    (radius, FRAC_PI_2 - lat, lon)
}

/// Spherical to `(radius, longitude, latitude)`
pub fn sphlat(radius: f64, colat: f64, lon: f64) -> (f64, f64, f64) {
    (radius, lon, FRAC_PI_2 - colat)
}

/// Spherical to `(radius, longitude, z)`
pub fn sphcyl(radius: f64, colat: f64, lon: f64) -> (f64, f64, f64) {
    (radius * colat.sin(), lon, radius * colat.cos())
}

/// Cylindrical to `(radius, colatitude, longitude)`
pub fn cylsph(r: f64, lon: f64, z: f64) -> (f64, f64, f64) {
    let radius = r.hypot(z);
    let colat = if radius == 0.0 { 0.0 } else { r.atan2(z) };
    (radius, colat, lon)
}

fn check_spheroid(ctx: &mut Context, module: &str, re: f64, f: f64) -> Result<bool> {
    if re <= 0.0 {
        chkin(ctx, module)?;
        setmsg(ctx, "Equatorial radius was #.");
        errdp(ctx, "#", re);
        sigerr(ctx, "SPICE(VALUEOUTOFRANGE)")?;
        chkout(ctx, module)?;
        return Ok(false);
    }
    if f >= 1.0 {
        chkin(ctx, module)?;
        setmsg(ctx, "Flattening coefficient was #.");
        errdp(ctx, "#", f);
        sigerr(ctx, "SPICE(VALUEOUTOFRANGE)")?;
        chkout(ctx, module)?;
        return Ok(false);
    }
    Ok(true)
}

/// Geodetic `(longitude, latitude, altitude)` on a spheroid with equatorial
/// radius `re` and flattening `f` to rectangular.
pub fn georec(ctx: &mut Context, lon: f64, lat: f64, alt: f64, re: f64, f: f64) -> Result<Vector3> {
    if r#return(ctx) {
        return Ok([0.0; 3]);
    }
    if !check_spheroid(ctx, "GEOREC", re, f)? {
        return Ok([0.0; 3]);
    }

    let e2 = f * (2.0 - f);
    let (slat, clat) = lat.sin_cos();
    let n = re / (1.0 - e2 * slat * slat).sqrt();
    Ok([
        (n + alt) * clat * lon.cos(),
        (n + alt) * clat * lon.sin(),
        (n * (1.0 - e2) + alt) * slat,
    ])
}

/// Rectangular to geodetic `(longitude, latitude, altitude)`. Points on the polar
/// axis get longitude 0; the origin gets latitude `π/2`.
pub fn recgeo(ctx: &mut Context, rect: &Vector3, re: f64, f: f64) -> Result<(f64, f64, f64)> {
    if r#return(ctx) {
        return Ok((0.0, 0.0, 0.0));
    }
    if !check_spheroid(ctx, "RECGEO", re, f)? {
        return Ok((0.0, 0.0, 0.0));
    }

    let [x, y, z] = *rect;
    let rp = re * (1.0 - f);
    let p = x.hypot(y);
    let lon = longitude(x, y);

    if p == 0.0 {
        let lat = if z < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
        return Ok((lon, lat, z.abs() - rp));
    }

    let e2 = f * (2.0 - f);
    let height = |lat: f64| {
        let (slat, clat) = lat.sin_cos();
        p * clat + z * slat - re * (1.0 - e2 * slat * slat).sqrt()
    };

    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..100 {
        let slat = lat.sin();
        let n = re / (1.0 - e2 * slat * slat).sqrt();
        let next = z.atan2(p * (1.0 - e2 * n / (n + height(lat))));
        let done = (next - lat).abs() <= 1e-15 * lat.abs().max(1.0);
        lat = next;
        if done {
            break;
        }
    }
    let alt = height(lat);
    Ok((lon, lat, alt))
}

/// Bodies whose planetographic longitude is positive east regardless of
/// their sense of rotation
const EAST_POSITIVE: [i32; 3] = [399, 301, 10];

/// +1 if planetographic longitude on `body` increases eastward, -1 if westward.
/// `BODY<id>_PGR_POSITIVE_LON` overrides; otherwise prograde rotators are
/// west-positive.
fn longitude_sense(ctx: &mut Context, module: &str, body: &str) -> Result<Option<f64>> {
    let Some(code) = bods2c(ctx, body)? else {
        chkin(ctx, module)?;
        setmsg(ctx, "The body name # could not be translated to a NAIF ID code.");
        errch(ctx, "#", body.trim());
        sigerr(ctx, "SPICE(NOTRANSLATION)")?;
        chkout(ctx, module)?;
        return Ok(None);
    };

    let name = format!("BODY{code}_PGR_POSITIVE_LON");
    if let Some(values) = pool::lookup(ctx, &name) {
        let given = match &values {
            PoolValues::Character(v) => v.first().map(|s| s.trim().to_ascii_uppercase()),
            PoolValues::Numeric(_) => None,
        };
        return match given.as_deref() {
            Some("EAST") => Ok(Some(1.0)),
            Some("WEST") => Ok(Some(-1.0)),
            _ => {
                chkin(ctx, module)?;
                setmsg(ctx, "The kernel variable # must be 'EAST' or 'WEST'.");
                errch(ctx, "#", &name);
                sigerr(ctx, "SPICE(VALUEOUTOFRANGE)")?;
                chkout(ctx, module)?;
                Ok(None)
            }
        };
    }

    if EAST_POSITIVE.contains(&code) {
        return Ok(Some(1.0));
    }

    match pool::lookup(ctx, &format!("BODY{code}_PM")) {
        Some(PoolValues::Numeric(pm)) if pm.len() >= 2 => {
            Ok(Some(if pm[1] < 0.0 { 1.0 } else { -1.0 }))
        }
        _ => {
            chkin(ctx, module)?;
            setmsg(
                ctx,
                "The sense of longitude on body # is set by BODY#_PM, which was not found in the kernel pool.",
            );
            errch(ctx, "#", body.trim());
            errint(ctx, "#", code as i64);
            sigerr(ctx, "SPICE(KERNELVARNOTFOUND)")?;
            chkout(ctx, module)?;
            Ok(None)
        }
    }
}

/// Planetographic `(longitude, latitude, altitude)` on `body` to rectangular.
/// The spheroid is as for [`georec`].
pub fn pgrrec(
    ctx: &mut Context,
    body: &str,
    lon: f64,
    lat: f64,
    alt: f64,
    re: f64,
    f: f64,
) -> Result<Vector3> {
    if r#return(ctx) {
        return Ok([0.0; 3]);
    }
    if !check_spheroid(ctx, "PGRREC", re, f)? {
        return Ok([0.0; 3]);
    }
    let Some(sense) = longitude_sense(ctx, "PGRREC", body)? else {
        return Ok([0.0; 3]);
    };
    georec(ctx, sense * lon, lat, alt, re, f)
}

/// Rectangular to planetographic `(longitude, latitude, altitude)` on `body`,
/// with longitude in `[0, 2π)`
pub fn recpgr(ctx: &mut Context, body: &str, rect: &Vector3, re: f64, f: f64) -> Result<(f64, f64, f64)> {
    if r#return(ctx) {
        return Ok((0.0, 0.0, 0.0));
    }
    if !check_spheroid(ctx, "RECPGR", re, f)? {
        return Ok((0.0, 0.0, 0.0));
    }
    let Some(sense) = longitude_sense(ctx, "RECPGR", body)? else {
        return Ok((0.0, 0.0, 0.0));
    };
    let (lon, lat, alt) = recgeo(ctx, rect, re, f)?;
    let lon = (sense * lon).rem_euclid(TAU);
    // rem_euclid can round up to TAU itself
    Ok((if lon >= TAU { 0.0 } else { lon }, lat, alt))
}
