//! Coordinate systems, planes, ellipses and ellipsoids.

use maxq_spicelib::{coords, ellipses, ellipsoid, planes};

use crate::{
    Angle, AzElVector, CylindricalVector, DimensionlessVector, Distance, DistanceVector, Ellipse,
    EllipsePlaneIntersection, GeodeticVector, LatitudinalVector, Plane, RaDecVector, Result,
    SpiceContext, SphericalVector,
};

pub fn reclat(rect: DistanceVector) -> LatitudinalVector {
    let (r, lon, lat) = coords::reclat(&rect.to_array());
    LatitudinalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        lat: Angle::new(lat),
    }
}

pub fn latrec(lat: LatitudinalVector) -> DistanceVector {
    DistanceVector::from_array(coords::latrec(lat.r.km, lat.lon.radians, lat.lat.radians))
}

pub fn recsph(rect: DistanceVector) -> SphericalVector {
    let (r, colat, lon) = coords::recsph(&rect.to_array());
    SphericalVector {
        r: Distance::new(r),
        colat: Angle::new(colat),
        lon: Angle::new(lon),
    }
}

pub fn sphrec(sph: SphericalVector) -> DistanceVector {
    DistanceVector::from_array(coords::sphrec(sph.r.km, sph.colat.radians, sph.lon.radians))
}

/// Cylindrical coordinates, with longitude in `[0, 2π)`
pub fn reccyl(rect: DistanceVector) -> CylindricalVector {
    let (r, lon, z) = coords::reccyl(&rect.to_array());
    CylindricalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        z: Distance::new(z),
    }
}

pub fn cylrec(cyl: CylindricalVector) -> DistanceVector {
    DistanceVector::from_array(coords::cylrec(cyl.r.km, cyl.lon.radians, cyl.z.km))
}

/// Range, right ascension in `[0, 2π)` and declination
pub fn recrad(rect: DistanceVector) -> RaDecVector {
    let (range, ra, dec) = coords::recrad(&rect.to_array());
    RaDecVector {
        range: Distance::new(range),
        ra: Angle::new(ra),
        dec: Angle::new(dec),
    }
}

pub fn radrec(radec: RaDecVector) -> DistanceVector {
    DistanceVector::from_array(coords::radrec(radec.range.km, radec.ra.radians, radec.dec.radians))
}

/// Range, azimuth in `[0, 2π)` and elevation. Azimuth runs counterclockwise
/// about +Z if `azccw`; elevation is positive toward +Z if `elplsz`.
pub fn recazl(rect: DistanceVector, azccw: bool, elplsz: bool) -> AzElVector {
    let (range, az, el) = coords::recazl(&rect.to_array(), azccw, elplsz);
    AzElVector {
        range: Distance::new(range),
        az: Angle::new(az),
        el: Angle::new(el),
    }
}

pub fn azlrec(azel: AzElVector, azccw: bool, elplsz: bool) -> DistanceVector {
    DistanceVector::from_array(coords::azlrec(
        azel.range.km,
        azel.az.radians,
        azel.el.radians,
        azccw,
        elplsz,
    ))
}

pub fn latcyl(lat: LatitudinalVector) -> CylindricalVector {
    let (r, lon, z) = coords::latcyl(lat.r.km, lat.lon.radians, lat.lat.radians);
    CylindricalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        z: Distance::new(z),
    }
}

pub fn cyllat(cyl: CylindricalVector) -> LatitudinalVector {
    let (r, lon, lat) = coords::cyllat(cyl.r.km, cyl.lon.radians, cyl.z.km);
    LatitudinalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        lat: Angle::new(lat),
    }
}

pub fn latsph(lat: LatitudinalVector) -> SphericalVector {
    let (r, colat, lon) = coords::latsph(lat.r.km, lat.lon.radians, lat.lat.radians);
    SphericalVector {
        r: Distance::new(r),
        colat: Angle::new(colat),
        lon: Angle::new(lon),
    }
}

pub fn sphlat(sph: SphericalVector) -> LatitudinalVector {
    let (r, lon, lat) = coords::sphlat(sph.r.km, sph.colat.radians, sph.lon.radians);
    LatitudinalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        lat: Angle::new(lat),
    }
}

pub fn sphcyl(sph: SphericalVector) -> CylindricalVector {
    let (r, lon, z) = coords::sphcyl(sph.r.km, sph.colat.radians, sph.lon.radians);
    CylindricalVector {
        r: Distance::new(r),
        lon: Angle::new(lon),
        z: Distance::new(z),
    }
}

pub fn cylsph(cyl: CylindricalVector) -> SphericalVector {
    let (r, colat, lon) = coords::cylsph(cyl.r.km, cyl.lon.radians, cyl.z.km);
    SphericalVector {
        r: Distance::new(r),
        colat: Angle::new(colat),
        lon: Angle::new(lon),
    }
}

/// Geodetic coordinates to rectangular, on a spheroid with equatorial radius
/// `re` and flattening `f`
pub fn georec(ctx: &mut SpiceContext, geo: GeodeticVector, re: Distance, f: f64) -> Result<DistanceVector> {
    ctx.call(|raw| coords::georec(raw, geo.lon.radians, geo.lat.radians, geo.alt.km, re.km, f))
        .map(DistanceVector::from_array)
}

pub fn recgeo(ctx: &mut SpiceContext, rect: DistanceVector, re: Distance, f: f64) -> Result<GeodeticVector> {
    let (lon, lat, alt) = ctx.call(|raw| coords::recgeo(raw, &rect.to_array(), re.km, f))?;
    Ok(GeodeticVector {
        lon: Angle::new(lon),
        lat: Angle::new(lat),
        alt: Distance::new(alt),
    })
}

/// Planetographic coordinates on `body` to rectangular. Longitude is positive
/// west on prograde rotators unless the kernel pool says otherwise.
pub fn pgrrec(
    ctx: &mut SpiceContext,
    body: &str,
    pgr: GeodeticVector,
    re: Distance,
    f: f64,
) -> Result<DistanceVector> {
    ctx.call(|raw| coords::pgrrec(raw, body, pgr.lon.radians, pgr.lat.radians, pgr.alt.km, re.km, f))
        .map(DistanceVector::from_array)
}

/// Rectangular to planetographic coordinates on `body`, with longitude in
/// `[0, 2π)`
pub fn recpgr(
    ctx: &mut SpiceContext,
    body: &str,
    rect: DistanceVector,
    re: Distance,
    f: f64,
) -> Result<GeodeticVector> {
    let (lon, lat, alt) = ctx.call(|raw| coords::recpgr(raw, body, &rect.to_array(), re.km, f))?;
    Ok(GeodeticVector {
        lon: Angle::new(lon),
        lat: Angle::new(lat),
        alt: Distance::new(alt),
    })
}

/// Plane from a normal vector and a constant
pub fn nvc2pl(ctx: &mut SpiceContext, normal: DimensionlessVector, constant: Distance) -> Result<Plane> {
    ctx.call(|raw| planes::nvc2pl(raw, &normal.to_array(), constant.km))
        .map(Plane::from)
}

/// Plane from a normal vector and a point in the plane
pub fn nvp2pl(ctx: &mut SpiceContext, normal: DimensionlessVector, point: DistanceVector) -> Result<Plane> {
    ctx.call(|raw| planes::nvp2pl(raw, &normal.to_array(), &point.to_array()))
        .map(Plane::from)
}

/// Plane from a point and two independent spanning vectors
pub fn psv2pl(
    ctx: &mut SpiceContext,
    point: DistanceVector,
    span1: DistanceVector,
    span2: DistanceVector,
) -> Result<Plane> {
    ctx.call(|raw| planes::psv2pl(raw, &point.to_array(), &span1.to_array(), &span2.to_array()))
        .map(Plane::from)
}

/// Unit normal and non-negative constant of a plane
pub fn pl2nvc(plane: &Plane) -> (DimensionlessVector, Distance) {
    let (normal, constant) = planes::pl2nvc(&(*plane).into());
    (DimensionlessVector::from_array(normal), Distance::new(constant))
}

/// Unit normal, and the point of the plane closest to the origin
pub fn pl2nvp(plane: &Plane) -> (DimensionlessVector, DistanceVector) {
    let (normal, point) = planes::pl2nvp(&(*plane).into());
    (DimensionlessVector::from_array(normal), DistanceVector::from_array(point))
}

/// Point closest to the origin, and two orthogonal unit spanning vectors
pub fn pl2psv(plane: &Plane) -> (DistanceVector, DistanceVector, DistanceVector) {
    let (point, span1, span2) = planes::pl2psv(&(*plane).into());
    (
        DistanceVector::from_array(point),
        DistanceVector::from_array(span1),
        DistanceVector::from_array(span2),
    )
}

/// Orthogonal projection of a point onto a plane
pub fn vprjp(vin: DistanceVector, plane: &Plane) -> DistanceVector {
    DistanceVector::from_array(planes::vprjp(&vin.to_array(), &(*plane).into()))
}

/// Nearest point on a line to `point`, and its distance
pub fn nplnpt(
    ctx: &mut SpiceContext,
    linpt: DistanceVector,
    lindir: DimensionlessVector,
    point: DistanceVector,
) -> Result<(DistanceVector, Distance)> {
    let (pnear, dist) = ctx.call(|raw| {
        planes::nplnpt(raw, &linpt.to_array(), &lindir.to_array(), &point.to_array())
    })?;
    Ok((DistanceVector::from_array(pnear), Distance::new(dist)))
}

/// Where the ray from `positn` along `u` meets the ellipsoid with semi-axes
/// `radii`, if it does
pub fn surfpt(
    ctx: &mut SpiceContext,
    positn: DistanceVector,
    u: DimensionlessVector,
    radii: DistanceVector,
) -> Result<Option<DistanceVector>> {
    let [a, b, c] = radii.to_array();
    let point = ctx.call(|raw| ellipsoid::surfpt(raw, &positn.to_array(), &u.to_array(), a, b, c))?;
    Ok(point.map(DistanceVector::from_array))
}

/// Outward unit normal at a point on the ellipsoid with semi-axes `radii`
pub fn surfnm(ctx: &mut SpiceContext, radii: DistanceVector, point: DistanceVector) -> Result<DimensionlessVector> {
    let [a, b, c] = radii.to_array();
    ctx.call(|raw| ellipsoid::surfnm(raw, a, b, c, &point.to_array()))
        .map(DimensionlessVector::from_array)
}

/// Nearest point on the ellipsoid with semi-axes `radii` to `positn`, and the
/// altitude of `positn` above it (negative inside)
pub fn nearpt(
    ctx: &mut SpiceContext,
    positn: DistanceVector,
    radii: DistanceVector,
) -> Result<(DistanceVector, Distance)> {
    let [a, b, c] = radii.to_array();
    let (npoint, alt) = ctx.call(|raw| ellipsoid::nearpt(raw, &positn.to_array(), a, b, c))?;
    Ok((DistanceVector::from_array(npoint), Distance::new(alt)))
}

/// Nearest point on the ellipsoid to a line, and its distance from the line.
/// The distance is zero where the line meets the ellipsoid.
pub fn npedln(
    ctx: &mut SpiceContext,
    radii: DistanceVector,
    linept: DistanceVector,
    linedr: DimensionlessVector,
) -> Result<(DistanceVector, Distance)> {
    let [a, b, c] = radii.to_array();
    let (pnear, dist) =
        ctx.call(|raw| ellipsoid::npedln(raw, a, b, c, &linept.to_array(), &linedr.to_array()))?;
    Ok((DistanceVector::from_array(pnear), Distance::new(dist)))
}

/// Ellipse from a centre and two generating vectors
pub fn cgv2el(center: DistanceVector, vec1: DistanceVector, vec2: DistanceVector) -> Ellipse {
    ellipses::cgv2el(&center.to_array(), &vec1.to_array(), &vec2.to_array()).into()
}

/// Centre and semi-axes of an ellipse
pub fn el2cgv(ellipse: &Ellipse) -> (DistanceVector, DistanceVector, DistanceVector) {
    (ellipse.center, ellipse.semi_major, ellipse.semi_minor)
}

pub fn inelpl(ctx: &mut SpiceContext, ellipse: &Ellipse, plane: &Plane) -> Result<EllipsePlaneIntersection> {
    ctx.call(|raw| ellipses::inelpl(raw, &(*ellipse).into(), &(*plane).into()))
        .map(EllipsePlaneIntersection::from)
}

/// Orthogonal projection of an ellipse onto a plane
pub fn pjelpl(ellipse: &Ellipse, plane: &Plane) -> Ellipse {
    ellipses::pjelpl(&(*ellipse).into(), &(*plane).into()).into()
}

/// Nearest point on an ellipse to `point`, and its distance
pub fn npelpt(
    ctx: &mut SpiceContext,
    point: DistanceVector,
    ellipse: &Ellipse,
) -> Result<(DistanceVector, Distance)> {
    let (pnear, dist) = ctx.call(|raw| ellipses::npelpt(raw, &point.to_array(), &(*ellipse).into()))?;
    Ok((DistanceVector::from_array(pnear), Distance::new(dist)))
}
