//! Parallel geodetic conversions
//!
//! A `SpiceContext` cannot be shared between threads, so each rayon task
//! creates its own and loads the constants it needs.

use itertools::{Itertools, MinMaxResult};
use maxq::*;
use rayon::prelude::*;

const EARTH: &[&str] = &[
    "\\begindata",
    "BODY399_RADII = ( 6378.1366 6378.1366 6356.7519 )",
];

fn earth_context() -> Result<SpiceContext<'static>> {
    let mut ctx = SpiceContext::new();
    lmpool(&mut ctx, EARTH)?;
    Ok(ctx)
}

fn radius_profile(lat: Angle) -> Result<Vec<Distance>> {
    let mut ctx = earth_context()?;
    let radii = bodvrd_distance_vector(&mut ctx, "EARTH", "RADII")?;
    let f = (radii.x - radii.z) / radii.x;

    (0..12)
        .map(|i| -> Result<Distance> {
            let geo = GeodeticVector {
                lon: Angle::from_degrees(30.0 * i as f64),
                lat,
                alt: Distance::new(400.0),
            };
            let rect = georec(&mut ctx, geo, radii.x, f)?;
            Ok(vnorm_distance(rect))
        })
        .collect()
}

fn main() -> Result<()> {
    let latitudes: Vec<Angle> = (-6..=6).map(|i| Angle::from_degrees(15.0 * i as f64)).collect();

    let profiles: Vec<(Angle, Vec<Distance>)> = latitudes
        .into_par_iter()
        .map(|lat| radius_profile(lat).map(|p| (lat, p)))
        .collect::<Result<_>>()?;

    for (lat, profile) in profiles {
        let MinMaxResult::MinMax(low, high) = profile.iter().map(|d| d.km).minmax_by(f64::total_cmp) else {
            continue;
        };
        println!("lat {:>6.1} deg: geocentric radius {low:.3} .. {high:.3} km", lat.degrees());
    }
    Ok(())
}
