//! Kernel pool tour
//!
//! Load body constants from text kernel lines, read them back with the typed
//! getters, and show how a failed lookup is reported without disturbing the
//! calls that follow.

use maxq::*;

const PCK_LINES: &[&str] = &[
    "\\begindata",
    "BODY399_RADII = ( 6378.1366 6378.1366 6356.7519 )",
    "BODY399_GM = 398600.435436",
    "BODY301_RADII = ( 1737.4 1737.4 1737.4 )",
    "BODY301_GM = 4902.800066",
    "\\begintext",
];

fn main() -> Result<()> {
    let mut ctx = SpiceContext::new();
    lmpool(&mut ctx, PCK_LINES)?;

    for body in ["EARTH", "MOON"] {
        let radii = bodvrd_distance_vector(&mut ctx, body, "RADII")?;
        let gm = bodvrd_mass(&mut ctx, body, "GM")?;
        let mean = bodvrd_mean_radius(&mut ctx, body)?;
        println!(
            "{body:>6}: radii ({:.1}, {:.1}, {:.1}) km, mean {:.3} km, GM {:.3} km^3/s^2",
            radii.x.km, radii.y.km, radii.z.km, mean.km, gm.gm
        );
    }

    let names = gnpool(&mut ctx, "BODY*", 0, 10)?.unwrap_or_default();
    println!("{} body variables: {}", names.len(), names.join(", "));

    let outcome = Outcome::from(&bodvrd_mass(&mut ctx, "MARS", "GM"));
    println!("Mars GM: {:?} {}", outcome.code, outcome.message);

    // The error above was consumed; this succeeds as normal
    let km = convrt(&mut ctx, 1.0, Units::Au, Units::Kilometers)?;
    println!("1 AU = {km} km");

    Ok(())
}
