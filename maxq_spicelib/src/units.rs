//! Unit conversion.

use maxq_std::{Context, Result, text};

use crate::errhnd::{chkin, chkout, errch, r#return, setmsg, sigerr};
use crate::time::{jyear, spd, tyear};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dimension {
    Angle,
    Length,
    Time,
}

/// Astronomical unit in metres (IAU 2012)
const AU_M: f64 = 149_597_870_700.0;

/// Speed of light in m/s
const C_M: f64 = 299_792_458.0;

fn lookup(unit: &str) -> Option<(Dimension, f64)> {
    use Dimension::*;
    use std::f64::consts::PI;

    Some(match unit {
        "RADIANS" => (Angle, 1.0),
        "DEGREES" => (Angle, PI / 180.0),
        "ARCMINUTES" => (Angle, PI / 10800.0),
        "ARCSECONDS" => (Angle, PI / 648000.0),
        "HOURANGLE" => (Angle, PI / 12.0),
        "MINUTEANGLE" => (Angle, PI / 720.0),
        "SECONDANGLE" => (Angle, PI / 43200.0),

        "METERS" | "M" => (Length, 1.0),
        "KILOMETERS" | "KM" => (Length, 1000.0),
        "CENTIMETERS" | "CM" => (Length, 0.01),
        "MILLIMETERS" | "MM" => (Length, 0.001),
        "FEET" => (Length, 0.3048),
        "INCHES" => (Length, 0.0254),
        "YARDS" => (Length, 0.9144),
        "STATUTE_MILES" => (Length, 1609.344),
        "NAUTICAL_MILES" => (Length, 1852.0),
        "AU" => (Length, AU_M),
        "PARSECS" => (Length, AU_M * 648000.0 / PI),
        "LIGHTSECS" => (Length, C_M),
        "LIGHTYEARS" => (Length, C_M * jyear()),

        "SECONDS" => (Time, 1.0),
        "MINUTES" => (Time, 60.0),
        "HOURS" => (Time, 3600.0),
        "DAYS" => (Time, spd()),
        "JULIAN_YEARS" | "YEARS" => (Time, jyear()),
        "TROPICAL_YEARS" => (Time, tyear()),

        _ => return None,
    })
}

/// Convert `x` from unit `input` to unit `output`. Unit names are
/// case-insensitive.
pub fn convrt(ctx: &mut Context, x: f64, input: &str, output: &str) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }

    let in_name = text::normalize_name(input);
    let out_name = text::normalize_name(output);
    let (Some(from), Some(to)) = (lookup(&in_name), lookup(&out_name)) else {
        chkin(ctx, "CONVRT")?;
        let bad: Vec<&str> = [input, output]
            .into_iter()
            .filter(|u| lookup(&text::normalize_name(u)).is_none())
            .collect();
        setmsg(ctx, "The following unit(s) were not recognized: #.");
        errch(ctx, "#", &bad.join(", "));
        sigerr(ctx, "SPICE(UNITSNOTREC)")?;
        chkout(ctx, "CONVRT")?;
        return Ok(0.0);
    };

    if from.0 != to.0 {
        chkin(ctx, "CONVRT")?;
        setmsg(ctx, "Input units # and output units # are not compatible.");
        errch(ctx, "#", input);
        errch(ctx, "#", output);
        sigerr(ctx, "SPICE(INCOMPATIBLEUNITS)")?;
        chkout(ctx, "CONVRT")?;
        return Ok(0.0);
    }

    if in_name == out_name {
        return Ok(x);
    }
    Ok(x * from.1 / to.1)
}
