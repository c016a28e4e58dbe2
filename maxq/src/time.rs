//! Time conversion. Everything involving UTC needs a leapseconds kernel
//! loaded; ephemeris time and the other uniform scales do not.

use maxq_spicelib::{errhnd, time};

use crate::{EphemerisPeriod, EphemerisTime, EpochType, Result, SpiceContext, TimeScale, UtcTimeFormat};

/// Picture used by [`timout_default`]
pub const DEFAULT_TIME_PICTURE: &str = "MON DD, YYYY HR:MN:SC.#### (TDB) ::TDB";

/// Julian date of 1900 JAN 0.5
pub fn j1900() -> f64 {
    time::j1900()
}

/// Julian date of 1950 JAN 1.0
pub fn j1950() -> f64 {
    time::j1950()
}

/// Julian date of 2000 JAN 1.5
pub fn j2000() -> f64 {
    time::j2000()
}

/// Julian date of 2100 JAN 1.5
pub fn j2100() -> f64 {
    time::j2100()
}

/// Julian date of the Besselian year 1900.0
pub fn b1900() -> f64 {
    time::b1900()
}

/// Julian date of the Besselian year 1950.0
pub fn b1950() -> f64 {
    time::b1950()
}

/// Seconds per day
pub fn spd() -> f64 {
    time::spd()
}

/// Seconds per Julian year
pub fn jyear() -> f64 {
    time::jyear()
}

/// Seconds per tropical year
pub fn tyear() -> f64 {
    time::tyear()
}

pub fn day_period() -> EphemerisPeriod {
    EphemerisPeriod::new(time::spd())
}

pub fn jyear_period() -> EphemerisPeriod {
    EphemerisPeriod::new(time::jyear())
}

pub fn tyear_period() -> EphemerisPeriod {
    EphemerisPeriod::new(time::tyear())
}

/// Convert a time string to ephemeris time. Strings are UTC unless labelled
/// `TDB` or `TDT`.
pub fn str2et(ctx: &mut SpiceContext, s: &str) -> Result<EphemerisTime> {
    ctx.call(|raw| time::str2et(raw, s)).map(EphemerisTime::new)
}

/// As [`str2et`], accepting UTC strings only
pub fn utc2et(ctx: &mut SpiceContext, s: &str) -> Result<EphemerisTime> {
    ctx.call(|raw| time::utc2et(raw, s)).map(EphemerisTime::new)
}

/// Format an epoch as UTC. `prec` is the number of decimal places in the
/// seconds field (days for [`UtcTimeFormat::JulianDate`]).
pub fn et2utc(
    ctx: &mut SpiceContext,
    et: EphemerisTime,
    format: UtcTimeFormat,
    prec: u32,
) -> Result<String> {
    let prec = i32::try_from(prec).unwrap_or(i32::MAX);
    ctx.call(|raw| time::et2utc(raw, et.seconds, format.name(), prec))
}

/// Ephemeris time as a calendar string, `YYYY MON DD HR:MN:SC.sss`, without
/// leapseconds
pub fn etcal(et: EphemerisTime) -> String {
    time::etcal(et.seconds)
}

/// Format an epoch according to a picture such as
/// `YYYY-MM-DD HR:MN:SC.### ::TDB`
pub fn timout(ctx: &mut SpiceContext, et: EphemerisTime, picture: &str) -> Result<String> {
    ctx.call(|raw| time::timout(raw, et.seconds, picture))
}

/// [`timout`] with [`DEFAULT_TIME_PICTURE`]
pub fn timout_default(ctx: &mut SpiceContext, et: EphemerisTime) -> Result<String> {
    timout(ctx, et, DEFAULT_TIME_PICTURE)
}

/// Parse a time string as seconds past J2000 on the formal calendar, with no
/// time system or leapseconds applied
pub fn tparse(ctx: &mut SpiceContext, s: &str) -> Result<EphemerisTime> {
    ctx.call(|raw| match time::tparse(s) {
        Ok(seconds) => Ok(seconds),
        Err(msg) => {
            errhnd::chkin(raw, "TPARSE")?;
            errhnd::setmsg(raw, "The time string '#' could not be parsed. #");
            errhnd::errch(raw, "#", s.trim());
            errhnd::errch(raw, "#", &msg);
            errhnd::sigerr(raw, "SPICE(UNPARSEDTIME)")?;
            errhnd::chkout(raw, "TPARSE")?;
            Ok(0.0)
        }
    })
    .map(EphemerisTime::new)
}

/// ET - UTC at `epoch`, given as UTC or ephemeris seconds past J2000
pub fn deltet(ctx: &mut SpiceContext, epoch: f64, eptype: EpochType) -> Result<EphemerisPeriod> {
    ctx.call(|raw| time::deltet(raw, epoch, eptype.name()))
        .map(EphemerisPeriod::new)
}

/// Convert an epoch between uniform time scales
pub fn unitim(ctx: &mut SpiceContext, epoch: f64, insys: TimeScale, outsys: TimeScale) -> Result<f64> {
    ctx.call(|raw| time::unitim(raw, epoch, insys.name(), outsys.name()))
}

/// The current ephemeris time, from the system clock
pub fn et_now(ctx: &mut SpiceContext) -> Result<EphemerisTime> {
    ctx.call(time::et_now).map(EphemerisTime::new)
}
