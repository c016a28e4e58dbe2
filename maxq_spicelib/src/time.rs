//! Time systems, calendars and time strings.
//!
//! Epochs are seconds past J2000 (2000 JAN 01 12:00:00). On the formal calendar
//! every day has exactly 86400 seconds; UTC conversions use the leapseconds
//! variables (`DELTET/*`) from the kernel pool.

use maxq_std::{Context, Result, text};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::errhnd::{chkin, chkout, errch, errdp, r#return, setmsg, sigerr};
use crate::pool::{self, PoolValues};

pub fn j1900() -> f64 {
    2415020.0
}

pub fn j1950() -> f64 {
    2433282.5
}

pub fn j2000() -> f64 {
    2451545.0
}

pub fn j2100() -> f64 {
    2488070.0
}

/// Julian date of the Besselian year 1900.0
pub fn b1900() -> f64 {
    2415020.31352
}

pub fn b1950() -> f64 {
    2433282.42345905
}

/// Seconds per day
pub fn spd() -> f64 {
    86400.0
}

/// Seconds per Julian year
pub fn jyear() -> f64 {
    31557600.0
}

/// Seconds per tropical year
pub fn tyear() -> f64 {
    31556925.9747
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Day number of 2000 JAN 01, counting from 1970 JAN 01
const J2000_DAY: i64 = 10957;

/// Largest calendar year magnitude accepted from time strings
const MAX_YEAR: i64 = 100_000_000;

/// Largest epoch magnitude, in seconds past J2000, that can be rendered
/// as a calendar string
const MAX_EPOCH: f64 = 3.0e15;

// Proleptic Gregorian day counting (days since 1970-01-01)

pub(crate) fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let m = m as i64;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

pub(crate) fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = (if z >= 0 { z } else { z - 146096 }) / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn is_leap_year(y: i64) -> bool {
    (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
}

fn days_in_month(y: i64, m: u32) -> u32 {
    match m {
        2 if is_leap_year(y) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Formal seconds past J2000 at the start of day number `day`
fn day_start(day: i64) -> f64 {
    (day - J2000_DAY) as f64 * 86400.0 - 43200.0
}

/// Split formal seconds past J2000 into a day number and seconds of day.
/// Epochs beyond [`MAX_EPOCH`] are pinned to it.
fn split_formal(x: f64) -> (i64, f64) {
    let x = if x.is_nan() { 0.0 } else { x };
    let t = x.clamp(-MAX_EPOCH, MAX_EPOCH) + 43200.0;
    let day = (t / 86400.0).floor();
    (day as i64 + J2000_DAY, t - day * 86400.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Calendar {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl Calendar {
    fn day_number(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    fn seconds_of_day(&self) -> f64 {
        self.hour as f64 * 3600.0 + self.minute as f64 * 60.0 + self.second
    }

    fn formal(&self) -> f64 {
        day_start(self.day_number()) + self.seconds_of_day()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.year.abs() > MAX_YEAR {
            return Err(format!("The year {} is outside the supported range.", self.year));
        }
        if !(1..=12).contains(&self.month) {
            return Err(format!("The month {} is not in the range 1 to 12.", self.month));
        }
        let dim = days_in_month(self.year, self.month);
        if !(1..=dim).contains(&self.day) {
            return Err(format!(
                "The day {} is not valid for {} {}.",
                self.day,
                MONTHS[self.month as usize - 1],
                self.year
            ));
        }
        if self.hour > 23 {
            return Err(format!("The hour {} is not in the range 0 to 23.", self.hour));
        }
        if self.minute > 59 {
            return Err(format!("The minute {} is not in the range 0 to 59.", self.minute));
        }
        if !(0.0..61.0).contains(&self.second) {
            return Err(format!("The seconds value {} is out of range.", self.second));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Parsed {
    Calendar(Calendar),
    Julian(f64),
}

impl Parsed {
    fn formal(&self) -> f64 {
        match self {
            Parsed::Calendar(c) => c.formal(),
            Parsed::Julian(jd) => (jd - j2000()) * spd(),
        }
    }
}

struct Patterns {
    julian: Regex,
    iso: Regex,
    iso_doy: Regex,
    doy_slash: Regex,
    clock: Regex,
    system: Regex,
}

const CLOCK: &str = r"(\d{1,2})(?::(\d{1,2})(?::(\d{1,2}(?:\.\d*)?))?)?";

impl Patterns {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            julian: Regex::new(r"^(?:JD\s*([+-]?(?:\d+\.?\d*|\.\d+))|([+-]?(?:\d+\.?\d*|\.\d+))\s*JD)$")?,
            iso: Regex::new(&format!(r"^(\d{{4}})-(\d{{1,2}})-(\d{{1,2}})(?:[T ]\s*{CLOCK})?Z?$"))?,
            iso_doy: Regex::new(&format!(r"^(\d{{4}})-(\d{{3}})(?:T{CLOCK})?Z?$"))?,
            doy_slash: Regex::new(&format!(r"^(\d{{4}})-(\d{{1,3}})\s*//\s*{CLOCK}$"))?,
            clock: Regex::new(&format!("^{CLOCK}$"))?,
            system: Regex::new(
                r"^(.*?)\s*(?:(TDB|TDT|TT|UTC)([+-]\d{1,2}(?::\d{1,2})?)?|\(\s*([PMCE][SD]T)\s*\)|([PMCE][SD]T))\s*$",
            )?,
        })
    }
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| Patterns::new().ok());

fn patterns() -> std::result::Result<&'static Patterns, String> {
    PATTERNS
        .as_ref()
        .ok_or_else(|| "Time string patterns are unavailable.".to_owned())
}

fn num<T: std::str::FromStr>(s: Option<regex::Match>) -> std::result::Result<Option<T>, String> {
    match s {
        None => Ok(None),
        Some(m) => m
            .as_str()
            .parse()
            .map(Some)
            .map_err(|_| format!("'{}' is not a valid number.", m.as_str())),
    }
}

/// Hour, minute and second from the three capture groups starting at `first`
fn clock_fields(
    caps: &regex::Captures,
    first: usize,
) -> std::result::Result<(u32, u32, f64), String> {
    Ok((
        num(caps.get(first))?.unwrap_or(0),
        num(caps.get(first + 1))?.unwrap_or(0),
        num(caps.get(first + 2))?.unwrap_or(0.0),
    ))
}

fn from_doy(year: i64, doy: u32, clock: (u32, u32, f64)) -> std::result::Result<Calendar, String> {
    if year.abs() > MAX_YEAR {
        return Err(format!("The year {year} is outside the supported range."));
    }
    let len = if is_leap_year(year) { 366 } else { 365 };
    if !(1..=len).contains(&doy) {
        return Err(format!("The day of year {doy} is not valid for {year}."));
    }
    let (year, month, day) = civil_from_days(days_from_civil(year, 1, 1) + doy as i64 - 1);
    Ok(Calendar {
        year,
        month,
        day,
        hour: clock.0,
        minute: clock.1,
        second: clock.2,
    })
}

fn month_number(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| m.starts_with(token))
        .map(|i| i as u32 + 1)
}

/// Forms with a month name, in any of the orders `MON DD YYYY`, `YYYY MON DD`
/// and `DD MON YYYY`, optionally followed by a clock time
fn parse_month_form(p: &Patterns, s: &str) -> std::result::Result<Calendar, String> {
    let unrecognized = || format!("The time string '{s}' is not in a recognized format.");

    let mut fields = vec![];
    let mut month = None;
    let mut clock = None;
    for token in s
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-' || c == '/')
        .filter(|t| !t.is_empty())
    {
        if token.contains(':') {
            let caps = p.clock.captures(token).ok_or_else(unrecognized)?;
            if clock.is_some() {
                return Err(unrecognized());
            }
            clock = Some(clock_fields(&caps, 1)?);
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            if clock.is_some() {
                return Err(unrecognized());
            }
            fields.push(token);
        } else if WEEKDAYS.iter().any(|w| token.starts_with(w)) {
            continue;
        } else if let Some(m) = month_number(token) {
            if month.is_some() || clock.is_some() {
                return Err(unrecognized());
            }
            month = Some((m, fields.len()));
        } else {
            return Err(unrecognized());
        }
    }

    let (month, position) = month.ok_or_else(unrecognized)?;
    if fields.len() != 2 {
        return Err(unrecognized());
    }
    let parse = |t: &str| t.parse::<i64>().map_err(|_| unrecognized());
    let (year, day) = match position {
        0 => (parse(fields[1])?, parse(fields[0])?),
        1 if fields[0].len() >= 3 => (parse(fields[0])?, parse(fields[1])?),
        1 => (parse(fields[1])?, parse(fields[0])?),
        _ => return Err(unrecognized()),
    };
    let (hour, minute, second) = clock.unwrap_or((0, 0, 0.0));
    Ok(Calendar {
        year,
        month,
        day: u32::try_from(day).map_err(|_| unrecognized())?,
        hour,
        minute,
        second,
    })
}

pub(crate) fn parse_time(s: &str) -> std::result::Result<Parsed, String> {
    let p = patterns()?;
    let s = text::normalize_name(s);
    if s.is_empty() {
        return Err("The time string is blank.".to_owned());
    }

    if let Some(caps) = p.julian.captures(&s) {
        let jd: f64 = num(caps.get(1).or(caps.get(2)))?.unwrap_or(0.0);
        return Ok(Parsed::Julian(jd));
    }

    let cal = if let Some(caps) = p.iso.captures(&s) {
        let (hour, minute, second) = clock_fields(&caps, 4)?;
        Calendar {
            year: num(caps.get(1))?.unwrap_or(0),
            month: num(caps.get(2))?.unwrap_or(0),
            day: num(caps.get(3))?.unwrap_or(0),
            hour,
            minute,
            second,
        }
    } else if let Some(caps) = p.iso_doy.captures(&s) {
        from_doy(
            num(caps.get(1))?.unwrap_or(0),
            num(caps.get(2))?.unwrap_or(0),
            clock_fields(&caps, 3)?,
        )?
    } else if let Some(caps) = p.doy_slash.captures(&s) {
        from_doy(
            num(caps.get(1))?.unwrap_or(0),
            num(caps.get(2))?.unwrap_or(0),
            clock_fields(&caps, 3)?,
        )?
    } else {
        parse_month_form(p, &s)?
    };

    cal.validate()?;
    Ok(Parsed::Calendar(cal))
}

/// Parse a time string on the formal calendar, returning seconds past J2000
/// or a description of the problem
pub fn tparse(s: &str) -> std::result::Result<f64, String> {
    parse_time(s).map(|p| p.formal())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum System {
    /// UTC, with the local offset from UTC in seconds
    Utc(f64),
    Tdb,
    Tdt,
}

fn zone_offset(zone: &str) -> f64 {
    let hours = match zone {
        "PST" => -8.0,
        "PDT" | "MST" => -7.0,
        "MDT" | "CST" => -6.0,
        "CDT" | "EST" => -5.0,
        "EDT" => -4.0,
        _ => 0.0,
    };
    hours * 3600.0
}

/// Separate a trailing time system or zone from the rest of the string
fn split_system(s: &str) -> std::result::Result<(String, System), String> {
    let p = patterns()?;
    let upper = text::normalize_name(s);
    let Some(caps) = p.system.captures(&upper) else {
        return Ok((upper, System::Utc(0.0)));
    };
    let body = caps.get(1).map_or("", |m| m.as_str()).to_owned();

    if let Some(zone) = caps.get(4).or(caps.get(5)) {
        return Ok((body, System::Utc(zone_offset(zone.as_str()))));
    }
    let system = match caps.get(2).map(|m| m.as_str()) {
        Some("TDB") => System::Tdb,
        Some("TDT" | "TT") => System::Tdt,
        _ => {
            let offset = match caps.get(3) {
                None => 0.0,
                Some(m) => {
                    let s = m.as_str();
                    let (sign, rest) = match s.strip_prefix('-') {
                        Some(rest) => (-1.0, rest),
                        None => (1.0, s.trim_start_matches('+')),
                    };
                    let (h, mins) = rest.split_once(':').unwrap_or((rest, "0"));
                    let h: f64 = h.parse().map_err(|_| format!("Bad UTC offset '{s}'."))?;
                    let mins: f64 = mins.parse().map_err(|_| format!("Bad UTC offset '{s}'."))?;
                    if h > 12.0 || mins >= 60.0 {
                        return Err(format!("The UTC offset '{s}' is out of range."));
                    }
                    sign * (h * 3600.0 + mins * 60.0)
                }
            };
            System::Utc(offset)
        }
    };
    Ok((body, system))
}

fn leap_var(
    ctx: &mut Context,
    module: &str,
    name: &str,
    size: Option<usize>,
) -> Result<Option<Vec<f64>>> {
    match pool::lookup(ctx, name) {
        Some(PoolValues::Numeric(v)) => {
            let ok = match size {
                Some(n) => v.len() == n,
                // DELTA_AT holds (offset, epoch) pairs
                None => !v.is_empty() && v.len() % 2 == 0,
            };
            if ok {
                return Ok(Some(v));
            }
        }
        Some(PoolValues::Character(_)) => (),
        None => {
            chkin(ctx, module)?;
            setmsg(
                ctx,
                "The variable #, needed for UTC conversion, is not in the kernel pool. Load a leapseconds kernel.",
            );
            errch(ctx, "#", name);
            sigerr(ctx, "SPICE(NOLEAPSECONDS)")?;
            chkout(ctx, module)?;
            return Ok(None);
        }
    }
    chkin(ctx, module)?;
    setmsg(ctx, "The leapseconds variable # has the wrong type or number of values.");
    errch(ctx, "#", name);
    sigerr(ctx, "SPICE(BADVARIABLESIZE)")?;
    chkout(ctx, module)?;
    Ok(None)
}

/// Leapseconds kernel data
pub(crate) struct LeapSeconds {
    delta_t_a: f64,
    k: f64,
    eb: f64,
    m: [f64; 2],
    /// (TAI-UTC, formal UTC epoch at which it takes effect)
    delta_at: Vec<(f64, f64)>,
}

impl LeapSeconds {
    /// Read the `DELTET/*` variables, signalling if they are absent or malformed.
    /// `None` once an error was signalled.
    pub(crate) fn load(ctx: &mut Context, module: &str) -> Result<Option<Self>> {
        let Some(delta_t_a) = leap_var(ctx, module, "DELTET/DELTA_T_A", Some(1))? else {
            return Ok(None);
        };
        let Some(k) = leap_var(ctx, module, "DELTET/K", Some(1))? else {
            return Ok(None);
        };
        let Some(eb) = leap_var(ctx, module, "DELTET/EB", Some(1))? else {
            return Ok(None);
        };
        let Some(m) = leap_var(ctx, module, "DELTET/M", Some(2))? else {
            return Ok(None);
        };
        let Some(delta_at) = leap_var(ctx, module, "DELTET/DELTA_AT", None)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            delta_t_a: delta_t_a[0],
            k: k[0],
            eb: eb[0],
            m: [m[0], m[1]],
            delta_at: delta_at.chunks_exact(2).map(|c| (c[0], c[1])).collect(),
        }))
    }

    /// TDB - TDT at the given TDB or TDT epoch
    fn periodic(&self, t: f64) -> f64 {
        let m = self.m[0] + self.m[1] * t;
        let e = m + self.eb * m.sin();
        self.k * e.sin()
    }

    /// TAI - UTC in effect at formal UTC epoch `u`
    fn dat_at_utc(&self, u: f64) -> f64 {
        self.delta_at
            .iter()
            .rev()
            .find(|(_, epoch)| u >= *epoch)
            .or(self.delta_at.first())
            .map_or(0.0, |(dat, _)| *dat)
    }

    fn tai_to_et(&self, tai: f64) -> f64 {
        let tdt = tai + self.delta_t_a;
        tdt + self.periodic(tdt)
    }

    fn et_to_tai(&self, et: f64) -> f64 {
        et - self.periodic(et) - self.delta_t_a
    }

    /// Leap-second aware conversion of a UTC calendar time with a local offset
    fn utc_to_et(&self, cal: &Calendar, offset: f64) -> f64 {
        let tai = if offset == 0.0 {
            // Seconds past 60 on the day before a leap second land inside it
            let start = day_start(cal.day_number());
            start + cal.seconds_of_day() + self.dat_at_utc(start)
        } else {
            let u = cal.formal() - offset;
            u + self.dat_at_utc(u)
        };
        self.tai_to_et(tai)
    }

    /// Day number and seconds of day in UTC. The seconds reach past 86400
    /// during a leap second.
    fn et_to_utc(&self, et: f64) -> (i64, f64) {
        let tai = self.et_to_tai(et);
        let idx = self
            .delta_at
            .iter()
            .rposition(|(dat, epoch)| tai >= epoch + dat);
        let u = match idx {
            None => tai - self.delta_at.first().map_or(0.0, |(dat, _)| *dat),
            Some(i) => {
                let u = tai - self.delta_at[i].0;
                if let Some((_, next)) = self.delta_at.get(i + 1) {
                    if u >= *next {
                        let (day, _) = split_formal(*next);
                        return (day - 1, 86400.0 + (u - next));
                    }
                }
                u
            }
        };
        split_formal(u)
    }

    /// Length in seconds of UTC day `day`
    fn day_length(&self, day: i64) -> f64 {
        let end = day_start(day + 1);
        let mut prev = None;
        for (dat, epoch) in &self.delta_at {
            if (epoch - end).abs() < 0.5 {
                return 86400.0 + prev.map_or(0.0, |p| dat - p);
            }
            prev = Some(*dat);
        }
        86400.0
    }
}

fn unparsed(ctx: &mut Context, module: &str, s: &str, msg: &str) -> Result<()> {
    chkin(ctx, module)?;
    setmsg(ctx, "The time string '#' could not be parsed. #");
    errch(ctx, "#", s.trim());
    errch(ctx, "#", msg);
    sigerr(ctx, "SPICE(UNPARSEDTIME)")?;
    chkout(ctx, module)
}

/// Convert a time string to ephemeris seconds past J2000 (TDB)
pub fn str2et(ctx: &mut Context, s: &str) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }

    let parsed = split_system(s).and_then(|(body, system)| Ok((parse_time(&body)?, system)));
    let (parsed, system) = match parsed {
        Ok(p) => p,
        Err(msg) => {
            unparsed(ctx, "STR2ET", s, &msg)?;
            return Ok(0.0);
        }
    };
    trace!(input = s, ?parsed, ?system, "parsed time string");

    match system {
        System::Tdb => Ok(parsed.formal()),
        System::Tdt => unitim(ctx, parsed.formal(), "TDT", "TDB"),
        System::Utc(offset) => {
            let Some(ls) = LeapSeconds::load(ctx, "STR2ET")? else {
                return Ok(0.0);
            };
            Ok(match parsed {
                Parsed::Calendar(cal) => ls.utc_to_et(&cal, offset),
                Parsed::Julian(_) => {
                    let u = parsed.formal() - offset;
                    ls.tai_to_et(u + ls.dat_at_utc(u))
                }
            })
        }
    }
}

/// Convert a UTC time string to ephemeris time. Strings labelled with another
/// time system are rejected.
pub fn utc2et(ctx: &mut Context, s: &str) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }
    match split_system(s) {
        Ok((_, System::Utc(_))) => str2et(ctx, s),
        Ok(_) => {
            unparsed(ctx, "UTC2ET", s, "Only UTC time strings are accepted.")?;
            Ok(0.0)
        }
        Err(msg) => {
            unparsed(ctx, "UTC2ET", s, &msg)?;
            Ok(0.0)
        }
    }
}

/// ET - UTC at `epoch`, which is UTC seconds past J2000 if `eptype` is `UTC`
/// or ephemeris seconds if `ET`
pub fn deltet(ctx: &mut Context, epoch: f64, eptype: &str) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }
    let kind = text::normalize_name(eptype);
    if kind != "UTC" && kind != "ET" {
        chkin(ctx, "DELTET")?;
        setmsg(ctx, "The epoch type # is not recognized. It must be UTC or ET.");
        errch(ctx, "#", eptype.trim());
        sigerr(ctx, "SPICE(INVALIDEPOCH)")?;
        chkout(ctx, "DELTET")?;
        return Ok(0.0);
    }
    let Some(ls) = LeapSeconds::load(ctx, "DELTET")? else {
        return Ok(0.0);
    };

    Ok(if kind == "UTC" {
        ls.tai_to_et(epoch + ls.dat_at_utc(epoch)) - epoch
    } else {
        let tai = ls.et_to_tai(epoch);
        let idx = ls.delta_at.iter().rposition(|(dat, e)| tai >= e + dat);
        let dat = match idx {
            Some(i) => ls.delta_at[i].0,
            None => ls.delta_at.first().map_or(0.0, |(dat, _)| *dat),
        };
        epoch - (tai - dat)
    })
}

/// Convert between uniform time scales: `TAI TDT TDB ET JDTDT JDTDB JED`
pub fn unitim(ctx: &mut Context, epoch: f64, insys: &str, outsys: &str) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }
    const TDB_LIKE: [&str; 4] = ["TDB", "ET", "JDTDB", "JED"];
    const KNOWN: [&str; 7] = ["TAI", "TDT", "TDB", "ET", "JDTDT", "JDTDB", "JED"];

    let insys = text::normalize_name(insys);
    let outsys = text::normalize_name(outsys);
    for sys in [&insys, &outsys] {
        if !KNOWN.contains(&sys.as_str()) {
            chkin(ctx, "UNITIM")?;
            setmsg(ctx, "The time system # is not recognized.");
            errch(ctx, "#", sys);
            sigerr(ctx, "SPICE(BADTIMETYPE)")?;
            chkout(ctx, "UNITIM")?;
            return Ok(0.0);
        }
    }

    let ls = if TDB_LIKE.contains(&insys.as_str()) && TDB_LIKE.contains(&outsys.as_str()) {
        None
    } else {
        match LeapSeconds::load(ctx, "UNITIM")? {
            Some(ls) => Some(ls),
            None => return Ok(0.0),
        }
    };

    let tdt_to_tdb = |tdt: f64| ls.as_ref().map_or(tdt, |ls| tdt + ls.periodic(tdt));
    let tdb = match insys.as_str() {
        "TAI" => tdt_to_tdb(epoch + ls.as_ref().map_or(0.0, |l| l.delta_t_a)),
        "TDT" => tdt_to_tdb(epoch),
        "JDTDT" => tdt_to_tdb((epoch - j2000()) * spd()),
        "JDTDB" | "JED" => (epoch - j2000()) * spd(),
        _ => epoch,
    };

    let tdt = || ls.as_ref().map_or(tdb, |ls| tdb - ls.periodic(tdb));
    Ok(match outsys.as_str() {
        "TAI" => tdt() - ls.as_ref().map_or(0.0, |l| l.delta_t_a),
        "TDT" => tdt(),
        "JDTDT" => j2000() + tdt() / spd(),
        "JDTDB" | "JED" => j2000() + tdb / spd(),
        _ => tdb,
    })
}

/// Quantize seconds of day to `10^-digits`, rounding or truncating, and carry
/// into the next day when the result reaches the day's length
fn quantize(
    day: i64,
    sod: f64,
    unit_digits: i32,
    round: bool,
    day_length: impl Fn(i64) -> f64,
) -> (i64, f64) {
    let scale = 10f64.powi(unit_digits);
    let scaled = sod * scale;
    let q = if round { scaled.round() } else { scaled.floor() } / scale;
    let len = day_length(day);
    if q >= len { (day + 1, q - len) } else { (day, q) }
}

/// Quantize to a whole number of `unit` seconds
fn quantize_unit(day: i64, sod: f64, unit: f64, round: bool, day_length: impl Fn(i64) -> f64) -> (i64, f64) {
    let n = sod / unit;
    let q = if round { n.round() } else { n.floor() } * unit;
    let len = day_length(day);
    if q >= len { (day + 1, q - len) } else { (day, q) }
}

struct Fields {
    year: i64,
    month: u32,
    day: u32,
    doy: u32,
    hour: u32,
    minute: u32,
    second: f64,
}

fn fields(day: i64, sod: f64) -> Fields {
    let (year, month, dom) = civil_from_days(day);
    let doy = (day - days_from_civil(year, 1, 1) + 1) as u32;
    let (hour, minute, second) = if sod >= 86400.0 {
        (23, 59, sod - 86340.0)
    } else {
        let h = (sod / 3600.0).floor();
        let m = ((sod - h * 3600.0) / 60.0).floor();
        (h as u32, m as u32, sod - h * 3600.0 - m * 60.0)
    };
    Fields {
        year,
        month,
        day: dom,
        doy,
        hour,
        minute,
        second,
    }
}

fn format_seconds(s: f64, prec: usize) -> String {
    if prec == 0 {
        format!("{:02.0}", s.floor())
    } else {
        format!("{:0w$.p$}", s, w = prec + 3, p = prec)
    }
}

/// Convert ephemeris time to a UTC string. `format` is `C`, `D`, `J`, `ISOC`
/// or `ISOD`; `prec` is the number of decimal places of seconds (or days for `J`).
pub fn et2utc(ctx: &mut Context, et: f64, format: &str, prec: i32) -> Result<String> {
    if r#return(ctx) {
        return Ok(String::new());
    }
    let format = text::normalize_name(format);
    if !["C", "D", "J", "ISOC", "ISOD"].contains(&format.as_str()) {
        chkin(ctx, "ET2UTC")?;
        setmsg(ctx, "The output format # is not recognized. Use C, D, J, ISOC or ISOD.");
        errch(ctx, "#", &format);
        sigerr(ctx, "SPICE(INVALIDTIMEFORMAT)")?;
        chkout(ctx, "ET2UTC")?;
        return Ok(String::new());
    }
    let prec = prec.clamp(0, 14);
    if !check_epoch(ctx, et, "ET2UTC")? {
        return Ok(String::new());
    }
    let Some(ls) = LeapSeconds::load(ctx, "ET2UTC")? else {
        return Ok(String::new());
    };

    let (day, sod) = ls.et_to_utc(et);
    if format == "J" {
        let jd = j2000() + (day_start(day) + sod) / spd();
        return Ok(format!("JD {:.p$}", jd, p = prec as usize));
    }

    let (day, sod) = quantize(day, sod, prec, true, |d| ls.day_length(d));
    let f = fields(day, sod);
    let clock = format!(
        "{:02}:{:02}:{}",
        f.hour,
        f.minute,
        format_seconds(f.second, prec as usize)
    );
    Ok(match format.as_str() {
        "C" => format!("{:04} {} {:02} {clock}", f.year, MONTHS[f.month as usize - 1], f.day),
        "D" => format!("{:04}-{:03} // {clock}", f.year, f.doy),
        "ISOD" => format!("{:04}-{:03}T{clock}", f.year, f.doy),
        _ => format!("{:04}-{:02}-{:02}T{clock}", f.year, f.month, f.day),
    })
}

/// Signals SPICE(VALUEOUTOFRANGE) when `et` cannot be shown on a calendar
fn check_epoch(ctx: &mut Context, et: f64, module: &str) -> Result<bool> {
    if et.is_finite() && et.abs() <= MAX_EPOCH {
        return Ok(true);
    }
    chkin(ctx, module)?;
    setmsg(ctx, "The epoch # is outside the range that can be converted to a calendar string.");
    errdp(ctx, "#", et);
    sigerr(ctx, "SPICE(VALUEOUTOFRANGE)")?;
    chkout(ctx, module)?;
    Ok(false)
}

/// Ephemeris time on the formal calendar, `YYYY MON DD HR:MN:SC.sss`.
/// No kernels are needed. Epochs too large for a calendar are shown at the
/// nearest representable limit, and NaN as J2000.
pub fn etcal(et: f64) -> String {
    let (day, sod) = split_formal(et);
    let (day, sod) = quantize(day, sod, 3, true, |_| 86400.0);
    let f = fields(day, sod);
    let year = match f.year {
        y if y < 1 => format!("{} B.C.", 1 - y),
        y if y < 1000 => format!("{y} A.D."),
        y => y.to_string(),
    };
    format!(
        "{year} {} {:02} {:02}:{:02}:{}",
        MONTHS[f.month as usize - 1],
        f.day,
        f.hour,
        f.minute,
        format_seconds(f.second, 3)
    )
}

/// Current ephemeris time, from the context's clock
pub fn et_now(ctx: &mut Context) -> Result<f64> {
    if r#return(ctx) {
        return Ok(0.0);
    }
    let now = ctx.utc_now();
    let secs = now.timestamp();
    let day = secs.div_euclid(86400);
    let sod = secs.rem_euclid(86400) as f64 + now.timestamp_subsec_nanos() as f64 * 1e-9;
    let (year, month, dom) = civil_from_days(day);
    let cal = Calendar {
        year,
        month,
        day: dom,
        hour: (sod / 3600.0) as u32,
        minute: ((sod % 3600.0) / 60.0) as u32,
        second: sod % 60.0,
    };
    let Some(ls) = LeapSeconds::load(ctx, "ET_NOW")? else {
        return Ok(0.0);
    };
    Ok(ls.utc_to_et(&cal, 0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    JulianDate,
    MonthUpper,
    MonthMixed,
    Year,
    DayOfYear,
    MonUpper,
    MonMixed,
    Year2,
    MonthNumber,
    Day,
    Hour,
    Minute,
    Second,
}

const TOKENS: [(&str, Token); 13] = [
    ("JULIAND", Token::JulianDate),
    ("MONTH", Token::MonthUpper),
    ("Month", Token::MonthMixed),
    ("YYYY", Token::Year),
    ("DOY", Token::DayOfYear),
    ("MON", Token::MonUpper),
    ("Mon", Token::MonMixed),
    ("YR", Token::Year2),
    ("MM", Token::MonthNumber),
    ("DD", Token::Day),
    ("HR", Token::Hour),
    ("MN", Token::Minute),
    ("SC", Token::Second),
];

enum Item {
    Literal(String),
    Field(Token, usize),
}

fn capitalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        out.push(if i == 0 { c } else { c.to_ascii_lowercase() });
    }
    out
}

fn picture_items(picture: &str) -> Vec<Item> {
    let mut items = vec![];
    let mut literal = String::new();
    let mut rest = picture;
    'outer: while !rest.is_empty() {
        for (name, token) in TOKENS {
            if let Some(after) = rest.strip_prefix(name) {
                let mut digits = 0;
                let mut after = after;
                if matches!(token, Token::Second | Token::JulianDate) && after.starts_with(".#") {
                    digits = after[1..].chars().take_while(|&c| c == '#').count();
                    after = &after[1 + digits..];
                }
                if !literal.is_empty() {
                    items.push(Item::Literal(std::mem::take(&mut literal)));
                }
                items.push(Item::Field(token, digits));
                rest = after;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }
    if !literal.is_empty() {
        items.push(Item::Literal(literal));
    }
    items
}

/// Format an epoch according to a picture such as `MON DD, YYYY HR:MN:SC.###`.
/// Markers `::UTC` (the default), `::TDB` and `::TDT` select the time system,
/// `::RND` rounds and `::TRNC` (the default) truncates.
pub fn timout(ctx: &mut Context, et: f64, picture: &str) -> Result<String> {
    if r#return(ctx) {
        return Ok(String::new());
    }

    let mut system = "UTC";
    let mut round = false;
    let mut picture = picture.to_owned();
    for (marker, sys, rnd) in [
        ("::TDB", Some("TDB"), None),
        ("::TDT", Some("TDT"), None),
        ("::UTC", Some("UTC"), None),
        ("::RND", None, Some(true)),
        ("::TRNC", None, Some(false)),
    ] {
        if picture.contains(marker) {
            picture = picture.replace(marker, "");
            if let Some(sys) = sys {
                system = sys;
            }
            if let Some(rnd) = rnd {
                round = rnd;
            }
        }
    }
    let items = picture_items(&picture);
    if !check_epoch(ctx, et, "TIMOUT")? {
        return Ok(String::new());
    }

    let leap = if system == "UTC" {
        match LeapSeconds::load(ctx, "TIMOUT")? {
            Some(ls) => Some(ls),
            None => return Ok(String::new()),
        }
    } else {
        None
    };
    let (day, sod) = match (&leap, system) {
        (Some(ls), _) => ls.et_to_utc(et),
        (None, "TDT") => split_formal(unitim(ctx, et, "TDB", "TDT")?),
        _ => split_formal(et),
    };
    let day_length = |d: i64| leap.as_ref().map_or(86400.0, |ls| ls.day_length(d));

    let has = |t: Token| items.iter().any(|i| matches!(i, Item::Field(f, _) if *f == t));
    let second_digits = items
        .iter()
        .find_map(|i| match i {
            Item::Field(Token::Second, d) => Some(*d),
            _ => None,
        })
        .unwrap_or(0);
    let (qday, qsod) = if has(Token::Second) {
        quantize(day, sod, second_digits as i32, round, day_length)
    } else if has(Token::Minute) {
        quantize_unit(day, sod, 60.0, round, day_length)
    } else if has(Token::Hour) {
        quantize_unit(day, sod, 3600.0, round, day_length)
    } else {
        quantize_unit(day, sod, day_length(day), round, day_length)
    };
    let f = fields(qday, qsod);

    let mut out = String::new();
    for item in items {
        match item {
            Item::Literal(s) => out.push_str(&s),
            Item::Field(token, digits) => out.push_str(&match token {
                Token::JulianDate => {
                    let jd = j2000() + (day_start(day) + sod) / spd();
                    let scale = 10f64.powi(digits as i32);
                    let jd = if round { jd } else { (jd * scale).floor() / scale };
                    format!("{jd:.digits$}")
                }
                Token::MonthUpper => MONTH_NAMES[f.month as usize - 1].to_owned(),
                Token::MonthMixed => capitalize(MONTH_NAMES[f.month as usize - 1]),
                Token::Year => format!("{:04}", f.year),
                Token::DayOfYear => format!("{:03}", f.doy),
                Token::MonUpper => MONTHS[f.month as usize - 1].to_owned(),
                Token::MonMixed => capitalize(MONTHS[f.month as usize - 1]),
                Token::Year2 => format!("{:02}", f.year.rem_euclid(100)),
                Token::MonthNumber => format!("{:02}", f.month),
                Token::Day => format!("{:02}", f.day),
                Token::Hour => format!("{:02}", f.hour),
                Token::Minute => format!("{:02}", f.minute),
                Token::Second => format_seconds(f.second, digits),
            }),
        }
    }
    // Markers removed from the end of the picture leave a trailing blank
    Ok(out.trim_end().to_owned())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, failed, getsms, reset};
    use approx::assert_abs_diff_eq;

    pub(crate) const NAIF0012: &str = r"KPL/LSK

\begindata

DELTET/DELTA_T_A       =   32.184
DELTET/K               =    1.657D-3
DELTET/EB              =    1.671D-2
DELTET/M               = (  6.239996D0   1.99096871D-7 )

DELTET/DELTA_AT        = ( 10,   @1972-JAN-1
                           11,   @1972-JUL-1
                           12,   @1973-JAN-1
                           13,   @1974-JAN-1
                           14,   @1975-JAN-1
                           15,   @1976-JAN-1
                           16,   @1977-JAN-1
                           17,   @1978-JAN-1
                           18,   @1979-JAN-1
                           19,   @1980-JAN-1
                           20,   @1981-JUL-1
                           21,   @1982-JUL-1
                           22,   @1983-JUL-1
                           23,   @1985-JUL-1
                           24,   @1988-JAN-1
                           25,   @1990-JAN-1
                           26,   @1991-JAN-1
                           27,   @1992-JUL-1
                           28,   @1993-JUL-1
                           29,   @1994-JUL-1
                           30,   @1996-JAN-1
                           31,   @1997-JUL-1
                           32,   @1999-JAN-1
                           33,   @2006-JAN-1
                           34,   @2009-JAN-1
                           35,   @2012-JUL-1
                           36,   @2015-JUL-1
                           37,   @2017-JAN-1 )

\begintext
";

    pub(crate) fn lsk_ctx<'a>() -> Context<'a> {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();
        crate::pool::load_text(&mut ctx, "naif0012.tls", NAIF0012, false).unwrap();
        assert!(!failed(&ctx));
        ctx
    }

    #[test]
    fn civil_days() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 1, 1), J2000_DAY);
        assert_eq!(civil_from_days(J2000_DAY + 59), (2000, 2, 29));
        assert_eq!(civil_from_days(days_from_civil(-4712, 1, 1)), (-4712, 1, 1));
        assert_eq!(days_from_civil(2017, 1, 1) - days_from_civil(2016, 12, 31), 1);
    }

    #[test]
    fn tparse_forms() {
        assert_eq!(tparse("2000-01-01T12:00:00"), Ok(0.0));
        assert_eq!(tparse("2000-01-01"), Ok(-43200.0));
        assert_eq!(tparse("JD 2451545.0"), Ok(0.0));
        assert_eq!(tparse("2451546.5 JD"), Ok(129600.0));
        assert_eq!(tparse("2000-001T12:00"), Ok(0.0));
        assert_eq!(tparse("2000-032 // 12:00:00"), tparse("2000-02-01T12:00:00"));
        assert_eq!(tparse("2000 JAN 01 12:00"), Ok(0.0));
        assert_eq!(tparse("January 1, 2000 12:00:00"), Ok(0.0));
        assert_eq!(tparse("1 jan 2000 12:00"), Ok(0.0));
        assert_eq!(tparse("1972-JAN-1"), Ok(-883656000.0));
        assert_abs_diff_eq!(
            tparse("2021-10-01T22:46:52.18").unwrap(),
            tparse("2021-10-01").unwrap() + 82012.18,
            epsilon = 1e-6
        );
    }

    #[test]
    fn tparse_rejects() {
        assert!(tparse("").is_err());
        assert!(tparse("2001-02-29").is_err());
        assert!(tparse("2000-13-01").is_err());
        assert!(tparse("2000-01-01T24:00:00").is_err());
        assert!(tparse("2001-366T00:00").is_err());
        assert!(tparse("yesterday").is_err());
        assert!(tparse("JAN FEB 2000").is_err());
        assert!(tparse("999999999999-01-01").is_err());
        assert!(tparse("99999999999999999999-01-01").is_err());
        assert!(tparse("999999999-200T00:00").is_err());
        assert!(tparse("1 jan 999999999").is_err());
    }

    #[test]
    fn str2et_utc() -> Result<()> {
        let mut ctx = lsk_ctx();
        let et = str2et(&mut ctx, "2000-01-01T12:00:00")?;
        assert_abs_diff_eq!(et, 64.1839273, epsilon = 1e-5);

        let et = str2et(&mut ctx, "2000 JAN 01 12:00:00 TDB")?;
        assert_eq!(et, 0.0);

        let tdt = str2et(&mut ctx, "2000-01-01T12:00:00 TT")?;
        assert_abs_diff_eq!(tdt, 0.0, epsilon = 2e-3);

        let pst = str2et(&mut ctx, "2000-01-01T04:00:00 PST")?;
        assert_abs_diff_eq!(pst, 64.1839273, epsilon = 1e-5);
        let offset = str2et(&mut ctx, "2000-01-01T17:30:00 UTC+05:30")?;
        assert_abs_diff_eq!(offset, 64.1839273, epsilon = 1e-5);
        Ok(())
    }

    #[test]
    fn str2et_leap_second() -> Result<()> {
        let mut ctx = lsk_ctx();
        let leap = str2et(&mut ctx, "2016-12-31T23:59:60.5")?;
        let after = str2et(&mut ctx, "2017-01-01T00:00:00")?;
        assert_abs_diff_eq!(after - leap, 0.5, epsilon = 1e-6);

        let s = et2utc(&mut ctx, leap, "ISOC", 1)?;
        assert_eq!(s, "2016-12-31T23:59:60.5");
        Ok(())
    }

    #[test]
    fn str2et_errors() -> Result<()> {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned())?;
        erract(&mut ctx, "SET", &mut "RETURN".to_owned())?;

        str2et(&mut ctx, "2000-01-01")?;
        assert_eq!(getsms(&mut ctx), "SPICE(NOLEAPSECONDS)");
        reset(&mut ctx);

        // TDB strings need no kernels
        assert_eq!(str2et(&mut ctx, "2000-01-01T12:00:00 TDB")?, 0.0);
        assert!(!failed(&ctx));

        str2et(&mut ctx, "not a time")?;
        assert_eq!(getsms(&mut ctx), "SPICE(UNPARSEDTIME)");
        Ok(())
    }

    #[test]
    fn et2utc_formats() -> Result<()> {
        let mut ctx = lsk_ctx();
        let et = str2et(&mut ctx, "1986-04-12T16:31:09.814")?;
        assert_eq!(et2utc(&mut ctx, et, "C", 3)?, "1986 APR 12 16:31:09.814");
        assert_eq!(et2utc(&mut ctx, et, "D", 3)?, "1986-102 // 16:31:09.814");
        assert_eq!(et2utc(&mut ctx, et, "ISOC", 0)?, "1986-04-12T16:31:10");
        assert_eq!(et2utc(&mut ctx, et, "isod", 2)?, "1986-102T16:31:09.81");
        assert_eq!(et2utc(&mut ctx, et, "J", 4)?, "JD 2446533.1883");

        et2utc(&mut ctx, et, "X", 3)?;
        assert_eq!(getsms(&mut ctx), "SPICE(INVALIDTIMEFORMAT)");
        Ok(())
    }

    #[test]
    fn et2utc_rounding_carries() -> Result<()> {
        let mut ctx = lsk_ctx();
        let et = str2et(&mut ctx, "2015-03-31T23:59:59.9999")?;
        assert_eq!(et2utc(&mut ctx, et, "ISOC", 2)?, "2015-04-01T00:00:00.00");

        let et = str2et(&mut ctx, "2016-12-31T23:59:60.99996")?;
        assert_eq!(et2utc(&mut ctx, et, "ISOC", 3)?, "2017-01-01T00:00:00.000");
        Ok(())
    }

    #[test]
    fn etcal_formal() {
        assert_eq!(etcal(0.0), "2000 JAN 01 12:00:00.000");
        assert_eq!(etcal(-43200.0 - 0.0006), "1999 DEC 31 23:59:59.999");
        assert_eq!(etcal(-43200.0 - 0.0001), "2000 JAN 01 00:00:00.000");
        assert!(etcal(-1e11).contains(" B.C. "));
        assert_eq!(etcal(1e300), etcal(MAX_EPOCH));
        assert_eq!(etcal(-f64::INFINITY), etcal(-MAX_EPOCH));
        assert_eq!(etcal(f64::NAN), etcal(0.0));
    }

    #[test]
    fn epochs_outside_calendar_range() -> Result<()> {
        let mut ctx = lsk_ctx();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned())?;
        erract(&mut ctx, "SET", &mut "RETURN".to_owned())?;

        assert_eq!(et2utc(&mut ctx, 1e300, "C", 3)?, "");
        assert_eq!(getsms(&mut ctx), "SPICE(VALUEOUTOFRANGE)");
        reset(&mut ctx);

        assert_eq!(timout(&mut ctx, f64::NAN, "YYYY-MM-DD")?, "");
        assert_eq!(getsms(&mut ctx), "SPICE(VALUEOUTOFRANGE)");
        reset(&mut ctx);

        str2et(&mut ctx, "999999999999-01-01T00:00:00")?;
        assert_eq!(getsms(&mut ctx), "SPICE(UNPARSEDTIME)");
        reset(&mut ctx);

        assert!(!et2utc(&mut ctx, -MAX_EPOCH, "ISOC", 0)?.is_empty());
        assert!(!failed(&ctx));
        Ok(())
    }

    #[test]
    fn deltet_and_unitim() -> Result<()> {
        let mut ctx = lsk_ctx();
        let d = deltet(&mut ctx, 0.0, "UTC")?;
        assert_abs_diff_eq!(d, 64.1839273, epsilon = 1e-5);
        let d = deltet(&mut ctx, 64.1839273, "ET")?;
        assert_abs_diff_eq!(d, 64.1839273, epsilon = 1e-5);

        deltet(&mut ctx, 0.0, "TAI")?;
        assert_eq!(getsms(&mut ctx), "SPICE(INVALIDEPOCH)");
        reset(&mut ctx);

        assert_eq!(unitim(&mut ctx, 0.0, "ET", "JED")?, 2451545.0);
        let tai = unitim(&mut ctx, 0.0, "TDB", "TAI")?;
        assert_abs_diff_eq!(tai, -32.1839273, epsilon = 1e-5);
        let back = unitim(&mut ctx, tai, "TAI", "TDB")?;
        assert_abs_diff_eq!(back, 0.0, epsilon = 1e-9);

        unitim(&mut ctx, 0.0, "GPS", "TDB")?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADTIMETYPE)");
        Ok(())
    }

    #[test]
    fn timout_pictures() -> Result<()> {
        let mut ctx = lsk_ctx();
        let et = str2et(&mut ctx, "2021-10-01T22:46:52.183")?;
        assert_eq!(
            timout(&mut ctx, et, "MON DD, YYYY HR:MN:SC.##")?,
            "OCT 01, 2021 22:46:52.18"
        );
        assert_eq!(timout(&mut ctx, et, "Month DD, YR")?, "October 01, 21");
        assert_eq!(timout(&mut ctx, et, "YYYY-DOY HR:MN ::RND")?, "2021-274 22:47");
        assert_eq!(timout(&mut ctx, et, "YYYY-MM-DD HR:MN")?, "2021-10-01 22:46");
        assert_eq!(
            timout(&mut ctx, 0.0, "YYYY Mon DD HR:MN:SC ::TDB (TDB)")?,
            "2000 Jan 01 12:00:00  (TDB)"
        );
        assert_eq!(timout(&mut ctx, 0.0, "JULIAND.### ::TDB")?, "2451545.000");
        assert_eq!(timout(&mut ctx, 0.0, "YYYY-MM-DD ::TDB ::RND")?, "2000-01-01");
        Ok(())
    }

    #[test]
    fn fixed_clock() -> Result<()> {
        use chrono::TimeZone;
        let mut ctx = lsk_ctx();
        ctx.set_fixed_time(chrono::Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).single());
        assert_abs_diff_eq!(et_now(&mut ctx)?, 64.1839273, epsilon = 1e-5);
        Ok(())
    }
}
