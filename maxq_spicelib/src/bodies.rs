//! Body name/ID translation and body constants from the kernel pool.

use maxq_std::{Context, Result, SaveInit, text};

use crate::errhnd::{chkin, chkout, errch, errint, r#return, setmsg, sigerr, signal};
use crate::pool::{self, PoolValues};

/// Maximum length of a body name
pub const MAXL: usize = 36;

/// Built-in name/code assignments. Where a code has several names, the first
/// listed is the one returned by [`bodc2n`].
const BUILTIN: &[(i32, &str)] = &[
    (0, "SOLAR SYSTEM BARYCENTER"),
    (0, "SSB"),
    (0, "SOLAR_SYSTEM_BARYCENTER"),
    (1, "MERCURY BARYCENTER"),
    (2, "VENUS BARYCENTER"),
    (3, "EARTH BARYCENTER"),
    (3, "EMB"),
    (3, "EARTH MOON BARYCENTER"),
    (3, "EARTH-MOON BARYCENTER"),
    (4, "MARS BARYCENTER"),
    (5, "JUPITER BARYCENTER"),
    (6, "SATURN BARYCENTER"),
    (7, "URANUS BARYCENTER"),
    (8, "NEPTUNE BARYCENTER"),
    (9, "PLUTO BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (399, "EARTH"),
    (301, "MOON"),
    (499, "MARS"),
    (401, "PHOBOS"),
    (402, "DEIMOS"),
    (599, "JUPITER"),
    (501, "IO"),
    (502, "EUROPA"),
    (503, "GANYMEDE"),
    (504, "CALLISTO"),
    (505, "AMALTHEA"),
    (514, "THEBE"),
    (699, "SATURN"),
    (601, "MIMAS"),
    (602, "ENCELADUS"),
    (603, "TETHYS"),
    (604, "DIONE"),
    (605, "RHEA"),
    (606, "TITAN"),
    (607, "HYPERION"),
    (608, "IAPETUS"),
    (609, "PHOEBE"),
    (799, "URANUS"),
    (701, "ARIEL"),
    (702, "UMBRIEL"),
    (703, "TITANIA"),
    (704, "OBERON"),
    (705, "MIRANDA"),
    (899, "NEPTUNE"),
    (801, "TRITON"),
    (802, "NEREID"),
    (999, "PLUTO"),
    (901, "CHARON"),
    (2000001, "CERES"),
    (2000002, "PALLAS"),
    (2000004, "VESTA"),
    (2000016, "PSYCHE"),
    (2000433, "EROS"),
    (2101955, "BENNU"),
    (2162173, "RYUGU"),
    (2486958, "ARROKOTH"),
    (-31, "VOYAGER 1"),
    (-31, "VG1"),
    (-32, "VOYAGER 2"),
    (-32, "VG2"),
    (-61, "JUNO"),
    (-64, "OSIRIS-REX"),
    (-64, "ORX"),
    (-74, "MARS RECONNAISSANCE ORBITER"),
    (-74, "MRO"),
    (-76, "MARS SCIENCE LABORATORY"),
    (-76, "MSL"),
    (-76, "CURIOSITY"),
    (-82, "CASSINI"),
    (-85, "LUNAR RECONNAISSANCE ORBITER"),
    (-85, "LRO"),
    (-96, "PARKER SOLAR PROBE"),
    (-96, "SPP"),
    (-98, "NEW HORIZONS"),
    (-168, "MARS 2020"),
    (-168, "PERSEVERANCE"),
    (-170, "JAMES WEBB SPACE TELESCOPE"),
    (-170, "JWST"),
    (-203, "DAWN"),
    (-236, "MESSENGER"),
    (-125544, "INTERNATIONAL SPACE STATION"),
    (-125544, "ISS"),
];

#[derive(Default)]
struct SaveVars {
    /// (normalized name, name as given, code)
    defs: Vec<(String, String, i32)>,
}

impl SaveInit for SaveVars {
    fn new() -> Self {
        Self::default()
    }
}

/// `NAIF_BODY_NAME`/`NAIF_BODY_CODE` pairs from the pool, in load order.
/// `None` once a size mismatch was signalled.
fn pool_mappings(ctx: &mut Context) -> Result<Option<Vec<(String, i32)>>> {
    let names = pool::lookup(ctx, "NAIF_BODY_NAME");
    let codes = pool::lookup(ctx, "NAIF_BODY_CODE");
    match (names, codes) {
        (Some(PoolValues::Character(names)), Some(PoolValues::Numeric(codes))) => {
            if names.len() != codes.len() {
                chkin(ctx, "ZZBODKER")?;
                setmsg(
                    ctx,
                    "The kernel pool has # values of NAIF_BODY_NAME but # values of NAIF_BODY_CODE.",
                );
                errint(ctx, "#", names.len() as i64);
                errint(ctx, "#", codes.len() as i64);
                sigerr(ctx, "SPICE(SIZEMISMATCH)")?;
                chkout(ctx, "ZZBODKER")?;
                return Ok(None);
            }
            Ok(Some(
                names
                    .into_iter()
                    .zip(codes)
                    .map(|(n, c)| (n, c.round() as i32))
                    .collect(),
            ))
        }
        _ => Ok(Some(vec![])),
    }
}

/// Candidate (name, code) assignments in precedence order
fn assignments(ctx: &mut Context) -> Result<Option<Vec<(String, i32)>>> {
    let Some(from_pool) = pool_mappings(ctx)? else {
        return Ok(None);
    };
    let vars = ctx.get_vars::<SaveVars>();
    let defs = vars.borrow();

    let mut all: Vec<(String, i32)> = from_pool
        .into_iter()
        .rev()
        .map(|(n, c)| (text::compress_blanks(&n), c))
        .collect();
    all.extend(defs.defs.iter().rev().map(|(_, n, c)| (n.clone(), *c)));
    all.extend(BUILTIN.iter().map(|(c, n)| (n.to_string(), *c)));
    Ok(Some(all))
}

fn lookup_name(all: &[(String, i32)], name: &str) -> Option<i32> {
    let key = text::normalize_name(name);
    all.iter()
        .find(|(n, _)| text::normalize_name(n) == key)
        .map(|(_, c)| *c)
}

/// Translate a body name to its NAIF ID code
pub fn bodn2c(ctx: &mut Context, name: &str) -> Result<Option<i32>> {
    if r#return(ctx) {
        return Ok(None);
    }
    let Some(all) = assignments(ctx)? else {
        return Ok(None);
    };
    Ok(lookup_name(&all, name))
}

/// Translate a NAIF ID code to the name with the highest precedence that
/// still maps back to the code
pub fn bodc2n(ctx: &mut Context, code: i32) -> Result<Option<String>> {
    if r#return(ctx) {
        return Ok(None);
    }
    let Some(all) = assignments(ctx)? else {
        return Ok(None);
    };
    Ok(all
        .iter()
        .filter(|(_, c)| *c == code)
        .find(|(n, _)| lookup_name(&all, n) == Some(code))
        .map(|(n, _)| n.clone()))
}

/// As [`bodn2c`], also accepting the decimal string form of an ID code
pub fn bods2c(ctx: &mut Context, name: &str) -> Result<Option<i32>> {
    if r#return(ctx) {
        return Ok(None);
    }
    match bodn2c(ctx, name)? {
        Some(code) => Ok(Some(code)),
        None => Ok(name.trim().parse::<i32>().ok()),
    }
}

/// Define a body name/code pair, overriding built-in assignments
pub fn boddef(ctx: &mut Context, name: &str, code: i32) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    if text::is_blank(name) {
        return signal(
            ctx,
            "BODDEF",
            "SPICE(BLANKNAMEASSIGNED)",
            "A blank name cannot be assigned to a body code.",
        );
    }
    let given = text::compress_blanks(text::truncate(name, MAXL));
    let key = text::normalize_name(&given);
    let vars = ctx.get_vars::<SaveVars>();
    let mut v = vars.borrow_mut();
    v.defs.retain(|(k, _, _)| *k != key);
    v.defs.push((key, given, code));
    Ok(())
}

fn body_var(body: i32, item: &str) -> String {
    format!("BODY{body}_{}", item.trim().to_ascii_uppercase())
}

/// True if the pool holds `BODY<body>_<item>`
pub fn bodfnd(ctx: &mut Context, body: i32, item: &str) -> Result<bool> {
    if r#return(ctx) {
        return Ok(false);
    }
    Ok(pool::lookup(ctx, &body_var(body, item)).is_some())
}

/// Values of the numeric pool variable `BODY<body>_<item>`, at most `maxn`
pub fn bodvcd(ctx: &mut Context, body: i32, item: &str, maxn: usize) -> Result<Option<Vec<f64>>> {
    if r#return(ctx) {
        return Ok(None);
    }
    chkin(ctx, "BODVCD")?;
    let name = body_var(body, item);
    let result = match pool::lookup(ctx, &name) {
        None => {
            setmsg(ctx, "The variable # could not be found in the kernel pool.");
            errch(ctx, "#", &name);
            sigerr(ctx, "SPICE(KERNELVARNOTFOUND)")?;
            None
        }
        Some(PoolValues::Character(_)) => {
            setmsg(ctx, "The variable # is character-valued; a numeric value was expected.");
            errch(ctx, "#", &name);
            sigerr(ctx, "SPICE(TYPEMISMATCH)")?;
            None
        }
        Some(PoolValues::Numeric(v)) if v.len() > maxn => {
            setmsg(ctx, "The variable # has # values, but the output array holds only #.");
            errch(ctx, "#", &name);
            errint(ctx, "#", v.len() as i64);
            errint(ctx, "#", maxn as i64);
            sigerr(ctx, "SPICE(ARRAYTOOSMALL)")?;
            None
        }
        Some(PoolValues::Numeric(v)) => Some(v),
    };
    chkout(ctx, "BODVCD")?;
    Ok(result)
}

/// As [`bodvcd`], identifying the body by name
pub fn bodvrd(ctx: &mut Context, bodynm: &str, item: &str, maxn: usize) -> Result<Option<Vec<f64>>> {
    if r#return(ctx) {
        return Ok(None);
    }
    chkin(ctx, "BODVRD")?;
    let result = match bods2c(ctx, bodynm)? {
        Some(code) => bodvcd(ctx, code, item, maxn)?,
        None => {
            setmsg(ctx, "The body name # could not be translated to a NAIF ID code.");
            errch(ctx, "#", bodynm.trim());
            sigerr(ctx, "SPICE(NOTRANSLATION)")?;
            None
        }
    };
    chkout(ctx, "BODVRD")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, getsms, qcktrc, reset};
    use crate::pool::{lmpool, pcpool, pdpool};

    fn ctx<'a>() -> Context<'a> {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();
        ctx
    }

    #[test]
    fn builtin_names() -> Result<()> {
        let mut ctx = ctx();
        assert_eq!(bodn2c(&mut ctx, "earth")?, Some(399));
        assert_eq!(bodn2c(&mut ctx, "  Solar   System Barycenter ")?, Some(0));
        assert_eq!(bodn2c(&mut ctx, "Unknown Rock")?, None);
        assert_eq!(bodc2n(&mut ctx, 3)?.as_deref(), Some("EARTH BARYCENTER"));
        assert_eq!(bodc2n(&mut ctx, -82)?.as_deref(), Some("CASSINI"));
        assert_eq!(bodc2n(&mut ctx, 123456)?, None);
        assert_eq!(bods2c(&mut ctx, "-77")?, Some(-77));
        assert_eq!(bods2c(&mut ctx, "MOON")?, Some(301));
        Ok(())
    }

    #[test]
    fn precedence() -> Result<()> {
        let mut ctx = ctx();
        boddef(&mut ctx, "Home", 399)?;
        assert_eq!(bodn2c(&mut ctx, "HOME")?, Some(399));
        assert_eq!(bodc2n(&mut ctx, 399)?.as_deref(), Some("Home"));

        lmpool(
            &mut ctx,
            &[
                "NAIF_BODY_NAME = ( 'HOME', 'Spacecraft  X' )",
                "NAIF_BODY_CODE = ( 1000, -999 )",
            ],
        )?;
        assert_eq!(bodn2c(&mut ctx, "home")?, Some(1000));
        assert_eq!(bodc2n(&mut ctx, -999)?.as_deref(), Some("Spacecraft X"));
        // 399 keeps its built-in name once 'HOME' maps elsewhere
        assert_eq!(bodc2n(&mut ctx, 399)?.as_deref(), Some("EARTH"));

        boddef(&mut ctx, "  ", 1)?;
        assert_eq!(getsms(&mut ctx), "SPICE(BLANKNAMEASSIGNED)");
        Ok(())
    }

    #[test]
    fn pool_size_mismatch() -> Result<()> {
        let mut ctx = ctx();
        pcpool(&mut ctx, "NAIF_BODY_NAME", &["A", "B"])?;
        pdpool(&mut ctx, "NAIF_BODY_CODE", &[1.0])?;
        assert_eq!(bodn2c(&mut ctx, "A")?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(SIZEMISMATCH)");
        Ok(())
    }

    #[test]
    fn body_constants() -> Result<()> {
        let mut ctx = ctx();
        pdpool(&mut ctx, "BODY399_RADII", &[6378.1366, 6378.1366, 6356.7519])?;
        pcpool(&mut ctx, "BODY399_NAME", &["EARTH"])?;

        assert!(bodfnd(&mut ctx, 399, "radii")?);
        assert!(!bodfnd(&mut ctx, 399, "GM")?);

        assert_eq!(
            bodvrd(&mut ctx, "EARTH", "RADII", 3)?,
            Some(vec![6378.1366, 6378.1366, 6356.7519])
        );

        assert_eq!(bodvcd(&mut ctx, 399, "GM", 1)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(KERNELVARNOTFOUND)");
        assert_eq!(qcktrc(&mut ctx), "BODVCD");
        reset(&mut ctx);

        assert_eq!(bodvcd(&mut ctx, 399, "RADII", 2)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(ARRAYTOOSMALL)");
        reset(&mut ctx);

        assert_eq!(bodvcd(&mut ctx, 399, "NAME", 2)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(TYPEMISMATCH)");
        reset(&mut ctx);

        assert_eq!(bodvrd(&mut ctx, "NOT A BODY", "RADII", 3)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(NOTRANSLATION)");
        assert_eq!(qcktrc(&mut ctx), "BODVRD");
        Ok(())
    }
}
