//! The kernel pool: named numeric and character variables loaded from text
//! kernels or inserted directly.

use indexmap::IndexMap;
use maxq_std::{Context, Result, SaveInit, text};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::errhnd::{chkin, chkout, errch, errint, r#return, setmsg, sigerr, signal};
use crate::kernel_text::{self, Op, RawValue};
use crate::time;

/// Maximum length of a kernel variable name
pub const MAXLEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum PoolValues {
    Numeric(Vec<f64>),
    Character(Vec<String>),
}

impl PoolValues {
    pub fn len(&self) -> usize {
        match self {
            PoolValues::Numeric(v) => v.len(),
            PoolValues::Character(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_char(&self) -> char {
        match self {
            PoolValues::Numeric(_) => 'N',
            PoolValues::Character(_) => 'C',
        }
    }
}

#[derive(Default)]
struct SaveVars {
    vars: IndexMap<String, PoolValues>,
}

impl SaveInit for SaveVars {
    fn new() -> Self {
        Self::default()
    }
}

/// Returns false (after signalling) if `name` cannot be a pool variable name
fn check_name(ctx: &mut Context, module: &str, name: &str) -> Result<bool> {
    if text::is_blank(name) {
        signal(
            ctx,
            module,
            "SPICE(EMPTYSTRING)",
            "The kernel variable name is blank.",
        )?;
        return Ok(false);
    }
    let name = name.trim();
    if name.chars().count() > MAXLEN || name.contains(char::is_whitespace) {
        chkin(ctx, module)?;
        setmsg(
            ctx,
            "The kernel variable name '#' is invalid. Names contain no blanks and have at most # characters.",
        );
        errch(ctx, "#", name);
        errint(ctx, "#", MAXLEN as i64);
        sigerr(ctx, "SPICE(BADVARNAME)")?;
        chkout(ctx, module)?;
        return Ok(false);
    }
    Ok(true)
}

fn check_room(ctx: &mut Context, module: &str, room: usize) -> Result<bool> {
    if room < 1 {
        signal(
            ctx,
            module,
            "SPICE(BADARRAYSIZE)",
            "The output array size must be at least 1.",
        )?;
        return Ok(false);
    }
    Ok(true)
}

/// Clear the pool
pub fn clpool(ctx: &mut Context) {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().vars.clear();
    debug!("kernel pool cleared");
}

/// Load the variables of a text kernel file into the pool
pub fn ldpool(ctx: &mut Context, file: &str) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    chkin(ctx, "LDPOOL")?;

    let path = ctx.resolve_path(file);
    if text::is_blank(file) || !ctx.file_exists(&path) {
        setmsg(ctx, "The file '#' could not be located.");
        errch(ctx, "#", file.trim());
        sigerr(ctx, "SPICE(NOSUCHFILE)")?;
        return chkout(ctx, "LDPOOL");
    }

    match ctx.read_file(&path) {
        Ok(data) => {
            let contents = String::from_utf8_lossy(&data);
            load_text(ctx, file.trim(), &contents, false)?;
        }
        Err(err) => {
            setmsg(ctx, "The file '#' could not be read: #");
            errch(ctx, "#", file.trim());
            errch(ctx, "#", &err.to_string());
            sigerr(ctx, "SPICE(FILEREADFAILED)")?;
        }
    }

    chkout(ctx, "LDPOOL")
}

/// Load kernel data supplied as lines of text. The lines are data unless they
/// switch to comments with `\begintext`.
pub fn lmpool<S: AsRef<str>>(ctx: &mut Context, lines: &[S]) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    chkin(ctx, "LMPOOL")?;
    let joined = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    load_text(ctx, "<buffer>", &joined, true)?;
    chkout(ctx, "LMPOOL")
}

/// Parse `contents` and apply its assignments. Nothing is applied if any
/// assignment is invalid.
pub(crate) fn load_text(
    ctx: &mut Context,
    source: &str,
    contents: &str,
    starts_in_data: bool,
) -> Result<()> {
    let assignments = match kernel_text::parse(contents, starts_in_data) {
        Ok(a) => a,
        Err(err) => {
            setmsg(
                ctx,
                "A kernel variable assignment could not be parsed at line # column # of '#'. Expected #.",
            );
            errint(ctx, "#", err.line as i64);
            errint(ctx, "#", err.column as i64);
            errch(ctx, "#", source);
            errch(ctx, "#", &err.expected);
            return sigerr(ctx, "SPICE(BADVARASSIGN)");
        }
    };

    let mut resolved = Vec::with_capacity(assignments.len());
    for a in assignments {
        if !check_name(ctx, "LDPOOL", &a.name)? {
            return Ok(());
        }

        let numeric = a.values[0].is_numeric();
        if a.values.iter().any(|v| v.is_numeric() != numeric) {
            setmsg(
                ctx,
                "The assignment to '#' at line # of '#' mixes numeric and character values.",
            );
            errch(ctx, "#", &a.name);
            errint(ctx, "#", a.line as i64);
            errch(ctx, "#", source);
            return sigerr(ctx, "SPICE(TYPEMISMATCH)");
        }

        let values = if numeric {
            let mut nums = Vec::with_capacity(a.values.len());
            for v in &a.values {
                match v {
                    RawValue::Number(n) => nums.push(*n),
                    RawValue::Date(d) => match time::tparse(d) {
                        Ok(et) => nums.push(et),
                        Err(msg) => {
                            setmsg(ctx, "The date '@#' at line # of '#' could not be parsed: #");
                            errch(ctx, "#", d);
                            errint(ctx, "#", a.line as i64);
                            errch(ctx, "#", source);
                            errch(ctx, "#", &msg);
                            return sigerr(ctx, "SPICE(BADTIMESPEC)");
                        }
                    },
                    RawValue::Text(_) => unreachable!("types were checked"),
                }
            }
            PoolValues::Numeric(nums)
        } else {
            PoolValues::Character(
                a.values
                    .into_iter()
                    .filter_map(|v| match v {
                        RawValue::Text(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )
        };
        resolved.push((a.name, a.op, a.line, values));
    }

    let vars = ctx.get_vars::<SaveVars>();
    let mut pool = vars.borrow_mut();

    // Types as they stand after each assignment, so that a bad '+=' anywhere
    // in the batch is found before anything is applied
    let mut types: HashMap<&str, char> = HashMap::new();
    let mut mismatch = None;
    for (name, op, line, values) in &resolved {
        let current = types
            .get(name.as_str())
            .copied()
            .or_else(|| pool.vars.get(name).map(PoolValues::type_char));
        match (op, current) {
            (Op::Append, Some(t)) if t != values.type_char() => {
                mismatch = Some((name.clone(), *line));
                break;
            }
            _ => {
                types.insert(name, values.type_char());
            }
        }
    }
    if let Some((name, line)) = mismatch {
        drop(pool);
        setmsg(
            ctx,
            "The '+=' assignment to '#' at line # of '#' does not match the type of the existing variable.",
        );
        errch(ctx, "#", &name);
        errint(ctx, "#", line as i64);
        errch(ctx, "#", source);
        return sigerr(ctx, "SPICE(TYPEMISMATCH)");
    }

    for (name, op, _, values) in resolved {
        match (op, pool.vars.get_mut(&name), values) {
            (Op::Append, Some(PoolValues::Numeric(old)), PoolValues::Numeric(new)) => {
                old.extend(new)
            }
            (Op::Append, Some(PoolValues::Character(old)), PoolValues::Character(new)) => {
                old.extend(new)
            }
            (_, _, values) => {
                // Re-assignment moves the variable to the end of the load order
                pool.vars.shift_remove(&name);
                pool.vars.insert(name, values);
            }
        }
    }
    drop(pool);
    debug!(source, "loaded kernel pool data");
    Ok(())
}

fn put(ctx: &mut Context, module: &str, name: &str, values: PoolValues) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    if !check_name(ctx, module, name)? {
        return Ok(());
    }
    if values.is_empty() {
        return signal(
            ctx,
            module,
            "SPICE(BADARRAYSIZE)",
            "At least one value must be supplied.",
        );
    }
    let vars = ctx.get_vars::<SaveVars>();
    let mut pool = vars.borrow_mut();
    let name = name.trim().to_owned();
    pool.vars.shift_remove(&name);
    pool.vars.insert(name, values);
    Ok(())
}

/// Insert a numeric variable, replacing any existing variable of that name
pub fn pdpool(ctx: &mut Context, name: &str, values: &[f64]) -> Result<()> {
    put(ctx, "PDPOOL", name, PoolValues::Numeric(values.to_vec()))
}

pub fn pipool(ctx: &mut Context, name: &str, values: &[i32]) -> Result<()> {
    put(
        ctx,
        "PIPOOL",
        name,
        PoolValues::Numeric(values.iter().map(|&v| v as f64).collect()),
    )
}

pub fn pcpool<S: AsRef<str>>(ctx: &mut Context, name: &str, values: &[S]) -> Result<()> {
    put(
        ctx,
        "PCPOOL",
        name,
        PoolValues::Character(values.iter().map(|v| v.as_ref().to_owned()).collect()),
    )
}

/// Delete a variable. Absent variables are ignored.
pub fn dvpool(ctx: &mut Context, name: &str) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().vars.shift_remove(name.trim());
    Ok(())
}

/// Copy of the pool contents, taken before a load that may need undoing
pub(crate) struct PoolSnapshot(IndexMap<String, PoolValues>);

pub(crate) fn snapshot(ctx: &mut Context) -> PoolSnapshot {
    let vars = ctx.get_vars::<SaveVars>();
    PoolSnapshot(vars.borrow().vars.clone())
}

/// Put back the contents saved by [`snapshot`]. Works with an error pending.
pub(crate) fn restore(ctx: &mut Context, saved: PoolSnapshot) {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().vars = saved.0;
}

/// Raw lookup, without any error checks
pub fn lookup(ctx: &mut Context, name: &str) -> Option<PoolValues> {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().vars.get(name.trim()).cloned()
}

/// Number of values and type (`'N'` or `'C'`) of a variable
pub fn dtpool(ctx: &mut Context, name: &str) -> Result<Option<(usize, char)>> {
    if r#return(ctx) {
        return Ok(None);
    }
    Ok(lookup(ctx, name).map(|v| (v.len(), v.type_char())))
}

/// True if a numeric variable of this name exists
pub fn expool(ctx: &mut Context, name: &str) -> Result<bool> {
    if r#return(ctx) {
        return Ok(false);
    }
    Ok(matches!(lookup(ctx, name), Some(PoolValues::Numeric(_))))
}

fn window<T: Clone>(values: &[T], start: usize, room: usize) -> Vec<T> {
    values.iter().skip(start).take(room).cloned().collect()
}

/// Up to `room` values of a numeric variable, from index `start`.
/// `None` if the variable is absent or character-valued.
pub fn gdpool(ctx: &mut Context, name: &str, start: usize, room: usize) -> Result<Option<Vec<f64>>> {
    if r#return(ctx) || !check_room(ctx, "GDPOOL", room)? {
        return Ok(None);
    }
    Ok(match lookup(ctx, name) {
        Some(PoolValues::Numeric(v)) => Some(window(&v, start, room)),
        _ => None,
    })
}

/// As [`gdpool`], rounding to the nearest integer
pub fn gipool(ctx: &mut Context, name: &str, start: usize, room: usize) -> Result<Option<Vec<i32>>> {
    if r#return(ctx) || !check_room(ctx, "GIPOOL", room)? {
        return Ok(None);
    }
    let Some(PoolValues::Numeric(v)) = lookup(ctx, name) else {
        return Ok(None);
    };

    let mut out = Vec::new();
    for x in window(&v, start, room) {
        let r = x.round();
        if !(i32::MIN as f64..=i32::MAX as f64).contains(&r) {
            chkin(ctx, "GIPOOL")?;
            setmsg(ctx, "The value # of variable '#' cannot be represented as an integer.");
            crate::errhnd::errdp(ctx, "#", x);
            errch(ctx, "#", name.trim());
            sigerr(ctx, "SPICE(INTOUTOFRANGE)")?;
            chkout(ctx, "GIPOOL")?;
            return Ok(None);
        }
        out.push(r as i32);
    }
    Ok(Some(out))
}

pub fn gcpool(ctx: &mut Context, name: &str, start: usize, room: usize) -> Result<Option<Vec<String>>> {
    if r#return(ctx) || !check_room(ctx, "GCPOOL", room)? {
        return Ok(None);
    }
    Ok(match lookup(ctx, name) {
        Some(PoolValues::Character(v)) => Some(window(&v, start, room)),
        _ => None,
    })
}

/// Convert a wildcard template (`*` any run, `%` one character) into an
/// anchored, case-insensitive regex
fn template_regex(template: &str) -> std::result::Result<Regex, regex::Error> {
    let mut pattern = String::from("(?i)^");
    for c in template.trim().chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '%' => pattern.push('.'),
            c => pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

/// Names of variables matching `template`, in load order
pub fn gnpool(
    ctx: &mut Context,
    template: &str,
    start: usize,
    room: usize,
) -> Result<Option<Vec<String>>> {
    if r#return(ctx) || !check_room(ctx, "GNPOOL", room)? {
        return Ok(None);
    }
    let re = match template_regex(template) {
        Ok(re) => re,
        Err(err) => {
            debug!(template, %err, "unusable name template");
            return Ok(None);
        }
    };

    let vars = ctx.get_vars::<SaveVars>();
    let names: Vec<String> = vars
        .borrow()
        .vars
        .keys()
        .filter(|k| re.is_match(k))
        .cloned()
        .collect();

    if names.is_empty() {
        Ok(None)
    } else {
        Ok(Some(window(&names, start, room)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, failed, getsms, reset};
    use maxq_std::files::MemFileManager;

    fn ctx<'a>() -> Context<'a> {
        let mut ctx = Context::new();
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();
        ctx
    }

    #[test]
    fn put_and_get() -> Result<()> {
        let mut ctx = ctx();
        pdpool(&mut ctx, "BODY399_RADII", &[6378.1366, 6378.1366, 6356.7519])?;
        pipool(&mut ctx, "COUNT", &[1, -2])?;
        pcpool(&mut ctx, "NAMES", &["EARTH", "MOON"])?;

        assert_eq!(
            gdpool(&mut ctx, "BODY399_RADII", 1, 7)?,
            Some(vec![6378.1366, 6356.7519])
        );
        assert_eq!(gdpool(&mut ctx, "BODY399_RADII", 5, 7)?, Some(vec![]));
        assert_eq!(gipool(&mut ctx, "COUNT", 0, 1)?, Some(vec![1]));
        assert_eq!(gcpool(&mut ctx, "NAMES", 0, 10)?, Some(vec!["EARTH".into(), "MOON".into()]));

        assert_eq!(gdpool(&mut ctx, "NAMES", 0, 10)?, None);
        assert_eq!(gcpool(&mut ctx, "COUNT", 0, 10)?, None);
        assert_eq!(gdpool(&mut ctx, "MISSING", 0, 10)?, None);
        assert!(!failed(&ctx));

        assert_eq!(dtpool(&mut ctx, "NAMES")?, Some((2, 'C')));
        assert_eq!(dtpool(&mut ctx, "COUNT")?, Some((2, 'N')));
        assert!(expool(&mut ctx, "COUNT")?);
        assert!(!expool(&mut ctx, "NAMES")?);

        dvpool(&mut ctx, "COUNT")?;
        assert_eq!(dtpool(&mut ctx, "COUNT")?, None);
        Ok(())
    }

    #[test]
    fn bad_room_and_names() -> Result<()> {
        let mut ctx = ctx();
        assert_eq!(gdpool(&mut ctx, "X", 0, 0)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(BADARRAYSIZE)");
        reset(&mut ctx);

        pdpool(&mut ctx, "  ", &[1.0])?;
        assert_eq!(getsms(&mut ctx), "SPICE(EMPTYSTRING)");
        reset(&mut ctx);

        pdpool(&mut ctx, "A_NAME_THAT_IS_LONGER_THAN_32_CHARS", &[1.0])?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADVARNAME)");
        reset(&mut ctx);

        pdpool(&mut ctx, "EMPTY", &[])?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADARRAYSIZE)");
        reset(&mut ctx);

        pdpool(&mut ctx, "BIG", &[1e20])?;
        assert_eq!(gipool(&mut ctx, "BIG", 0, 1)?, None);
        assert_eq!(getsms(&mut ctx), "SPICE(INTOUTOFRANGE)");
        Ok(())
    }

    #[test]
    fn lmpool_lines() -> Result<()> {
        let mut ctx = ctx();
        lmpool(
            &mut ctx,
            &[
                "DELTET/DELTA_AT = ( 10, @1972-JAN-1",
                "                    11, @1972-JUL-1 )",
                "NAME = 'a'",
                "NAME += ( 'b', 'c' )",
            ],
        )?;
        assert!(!failed(&ctx));
        let at = gdpool(&mut ctx, "DELTET/DELTA_AT", 0, 10)?.unwrap();
        assert_eq!(at.len(), 4);
        assert_eq!(at[0], 10.0);
        assert_eq!(at[1], -883656000.0);
        assert_eq!(gcpool(&mut ctx, "NAME", 0, 10)?.unwrap(), vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn load_errors() -> Result<()> {
        let mut ctx = ctx();
        lmpool(&mut ctx, &["A = ( 1 'x' )"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(TYPEMISMATCH)");
        reset(&mut ctx);

        lmpool(&mut ctx, &["A = 1", "A += 'x'"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(TYPEMISMATCH)");
        reset(&mut ctx);

        lmpool(&mut ctx, &["A = @NOT-A-DATE"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADTIMESPEC)");
        reset(&mut ctx);

        lmpool(&mut ctx, &["A 1"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADVARASSIGN)");
        Ok(())
    }

    #[test]
    fn append_mismatch_applies_nothing() -> Result<()> {
        let mut ctx = ctx();
        lmpool(&mut ctx, &["A = 1", "B = 2", "A += 'x'"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(TYPEMISMATCH)");
        reset(&mut ctx);
        assert!(!expool(&mut ctx, "A")?);
        assert!(!expool(&mut ctx, "B")?);

        pcpool(&mut ctx, "NAMES", &["EARTH"])?;
        lmpool(&mut ctx, &["C = 3", "NAMES += 4"])?;
        assert_eq!(getsms(&mut ctx), "SPICE(TYPEMISMATCH)");
        reset(&mut ctx);
        assert!(!expool(&mut ctx, "C")?);
        assert_eq!(gcpool(&mut ctx, "NAMES", 0, 10)?, Some(vec!["EARTH".into()]));

        // Re-assigning first makes the later append consistent
        lmpool(&mut ctx, &["NAMES = 1", "NAMES += 4"])?;
        assert!(!failed(&ctx));
        assert_eq!(gdpool(&mut ctx, "NAMES", 0, 10)?, Some(vec![1.0, 4.0]));
        Ok(())
    }

    #[test]
    fn ldpool_files() -> Result<()> {
        let mut files = MemFileManager::new();
        files.insert(
            "/kernels/test.tpc",
            "KPL/PCK\n\\begindata\nBODY499_RADII = ( 3396.19 3396.19 3376.20 )\n",
        );
        let mut ctx = Context::with_file_manager(files);
        erract(&mut ctx, "SET", &mut "RETURN".to_owned())?;
        errprt(&mut ctx, "SET", &mut "NONE".to_owned())?;

        ldpool(&mut ctx, "/kernels/test.tpc")?;
        assert_eq!(dtpool(&mut ctx, "BODY499_RADII")?, Some((3, 'N')));

        ldpool(&mut ctx, "/kernels/missing.tpc")?;
        assert_eq!(getsms(&mut ctx), "SPICE(NOSUCHFILE)");
        Ok(())
    }

    #[test]
    fn name_templates() -> Result<()> {
        let mut ctx = ctx();
        pdpool(&mut ctx, "BODY399_RADII", &[1.0])?;
        pdpool(&mut ctx, "BODY499_RADII", &[1.0])?;
        pdpool(&mut ctx, "BODY10_GM", &[1.0])?;
        pdpool(&mut ctx, "body599_pm", &[1.0])?;

        assert_eq!(
            gnpool(&mut ctx, "BODY%%%_*", 0, 100)?,
            Some(vec![
                "BODY399_RADII".to_owned(),
                "BODY499_RADII".to_owned(),
                "body599_pm".to_owned()
            ])
        );
        assert_eq!(gnpool(&mut ctx, "*_GM", 0, 100)?, Some(vec!["BODY10_GM".to_owned()]));
        assert_eq!(gnpool(&mut ctx, "BODY%%%_*", 1, 1)?, Some(vec!["BODY499_RADII".to_owned()]));
        assert_eq!(gnpool(&mut ctx, "NOPE*", 0, 100)?, None);
        Ok(())
    }

    #[test]
    fn clear() -> Result<()> {
        let mut ctx = ctx();
        pdpool(&mut ctx, "A", &[1.0])?;
        clpool(&mut ctx);
        assert_eq!(dtpool(&mut ctx, "A")?, None);
        Ok(())
    }
}
