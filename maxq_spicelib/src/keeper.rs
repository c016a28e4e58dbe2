//! Kernel manager: tracks loaded kernel files and meta-kernels.
//!
//! Only text kernels carry data in this toolkit. Binary kernels (SPK, CK,
//! binary PCK, DSK, EK) are recognised by their id word and refused.

use maxq_std::{Context, Result, SaveInit, text};
use tracing::{debug, info};

use crate::errhnd::{chkin, chkout, errch, errint, failed, r#return, setmsg, sigerr, signal};
use crate::kernel_text;
use crate::pool::{self, PoolValues};

const META_VARIABLES: [&str; 3] = ["KERNELS_TO_LOAD", "PATH_SYMBOLS", "PATH_VALUES"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelClass {
    Text,
    Meta,
}

impl KernelClass {
    pub fn name(self) -> &'static str {
        match self {
            KernelClass::Text => "TEXT",
            KernelClass::Meta => "META",
        }
    }
}

/// Description of a loaded kernel, as returned by [`kdata`] and [`kinfo`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelData {
    pub file: String,
    /// `TEXT` or `META`
    pub filtyp: String,
    /// The meta-kernel that loaded this file, or blank
    pub source: String,
    /// Always 0 for text kernels
    pub handle: i32,
}

#[derive(Debug, Clone)]
struct Entry {
    file: String,
    class: KernelClass,
    source: Option<String>,
    contents: String,
}

impl Entry {
    fn data(&self) -> KernelData {
        KernelData {
            file: self.file.clone(),
            filtyp: self.class.name().to_owned(),
            source: self.source.clone().unwrap_or_default(),
            handle: 0,
        }
    }
}

#[derive(Default)]
struct SaveVars {
    loaded: Vec<Entry>,
}

impl SaveInit for SaveVars {
    fn new() -> Self {
        Self::default()
    }
}

enum Architecture {
    Text,
    Meta,
    Binary(String),
}

fn architecture(contents: &str) -> Architecture {
    match kernel_text::id_word(contents) {
        Some(id) if id.starts_with("DAF/") || id.starts_with("DAS/") || id == "NAIF/DAF" => {
            Architecture::Binary(id.to_owned())
        }
        Some("KPL/MK") => Architecture::Meta,
        _ if kernel_text::assigns_kernels_to_load(contents) => Architecture::Meta,
        _ => Architecture::Text,
    }
}

/// Load a kernel file: a text kernel into the pool, or each file listed by a
/// meta-kernel. Loading a file again moves it to the end of the load order.
///
/// A failed load leaves the pool and the list of loaded kernels as they were,
/// including when a meta-kernel fails part way through its list.
pub fn furnsh(ctx: &mut Context, file: &str) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    chkin(ctx, "FURNSH")?;
    if text::is_blank(file) {
        setmsg(ctx, "The input file name is blank.");
        sigerr(ctx, "SPICE(BLANKFILENAME)")?;
        return chkout(ctx, "FURNSH");
    }
    let saved = (pool::snapshot(ctx), loaded_entries(ctx));
    let result = load_file(ctx, file.trim(), None);
    if result.is_err() || failed(ctx) {
        let (pool_vars, loaded) = saved;
        pool::restore(ctx, pool_vars);
        ctx.get_vars::<SaveVars>().borrow_mut().loaded = loaded;
        debug!(file = file.trim(), "rolled back failed load");
    }
    result?;
    chkout(ctx, "FURNSH")
}

fn loaded_entries(ctx: &mut Context) -> Vec<Entry> {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().loaded.clone()
}

fn load_file(ctx: &mut Context, file: &str, source: Option<&str>) -> Result<()> {
    let path = ctx.resolve_path(file);
    if !ctx.file_exists(&path) {
        setmsg(ctx, "The file '#' could not be located.");
        errch(ctx, "#", file);
        return sigerr(ctx, "SPICE(NOSUCHFILE)");
    }
    let contents = match ctx.read_file(&path) {
        Ok(data) => String::from_utf8_lossy(&data).into_owned(),
        Err(err) => {
            setmsg(ctx, "The file '#' could not be read: #");
            errch(ctx, "#", file);
            errch(ctx, "#", &err.to_string());
            return sigerr(ctx, "SPICE(FILEREADFAILED)");
        }
    };

    let class = match architecture(&contents) {
        Architecture::Binary(id) => {
            setmsg(
                ctx,
                "The file '#' is a binary kernel (#). Only text kernels and meta-kernels can be loaded.",
            );
            errch(ctx, "#", file);
            errch(ctx, "#", &id);
            return sigerr(ctx, "SPICE(NOTSUPPORTED)");
        }
        Architecture::Meta if source.is_some() => {
            setmsg(ctx, "The meta-kernel '#' lists another meta-kernel, '#'.");
            errch(ctx, "#", source.unwrap_or_default());
            errch(ctx, "#", file);
            return sigerr(ctx, "SPICE(RECURSIVELOADING)");
        }
        Architecture::Meta => KernelClass::Meta,
        Architecture::Text => KernelClass::Text,
    };

    if is_loaded(ctx, file) {
        unload(ctx, file)?;
    }

    pool::load_text(ctx, file, &contents, false)?;
    if failed(ctx) {
        return Ok(());
    }

    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().loaded.push(Entry {
        file: file.to_owned(),
        class,
        source: source.map(str::to_owned),
        contents,
    });
    info!(file, class = class.name(), "loaded kernel");

    if class == KernelClass::Meta {
        load_meta_children(ctx, file)?;
    }
    Ok(())
}

fn character_var(ctx: &mut Context, name: &str) -> Vec<String> {
    match pool::lookup(ctx, name) {
        Some(PoolValues::Character(v)) => v,
        _ => vec![],
    }
}

/// Join values continued onto the next value with a trailing `+`
fn join_continued(values: Vec<String>) -> Vec<String> {
    let mut out = vec![];
    let mut pending = String::new();
    for v in values {
        let v = v.trim_end();
        match v.strip_suffix('+') {
            Some(head) => pending.push_str(head),
            None => {
                pending.push_str(v);
                out.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

/// Replace `$SYMBOL` references. `Err` carries the unknown symbol.
fn substitute(path: &str, symbols: &[(String, String)]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..len];
        match symbols.iter().find(|(s, _)| s == name) {
            Some((_, value)) => out.push_str(value),
            None => return Err(name.to_owned()),
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    Ok(out)
}

fn load_meta_children(ctx: &mut Context, meta: &str) -> Result<()> {
    let kernels = join_continued(character_var(ctx, "KERNELS_TO_LOAD"));
    let names = character_var(ctx, "PATH_SYMBOLS");
    let values = join_continued(character_var(ctx, "PATH_VALUES"));
    for name in META_VARIABLES {
        pool::dvpool(ctx, name)?;
    }

    if names.len() != values.len() {
        setmsg(
            ctx,
            "The meta-kernel '#' has # PATH_SYMBOLS but # PATH_VALUES.",
        );
        errch(ctx, "#", meta);
        errint(ctx, "#", names.len() as i64);
        errint(ctx, "#", values.len() as i64);
        return sigerr(ctx, "SPICE(PATHMISMATCH)");
    }
    let symbols: Vec<(String, String)> = names
        .into_iter()
        .map(|n| n.trim().to_owned())
        .zip(values)
        .collect();

    for kernel in kernels {
        let file = match substitute(kernel.trim(), &symbols) {
            Ok(f) => f,
            Err(symbol) => {
                setmsg(ctx, "The symbol '$#' in '#', listed by the meta-kernel '#', is not defined by PATH_SYMBOLS.");
                errch(ctx, "#", &symbol);
                errch(ctx, "#", kernel.trim());
                errch(ctx, "#", meta);
                return sigerr(ctx, "SPICE(NOSUCHSYMBOL)");
            }
        };
        load_file(ctx, &file, Some(meta))?;
        if failed(ctx) {
            break;
        }
    }
    Ok(())
}

fn is_loaded(ctx: &mut Context, file: &str) -> bool {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().loaded.iter().any(|e| e.file == file)
}

/// Unload a kernel file (with the files a meta-kernel loaded). The pool is
/// rebuilt from the text kernels that remain loaded, so variables inserted
/// directly are discarded. Files that are not loaded are ignored.
pub fn unload(ctx: &mut Context, file: &str) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    let file = file.trim();
    let vars = ctx.get_vars::<SaveVars>();
    let remaining = {
        let mut v = vars.borrow_mut();
        let before = v.loaded.len();
        v.loaded
            .retain(|e| e.file != file && e.source.as_deref() != Some(file));
        if v.loaded.len() == before {
            return Ok(());
        }
        v.loaded.clone()
    };
    debug!(file, "unloaded kernel");

    chkin(ctx, "UNLOAD")?;
    pool::clpool(ctx);
    for entry in &remaining {
        pool::load_text(ctx, &entry.file, &entry.contents, false)?;
        if entry.class == KernelClass::Meta {
            for name in META_VARIABLES {
                pool::dvpool(ctx, name)?;
            }
        }
    }
    chkout(ctx, "UNLOAD")
}

/// Unload everything and clear the pool
pub fn kclear(ctx: &mut Context) -> Result<()> {
    if r#return(ctx) {
        return Ok(());
    }
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().loaded.clear();
    pool::clpool(ctx);
    debug!("cleared all kernels");
    Ok(())
}

/// Parse a kind list such as `"TEXT, META"` or `"ALL"`
fn kind_filter(kind: &str) -> (bool, bool) {
    let mut want = (false, false);
    for word in text::normalize_name(kind).split([',', ' ']).filter(|w| !w.is_empty()) {
        match word {
            "ALL" => want = (true, true),
            "TEXT" => want.0 = true,
            "META" => want.1 = true,
            // Binary kinds never match anything loaded here
            _ => (),
        }
    }
    want
}

fn matching(ctx: &mut Context, kind: &str) -> Vec<Entry> {
    let (want_text, want_meta) = kind_filter(kind);
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow()
        .loaded
        .iter()
        .filter(|e| match e.class {
            KernelClass::Text => want_text,
            KernelClass::Meta => want_meta,
        })
        .cloned()
        .collect()
}

/// Number of loaded kernels of the given kinds (`SPK CK PCK DSK EK TEXT META ALL`)
pub fn ktotal(ctx: &mut Context, kind: &str) -> Result<usize> {
    if r#return(ctx) {
        return Ok(0);
    }
    Ok(matching(ctx, kind).len())
}

/// The `which`-th (0-based) loaded kernel of the given kinds
pub fn kdata(ctx: &mut Context, which: usize, kind: &str) -> Result<Option<KernelData>> {
    if r#return(ctx) {
        return Ok(None);
    }
    Ok(matching(ctx, kind).get(which).map(Entry::data))
}

pub fn kinfo(ctx: &mut Context, file: &str) -> Result<Option<KernelData>> {
    if r#return(ctx) {
        return Ok(None);
    }
    if text::is_blank(file) {
        signal(ctx, "KINFO", "SPICE(BLANKFILENAME)", "The input file name is blank.")?;
        return Ok(None);
    }
    let vars = ctx.get_vars::<SaveVars>();
    let v = vars.borrow();
    Ok(v.loaded.iter().find(|e| e.file == file.trim()).map(Entry::data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errhnd::{erract, errprt, getsms, reset};
    use crate::pool::{gcpool, gdpool};
    use maxq_std::files::MemFileManager;

    fn ctx_with(files: &[(&str, &str)]) -> Context<'static> {
        let mut fm = MemFileManager::new();
        for (name, contents) in files {
            fm.insert(format!("/k/{name}"), *contents);
        }
        let mut ctx = Context::with_file_manager(fm);
        ctx.set_content_root("/k");
        errprt(&mut ctx, "SET", &mut "NONE".to_owned()).unwrap();
        erract(&mut ctx, "SET", &mut "RETURN".to_owned()).unwrap();
        ctx
    }

    const PCK: &str = "KPL/PCK\n\\begindata\nBODY399_RADII = ( 6378.1366 6378.1366 6356.7519 )\n";
    const EXTRA: &str = "\\begindata\nBODY399_GM = 398600.435436\nLIST += 'pck2'\n";
    const META: &str = "KPL/MK\n\\begindata\n\
        PATH_SYMBOLS = ( 'K' )\n\
        PATH_VALUES = ( 'sub' )\n\
        KERNELS_TO_LOAD = ( '$K/pck.tpc', 'ext+'\n  'ra.tpc' )\n\
        MISSION = 'demo'\n";

    #[test]
    fn furnsh_text_and_meta() -> Result<()> {
        let mut ctx = ctx_with(&[
            ("sub/pck.tpc", PCK),
            ("extra.tpc", EXTRA),
            ("demo.tm", META),
        ]);

        furnsh(&mut ctx, "demo.tm")?;
        assert!(!failed(&ctx));
        assert_eq!(ktotal(&mut ctx, "ALL")?, 3);
        assert_eq!(ktotal(&mut ctx, "TEXT")?, 2);
        assert_eq!(ktotal(&mut ctx, "META")?, 1);
        assert_eq!(ktotal(&mut ctx, "SPK, CK")?, 0);

        let first = kdata(&mut ctx, 0, "ALL")?.unwrap();
        assert_eq!(first.file, "demo.tm");
        assert_eq!(first.filtyp, "META");
        let child = kdata(&mut ctx, 0, "TEXT")?.unwrap();
        assert_eq!(child.file, "sub/pck.tpc");
        assert_eq!(child.source, "demo.tm");
        assert_eq!(child.handle, 0);
        assert_eq!(kdata(&mut ctx, 5, "ALL")?, None);

        assert_eq!(gdpool(&mut ctx, "BODY399_GM", 0, 1)?, Some(vec![398600.435436]));
        assert_eq!(gcpool(&mut ctx, "MISSION", 0, 1)?, Some(vec!["demo".to_owned()]));
        assert_eq!(gcpool(&mut ctx, "KERNELS_TO_LOAD", 0, 1)?, None);
        Ok(())
    }

    #[test]
    fn reload_moves_to_end() -> Result<()> {
        let mut ctx = ctx_with(&[("pck.tpc", PCK), ("extra.tpc", EXTRA)]);
        furnsh(&mut ctx, "pck.tpc")?;
        furnsh(&mut ctx, "extra.tpc")?;
        furnsh(&mut ctx, "pck.tpc")?;
        assert_eq!(kdata(&mut ctx, 1, "ALL")?.unwrap().file, "pck.tpc");

        // '+=' values are not duplicated by a reload
        furnsh(&mut ctx, "extra.tpc")?;
        assert_eq!(gcpool(&mut ctx, "LIST", 0, 10)?, Some(vec!["pck2".to_owned()]));
        assert_eq!(ktotal(&mut ctx, "ALL")?, 2);
        Ok(())
    }

    #[test]
    fn unload_rebuilds_pool() -> Result<()> {
        let mut ctx = ctx_with(&[("pck.tpc", PCK), ("extra.tpc", EXTRA)]);
        furnsh(&mut ctx, "pck.tpc")?;
        furnsh(&mut ctx, "extra.tpc")?;
        unload(&mut ctx, "extra.tpc")?;
        assert_eq!(gdpool(&mut ctx, "BODY399_GM", 0, 1)?, None);
        assert!(gdpool(&mut ctx, "BODY399_RADII", 0, 3)?.is_some());
        assert_eq!(kinfo(&mut ctx, "extra.tpc")?, None);
        assert_eq!(kinfo(&mut ctx, "pck.tpc")?.unwrap().filtyp, "TEXT");

        unload(&mut ctx, "never-loaded.tpc")?;
        assert!(!failed(&ctx));

        kclear(&mut ctx)?;
        assert_eq!(ktotal(&mut ctx, "ALL")?, 0);
        assert_eq!(gdpool(&mut ctx, "BODY399_RADII", 0, 3)?, None);
        Ok(())
    }

    #[test]
    fn unload_meta_drops_children() -> Result<()> {
        let mut ctx = ctx_with(&[
            ("sub/pck.tpc", PCK),
            ("extra.tpc", EXTRA),
            ("demo.tm", META),
        ]);
        furnsh(&mut ctx, "demo.tm")?;
        unload(&mut ctx, "demo.tm")?;
        assert_eq!(ktotal(&mut ctx, "ALL")?, 0);
        assert_eq!(gcpool(&mut ctx, "MISSION", 0, 1)?, None);
        Ok(())
    }

    #[test]
    fn load_errors() -> Result<()> {
        let mut ctx = ctx_with(&[
            ("de440.bsp", "DAF/SPK \0\0\0"),
            ("outer.tm", "KPL/MK\n\\begindata\nKERNELS_TO_LOAD = ( 'inner.tm' )\n"),
            ("inner.tm", "KPL/MK\n\\begindata\nKERNELS_TO_LOAD = ( 'x.tpc' )\n"),
            ("badsym.tm", "\\begindata\nKERNELS_TO_LOAD = ( '$NOPE/x.tpc' )\n"),
            (
                "mismatch.tm",
                "\\begindata\nPATH_SYMBOLS = ( 'A' 'B' )\nPATH_VALUES = ( 'a' )\nKERNELS_TO_LOAD = ( 'x' )\n",
            ),
        ]);

        for (file, short) in [
            ("  ", "SPICE(BLANKFILENAME)"),
            ("missing.tpc", "SPICE(NOSUCHFILE)"),
            ("de440.bsp", "SPICE(NOTSUPPORTED)"),
            ("outer.tm", "SPICE(RECURSIVELOADING)"),
            ("badsym.tm", "SPICE(NOSUCHSYMBOL)"),
            ("mismatch.tm", "SPICE(PATHMISMATCH)"),
        ] {
            furnsh(&mut ctx, file)?;
            assert_eq!(getsms(&mut ctx), short, "{file}");
            reset(&mut ctx);
        }
        Ok(())
    }

    #[test]
    fn failed_meta_load_leaves_nothing_behind() -> Result<()> {
        let mut ctx = ctx_with(&[
            ("pck.tpc", PCK),
            ("extra.tpc", EXTRA),
            (
                "badsym.tm",
                "\\begindata\nKERNELS_TO_LOAD = ( 'extra.tpc' '$NOPE/x.tpc' )\nMISSION = 'bad'\n",
            ),
            (
                "mismatch.tm",
                "\\begindata\nPATH_SYMBOLS = ( 'A' 'B' )\nPATH_VALUES = ( 'a' )\nKERNELS_TO_LOAD = ( 'x' )\n",
            ),
            ("partial.tm", "KPL/MK\n\\begindata\nKERNELS_TO_LOAD = ( 'extra.tpc' 'gone.tpc' )\n"),
        ]);
        furnsh(&mut ctx, "pck.tpc")?;
        pool::pdpool(&mut ctx, "DIRECT", &[1.0])?;

        for (file, short) in [
            ("badsym.tm", "SPICE(NOSUCHSYMBOL)"),
            ("mismatch.tm", "SPICE(PATHMISMATCH)"),
            ("partial.tm", "SPICE(NOSUCHFILE)"),
        ] {
            furnsh(&mut ctx, file)?;
            assert_eq!(getsms(&mut ctx), short, "{file}");
            reset(&mut ctx);

            assert_eq!(ktotal(&mut ctx, "ALL")?, 1, "{file}");
            assert_eq!(kinfo(&mut ctx, file)?, None);
            assert_eq!(kinfo(&mut ctx, "extra.tpc")?, None);
            assert_eq!(gdpool(&mut ctx, "BODY399_GM", 0, 1)?, None);
            assert_eq!(gcpool(&mut ctx, "MISSION", 0, 1)?, None);
            assert_eq!(gcpool(&mut ctx, "KERNELS_TO_LOAD", 0, 1)?, None);
            assert_eq!(gcpool(&mut ctx, "PATH_SYMBOLS", 0, 1)?, None);
            assert_eq!(gdpool(&mut ctx, "DIRECT", 0, 1)?, Some(vec![1.0]));
            assert!(gdpool(&mut ctx, "BODY399_RADII", 0, 3)?.is_some());
        }
        Ok(())
    }

    #[test]
    fn failed_reload_keeps_previous_copy() -> Result<()> {
        let mut ctx = ctx_with(&[("pck.tpc", PCK)]);
        furnsh(&mut ctx, "pck.tpc")?;
        ctx.append_file(std::path::Path::new("/k/pck.tpc"), b"BROKEN 1\n")?;
        furnsh(&mut ctx, "pck.tpc")?;
        assert_eq!(getsms(&mut ctx), "SPICE(BADVARASSIGN)");
        reset(&mut ctx);
        assert_eq!(ktotal(&mut ctx, "ALL")?, 1);
        assert!(gdpool(&mut ctx, "BODY399_RADII", 0, 3)?.is_some());
        Ok(())
    }

    #[test]
    fn continued_values() {
        assert_eq!(
            join_continued(vec!["a+".into(), "b+".into(), "c".into(), "d".into()]),
            vec!["abc", "d"]
        );
        let symbols = vec![("KERNELS".to_owned(), "/data/k".to_owned())];
        assert_eq!(substitute("$KERNELS/lsk/naif.tls", &symbols), Ok("/data/k/lsk/naif.tls".to_owned()));
        assert_eq!(substitute("$OTHER/x", &symbols), Err("OTHER".to_owned()));
    }
}
