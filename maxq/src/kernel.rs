//! Kernel loading, relative to the context's content root.

use std::path::Path;

use maxq_spicelib::{errhnd, keeper};
use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, KernelType, Result, SpiceContext, forward};

/// Description of a loaded kernel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KernelInfo {
    pub file: String,
    /// `TEXT` or `META`
    pub file_type: String,
    /// The meta-kernel that loaded this file, or empty
    pub source: String,
    pub handle: i32,
}

impl From<keeper::KernelData> for KernelInfo {
    fn from(d: keeper::KernelData) -> Self {
        Self {
            file: d.file,
            file_type: d.filtyp,
            source: d.source,
            handle: d.handle,
        }
    }
}

/// List the files under `relative_directory` (searched recursively), as
/// paths relative to the content root with `/` separators, sorted.
///
/// With `error_if_none`, an empty or missing directory is a
/// `SPICE(NOSUCHFILE)` error.
pub fn enumerate_kernels(
    ctx: &mut SpiceContext,
    relative_directory: &str,
    error_if_none: bool,
) -> Result<Vec<String>> {
    ctx.call(|raw| {
        let root = raw.resolve_path(".");
        let dir = raw.resolve_path(relative_directory);

        let mut files: Vec<String> = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                let parts: Option<Vec<&str>> =
                    path.components().map(|c| c.as_os_str().to_str()).collect();
                parts.map(|p| p.join("/"))
            })
            .collect();
        files.sort();
        debug!(dir = %dir.display(), count = files.len(), "enumerated kernels");

        if files.is_empty() && error_if_none {
            errhnd::chkin(raw, "ENUMERATE_KERNELS")?;
            errhnd::setmsg(raw, "No files were found in the directory '#'.");
            errhnd::errch(raw, "#", relative_directory);
            errhnd::sigerr(raw, "SPICE(NOSUCHFILE)")?;
            errhnd::chkout(raw, "ENUMERATE_KERNELS")?;
        }
        Ok(files)
    })
}

forward! {
    /// Load a kernel, relative to the content root. Loading a file again
    /// moves it to the end of the load order.
    fn furnsh(file: &str) -> () => keeper::furnsh;

    /// Unload a kernel, with any files it loaded as a meta-kernel
    fn unload(file: &str) -> () => keeper::unload;
}

/// Load each file in order, stopping at the first failure
pub fn furnsh_list<S: AsRef<str>>(ctx: &mut SpiceContext, files: &[S]) -> Result<()> {
    for file in files {
        furnsh(ctx, file.as_ref())?;
    }
    Ok(())
}

/// Load a kernel by absolute path, bypassing the content root
pub fn furnsh_absolute(ctx: &mut SpiceContext, path: &Path) -> Result<()> {
    let Some(name) = path.to_str() else {
        return Err(Error::InternalError(maxq_std::Error::NonUnicodePath));
    };
    if !path.is_absolute() {
        return ctx.call(|raw| {
            errhnd::chkin(raw, "FURNSH_ABSOLUTE")?;
            errhnd::setmsg(raw, "The path '#' is not absolute.");
            errhnd::errch(raw, "#", name);
            errhnd::sigerr(raw, "SPICE(NOSUCHFILE)")?;
            errhnd::chkout(raw, "FURNSH_ABSOLUTE")
        });
    }
    furnsh(ctx, name)
}

/// Join each relative path onto `base_path`
pub fn combine_paths<S: AsRef<str>>(base_path: &str, relative_paths: &[S]) -> Vec<String> {
    let base = base_path.trim_end_matches(['/', '\\']);
    relative_paths
        .iter()
        .map(|rel| {
            let rel = rel.as_ref().trim_start_matches(['/', '\\']);
            if base.is_empty() {
                rel.to_owned()
            } else {
                format!("{base}/{rel}")
            }
        })
        .collect()
}

/// Unload every kernel and clear the kernel pool
pub fn clear_all(ctx: &mut SpiceContext) -> Result<()> {
    ctx.call(keeper::kclear)
}

/// Return the toolkit to its initial state: no kernels, no pool variables,
/// no body name overrides, and the configured error settings
pub fn init_all(ctx: &mut SpiceContext) -> Result<()> {
    debug!("reinitializing toolkit state");
    ctx.reinitialize()
}

/// Number of loaded kernels of the given kinds
pub fn ktotal(ctx: &mut SpiceContext, kind: KernelType) -> Result<usize> {
    let kind = kind.to_list();
    ctx.call(|raw| keeper::ktotal(raw, &kind))
}

/// The `which`-th (0-based) loaded kernel of the given kinds
pub fn kdata(ctx: &mut SpiceContext, which: usize, kind: KernelType) -> Result<Option<KernelInfo>> {
    let kind = kind.to_list();
    let data = ctx.call(|raw| keeper::kdata(raw, which, &kind))?;
    Ok(data.map(KernelInfo::from))
}

/// Information about a loaded kernel, by the name it was loaded with
pub fn kinfo(ctx: &mut SpiceContext, file: &str) -> Result<Option<KernelInfo>> {
    Ok(ctx.call(|raw| keeper::kinfo(raw, file))?.map(KernelInfo::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(
            combine_paths("kernels/", &["a.tls", "/sub/b.tpc"]),
            vec!["kernels/a.tls".to_owned(), "kernels/sub/b.tpc".to_owned()]
        );
        assert_eq!(combine_paths("", &["a.tls"]), vec!["a.tls".to_owned()]);
        assert!(combine_paths::<&str>("kernels", &[]).is_empty());
    }
}
