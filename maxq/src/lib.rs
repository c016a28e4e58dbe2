//! Typed, error-translating API over the MaxQ SPICE toolkit.
//!
//! The toolkit in [`maxq_spicelib`] reports failures the way SPICE always has:
//! a failing routine records a short message such as `SPICE(NOSUCHFILE)` and a
//! long message in a global error state, then returns. This crate wraps every
//! toolkit call so that state never escapes.
//!
//! ## `SpiceContext`
//!
//! All toolkit state (the kernel pool, loaded kernels, body names, the error
//! state) lives in a [`SpiceContext`]. Any function that touches that state
//! takes the context as its first argument. Pure geometry takes no context.
//!
//! A context is not `Send`. Threads that want to work in parallel each create
//! their own context and load the kernels they need.
//!
//! ## Error handling
//!
//! Every fallible function returns [`Result`]. Before the toolkit routine
//! runs, any stale error state is cleared; afterwards, if the routine failed,
//! its short and long messages are captured into the corresponding
//! [`Error`] variant and the toolkit state is reset. The next call starts
//! clean, whether or not you handled the error:
//!
//! ```
//! use maxq::*;
//! let mut ctx = SpiceContext::new();
//! assert!(matches!(furnsh(&mut ctx, "no/such/file.tls"), Err(Error::NOSUCHFILE(..))));
//! // The same context keeps working after an error
//! assert_eq!(convrt(&mut ctx, 1.0, Units::Kilometers, Units::Meters).unwrap(), 1000.0);
//! ```
//!
//! Hosts that want a result code and message instead of a `Result` can build
//! an [`Outcome`] from any result:
//!
//! ```
//! use maxq::*;
//! let mut ctx = SpiceContext::new();
//! let outcome = Outcome::from(&gdpool_scalar(&mut ctx, "NO_SUCH_VARIABLE"));
//! assert_eq!(outcome.code, ResultCode::Error);
//! assert!(outcome.message.starts_with("SPICE(KERNELVARNOTFOUND)"));
//! ```
//!
//! ## Units
//!
//! Parameters and results carry their units in their types ([`Distance`],
//! [`Angle`], [`EphemerisTime`], ...). Every type's `Default` is zero.
//!
//! Vectors convert to and from `[f64; 3]`, which makes `nalgebra` interop
//! straightforward:
//!
//! ```
//! use maxq::*;
//! use approx::assert_relative_eq;
//! use nalgebra as na;
//! let v = na::Vector3::new(1.0, 2.0, 3.0);
//! let r = vrotv(DimensionlessVector::from(<[f64; 3]>::from(v)), DimensionlessVector::Z_AXIS, Angle::from_degrees(90.0));
//! assert_relative_eq!(na::Vector3::from(r.to_array()), na::Vector3::new(-2.0, 1.0, 3.0), epsilon = 1e-15);
//! ```

use maxq_spicelib::errhnd;
use maxq_std::files::FsFileManager;
use tracing::debug;

/// Defines wrappers that forward their arguments unchanged to a toolkit
/// routine through [`SpiceContext::call`].
macro_rules! forward {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty => $routine:path;
    )*) => {$(
        $(#[$meta])*
        pub fn $name(ctx: &mut SpiceContext, $($arg: $ty),*) -> Result<$ret> {
            ctx.call(|raw| $routine(raw, $($arg),*))
        }
    )*};
}
pub(crate) use forward;

mod bodies;
mod config;
mod error_control;
mod errors;
mod geometry;
mod kernel;
mod math;
mod pool;
mod time;
mod types;

pub use bodies::*;
pub use config::*;
pub use error_control::*;
pub use errors::*;
pub use geometry::*;
pub use kernel::*;
pub use math::*;
pub use pool::*;
pub use time::*;
pub use types::*;

pub struct SpiceContext<'a> {
    ctx: maxq_std::Context<'a>,
    config: SpiceConfig,
}

impl<'a> SpiceContext<'a> {
    /// A context with the default [`SpiceConfig`]
    pub fn new() -> Self {
        match Self::with_config(SpiceConfig::default()) {
            Ok(ctx) => ctx,
            // The default settings are valid names for every routine
            Err(err) => unreachable!("default configuration rejected: {err}"),
        }
    }

    /// A context with the given content root and error settings. Fails if the
    /// toolkit rejects the error settings, e.g. a blank device name.
    pub fn with_config(config: SpiceConfig) -> Result<Self> {
        let ctx = maxq_std::Context::with_file_manager(FsFileManager::with_root(
            config.content_root.clone(),
        ));
        let mut spice = Self { ctx, config };
        spice.apply_config()?;
        Ok(spice)
    }

    fn apply_config(&mut self) -> Result<()> {
        // Set the action first, so a rejected device name returns instead of
        // terminating
        let SpiceConfig {
            error_action,
            error_output,
            error_device,
            ..
        } = self.config.clone();
        set_erract(self, error_action)?;
        set_errprt(self, error_output)?;
        set_errdev(self, &error_device)?;
        Ok(())
    }

    pub fn config(&self) -> &SpiceConfig {
        &self.config
    }

    /// Direct access to the toolkit state. Errors signalled through this
    /// context stay pending until the next [`call`](Self::call) or
    /// [`reset`].
    pub fn raw_context(&mut self) -> &mut maxq_std::Context<'a> {
        &mut self.ctx
    }

    /// Run a toolkit routine with error translation.
    ///
    /// Pending errors are cleared before `f` runs. If the routine leaves an
    /// error pending (including when the `ABORT` action terminated it), the
    /// error is captured, the toolkit state is reset, and the error is
    /// returned.
    pub fn call<T>(
        &mut self,
        f: impl FnOnce(&mut maxq_std::Context<'a>) -> maxq_std::Result<T>,
    ) -> Result<T> {
        errhnd::reset(&mut self.ctx);
        errhnd::trcclr(&mut self.ctx);

        let ret = f(&mut self.ctx);
        self.handle_errors()?;
        Ok(ret?)
    }

    fn handle_errors(&mut self) -> Result<()> {
        if errhnd::failed(&self.ctx) {
            let short = errhnd::getsms(&mut self.ctx);
            let long = errhnd::getlms(&mut self.ctx);

            // Reset error state, so the next call is unaffected
            errhnd::reset(&mut self.ctx);
            errhnd::trcclr(&mut self.ctx);

            debug!(short, long, "toolkit error translated");
            Err(Error::from_short(&short, &long))
        } else {
            Ok(())
        }
    }

    /// Drop all toolkit state and apply the configuration again
    pub(crate) fn reinitialize(&mut self) -> Result<()> {
        self.ctx.clear_vars();
        self.apply_config()
    }
}

impl Default for SpiceContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}
