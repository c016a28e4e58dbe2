//! Error action, output device and report items of the toolkit's error
//! subsystem.

use maxq_spicelib::errhnd;

use crate::{
    Error, ErrorAction, ErrorDevice, ErrorItems, Outcome, Result, ResultCode, SpiceContext,
};

pub fn get_erract(ctx: &mut SpiceContext) -> Result<ErrorAction> {
    let mut action = String::new();
    ctx.call(|raw| errhnd::erract(raw, "GET", &mut action))?;
    Ok(ErrorAction::parse(&action).unwrap_or_default())
}

/// Set the action taken when a toolkit routine signals an error.
///
/// Whatever the action, errors are still translated at the API boundary;
/// `ABORT` and `DEFAULT` terminate only the current call. `IGNORE` suppresses
/// errors entirely, so failed calls return `Ok` with neutral values.
pub fn set_erract(ctx: &mut SpiceContext, action: ErrorAction) -> Result<()> {
    let mut name = action.name().to_owned();
    ctx.call(|raw| errhnd::erract(raw, "SET", &mut name))
}

pub fn get_errdev(ctx: &mut SpiceContext) -> Result<ErrorDevice> {
    let mut device = String::new();
    ctx.call(|raw| errhnd::errdev(raw, "GET", &mut device))?;
    Ok(ErrorDevice::parse(&device))
}

/// Set where error reports are written. File names are resolved against the
/// content root.
pub fn set_errdev(ctx: &mut SpiceContext, device: &ErrorDevice) -> Result<()> {
    let mut name = device.name().to_owned();
    ctx.call(|raw| errhnd::errdev(raw, "SET", &mut name))
}

pub fn get_errprt(ctx: &mut SpiceContext) -> Result<ErrorItems> {
    let mut list = String::new();
    ctx.call(|raw| errhnd::errprt(raw, "GET", &mut list))?;
    Ok(ErrorItems::from_list(&list))
}

/// Select exactly `items` for error reports; an empty set disables reports
pub fn set_errprt(ctx: &mut SpiceContext, items: ErrorItems) -> Result<()> {
    let mut list = if items.is_empty() {
        "NONE".to_owned()
    } else {
        format!("NONE, {}", items.to_list())
    };
    ctx.call(|raw| errhnd::errprt(raw, "SET", &mut list))
}

/// Discard any pending error and the traceback
pub fn reset(ctx: &mut SpiceContext) {
    let raw = ctx.raw_context();
    errhnd::reset(raw);
    errhnd::trcclr(raw);
}

/// Signal `short` (e.g. `SPICE(VALUEOUTOFRANGE)`) with the long message
/// `message`, and return it translated like any other toolkit error
pub fn raise_spice_error(ctx: &mut SpiceContext, message: &str, short: &str) -> Result<()> {
    ctx.call(|raw| errhnd::signal(raw, "RAISE_SPICE_ERROR", short, message))
}

/// The outcome implied by the toolkit's error state as it stands, for code
/// that called routines through [`SpiceContext::raw_context`]. A pending
/// error is reported and then cleared.
pub fn get_implied_result(ctx: &mut SpiceContext) -> Outcome {
    let raw = ctx.raw_context();
    if !errhnd::failed(raw) {
        return Outcome::default();
    }
    let short = errhnd::getsms(raw);
    let long = errhnd::getlms(raw);
    errhnd::reset(raw);
    errhnd::trcclr(raw);
    Outcome {
        code: ResultCode::Error,
        message: Error::from_short(&short, &long).message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let mut ctx = SpiceContext::new();
        assert_eq!(get_erract(&mut ctx).unwrap(), ErrorAction::Return);
        assert_eq!(get_errprt(&mut ctx).unwrap(), ErrorItems::empty());
        assert_eq!(get_errdev(&mut ctx).unwrap(), ErrorDevice::Screen);

        set_erract(&mut ctx, ErrorAction::Report).unwrap();
        assert_eq!(get_erract(&mut ctx).unwrap(), ErrorAction::Report);

        set_errprt(&mut ctx, ErrorItems::SHORT | ErrorItems::LONG).unwrap();
        assert_eq!(get_errprt(&mut ctx).unwrap(), ErrorItems::SHORT | ErrorItems::LONG);

        set_errdev(&mut ctx, &ErrorDevice::Null).unwrap();
        assert_eq!(get_errdev(&mut ctx).unwrap(), ErrorDevice::Null);
    }

    #[test]
    fn raised_errors() {
        let mut ctx = SpiceContext::new();
        let err = raise_spice_error(&mut ctx, "This is a test error.", "SPICE(VALUEOUTOFRANGE)")
            .unwrap_err();
        assert!(matches!(&err, Error::VALUEOUTOFRANGE(long) if long == "This is a test error."));

        let err = raise_spice_error(&mut ctx, "custom", "SPICE(SOMETHINGELSE)").unwrap_err();
        assert_eq!(err.short(), "SPICE(SOMETHINGELSE)");
    }

    #[test]
    fn implied_result() {
        let mut ctx = SpiceContext::new();
        assert_eq!(get_implied_result(&mut ctx), Outcome::default());

        errhnd::signal(ctx.raw_context(), "TEST", "SPICE(ZEROVECTOR)", "zero").unwrap();
        let outcome = get_implied_result(&mut ctx);
        assert_eq!(outcome.code, ResultCode::Error);
        assert_eq!(outcome.message, "SPICE(ZEROVECTOR): zero");
        assert_eq!(get_implied_result(&mut ctx), Outcome::default());

        errhnd::signal(ctx.raw_context(), "TEST", "SPICE(ZEROVECTOR)", "zero").unwrap();
        reset(&mut ctx);
        assert_eq!(get_implied_result(&mut ctx), Outcome::default());
    }
}
