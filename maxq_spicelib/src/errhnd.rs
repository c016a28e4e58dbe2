//! The toolkit's error subsystem.
//!
//! Errors are not returned from routines. A failing routine records a short
//! message (`SPICE(NAME)`), a long message and a frozen traceback in the context,
//! and sets the failed flag. What happens next depends on the error action:
//!
//! * `RETURN`: routines that find an error pending return immediately, so the
//!   first error survives until somebody calls [`reset`].
//! * `REPORT`: the error is recorded and printed, execution continues.
//! * `IGNORE`: nothing is recorded.
//! * `ABORT` / `DEFAULT`: the error is printed and the routine returns
//!   [`maxq_std::Error::Terminated`].

use maxq_std::{Context, Result, SaveInit, text};
use tracing::debug;

/// Maximum length of a short error message
pub const SMSGLN: usize = 25;
/// Maximum length of a long error message
pub const LMSGLN: usize = 1840;
/// Maximum traceback depth
pub const MAXMOD: usize = 100;

pub const TOOLKIT_VERSION: &str = concat!("MAXQ ", env!("CARGO_PKG_VERSION"));

const BORDER: &str =
    "================================================================================";

const DEFAULT_MESSAGE: &str = "Oh, by the way:  The SPICELIB error handling actions are \
USER-TAILORABLE.  You can choose whether the Toolkit aborts or continues when errors occur, \
which error messages to output, and where to send the output.  Please read the ERROR \
\"Required Reading\" file, or see the routines ERRACT, ERRDEV, and ERRPRT.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Abort,
    Report,
    Return,
    Ignore,
    Default,
}

impl Action {
    fn parse(s: &str) -> Option<Self> {
        match text::normalize_name(s).as_str() {
            "ABORT" => Some(Action::Abort),
            "REPORT" => Some(Action::Report),
            "RETURN" => Some(Action::Return),
            "IGNORE" => Some(Action::Ignore),
            "DEFAULT" => Some(Action::Default),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Action::Abort => "ABORT",
            Action::Report => "REPORT",
            Action::Return => "RETURN",
            Action::Ignore => "IGNORE",
            Action::Default => "DEFAULT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PrintItems {
    short: bool,
    long: bool,
    explain: bool,
    traceback: bool,
    default: bool,
}

impl PrintItems {
    const ALL: Self = Self {
        short: true,
        long: true,
        explain: true,
        traceback: true,
        default: true,
    };

    const NONE: Self = Self {
        short: false,
        long: false,
        explain: false,
        traceback: false,
        default: false,
    };

    fn any(&self) -> bool {
        *self != Self::NONE
    }
}

struct SaveVars {
    action: Action,
    device: String,
    items: PrintItems,
    short: String,
    long: String,
    modules: Vec<String>,
    frozen: Vec<String>,
}

impl SaveInit for SaveVars {
    fn new() -> Self {
        Self {
            action: Action::Default,
            device: "SCREEN".to_owned(),
            items: PrintItems::ALL,
            short: String::new(),
            long: String::new(),
            modules: Vec::new(),
            frozen: Vec::new(),
        }
    }
}

/// True if an error is pending
pub fn failed(ctx: &Context) -> bool {
    ctx.get_spice_failed()
}

/// True if the calling routine should return immediately, because an error is
/// pending and the error action is `RETURN`
pub fn r#return(ctx: &mut Context) -> bool {
    if !ctx.get_spice_failed() {
        return false;
    }
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().action == Action::Return
}

/// Whether message routines may still modify the stored messages
fn accepting(ctx: &mut Context) -> bool {
    !r#return(ctx)
}

/// Clear the pending error
pub fn reset(ctx: &mut Context) {
    let vars = ctx.get_vars::<SaveVars>();
    let mut vars = vars.borrow_mut();
    vars.short.clear();
    vars.long.clear();
    vars.frozen.clear();
    drop(vars);
    ctx.set_spice_failed(false);
}

/// Discard the active traceback. Only meaningful when no toolkit routine is
/// executing, e.g. at an API boundary after a routine was terminated.
pub fn trcclr(ctx: &mut Context) {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().modules.clear();
}

pub fn setmsg(ctx: &mut Context, msg: &str) {
    if !accepting(ctx) {
        return;
    }
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow_mut().long = text::truncate(msg, LMSGLN).to_owned();
}

/// Replace the first occurrence of `marker` in the long message with `value`
pub fn errch(ctx: &mut Context, marker: &str, value: &str) {
    if !accepting(ctx) || marker.is_empty() {
        return;
    }
    let vars = ctx.get_vars::<SaveVars>();
    let mut vars = vars.borrow_mut();
    if let Some(pos) = vars.long.find(marker) {
        vars.long.replace_range(pos..pos + marker.len(), value);
        let long = text::truncate(&vars.long, LMSGLN).to_owned();
        vars.long = long;
    }
}

pub fn errint(ctx: &mut Context, marker: &str, value: i64) {
    errch(ctx, marker, &value.to_string());
}

pub fn errdp(ctx: &mut Context, marker: &str, value: f64) {
    errch(ctx, marker, &dp_string(value));
}

/// Scientific notation with 14 significant digits, e.g. `1.0000000000000E+00`
pub fn dp_string(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let s = format!("{value:.13E}");
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}E{sign}{:02}", exp.abs())
        }
        None => s,
    }
}

/// Signal an error, identified by its short message
pub fn sigerr(ctx: &mut Context, short: &str) -> Result<()> {
    let failed = ctx.get_spice_failed();
    let vars = ctx.get_vars::<SaveVars>();
    let mut v = vars.borrow_mut();

    if v.action == Action::Ignore {
        return Ok(());
    }
    if failed && v.action == Action::Return {
        return Ok(());
    }

    v.short = text::truncate(short.trim(), SMSGLN).to_owned();
    v.frozen = v.modules.clone();
    let action = v.action;
    let report = if v.items.any() {
        Some((format_report(&v), v.device.clone()))
    } else {
        None
    };
    drop(v);

    debug!(short, action = action.name(), "toolkit error signalled");
    ctx.set_spice_failed(true);

    if let Some((report, device)) = report {
        write_report(ctx, &device, &report);
    }

    match action {
        Action::Abort | Action::Default => ctx.exit(1),
        _ => Ok(()),
    }
}

fn format_report(v: &SaveVars) -> String {
    let items = v.items;
    let mut out = String::new();
    out.push_str(BORDER);
    out.push_str("\n\n");
    if items.default {
        out.push_str(&format!("Toolkit version: {TOOLKIT_VERSION}\n\n"));
    }
    if items.short {
        out.push_str(&v.short);
        out.push_str(" --");
        if items.explain {
            let explain = expln(&v.short);
            if !explain.is_empty() {
                out.push(' ');
                out.push_str(explain);
            }
        }
        out.push_str("\n\n");
    }
    if items.long && !v.long.is_empty() {
        out.push_str(&v.long);
        out.push_str("\n\n");
    }
    if items.traceback && !v.frozen.is_empty() {
        out.push_str("A traceback follows.  The name of the highest level module is first.\n");
        out.push_str(&v.frozen.join(" --> "));
        out.push_str("\n\n");
    }
    if items.default {
        out.push_str(DEFAULT_MESSAGE);
        out.push_str("\n\n");
    }
    out.push_str(BORDER);
    out.push('\n');
    out
}

fn write_report(ctx: &mut Context, device: &str, report: &str) {
    let res = match text::normalize_name(device).as_str() {
        "NULL" => Ok(()),
        "SCREEN" => ctx.write_stdout(report.as_bytes()),
        _ => {
            let path = ctx.resolve_path(device);
            ctx.append_file(&path, report.as_bytes())
        }
    };
    // Reporting is best-effort; the error itself is still recorded
    if let Err(err) = res {
        debug!(device, %err, "failed to write error report");
    }
}

pub fn getsms(ctx: &mut Context) -> String {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().short.clone()
}

pub fn getlms(ctx: &mut Context) -> String {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().long.clone()
}

/// Retrieve the `SHORT`, `LONG` or `EXPLAIN` message of the pending error
pub fn getmsg(ctx: &mut Context, option: &str) -> Result<String> {
    match text::normalize_name(option).as_str() {
        "SHORT" => Ok(getsms(ctx)),
        "LONG" => Ok(getlms(ctx)),
        "EXPLAIN" => Ok(expln(&getsms(ctx)).to_owned()),
        _ => {
            chkin(ctx, "GETMSG")?;
            setmsg(ctx, "Option # is not recognized.");
            errch(ctx, "#", option);
            sigerr(ctx, "SPICE(INVALIDMSGTYPE)")?;
            chkout(ctx, "GETMSG")?;
            Ok(String::new())
        }
    }
}

/// Check in a module to the traceback
pub fn chkin(ctx: &mut Context, module: &str) -> Result<()> {
    if text::is_blank(module) {
        setmsg(ctx, "A blank string was supplied as a module name.");
        return sigerr(ctx, "SPICE(BLANKMODULENAME)");
    }

    let vars = ctx.get_vars::<SaveVars>();
    let depth = {
        let mut v = vars.borrow_mut();
        v.modules.push(module.trim().to_owned());
        v.modules.len()
    };

    if depth > MAXMOD {
        setmsg(ctx, "The traceback depth exceeded #.");
        errint(ctx, "#", MAXMOD as i64);
        sigerr(ctx, "SPICE(TRACEBACKOVERFLOW)")?;
    }
    Ok(())
}

/// Check out a module; it must be the module most recently checked in
pub fn chkout(ctx: &mut Context, module: &str) -> Result<()> {
    let vars = ctx.get_vars::<SaveVars>();
    let top = vars.borrow_mut().modules.pop();
    match top {
        Some(top) if text::eq_names(&top, module) => Ok(()),
        Some(top) => {
            setmsg(
                ctx,
                "Checking out module # does not match the last module checked in, #.",
            );
            errch(ctx, "#", module);
            errch(ctx, "#", &top);
            sigerr(ctx, "SPICE(NAMESDONOTMATCH)")
        }
        None => Ok(()),
    }
}

/// Check in `module`, signal `short` with the long message `msg`, check out.
/// This keeps the traceback accurate for routines that only check in on error.
pub fn signal(ctx: &mut Context, module: &str, short: &str, msg: &str) -> Result<()> {
    chkin(ctx, module)?;
    setmsg(ctx, msg);
    sigerr(ctx, short)?;
    chkout(ctx, module)
}

/// Current traceback depth
pub fn trcdep(ctx: &mut Context) -> usize {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().modules.len()
}

/// Name of the module at `index` (0 is the highest level)
pub fn trcnam(ctx: &mut Context, index: usize) -> Option<String> {
    let vars = ctx.get_vars::<SaveVars>();
    vars.borrow().modules.get(index).cloned()
}

/// The traceback as `A --> B --> C`. Frozen at the moment of the error while an
/// error is pending.
pub fn qcktrc(ctx: &mut Context) -> String {
    let failed = ctx.get_spice_failed();
    let vars = ctx.get_vars::<SaveVars>();
    let v = vars.borrow();
    if failed {
        v.frozen.join(" --> ")
    } else {
        v.modules.join(" --> ")
    }
}

fn invalid_operation(ctx: &mut Context, module: &str, op: &str) -> Result<()> {
    chkin(ctx, module)?;
    setmsg(ctx, "The operation, #, is not recognized. It must be GET or SET.");
    errch(ctx, "#", op);
    sigerr(ctx, "SPICE(INVALIDOPERATION)")?;
    chkout(ctx, module)
}

/// Get or set the error action
pub fn erract(ctx: &mut Context, op: &str, action: &mut String) -> Result<()> {
    let vars = ctx.get_vars::<SaveVars>();
    match text::normalize_name(op).as_str() {
        "GET" => {
            *action = vars.borrow().action.name().to_owned();
            Ok(())
        }
        "SET" => match Action::parse(action) {
            Some(a) => {
                vars.borrow_mut().action = a;
                Ok(())
            }
            None => {
                chkin(ctx, "ERRACT")?;
                setmsg(ctx, "The action, #, is not recognized.");
                errch(ctx, "#", action);
                sigerr(ctx, "SPICE(INVALIDACTION)")?;
                chkout(ctx, "ERRACT")
            }
        },
        _ => invalid_operation(ctx, "ERRACT", op),
    }
}

/// Get or set the error output device: `SCREEN`, `NULL`, or a file name
pub fn errdev(ctx: &mut Context, op: &str, device: &mut String) -> Result<()> {
    let vars = ctx.get_vars::<SaveVars>();
    match text::normalize_name(op).as_str() {
        "GET" => {
            *device = vars.borrow().device.clone();
            Ok(())
        }
        "SET" => {
            if text::is_blank(device) {
                return signal(
                    ctx,
                    "ERRDEV",
                    "SPICE(BLANKFILENAME)",
                    "The error device name is blank.",
                );
            }
            let name = match text::normalize_name(device).as_str() {
                d @ ("SCREEN" | "NULL") => d.to_owned(),
                _ => device.trim().to_owned(),
            };
            vars.borrow_mut().device = name;
            Ok(())
        }
        _ => invalid_operation(ctx, "ERRDEV", op),
    }
}

/// Get or set which parts of an error report are output. On `SET`, `list`
/// is a comma or blank separated list of `SHORT LONG EXPLAIN TRACEBACK
/// DEFAULT ALL NONE`, each optionally prefixed with `NO`.
pub fn errprt(ctx: &mut Context, op: &str, list: &mut String) -> Result<()> {
    let vars = ctx.get_vars::<SaveVars>();
    match text::normalize_name(op).as_str() {
        "GET" => {
            let items = vars.borrow().items;
            let mut names = vec![];
            for (on, name) in [
                (items.short, "SHORT"),
                (items.long, "LONG"),
                (items.explain, "EXPLAIN"),
                (items.traceback, "TRACEBACK"),
                (items.default, "DEFAULT"),
            ] {
                if on {
                    names.push(name);
                }
            }
            *list = if names.is_empty() {
                "NONE".to_owned()
            } else {
                names.join(", ")
            };
            Ok(())
        }
        "SET" => {
            let mut items = vars.borrow().items;
            for word in list
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|w| !w.is_empty())
            {
                let word = word.to_ascii_uppercase();
                let (on, name) = match word.strip_prefix("NO") {
                    Some(rest) if !rest.is_empty() && word != "NONE" => (false, rest.to_owned()),
                    _ => (true, word.clone()),
                };
                match (name.as_str(), on) {
                    ("ALL", true) => items = PrintItems::ALL,
                    ("NONE", true) => items = PrintItems::NONE,
                    ("SHORT", _) => items.short = on,
                    ("LONG", _) => items.long = on,
                    ("EXPLAIN", _) => items.explain = on,
                    ("TRACEBACK", _) => items.traceback = on,
                    ("DEFAULT", _) => items.default = on,
                    _ => {
                        chkin(ctx, "ERRPRT")?;
                        setmsg(ctx, "The list item, #, is not recognized.");
                        errch(ctx, "#", &word);
                        sigerr(ctx, "SPICE(INVALIDLISTITEM)")?;
                        return chkout(ctx, "ERRPRT");
                    }
                }
            }
            vars.borrow_mut().items = items;
            Ok(())
        }
        _ => invalid_operation(ctx, "ERRPRT", op),
    }
}

/// One-line explanation of a short error message
pub fn expln(short: &str) -> &'static str {
    let name = short
        .trim()
        .strip_prefix("SPICE(")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or("");
    match name {
        "ARRAYTOOSMALL" => "The Output Array Is Too Small",
        "BADARRAYSIZE" => "The Array Size Supplied Is Invalid",
        "BADAXISLENGTH" => "An Ellipsoid Axis Length Is Not Positive",
        "BADAXISNUMBERS" => "Rotation Axis Numbers Are Invalid",
        "BADINDEX" => "An Invalid Axis Index Was Supplied",
        "BADTIMESPEC" => "A Time Specification in a Kernel Could Not Be Parsed",
        "BADTIMETYPE" => "The Time System Was Not Recognized",
        "BADVARASSIGN" => "A Kernel Variable Assignment Could Not Be Parsed",
        "BADVARIABLESIZE" => "A Kernel Variable Has the Wrong Number of Values",
        "BADVARNAME" => "The Kernel Variable Name Is Invalid",
        "BLANKFILENAME" => "A Blank String Was Supplied as a File Name",
        "BLANKMODULENAME" => "A blank string was used as a module name",
        "BLANKNAMEASSIGNED" => "A Blank String Cannot Be Assigned as a Body Name",
        "DEGENERATECASE" => "The Inputs Describe a Degenerate Case",
        "DEPENDENTVECTORS" => "The Input Vectors Are Linearly Dependent",
        "DIVIDEBYZERO" => "A Division by Zero Would Occur",
        "EMPTYSTRING" => "An Empty String Was Supplied Where a Value Is Required",
        "FILEREADFAILED" => "An Attempt to Read a File Failed",
        "INCOMPATIBLEUNITS" => "The Input and Output Units are Incompatible",
        "INTOUTOFRANGE" => "A Value Is Outside the Range of Integers",
        "INVALIDACTION" => "An Invalid Action Value Was Supplied",
        "INVALIDEPOCH" => "An Invalid Epoch Type Specification Was Supplied",
        "INVALIDLISTITEM" => "An Invalid Item Was Found in a List",
        "INVALIDMSGTYPE" => "An Invalid Error Message Type Was Specified",
        "INVALIDOPERATION" => "An Invalid Operation Value Was Supplied",
        "INVALIDTIMEFORMAT" => "Specification of Time String Format Was Not Recognized",
        "KERNELVARNOTFOUND" => "The Variable Was not Found in the Kernel Pool.",
        "NAMESDONOTMATCH" => "Module Name Does Not Match the Name Last Checked In",
        "NOLEAPSECONDS" => "No Leapseconds Data Is Loaded in the Kernel Pool",
        "NOSUCHFILE" => "The File Does Not Exist",
        "NOSUCHSYMBOL" => "The Symbol Does Not Exist in the Symbol Table",
        "NOTAROTATION" => "The Matrix Is Not a Rotation",
        "NOTRANSLATION" => "The Body Name Could Not Be Translated to an ID Code",
        "NOTSUPPORTED" => "The Requested Operation Is Not Supported",
        "PATHMISMATCH" => "PATH_SYMBOLS and PATH_VALUES Have Different Sizes",
        "RECURSIVELOADING" => "A Meta-Kernel Cannot Load Another Meta-Kernel",
        "SIZEMISMATCH" => "The Input Arrays Have Different Sizes",
        "TRACEBACKOVERFLOW" => "No More Entries Can Be Added to the Traceback Representation",
        "TYPEMISMATCH" => "The Kernel Variable Has the Wrong Data Type",
        "UNITSNOTREC" => "The Input or Output Units Were Not Recognized",
        "UNPARSEDTIME" => "The Time String Could Not Be Parsed",
        "VALUEOUTOFRANGE" => "A Value Is Outside Its Valid Range",
        "ZEROLENGTHCOLUMN" => "A Matrix Column Has Zero Length",
        "ZEROVECTOR" => "Input Vector is the Zero Vector",
        _ => "",
    }
}
