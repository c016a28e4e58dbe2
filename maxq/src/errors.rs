use crate::{FoundCode, ResultCode};

/// Errors returned by [`SpiceContext`](crate::SpiceContext) calls.
///
/// Each toolkit short error message `SPICE(FOO)` maps to the variant `FOO`,
/// carrying the long message. The variant's `Display` is the toolkit's one-line
/// explanation of the error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("internal error {0}")]
    InternalError(#[from] maxq_std::Error),

    #[error("Unknown SPICE error: {short}")]
    UNKNOWN { short: String, long: String },

    #[error("The Output Array Is Too Small")]
    ARRAYTOOSMALL(String),
    #[error("The Array Size Supplied Is Invalid")]
    BADARRAYSIZE(String),
    #[error("An Ellipsoid Axis Length Is Not Positive")]
    BADAXISLENGTH(String),
    #[error("Rotation Axis Numbers Are Invalid")]
    BADAXISNUMBERS(String),
    #[error("An Invalid Axis Index Was Supplied")]
    BADINDEX(String),
    #[error("A Time Specification in a Kernel Could Not Be Parsed")]
    BADTIMESPEC(String),
    #[error("The Time System Was Not Recognized")]
    BADTIMETYPE(String),
    #[error("A Kernel Variable Assignment Could Not Be Parsed")]
    BADVARASSIGN(String),
    #[error("A Kernel Variable Has the Wrong Number of Values")]
    BADVARIABLESIZE(String),
    #[error("The Kernel Variable Name Is Invalid")]
    BADVARNAME(String),
    #[error("A Blank String Was Supplied as a File Name")]
    BLANKFILENAME(String),
    #[error("A blank string was used as a module name")]
    BLANKMODULENAME(String),
    #[error("A Blank String Cannot Be Assigned as a Body Name")]
    BLANKNAMEASSIGNED(String),
    #[error("The Inputs Describe a Degenerate Case")]
    DEGENERATECASE(String),
    #[error("The Input Vectors Are Linearly Dependent")]
    DEPENDENTVECTORS(String),
    #[error("A Division by Zero Would Occur")]
    DIVIDEBYZERO(String),
    #[error("An Empty String Was Supplied Where a Value Is Required")]
    EMPTYSTRING(String),
    #[error("An Attempt to Read a File Failed")]
    FILEREADFAILED(String),
    #[error("The Input and Output Units are Incompatible")]
    INCOMPATIBLEUNITS(String),
    #[error("A Value Is Outside the Range of Integers")]
    INTOUTOFRANGE(String),
    #[error("An Invalid Action Value Was Supplied")]
    INVALIDACTION(String),
    #[error("An Invalid Epoch Type Specification Was Supplied")]
    INVALIDEPOCH(String),
    #[error("An Invalid Item Was Found in a List")]
    INVALIDLISTITEM(String),
    #[error("An Invalid Error Message Type Was Specified")]
    INVALIDMSGTYPE(String),
    #[error("An Invalid Operation Value Was Supplied")]
    INVALIDOPERATION(String),
    #[error("Specification of Time String Format Was Not Recognized")]
    INVALIDTIMEFORMAT(String),
    #[error("The Variable Was not Found in the Kernel Pool.")]
    KERNELVARNOTFOUND(String),
    #[error("Module Name Does Not Match the Name Last Checked In")]
    NAMESDONOTMATCH(String),
    #[error("No Leapseconds Data Is Loaded in the Kernel Pool")]
    NOLEAPSECONDS(String),
    #[error("The File Does Not Exist")]
    NOSUCHFILE(String),
    #[error("The Symbol Does Not Exist in the Symbol Table")]
    NOSUCHSYMBOL(String),
    #[error("The Matrix Is Not a Rotation")]
    NOTAROTATION(String),
    #[error("The Body Name Could Not Be Translated to an ID Code")]
    NOTRANSLATION(String),
    #[error("The Requested Operation Is Not Supported")]
    NOTSUPPORTED(String),
    #[error("PATH_SYMBOLS and PATH_VALUES Have Different Sizes")]
    PATHMISMATCH(String),
    #[error("A Meta-Kernel Cannot Load Another Meta-Kernel")]
    RECURSIVELOADING(String),
    #[error("The Input Arrays Have Different Sizes")]
    SIZEMISMATCH(String),
    #[error("No More Entries Can Be Added to the Traceback Representation")]
    TRACEBACKOVERFLOW(String),
    #[error("The Kernel Variable Has the Wrong Data Type")]
    TYPEMISMATCH(String),
    #[error("The Input or Output Units Were Not Recognized")]
    UNITSNOTREC(String),
    #[error("The Time String Could Not Be Parsed")]
    UNPARSEDTIME(String),
    #[error("A Value Is Outside Its Valid Range")]
    VALUEOUTOFRANGE(String),
    #[error("A Matrix Column Has Zero Length")]
    ZEROLENGTHCOLUMN(String),
    #[error("Input Vector is the Zero Vector")]
    ZEROVECTOR(String),
}

impl Error {
    pub fn from_short(short: &str, long: &str) -> Self {
        let long = long.to_owned();
        match short {
            "SPICE(ARRAYTOOSMALL)" => Error::ARRAYTOOSMALL(long),
            "SPICE(BADARRAYSIZE)" => Error::BADARRAYSIZE(long),
            "SPICE(BADAXISLENGTH)" => Error::BADAXISLENGTH(long),
            "SPICE(BADAXISNUMBERS)" => Error::BADAXISNUMBERS(long),
            "SPICE(BADINDEX)" => Error::BADINDEX(long),
            "SPICE(BADTIMESPEC)" => Error::BADTIMESPEC(long),
            "SPICE(BADTIMETYPE)" => Error::BADTIMETYPE(long),
            "SPICE(BADVARASSIGN)" => Error::BADVARASSIGN(long),
            "SPICE(BADVARIABLESIZE)" => Error::BADVARIABLESIZE(long),
            "SPICE(BADVARNAME)" => Error::BADVARNAME(long),
            "SPICE(BLANKFILENAME)" => Error::BLANKFILENAME(long),
            "SPICE(BLANKMODULENAME)" => Error::BLANKMODULENAME(long),
            "SPICE(BLANKNAMEASSIGNED)" => Error::BLANKNAMEASSIGNED(long),
            "SPICE(DEGENERATECASE)" => Error::DEGENERATECASE(long),
            "SPICE(DEPENDENTVECTORS)" => Error::DEPENDENTVECTORS(long),
            "SPICE(DIVIDEBYZERO)" => Error::DIVIDEBYZERO(long),
            "SPICE(EMPTYSTRING)" => Error::EMPTYSTRING(long),
            "SPICE(FILEREADFAILED)" => Error::FILEREADFAILED(long),
            "SPICE(INCOMPATIBLEUNITS)" => Error::INCOMPATIBLEUNITS(long),
            "SPICE(INTOUTOFRANGE)" => Error::INTOUTOFRANGE(long),
            "SPICE(INVALIDACTION)" => Error::INVALIDACTION(long),
            "SPICE(INVALIDEPOCH)" => Error::INVALIDEPOCH(long),
            "SPICE(INVALIDLISTITEM)" => Error::INVALIDLISTITEM(long),
            "SPICE(INVALIDMSGTYPE)" => Error::INVALIDMSGTYPE(long),
            "SPICE(INVALIDOPERATION)" => Error::INVALIDOPERATION(long),
            "SPICE(INVALIDTIMEFORMAT)" => Error::INVALIDTIMEFORMAT(long),
            "SPICE(KERNELVARNOTFOUND)" => Error::KERNELVARNOTFOUND(long),
            "SPICE(NAMESDONOTMATCH)" => Error::NAMESDONOTMATCH(long),
            "SPICE(NOLEAPSECONDS)" => Error::NOLEAPSECONDS(long),
            "SPICE(NOSUCHFILE)" => Error::NOSUCHFILE(long),
            "SPICE(NOSUCHSYMBOL)" => Error::NOSUCHSYMBOL(long),
            "SPICE(NOTAROTATION)" => Error::NOTAROTATION(long),
            "SPICE(NOTRANSLATION)" => Error::NOTRANSLATION(long),
            "SPICE(NOTSUPPORTED)" => Error::NOTSUPPORTED(long),
            "SPICE(PATHMISMATCH)" => Error::PATHMISMATCH(long),
            "SPICE(RECURSIVELOADING)" => Error::RECURSIVELOADING(long),
            "SPICE(SIZEMISMATCH)" => Error::SIZEMISMATCH(long),
            "SPICE(TRACEBACKOVERFLOW)" => Error::TRACEBACKOVERFLOW(long),
            "SPICE(TYPEMISMATCH)" => Error::TYPEMISMATCH(long),
            "SPICE(UNITSNOTREC)" => Error::UNITSNOTREC(long),
            "SPICE(UNPARSEDTIME)" => Error::UNPARSEDTIME(long),
            "SPICE(VALUEOUTOFRANGE)" => Error::VALUEOUTOFRANGE(long),
            "SPICE(ZEROLENGTHCOLUMN)" => Error::ZEROLENGTHCOLUMN(long),
            "SPICE(ZEROVECTOR)" => Error::ZEROVECTOR(long),
            _ => Error::UNKNOWN {
                short: short.to_owned(),
                long,
            },
        }
    }

    /// The toolkit's short error message, e.g. `SPICE(ZEROVECTOR)`. Empty for
    /// internal errors.
    pub fn short(&self) -> String {
        match self {
            Error::InternalError(_) => String::new(),
            Error::UNKNOWN { short, .. } => short.clone(),
            Error::ARRAYTOOSMALL(_) => "SPICE(ARRAYTOOSMALL)".to_owned(),
            Error::BADARRAYSIZE(_) => "SPICE(BADARRAYSIZE)".to_owned(),
            Error::BADAXISLENGTH(_) => "SPICE(BADAXISLENGTH)".to_owned(),
            Error::BADAXISNUMBERS(_) => "SPICE(BADAXISNUMBERS)".to_owned(),
            Error::BADINDEX(_) => "SPICE(BADINDEX)".to_owned(),
            Error::BADTIMESPEC(_) => "SPICE(BADTIMESPEC)".to_owned(),
            Error::BADTIMETYPE(_) => "SPICE(BADTIMETYPE)".to_owned(),
            Error::BADVARASSIGN(_) => "SPICE(BADVARASSIGN)".to_owned(),
            Error::BADVARIABLESIZE(_) => "SPICE(BADVARIABLESIZE)".to_owned(),
            Error::BADVARNAME(_) => "SPICE(BADVARNAME)".to_owned(),
            Error::BLANKFILENAME(_) => "SPICE(BLANKFILENAME)".to_owned(),
            Error::BLANKMODULENAME(_) => "SPICE(BLANKMODULENAME)".to_owned(),
            Error::BLANKNAMEASSIGNED(_) => "SPICE(BLANKNAMEASSIGNED)".to_owned(),
            Error::DEGENERATECASE(_) => "SPICE(DEGENERATECASE)".to_owned(),
            Error::DEPENDENTVECTORS(_) => "SPICE(DEPENDENTVECTORS)".to_owned(),
            Error::DIVIDEBYZERO(_) => "SPICE(DIVIDEBYZERO)".to_owned(),
            Error::EMPTYSTRING(_) => "SPICE(EMPTYSTRING)".to_owned(),
            Error::FILEREADFAILED(_) => "SPICE(FILEREADFAILED)".to_owned(),
            Error::INCOMPATIBLEUNITS(_) => "SPICE(INCOMPATIBLEUNITS)".to_owned(),
            Error::INTOUTOFRANGE(_) => "SPICE(INTOUTOFRANGE)".to_owned(),
            Error::INVALIDACTION(_) => "SPICE(INVALIDACTION)".to_owned(),
            Error::INVALIDEPOCH(_) => "SPICE(INVALIDEPOCH)".to_owned(),
            Error::INVALIDLISTITEM(_) => "SPICE(INVALIDLISTITEM)".to_owned(),
            Error::INVALIDMSGTYPE(_) => "SPICE(INVALIDMSGTYPE)".to_owned(),
            Error::INVALIDOPERATION(_) => "SPICE(INVALIDOPERATION)".to_owned(),
            Error::INVALIDTIMEFORMAT(_) => "SPICE(INVALIDTIMEFORMAT)".to_owned(),
            Error::KERNELVARNOTFOUND(_) => "SPICE(KERNELVARNOTFOUND)".to_owned(),
            Error::NAMESDONOTMATCH(_) => "SPICE(NAMESDONOTMATCH)".to_owned(),
            Error::NOLEAPSECONDS(_) => "SPICE(NOLEAPSECONDS)".to_owned(),
            Error::NOSUCHFILE(_) => "SPICE(NOSUCHFILE)".to_owned(),
            Error::NOSUCHSYMBOL(_) => "SPICE(NOSUCHSYMBOL)".to_owned(),
            Error::NOTAROTATION(_) => "SPICE(NOTAROTATION)".to_owned(),
            Error::NOTRANSLATION(_) => "SPICE(NOTRANSLATION)".to_owned(),
            Error::NOTSUPPORTED(_) => "SPICE(NOTSUPPORTED)".to_owned(),
            Error::PATHMISMATCH(_) => "SPICE(PATHMISMATCH)".to_owned(),
            Error::RECURSIVELOADING(_) => "SPICE(RECURSIVELOADING)".to_owned(),
            Error::SIZEMISMATCH(_) => "SPICE(SIZEMISMATCH)".to_owned(),
            Error::TRACEBACKOVERFLOW(_) => "SPICE(TRACEBACKOVERFLOW)".to_owned(),
            Error::TYPEMISMATCH(_) => "SPICE(TYPEMISMATCH)".to_owned(),
            Error::UNITSNOTREC(_) => "SPICE(UNITSNOTREC)".to_owned(),
            Error::UNPARSEDTIME(_) => "SPICE(UNPARSEDTIME)".to_owned(),
            Error::VALUEOUTOFRANGE(_) => "SPICE(VALUEOUTOFRANGE)".to_owned(),
            Error::ZEROLENGTHCOLUMN(_) => "SPICE(ZEROLENGTHCOLUMN)".to_owned(),
            Error::ZEROVECTOR(_) => "SPICE(ZEROVECTOR)".to_owned(),
        }
    }

    /// The toolkit's long error message
    pub fn long(&self) -> String {
        match self {
            Error::InternalError(err) => err.to_string(),
            Error::UNKNOWN { long, .. } => long.clone(),
            Error::ARRAYTOOSMALL(long)
            | Error::BADARRAYSIZE(long)
            | Error::BADAXISLENGTH(long)
            | Error::BADAXISNUMBERS(long)
            | Error::BADINDEX(long)
            | Error::BADTIMESPEC(long)
            | Error::BADTIMETYPE(long)
            | Error::BADVARASSIGN(long)
            | Error::BADVARIABLESIZE(long)
            | Error::BADVARNAME(long)
            | Error::BLANKFILENAME(long)
            | Error::BLANKMODULENAME(long)
            | Error::BLANKNAMEASSIGNED(long)
            | Error::DEGENERATECASE(long)
            | Error::DEPENDENTVECTORS(long)
            | Error::DIVIDEBYZERO(long)
            | Error::EMPTYSTRING(long)
            | Error::FILEREADFAILED(long)
            | Error::INCOMPATIBLEUNITS(long)
            | Error::INTOUTOFRANGE(long)
            | Error::INVALIDACTION(long)
            | Error::INVALIDEPOCH(long)
            | Error::INVALIDLISTITEM(long)
            | Error::INVALIDMSGTYPE(long)
            | Error::INVALIDOPERATION(long)
            | Error::INVALIDTIMEFORMAT(long)
            | Error::KERNELVARNOTFOUND(long)
            | Error::NAMESDONOTMATCH(long)
            | Error::NOLEAPSECONDS(long)
            | Error::NOSUCHFILE(long)
            | Error::NOSUCHSYMBOL(long)
            | Error::NOTAROTATION(long)
            | Error::NOTRANSLATION(long)
            | Error::NOTSUPPORTED(long)
            | Error::PATHMISMATCH(long)
            | Error::RECURSIVELOADING(long)
            | Error::SIZEMISMATCH(long)
            | Error::TRACEBACKOVERFLOW(long)
            | Error::TYPEMISMATCH(long)
            | Error::UNITSNOTREC(long)
            | Error::UNPARSEDTIME(long)
            | Error::VALUEOUTOFRANGE(long)
            | Error::ZEROLENGTHCOLUMN(long)
            | Error::ZEROVECTOR(long) => long.clone(),
        }
    }

    /// Short and long message together, as reported to callers that only take
    /// a string
    pub fn message(&self) -> String {
        let short = self.short();
        let long = self.long();
        match (short.is_empty(), long.is_empty()) {
            (true, _) => long,
            (false, true) => short,
            (false, false) => format!("{short}: {long}"),
        }
    }

    /// Whether the error came from the toolkit, rather than from the runtime
    pub fn is_toolkit_error(&self) -> bool {
        !matches!(self, Error::InternalError(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result code and message of a call, in the form expected by hosts that cannot
/// take a `Result`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub code: ResultCode,
    /// Empty on success, never empty on failure
    pub message: String,
}

impl<T> From<&Result<T>> for Outcome {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Outcome {
                code: ResultCode::Success,
                message: String::new(),
            },
            Err(err) => Outcome {
                code: ResultCode::Error,
                message: err.message(),
            },
        }
    }
}

impl<T> From<&Option<T>> for FoundCode {
    fn from(value: &Option<T>) -> Self {
        if value.is_some() {
            FoundCode::Found
        } else {
            FoundCode::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_codes() {
        let err = Error::from_short("SPICE(ZEROVECTOR)", "Direction is zero.");
        assert!(matches!(&err, Error::ZEROVECTOR(long) if long == "Direction is zero."));
        assert_eq!(err.short(), "SPICE(ZEROVECTOR)");
        assert_eq!(err.to_string(), "Input Vector is the Zero Vector");
        assert_eq!(err.message(), "SPICE(ZEROVECTOR): Direction is zero.");

        let err = Error::from_short("SPICE(MADEUP)", "");
        assert!(matches!(&err, Error::UNKNOWN { short, .. } if short == "SPICE(MADEUP)"));
        assert_eq!(err.short(), "SPICE(MADEUP)");
        assert_eq!(err.message(), "SPICE(MADEUP)");

        let err = Error::from(maxq_std::Error::Terminated(1));
        assert!(!err.is_toolkit_error());
        assert_eq!(err.short(), "");
        assert_eq!(err.message(), "process terminated with code 1");
    }

    #[test]
    fn explanations_match_toolkit() {
        for short in [
            "SPICE(ARRAYTOOSMALL)",
            "SPICE(BADARRAYSIZE)",
            "SPICE(BADAXISLENGTH)",
            "SPICE(BADAXISNUMBERS)",
            "SPICE(BADINDEX)",
            "SPICE(BADTIMESPEC)",
            "SPICE(BADTIMETYPE)",
            "SPICE(BADVARASSIGN)",
            "SPICE(BADVARIABLESIZE)",
            "SPICE(BADVARNAME)",
            "SPICE(BLANKFILENAME)",
            "SPICE(BLANKMODULENAME)",
            "SPICE(BLANKNAMEASSIGNED)",
            "SPICE(DEGENERATECASE)",
            "SPICE(DEPENDENTVECTORS)",
            "SPICE(DIVIDEBYZERO)",
            "SPICE(EMPTYSTRING)",
            "SPICE(FILEREADFAILED)",
            "SPICE(INCOMPATIBLEUNITS)",
            "SPICE(INTOUTOFRANGE)",
            "SPICE(INVALIDACTION)",
            "SPICE(INVALIDEPOCH)",
            "SPICE(INVALIDLISTITEM)",
            "SPICE(INVALIDMSGTYPE)",
            "SPICE(INVALIDOPERATION)",
            "SPICE(INVALIDTIMEFORMAT)",
            "SPICE(KERNELVARNOTFOUND)",
            "SPICE(NAMESDONOTMATCH)",
            "SPICE(NOLEAPSECONDS)",
            "SPICE(NOSUCHFILE)",
            "SPICE(NOSUCHSYMBOL)",
            "SPICE(NOTAROTATION)",
            "SPICE(NOTRANSLATION)",
            "SPICE(NOTSUPPORTED)",
            "SPICE(PATHMISMATCH)",
            "SPICE(RECURSIVELOADING)",
            "SPICE(SIZEMISMATCH)",
            "SPICE(TRACEBACKOVERFLOW)",
            "SPICE(TYPEMISMATCH)",
            "SPICE(UNITSNOTREC)",
            "SPICE(UNPARSEDTIME)",
            "SPICE(VALUEOUTOFRANGE)",
            "SPICE(ZEROLENGTHCOLUMN)",
            "SPICE(ZEROVECTOR)",
        ] {
            let err = Error::from_short(short, "");
            assert!(!matches!(err, Error::UNKNOWN { .. }), "{short}");
            assert_eq!(err.short(), short);
            assert_eq!(err.to_string(), maxq_spicelib::errhnd::expln(short), "{short}");
        }
    }

    #[test]
    fn outcomes() {
        let ok: Result<f64> = Ok(1.0);
        assert_eq!(Outcome::from(&ok), Outcome::default());

        let err: Result<f64> = Err(Error::from_short("SPICE(NOSUCHFILE)", "x.tls"));
        let outcome = Outcome::from(&err);
        assert_eq!(outcome.code, ResultCode::Error);
        assert!(!outcome.message.is_empty());

        assert_eq!(FoundCode::from(&Some(3)), FoundCode::Found);
        assert_eq!(FoundCode::from(&None::<i32>), FoundCode::NotFound);
    }
}
