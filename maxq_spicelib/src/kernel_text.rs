//! Parser for the data sections of text kernels.
//!
//! A text kernel alternates between comment sections and data sections, introduced
//! by lines containing only `\begintext` or `\begindata`. Comment lines are blanked
//! rather than removed before parsing, so that parser positions still map onto
//! line numbers in the original file.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Assign,
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// `@` date, still unparsed
    Date(String),
}

impl RawValue {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, RawValue::Text(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub op: Op,
    pub values: Vec<RawValue>,
    /// 1-based line number of the variable name
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub expected: String,
}

/// Blank everything outside data sections. `in_data` is the initial state.
fn data_lines(text: &str, mut in_data: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        match line.trim() {
            "\\begindata" => in_data = true,
            "\\begintext" => in_data = false,
            _ if in_data => out.push_str(line),
            _ => (),
        }
        out.push('\n');
    }
    out
}

fn unescape(s: &str) -> String {
    // Strip the outer quotes; '' inside stands for a single quote
    s[1..s.len() - 1].replace("''", "'")
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

peg::parser! {
    grammar kernel_parser() for str {
        rule ws() = quiet!{[' ' | '\t' | '\r' | '\n']*}

        rule sep() = quiet!{[' ' | '\t' | '\r' | '\n' | ',']*}

        rule name() -> &'input str
            = $([^ ' ' | '\t' | '\r' | '\n' | '=' | '+' | '(' | ')' | ',' | '\'' | '@']+)

        rule op() -> Op
            = "+=" { Op::Append }
            / "=" { Op::Assign }

        rule digits() = ['0'..='9']+

        rule number() -> f64
            = n:$(['+' | '-']? (digits() ("." digits()?)? / "." digits())
                  (['e' | 'E' | 'd' | 'D'] ['+' | '-']? digits())?)
                {? n.replace(['d', 'D'], "e").parse().or(Err("number")) }

        rule string() -> String
            = s:$(("'" [^ '\'' | '\n']* "'")+) { unescape(s) }

        rule date() -> String
            = "@" d:$([^ ' ' | '\t' | '\r' | '\n' | ',' | '(' | ')']+) { d.to_owned() }

        rule value() -> RawValue
            = d:date() { RawValue::Date(d) }
            / s:string() { RawValue::Text(s) }
            / n:number() { RawValue::Number(n) }

        rule values() -> Vec<RawValue>
            = "(" sep() v:(value() ++ sep()) sep() ")" { v }
            / v:value() { vec![v] }

        rule assignment() -> (usize, Assignment)
            = ws() p:position!() n:name() ws() o:op() ws() v:values()
                { (p, Assignment { name: n.to_owned(), op: o, values: v, line: 0 }) }

        pub rule kernel() -> Vec<(usize, Assignment)>
            = a:assignment()* ws() ![_] { a }
    }
}

/// Parse the assignments in a text kernel. Lines before the first `\begindata`
/// are comments unless `starts_in_data` is set.
pub fn parse(text: &str, starts_in_data: bool) -> Result<Vec<Assignment>, SyntaxError> {
    let data = data_lines(text, starts_in_data);
    match kernel_parser::kernel(&data) {
        Ok(assignments) => Ok(assignments
            .into_iter()
            .map(|(offset, mut a)| {
                a.line = line_of(&data, offset);
                a
            })
            .collect()),
        Err(err) => Err(SyntaxError {
            line: err.location.line,
            column: err.location.column,
            expected: err.expected.to_string(),
        }),
    }
}

/// Text kernels may start with an id word such as `KPL/PCK` or `KPL/MK`
pub fn id_word(text: &str) -> Option<&str> {
    let first = text.lines().next()?.split_whitespace().next()?;
    if first.contains('/') {
        Some(first)
    } else {
        None
    }
}

/// True if the text assigns `KERNELS_TO_LOAD` in a data section
pub fn assigns_kernels_to_load(text: &str) -> bool {
    data_lines(text, false)
        .lines()
        .any(|line| line.trim_start().starts_with("KERNELS_TO_LOAD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_data() {
        let text = "KPL/PCK\n\
            Comments mentioning X = 1\n\
            \\begindata\n\
            BODY399_RADII = ( 6378.1366 6378.1366 6356.7519 )\n\
            \\begintext\n\
            More comments\n\
            \\begindata\n\
            NAME += 'Earth'\n";
        let a = parse(text, false).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].name, "BODY399_RADII");
        assert_eq!(a[0].op, Op::Assign);
        assert_eq!(a[0].line, 4);
        assert_eq!(
            a[0].values,
            vec![
                RawValue::Number(6378.1366),
                RawValue::Number(6378.1366),
                RawValue::Number(6356.7519)
            ]
        );
        assert_eq!(a[1].op, Op::Append);
        assert_eq!(a[1].line, 8);
        assert_eq!(a[1].values, vec![RawValue::Text("Earth".to_owned())]);
    }

    #[test]
    fn value_forms() {
        let a = parse(
            "A = ( 1, 1.5D3, -2E-1 .5 +7. )\nB = 'it''s'\nC=( @1972-JAN-1,\n  @2017-JAN-1 )",
            true,
        )
        .unwrap();
        assert_eq!(
            a[0].values,
            vec![
                RawValue::Number(1.0),
                RawValue::Number(1500.0),
                RawValue::Number(-0.2),
                RawValue::Number(0.5),
                RawValue::Number(7.0)
            ]
        );
        assert_eq!(a[1].values, vec![RawValue::Text("it's".to_owned())]);
        assert_eq!(
            a[2].values,
            vec![
                RawValue::Date("1972-JAN-1".to_owned()),
                RawValue::Date("2017-JAN-1".to_owned())
            ]
        );
        assert_eq!(a[2].line, 3);
    }

    #[test]
    fn syntax_errors() {
        let err = parse("\\begindata\nA = 1\nB 2\n", false).unwrap_err();
        assert_eq!(err.line, 3);

        assert!(parse("A = ( 1 2", true).is_err());
        assert!(parse("A = ()", true).is_err());
        assert!(parse("A = 'unterminated", true).is_err());
    }

    #[test]
    fn no_data() {
        assert_eq!(parse("just comments\n", false).unwrap(), vec![]);
        assert_eq!(parse("", true).unwrap(), vec![]);
    }

    #[test]
    fn id_words() {
        assert_eq!(id_word("KPL/MK\n"), Some("KPL/MK"));
        assert_eq!(id_word("DAF/SPK    \0\0"), Some("DAF/SPK"));
        assert_eq!(id_word("\\begindata\n"), None);
        assert!(assigns_kernels_to_load(
            "\\begindata\n KERNELS_TO_LOAD = ( 'a.tls' )\n"
        ));
        assert!(!assigns_kernels_to_load("KERNELS_TO_LOAD in a comment\n"));
    }
}
