//! Diagnostic messages built from `$` templates.
//!
//! Every `$` in a template is replaced, in order, by the next argument. Extra `$` markers are
//! kept verbatim and extra arguments are ignored.
//!
//! ```
//! # use tarn_common::diagnostic::{format_template, Diagnostic, Severity};
//! let line = 3;
//! assert_eq!(format_template("bad token on line $", &[&line]), "bad token on line 3");
//!
//! let diagnostic = Diagnostic::new(Severity::Warning, "unused $", &[&"x"]);
//! assert_eq!(diagnostic.to_string(), "warning: unused x");
//! ```

use std::fmt::{Display, Formatter, Write};

/// Replaces each `$` in `template` positionally with the next of `args`
pub fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut args = args.iter();
    for c in template.chars() {
        if c != '$' {
            output.push(c);
            continue;
        }
        match args.next() {
            Some(arg) => {
                let _ = write!(output, "{arg}");
            }
            None => output.push('$'),
        }
    }
    output
}

/// How bad a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
    /// the process must stop once this is reported
    Fatal,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// A formatted message with a severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic by formatting `template` with `args`
    pub fn new(severity: Severity, template: &str, args: &[&dyn Display]) -> Self {
        Self {
            severity,
            message: format_template(template, args),
        }
    }

    pub fn warning(template: &str, args: &[&dyn Display]) -> Self {
        Self::new(Severity::Warning, template, args)
    }

    pub fn error(template: &str, args: &[&dyn Display]) -> Self {
        Self::new(Severity::Error, template, args)
    }

    pub fn fatal(template: &str, args: &[&dyn Display]) -> Self {
        Self::new(Severity::Fatal, template, args)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether reporting this diagnostic must end the process
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_positional_replacement() {
        let formatted = format_template("Found a token in tree vector($): $", &[&7, &"Identifier x"]);
        assert_eq!(formatted, "Found a token in tree vector(7): Identifier x");
    }

    #[test]
    fn test_surplus_markers_and_args() {
        assert_eq!(format_template("$ and $", &[&1]), "1 and $");
        assert_eq!(format_template("only $", &[&1, &2]), "only 1");
        assert_eq!(format_template("no markers", &[&1]), "no markers");
    }

    #[test]
    fn test_fatal_flag() {
        assert!(Diagnostic::fatal("stop", &[]).is_fatal());
        assert!(!Diagnostic::error("keep going", &[]).is_fatal());
        assert!(Severity::Fatal > Severity::Warning);
    }
}
