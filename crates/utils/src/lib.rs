#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

use error_stack::{Context, Report};

pub trait ContextExt: Context + Sized {
    /// Start a new report from this error context.
    #[track_caller]
    fn report(self) -> Report<Self> {
        error_stack::report!(self)
    }
}

impl<E: Context + Sized> ContextExt for E {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(thiserror::Error, Debug, PartialEq)]
    #[error("Parsing failed")]
    struct ParseError;

    #[test]
    fn report_keeps_context() {
        let report = ParseError.report().attach_printable("bad digit");
        assert_eq!(report.current_context(), &ParseError);
        let printed = format!("{:?}", report);
        assert!(printed.contains("Parsing failed"));
        assert!(printed.contains("bad digit"));
    }
}
