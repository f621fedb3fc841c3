//! Toolkit return codes and their severity.
//!
//! Every stage call into the solver toolkit yields an integer code. The
//! toolkit convention maps ranges of that integer to a severity:
//!
//! | code      | severity   |
//! |-----------|------------|
//! | `0`       | `Ok`       |
//! | `1..=99`  | `Warning`  |
//! | `>= 100`  | `Fatal`    |
//!
//! Negative codes are never produced by the toolkit and are classified as
//! `Fatal`.

use std::cmp::Ordering;
use std::fmt;

/// Last code that is still advisory.
pub const MAX_WARNING_CODE: i32 = 99;

/// Severity class of a toolkit status code, ordered from best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Ok,
    Warning,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Fatal => "fatal",
        }
    }
}

/// Raw status code returned by a toolkit stage call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusCode(pub i32);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0);

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn severity(self) -> Severity {
        match self.0 {
            0 => Severity::Ok,
            1..=MAX_WARNING_CODE => Severity::Warning,
            _ => Severity::Fatal,
        }
    }

    pub fn is_ok(self) -> bool {
        self.severity() == Severity::Ok
    }

    pub fn is_warning(self) -> bool {
        self.severity() == Severity::Warning
    }

    pub fn is_fatal(self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Compare two codes by how bad they are: severity first, then value.
    pub fn cmp_severity(self, other: StatusCode) -> Ordering {
        self.severity()
            .cmp(&other.severity())
            .then_with(|| self.0.cmp(&other.0))
    }

    /// The worse of two codes.
    pub fn worst(self, other: StatusCode) -> StatusCode {
        match self.cmp_severity(other) {
            Ordering::Less => other,
            _ => self,
        }
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.severity().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classify_ranges() {
        assert_eq!(StatusCode(0).severity(), Severity::Ok);
        assert_eq!(StatusCode(1).severity(), Severity::Warning);
        assert_eq!(StatusCode(6).severity(), Severity::Warning);
        assert_eq!(StatusCode(99).severity(), Severity::Warning);
        assert_eq!(StatusCode(100).severity(), Severity::Fatal);
        assert_eq!(StatusCode(200).severity(), Severity::Fatal);
        assert_eq!(StatusCode(-1).severity(), Severity::Fatal);
    }

    #[test]
    fn worst_prefers_severity_over_value() {
        assert_eq!(StatusCode(99).worst(StatusCode(101)), StatusCode(101));
        assert_eq!(StatusCode(6).worst(StatusCode(0)), StatusCode(6));
        assert_eq!(StatusCode(200).worst(StatusCode(110)), StatusCode(200));
        assert_eq!(StatusCode(-1).worst(StatusCode(50)), StatusCode(-1));
        assert_eq!(StatusCode(-1).worst(StatusCode(100)), StatusCode(100));
    }

    #[test]
    fn display_includes_severity() {
        assert_eq!(StatusCode(200).to_string(), "200 (fatal)");
        assert_eq!(StatusCode(0).to_string(), "0 (ok)");
    }

    proptest! {
        #[test]
        fn worst_is_commutative_and_idempotent(a in -10i32..400, b in -10i32..400) {
            let (a, b) = (StatusCode(a), StatusCode(b));
            prop_assert_eq!(a.worst(b), b.worst(a));
            prop_assert_eq!(a.worst(a), a);
        }

        #[test]
        fn worst_never_lowers_severity(a in -10i32..400, b in -10i32..400) {
            let w = StatusCode(a).worst(StatusCode(b));
            prop_assert!(w.severity() >= StatusCode(a).severity());
            prop_assert!(w.severity() >= StatusCode(b).severity());
        }
    }
}
