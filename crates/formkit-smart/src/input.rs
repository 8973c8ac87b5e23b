//! # Parser Input
//!
//! Form values normally arrive as text, but a post-processing step may
//! already hold a number. [`SmartInput`] covers both so the parsers can
//! pass numbers through without a string round-trip where that matters.

use std::borrow::Cow;
use std::fmt;

/// A value handed to one of the smart parsers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmartInput<'a> {
    /// Raw text as read from an input element.
    Text(&'a str),
    /// A value that is already numeric.
    Number(f64),
}

impl<'a> SmartInput<'a> {
    /// Returns the textual form of the input.
    ///
    /// Numbers without a fractional part render without a decimal point
    /// (`10.0` becomes `"10"`), so an integral number behaves exactly like
    /// the digits a user would have typed.
    pub fn as_text(&self) -> Cow<'a, str> {
        match *self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(render_number(n)),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl<'a> From<&'a str> for SmartInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for SmartInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s.as_str())
    }
}

impl From<f64> for SmartInput<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for SmartInput<'_> {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl fmt::Display for SmartInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}
