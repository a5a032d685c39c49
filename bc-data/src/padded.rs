//! Zero-padded decimal integers for resource filenames.

use std::fmt;

/// Fixed-width, zero-padded decimal form of an integer.
///
/// Resource filenames embed ids this way, e.g. `unit043.csv` for cat 42
/// (ids in stat filenames are one-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedInt {
    value: i64,
    width: usize,
}

impl PaddedInt {
    pub fn new(value: impl Into<i64>, width: usize) -> Self {
        Self {
            value: value.into(),
            width,
        }
    }
}

impl fmt::Display for PaddedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(PaddedInt::new(3, 3).to_string(), "003");
        assert_eq!(PaddedInt::new(43, 3).to_string(), "043");
        assert_eq!(PaddedInt::new(1234, 3).to_string(), "1234");
        assert_eq!(PaddedInt::new(7, 2).to_string(), "07");
    }
}
