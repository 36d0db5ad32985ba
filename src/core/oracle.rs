use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Upper bound (exclusive) of the code points an alphabet may draw from.
pub const CODE_SPACE: u32 = 0x10000;

/// UTF-16 surrogates. Not Unicode scalar values, so never symbols.
pub const SURROGATES: RangeInclusive<u32> = 0xD800..=0xDFFF;

/// The oracle could not answer for a code point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("oracle query for U+{code_point:04X} failed: {reason}")]
pub struct OracleError {
    pub code_point: u32,
    pub reason: String,
}

impl OracleError {
    pub fn new(code_point: u32, reason: impl Into<String>) -> Self {
        OracleError {
            code_point,
            reason: reason.into(),
        }
    }
}

/// Decides whether a code point survives the target text channel.
///
/// Queries are independent and read-only, so implementations must be
/// callable from several threads at once.
pub trait SafetyOracle: Sync {
    fn is_safe(&self, code_point: u32) -> Result<bool, OracleError>;
}

impl<F> SafetyOracle for F
where
    F: Fn(u32) -> bool + Sync,
{
    fn is_safe(&self, code_point: u32) -> Result<bool, OracleError> {
        Ok(self(code_point))
    }
}

/// Rule-based oracle for a double-quoted string literal in UTF-8 source.
///
/// Rejects every code point in `forbid` and, when enabled, the UTF-16
/// surrogate block which cannot appear in well-formed UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOracle {
    forbid: BTreeSet<u32>,
    forbid_surrogates: bool,
}

impl LiteralOracle {
    pub fn new(forbid: impl IntoIterator<Item = u32>, forbid_surrogates: bool) -> Self {
        LiteralOracle {
            forbid: forbid.into_iter().collect(),
            forbid_surrogates,
        }
    }

    /// Rules for a Python 3 `"..."` literal read as UTF-8 source: NUL, LF,
    /// CR, the quote and the backslash break it.
    pub fn python() -> Self {
        Self::new([0x00, 0x0A, 0x0D, 0x22, 0x5C], true)
    }

    pub fn forbidden(&self) -> impl Iterator<Item = u32> + '_ {
        self.forbid.iter().copied()
    }
}

impl SafetyOracle for LiteralOracle {
    fn is_safe(&self, code_point: u32) -> Result<bool, OracleError> {
        if code_point >= CODE_SPACE {
            return Err(OracleError::new(code_point, "outside the basic multilingual plane"));
        }
        if self.forbid_surrogates && SURROGATES.contains(&code_point) {
            return Ok(false);
        }
        Ok(!self.forbid.contains(&code_point))
    }
}

/// Oracle answering from code points probed offline on the real runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbedOracle {
    safe: BTreeSet<u32>,
}

impl ProbedOracle {
    pub fn new(safe: impl IntoIterator<Item = u32>) -> Self {
        ProbedOracle {
            safe: safe.into_iter().collect(),
        }
    }
}

impl SafetyOracle for ProbedOracle {
    fn is_safe(&self, code_point: u32) -> Result<bool, OracleError> {
        Ok(self.safe.contains(&code_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_literal_rules() {
        let oracle = LiteralOracle::python();
        assert!(!oracle.is_safe(0).unwrap());
        assert!(!oracle.is_safe('\n' as u32).unwrap());
        assert!(!oracle.is_safe('"' as u32).unwrap());
        assert!(!oracle.is_safe('\\' as u32).unwrap());
        assert!(!oracle.is_safe(0xD800).unwrap());
        assert!(!oracle.is_safe(0xDFFF).unwrap());
        assert!(oracle.is_safe('A' as u32).unwrap());
        assert!(oracle.is_safe(0xE000).unwrap());
        assert!(oracle.is_safe(0xFFFF).unwrap());
    }

    #[test]
    fn test_literal_oracle_rejects_out_of_plane() {
        let err = LiteralOracle::python().is_safe(0x10000).unwrap_err();
        assert_eq!(err.code_point, 0x10000);
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |cp: u32| cp % 2 == 0;
        assert!(oracle.is_safe(4).unwrap());
        assert!(!oracle.is_safe(5).unwrap());
    }

    #[test]
    fn test_probed_oracle() {
        let oracle = ProbedOracle::new([5, 6, 7]);
        assert!(oracle.is_safe(6).unwrap());
        assert!(!oracle.is_safe(8).unwrap());
    }
}
