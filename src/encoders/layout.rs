use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::One;

/// Largest byte unit a layout may use.
pub const MAX_UNIT_BYTES: usize = 4096;

/// Pairing of a byte unit with the character unit that losslessly holds it.
///
/// `unit_chars` is always the smallest count with
/// `charset_size^unit_chars >= 256^unit_bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    charset_size: u32,
    unit_bytes: usize,
    unit_chars: usize,
}

impl ChunkLayout {
    /// Computes the minimal character unit for `unit_bytes`.
    pub fn derive(charset_size: u32, unit_bytes: usize) -> Result<Self> {
        if charset_size < 2 {
            return Err(Error::InvalidLayout(format!(
                "charset of {} symbols cannot carry information",
                charset_size
            )));
        }
        if unit_bytes == 0 || unit_bytes > MAX_UNIT_BYTES {
            return Err(Error::InvalidLayout(format!(
                "unit_bytes must be between 1 and {}, got {}",
                MAX_UNIT_BYTES, unit_bytes
            )));
        }

        let target = BigUint::one() << (8 * unit_bytes);
        let base = BigUint::from(charset_size);
        let mut capacity = BigUint::one();
        let mut unit_chars = 0;
        while capacity < target {
            capacity *= &base;
            unit_chars += 1;
        }

        Ok(ChunkLayout {
            charset_size,
            unit_bytes,
            unit_chars,
        })
    }

    /// Accepts an explicit pair only if it is exactly the derived one.
    pub fn new(charset_size: u32, unit_bytes: usize, unit_chars: usize) -> Result<Self> {
        let derived = Self::derive(charset_size, unit_bytes)?;
        if derived.unit_chars != unit_chars {
            let problem = if unit_chars < derived.unit_chars {
                "cannot hold"
            } else {
                "is not minimal for"
            };
            return Err(Error::InvalidLayout(format!(
                "{} chars {} {} bytes over {} symbols (expected {})",
                unit_chars, problem, unit_bytes, charset_size, derived.unit_chars
            )));
        }
        Ok(derived)
    }

    /// Best bits-per-character layout with at most `max_unit_bytes` bytes.
    /// Ties keep the smaller unit.
    pub fn best(charset_size: u32, max_unit_bytes: usize) -> Result<Self> {
        let mut best = Self::derive(charset_size, 1)?;
        for unit_bytes in 2..=max_unit_bytes {
            let candidate = Self::derive(charset_size, unit_bytes)?;
            if candidate.unit_bytes * best.unit_chars > best.unit_bytes * candidate.unit_chars {
                best = candidate;
            }
        }
        tracing::debug!(
            charset_size,
            unit_bytes = best.unit_bytes,
            unit_chars = best.unit_chars,
            "selected chunk layout"
        );
        Ok(best)
    }

    pub fn charset_size(&self) -> u32 {
        self.charset_size
    }

    pub fn unit_bytes(&self) -> usize {
        self.unit_bytes
    }

    pub fn unit_chars(&self) -> usize {
        self.unit_chars
    }

    /// Payload bits carried per output character.
    pub fn efficiency(&self) -> f64 {
        (self.unit_bytes * 8) as f64 / self.unit_chars as f64
    }

    /// Encoded length in characters for `len` input bytes.
    pub fn encoded_len(&self, len: usize) -> usize {
        len.div_ceil(self.unit_bytes) * self.unit_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4, 1 => 4 ; "toy alphabet")]
    #[test_case(4, 2 => 8 ; "toy alphabet two bytes")]
    #[test_case(256, 5 => 5 ; "byte alphabet")]
    #[test_case(63481, 1 => 1 ; "wide one byte")]
    #[test_case(63481, 3 => 2 ; "wide three bytes")]
    #[test_case(63481, 347 => 174 ; "wide production unit")]
    fn test_derived_unit_chars(size: u32, unit_bytes: usize) -> usize {
        ChunkLayout::derive(size, unit_bytes).unwrap().unit_chars()
    }

    #[test]
    fn test_explicit_layout_must_be_minimal() {
        assert!(ChunkLayout::new(63481, 347, 174).is_ok());
        let short = ChunkLayout::new(63481, 347, 173).unwrap_err();
        assert!(short.to_string().contains("cannot hold"));
        let long = ChunkLayout::new(63481, 347, 175).unwrap_err();
        assert!(long.to_string().contains("not minimal"));
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(ChunkLayout::derive(1, 8).is_err());
        assert!(ChunkLayout::derive(64, 0).is_err());
    }

    #[test]
    fn test_unit_bytes_upper_bound() {
        assert!(ChunkLayout::derive(63481, MAX_UNIT_BYTES).is_ok());
        let err = ChunkLayout::derive(63481, MAX_UNIT_BYTES + 1).unwrap_err();
        assert_eq!(err.kind(), "invalid-layout");
        assert!(ChunkLayout::derive(63481, usize::MAX).is_err());
    }

    #[test]
    fn test_best_layout() {
        let best = ChunkLayout::best(63481, 400).unwrap();
        assert_eq!((best.unit_bytes(), best.unit_chars()), (347, 174));
        assert!(best.efficiency() > 15.95);

        let toy = ChunkLayout::best(4, 8).unwrap();
        assert_eq!((toy.unit_bytes(), toy.unit_chars()), (1, 4));
    }

    #[test]
    fn test_encoded_len() {
        let layout = ChunkLayout::derive(63481, 347).unwrap();
        assert_eq!(layout.encoded_len(0), 0);
        assert_eq!(layout.encoded_len(1), 174);
        assert_eq!(layout.encoded_len(347), 174);
        assert_eq!(layout.encoded_len(348), 348);
    }
}
