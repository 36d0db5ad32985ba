use crate::core::alphabet::Alphabet;
use crate::encoders::layout::ChunkLayout;
use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use std::sync::Arc;

/// Exact conversion between one byte unit and one character unit.
///
/// The byte unit is read as a little-endian integer (byte 0 least
/// significant) and written out in base `charset_size`, most significant
/// digit first.
#[derive(Debug, Clone)]
pub struct ChunkCodec {
    alphabet: Arc<Alphabet>,
    layout: ChunkLayout,
    base: BigUint,
}

impl ChunkCodec {
    pub fn new(alphabet: Arc<Alphabet>, unit_bytes: usize) -> Result<Self> {
        let layout = ChunkLayout::derive(alphabet.base(), unit_bytes)?;
        Self::with_layout(alphabet, layout)
    }

    pub fn with_layout(alphabet: Arc<Alphabet>, layout: ChunkLayout) -> Result<Self> {
        if layout.charset_size() != alphabet.base() {
            return Err(Error::InvalidLayout(format!(
                "layout derived for {} symbols, alphabet has {}",
                layout.charset_size(),
                alphabet.base()
            )));
        }
        let base = BigUint::from(alphabet.base());
        Ok(ChunkCodec {
            alphabet,
            layout,
            base,
        })
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    pub fn encode_chunk(&self, chunk: &[u8]) -> Result<String> {
        let mut out = String::with_capacity(self.layout.unit_chars() * 3);
        self.encode_chunk_into(chunk, &mut out)?;
        Ok(out)
    }

    pub(crate) fn encode_chunk_into(&self, chunk: &[u8], out: &mut String) -> Result<()> {
        if chunk.len() != self.layout.unit_bytes() {
            return Err(Error::malformed(format!(
                "chunk is {} bytes, expected {}",
                chunk.len(),
                self.layout.unit_bytes()
            )));
        }

        let mut num = BigUint::from_bytes_le(chunk);
        let mut digits = vec!['\0'; self.layout.unit_chars()];
        for slot in digits.iter_mut().rev() {
            let (quotient, remainder) = num.div_rem(&self.base);
            let index = remainder
                .to_u32()
                .ok_or_else(|| Error::invariant("remainder exceeds charset size"))?;
            *slot = self.alphabet.encode_digit(index).ok_or_else(|| {
                Error::invariant(format!("index {} has no charset member", index))
            })?;
            num = quotient;
        }

        if !num.is_zero() {
            return Err(Error::invariant(format!(
                "{} bytes did not fit in {} chars",
                self.layout.unit_bytes(),
                self.layout.unit_chars()
            )));
        }

        out.extend(digits);
        Ok(())
    }

    pub fn decode_chunk(&self, chars: &[char]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.layout.unit_bytes());
        self.decode_chunk_into(chars, &mut out)?;
        Ok(out)
    }

    pub(crate) fn decode_chunk_into(&self, chars: &[char], out: &mut Vec<u8>) -> Result<()> {
        if chars.len() != self.layout.unit_chars() {
            return Err(Error::malformed(format!(
                "chunk is {} chars, expected {}",
                chars.len(),
                self.layout.unit_chars()
            )));
        }

        let mut num = BigUint::zero();
        for &c in chars {
            let digit = self.alphabet.decode_char(c).ok_or_else(|| {
                Error::malformed(format!("U+{:04X} is not in the charset", c as u32))
            })?;
            num *= &self.base;
            num += digit;
        }

        let bytes = num.to_bytes_le();
        if bytes.len() > self.layout.unit_bytes() {
            return Err(Error::malformed(format!(
                "chunk value needs {} bytes, unit holds {}",
                bytes.len(),
                self.layout.unit_bytes()
            )));
        }

        let end = out.len() + self.layout.unit_bytes();
        out.extend_from_slice(&bytes);
        out.resize(end, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oracle::LiteralOracle;

    fn toy() -> ChunkCodec {
        let alphabet = Alphabet::from_code_points(vec![65, 66, 67, 68]).unwrap();
        ChunkCodec::new(Arc::new(alphabet), 1).unwrap()
    }

    fn wide() -> ChunkCodec {
        let alphabet = Alphabet::build(&LiteralOracle::python()).unwrap();
        ChunkCodec::new(Arc::new(alphabet), 347).unwrap()
    }

    #[test]
    fn test_toy_byte_by_hand() {
        // 0x4D = 77 = 1*64 + 0*16 + 3*4 + 1
        let codec = toy();
        assert_eq!(codec.layout().unit_chars(), 4);
        assert_eq!(codec.encode_chunk(&[0x4D]).unwrap(), "BADB");
        let chars: Vec<char> = "BADB".chars().collect();
        assert_eq!(codec.decode_chunk(&chars).unwrap(), vec![0x4D]);
    }

    #[test]
    fn test_toy_exhaustive() {
        let codec = toy();
        for byte in 0..=255u8 {
            let encoded = codec.encode_chunk(&[byte]).unwrap();
            let chars: Vec<char> = encoded.chars().collect();
            assert_eq!(codec.decode_chunk(&chars).unwrap(), vec![byte]);
        }
        assert_eq!(codec.encode_chunk(&[0]).unwrap(), "AAAA");
        assert_eq!(codec.encode_chunk(&[255]).unwrap(), "DDDD");
    }

    #[test]
    fn test_two_byte_units_exhaustive() {
        let alphabet = Alphabet::from_code_points(vec![5, 6, 7, 20, 21]).unwrap();
        let codec = ChunkCodec::new(Arc::new(alphabet), 2).unwrap();
        assert_eq!(codec.layout().unit_chars(), 7);
        for value in 0..=u16::MAX {
            let bytes = value.to_le_bytes();
            let encoded = codec.encode_chunk(&bytes).unwrap();
            let chars: Vec<char> = encoded.chars().collect();
            assert_eq!(codec.decode_chunk(&chars).unwrap(), bytes);
        }
    }

    #[test]
    fn test_wide_chunk_extremes() {
        let codec = wide();
        for fill in [0x00u8, 0x01, 0x7F, 0xFF] {
            let chunk = vec![fill; 347];
            let encoded = codec.encode_chunk(&chunk).unwrap();
            assert_eq!(encoded.chars().count(), 174);
            let chars: Vec<char> = encoded.chars().collect();
            assert_eq!(codec.decode_chunk(&chars).unwrap(), chunk);
        }
    }

    #[test]
    fn test_wide_chunk_patterned() {
        let codec = wide();
        let mut state = 0x2545_F491u32;
        for _ in 0..32 {
            let chunk: Vec<u8> = (0..347)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    state as u8
                })
                .collect();
            let chars: Vec<char> = codec.encode_chunk(&chunk).unwrap().chars().collect();
            assert_eq!(codec.decode_chunk(&chars).unwrap(), chunk);
        }
    }

    #[test]
    fn test_little_endian_significance() {
        let codec = wide();
        let mut chunk = vec![0u8; 347];
        chunk[0] = 1;
        let encoded: Vec<char> = codec.encode_chunk(&chunk).unwrap().chars().collect();
        // value 1 -> all zero digits except the least significant (last) one
        assert!(encoded[..173].iter().all(|&c| c == '\u{1}'));
        assert_eq!(encoded[173], '\u{2}');
    }

    #[test]
    fn test_decode_rejects_foreign_char() {
        let codec = toy();
        let err = codec.decode_chunk(&['A', 'B', 'x', 'D']).unwrap_err();
        assert_eq!(err.kind(), "malformed-input");
    }

    #[test]
    fn test_decode_rejects_overflowing_value() {
        // base 5, two-byte unit: 5^7 = 78125 > 65536, so the top codes overflow
        let alphabet = Alphabet::from_code_points(vec![5, 6, 7, 20, 21]).unwrap();
        let codec = ChunkCodec::new(Arc::new(alphabet), 2).unwrap();
        let top = char::from_u32(21).unwrap();
        let err = codec.decode_chunk(&[top; 7]).unwrap_err();
        assert!(err.to_string().contains("unit holds 2"));
    }

    #[test]
    fn test_wrong_sizes_rejected() {
        let codec = toy();
        assert!(codec.encode_chunk(&[1, 2]).is_err());
        assert!(codec.decode_chunk(&['A']).is_err());
    }

    #[test]
    fn test_layout_must_match_alphabet() {
        let alphabet = Arc::new(Alphabet::from_code_points(vec![65, 66, 67, 68]).unwrap());
        let layout = ChunkLayout::derive(5, 1).unwrap();
        assert!(ChunkCodec::with_layout(alphabet, layout).is_err());
    }
}
