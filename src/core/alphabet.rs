use crate::core::charset::{Charset, CharsetVersion};
use crate::core::offset_table::OffsetTables;
use crate::core::oracle::SafetyOracle;
use crate::error::Result;

/// A charset together with the lookup tables derived from it.
///
/// Immutable once built; wrap it in an `Arc` to share it between codecs
/// and threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    charset: Charset,
    tables: OffsetTables,
}

impl Alphabet {
    pub fn new(charset: Charset) -> Self {
        let tables = OffsetTables::build(&charset);
        Alphabet { charset, tables }
    }

    pub fn build<O: SafetyOracle + ?Sized>(oracle: &O) -> Result<Self> {
        Ok(Self::new(Charset::build(oracle)?))
    }

    pub fn from_code_points(code_points: Vec<u32>) -> Result<Self> {
        Ok(Self::new(Charset::from_code_points(code_points)?))
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn tables(&self) -> &OffsetTables {
        &self.tables
    }

    pub fn version(&self) -> &CharsetVersion {
        self.charset.version()
    }

    /// Number of symbols.
    pub fn base(&self) -> u32 {
        self.charset.len() as u32
    }

    pub fn encode_digit(&self, index: u32) -> Option<char> {
        self.tables.encode_index(index)
    }

    pub fn decode_char(&self, c: char) -> Option<u32> {
        self.tables.decode_index(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toy_alphabet() {
        let alphabet = Alphabet::from_code_points("ABCD".chars().map(|c| c as u32).collect())
            .unwrap();
        assert_eq!(alphabet.base(), 4);
        assert_eq!(alphabet.encode_digit(2), Some('C'));
        assert_eq!(alphabet.decode_char('D'), Some(3));
        assert_eq!(alphabet.decode_char('E'), None);
        assert_eq!(alphabet.tables().len(), 1);
    }
}
