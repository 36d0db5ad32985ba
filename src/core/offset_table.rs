//! Run-length lookup tables between dense indices and code points.
//!
//! A charset of ~63k members has only a handful of gaps, so instead of a
//! 63k-entry array we keep one `(threshold, offset)` pair per contiguous
//! run. Both directions resolve with a binary search over the runs.

use crate::core::charset::Charset;
use crate::core::oracle::CODE_SPACE;

/// Dense index -> code point. Entries are `(first_index, offset)` in
/// descending order; a run's members are `index + offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeTable {
    entries: Vec<(u32, u32)>,
    size: u32,
}

impl EncodeTable {
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    pub fn lookup(&self, index: u32) -> Option<u32> {
        if index >= self.size {
            return None;
        }
        let pos = self.entries.partition_point(|&(threshold, _)| threshold > index);
        self.entries.get(pos).map(|&(_, offset)| index + offset)
    }
}

/// Code point -> dense index. Entries are `(last_code_point, offset)` in
/// ascending order, the final run closed by a sentinel at `0x10000`; a
/// run's members map to `code_point - offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    entries: Vec<(u32, u32)>,
}

impl DecodeTable {
    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    /// Unchecked lookup: gap code points map onto a neighbouring index.
    pub fn lookup(&self, code_point: u32) -> Option<u32> {
        let pos = self.entries.partition_point(|&(upper, _)| upper < code_point);
        self.entries
            .get(pos)
            .and_then(|&(_, offset)| code_point.checked_sub(offset))
    }
}

/// Both directions for one charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTables {
    encode: EncodeTable,
    decode: DecodeTable,
}

impl OffsetTables {
    pub fn build(charset: &Charset) -> Self {
        let runs = charset.runs();
        let size = charset.len() as u32;

        let mut encode = Vec::with_capacity(runs.len());
        let mut decode = Vec::with_capacity(runs.len());
        for (i, &(start_cp, start_index, len)) in runs.iter().enumerate() {
            let offset = start_cp - start_index;
            encode.push((start_index, offset));
            let upper = if i + 1 == runs.len() {
                CODE_SPACE
            } else {
                start_cp + len - 1
            };
            decode.push((upper, offset));
        }
        encode.reverse();

        OffsetTables {
            encode: EncodeTable {
                entries: encode,
                size,
            },
            decode: DecodeTable { entries: decode },
        }
    }

    pub fn encode_table(&self) -> &EncodeTable {
        &self.encode
    }

    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode
    }

    /// Number of entries in each table (one per run).
    pub fn len(&self) -> usize {
        self.encode.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.entries.is_empty()
    }

    pub fn encode_index(&self, index: u32) -> Option<char> {
        self.encode.lookup(index).and_then(char::from_u32)
    }

    /// Dense index of `c`, or `None` when `c` is not a charset member.
    pub fn decode_index(&self, c: char) -> Option<u32> {
        let code_point = c as u32;
        let index = self.decode.lookup(code_point)?;
        (self.encode.lookup(index) == Some(code_point)).then_some(index)
    }
}
