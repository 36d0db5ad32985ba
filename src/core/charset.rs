use crate::core::oracle::{CODE_SPACE, SURROGATES, SafetyOracle};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Line and paragraph separators. They are always excluded: several
/// runtimes and clipboards treat them as line breaks inside literals.
pub const SEPARATORS: [u32; 2] = [0x2028, 0x2029];

/// Ordered set of code points usable as encoding symbols.
///
/// Strictly increasing, below U+10000, free of separators and surrogates,
/// read-only once built. Its size fixes every numeric constant downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    code_points: Vec<u32>,
    version: CharsetVersion,
}

impl Charset {
    /// Builds a charset from an already computed list of code points.
    pub fn from_code_points(code_points: Vec<u32>) -> Result<Self> {
        validate(&code_points)?;
        let version = CharsetVersion::compute(&code_points);
        Ok(Charset {
            code_points,
            version,
        })
    }

    /// Filters the whole code space through `oracle`.
    ///
    /// Any oracle failure aborts the build; a partial charset would
    /// silently disagree with the decoder.
    pub fn build<O: SafetyOracle + ?Sized>(oracle: &O) -> Result<Self> {
        let mut code_points = Vec::new();
        for cp in 0..CODE_SPACE {
            if SEPARATORS.contains(&cp) || SURROGATES.contains(&cp) {
                continue;
            }
            let safe = oracle
                .is_safe(cp)
                .map_err(|e| Error::BuildUnavailable(e.to_string()))?;
            if safe {
                code_points.push(cp);
            }
        }
        let charset = Self::from_code_points(code_points)?;
        tracing::info!(
            size = charset.len(),
            runs = charset.discontinuities(),
            version = %charset.version(),
            "built charset"
        );
        Ok(charset)
    }

    pub fn len(&self) -> usize {
        self.code_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_points.is_empty()
    }

    pub fn code_points(&self) -> &[u32] {
        &self.code_points
    }

    pub fn version(&self) -> &CharsetVersion {
        &self.version
    }

    /// Binary search membership test.
    pub fn contains(&self, code_point: u32) -> bool {
        self.code_points.binary_search(&code_point).is_ok()
    }

    /// Contiguous runs as `(first_code_point, first_dense_index, len)`.
    pub fn runs(&self) -> Vec<(u32, u32, u32)> {
        let mut runs: Vec<(u32, u32, u32)> = Vec::new();
        let mut previous: Option<u32> = None;
        for (index, &cp) in self.code_points.iter().enumerate() {
            let extends = previous.is_some_and(|prev| cp == prev + 1);
            if let (true, Some(run)) = (extends, runs.last_mut()) {
                run.2 += 1;
            } else {
                runs.push((cp, index as u32, 1));
            }
            previous = Some(cp);
        }
        runs
    }

    /// Number of positions where a new run starts; the first code point
    /// always starts one.
    pub fn discontinuities(&self) -> usize {
        self.runs().len()
    }

    /// Persists the charset as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = CharsetFile {
            version: self.version.to_string(),
            code_points: self.code_points.clone(),
        };
        std::fs::write(path, serde_json::to_string(&file)?)?;
        Ok(())
    }

    /// Loads a persisted charset, re-validating it and its version tag.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CharsetFile = serde_json::from_str(content)?;
        let charset = Self::from_code_points(file.code_points)?;
        if charset.version.to_string() != file.version {
            return Err(Error::VersionMismatch {
                expected: file.version,
                found: charset.version.to_string(),
            });
        }
        Ok(charset)
    }
}

fn validate(code_points: &[u32]) -> Result<()> {
    if code_points.len() < 2 {
        return Err(Error::InvalidCharset(format!(
            "need at least 2 symbols, got {}",
            code_points.len()
        )));
    }
    for pair in code_points.windows(2) {
        if pair[1] <= pair[0] {
            return Err(Error::InvalidCharset(format!(
                "code points must be strictly increasing (U+{:04X} after U+{:04X})",
                pair[1], pair[0]
            )));
        }
    }
    if let Some(&last) = code_points.last()
        && last >= CODE_SPACE
    {
        return Err(Error::InvalidCharset(format!(
            "U+{:X} is outside the basic multilingual plane",
            last
        )));
    }
    if let Some(sep) = code_points.iter().find(|cp| SEPARATORS.contains(cp)) {
        return Err(Error::InvalidCharset(format!(
            "U+{:04X} is a separator and cannot be a symbol",
            sep
        )));
    }
    if let Some(sur) = code_points.iter().find(|&&cp| SURROGATES.contains(&cp)) {
        return Err(Error::InvalidCharset(format!(
            "U+{:04X} is a surrogate and cannot be a symbol",
            sur
        )));
    }
    Ok(())
}

/// On-disk form of a charset.
#[derive(Debug, Serialize, Deserialize)]
struct CharsetFile {
    version: String,
    code_points: Vec<u32>,
}

/// Identity of a charset: its size plus a digest of its members.
///
/// Encoder and decoder must agree on this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharsetVersion {
    pub size: usize,
    pub fingerprint: String,
}

impl CharsetVersion {
    fn compute(code_points: &[u32]) -> Self {
        let mut hasher = Sha256::new();
        for cp in code_points {
            hasher.update(cp.to_le_bytes());
        }
        let digest = hasher.finalize();
        CharsetVersion {
            size: code_points.len(),
            fingerprint: hex::encode(&digest[..8]),
        }
    }
}

impl fmt::Display for CharsetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.size, self.fingerprint)
    }
}
