use crate::core::alphabet::Alphabet;
use crate::core::charset::Charset;
use crate::core::oracle::{LiteralOracle, ProbedOracle, SafetyOracle};
use crate::encoders::layout::ChunkLayout;
use crate::encoders::stream::StreamCodec;
use crate::error::{CodePointDisplay, Error, Result};
use crate::features::compression::{Compression, CompressionAlgorithm};
use crate::packer::{BootstrapRenderer, Packer, PythonBootstrap};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One target environment: which code points survive it, how payloads
/// are chunked and compressed, and which bootstrap runs there.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    /// Code points the bootstrap literal cannot contain
    #[serde(default)]
    pub forbid: Vec<u32>,
    /// Oracle rejects U+D800..U+DFFF (default: true). Charsets never hold
    /// surrogates either way.
    #[serde(default = "default_true")]
    pub forbid_surrogates: bool,
    /// Persisted charset probed on the real runtime; replaces the rules above
    #[serde(default)]
    pub charset_file: Option<String>,
    /// Bytes per chunk
    #[serde(default = "default_unit_bytes")]
    pub unit_bytes: usize,
    /// Characters per chunk; must be the minimal value when given
    #[serde(default)]
    pub unit_chars: Option<usize>,
    #[serde(default = "default_compression")]
    pub compression: String,
    /// Compression level (algorithm default when unset)
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default = "default_bootstrap")]
    pub bootstrap: String,
}

fn default_true() -> bool {
    true
}

fn default_unit_bytes() -> usize {
    347
}

fn default_compression() -> String {
    "lzma".to_string()
}

fn default_bootstrap() -> String {
    "python".to_string()
}

impl ProfileConfig {
    /// The oracle this profile builds its charset from.
    pub fn oracle(&self) -> Result<Box<dyn SafetyOracle>> {
        match &self.charset_file {
            Some(path) => {
                let path = expand_path(path);
                let charset = Charset::load(&path).map_err(|e| match e {
                    Error::Io(_) | Error::Config(_) => Error::BuildUnavailable(format!(
                        "charset file {}: {}",
                        path.display(),
                        e
                    )),
                    other => other,
                })?;
                Ok(Box::new(ProbedOracle::new(charset.code_points().iter().copied())))
            }
            None => Ok(Box::new(LiteralOracle::new(
                self.forbid.iter().copied(),
                self.forbid_surrogates,
            ))),
        }
    }

    pub fn build_alphabet(&self) -> Result<Alphabet> {
        let oracle = self.oracle()?;
        Alphabet::build(oracle.as_ref())
    }

    /// Derives the layout for `charset_size`, checking an explicit
    /// `unit_chars` up front instead of failing mid-encode.
    pub fn layout(&self, charset_size: u32) -> Result<ChunkLayout> {
        match self.unit_chars {
            Some(unit_chars) => ChunkLayout::new(charset_size, self.unit_bytes, unit_chars),
            None => ChunkLayout::derive(charset_size, self.unit_bytes),
        }
    }

    pub fn build_codec(&self) -> Result<StreamCodec> {
        let alphabet = self.build_alphabet()?;
        let layout = self.layout(alphabet.base())?;
        StreamCodec::with_layout(Arc::new(alphabet), layout)
    }

    pub fn compression(&self) -> Result<Compression> {
        let algorithm: CompressionAlgorithm = self.compression.parse()?;
        Ok(algorithm.with_level(self.level.unwrap_or_else(|| algorithm.default_level())))
    }

    pub fn renderer(&self) -> Result<Box<dyn BootstrapRenderer>> {
        match self.bootstrap.as_str() {
            "python" => Ok(Box::new(PythonBootstrap)),
            other => Err(Error::Config(format!("unknown bootstrap: {}", other))),
        }
    }

    /// Builds the packer, refusing a charset that admits any character the
    /// bootstrap reserves.
    pub fn build_packer(&self) -> Result<Packer> {
        let renderer = self.renderer()?;
        let codec = self.build_codec()?;

        let charset = codec.alphabet().charset();
        let admitted: Vec<String> = renderer
            .forbidden_chars()
            .iter()
            .map(|&c| c as u32)
            .filter(|&cp| charset.contains(cp))
            .map(|cp| CodePointDisplay(cp).to_string())
            .collect();
        if !admitted.is_empty() {
            return Err(Error::InvalidCharset(format!(
                "the {} bootstrap reserves {}; add them to `forbid`",
                renderer.name(),
                admitted.join(", ")
            )));
        }

        Ok(Packer::new(codec, self.compression()?).with_renderer(renderer))
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Global settings.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Profile used when none is named on the command line
    #[serde(default)]
    pub default_profile: Option<String>,
}

/// Collection of profiles loaded from TOML files.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    pub profiles: HashMap<String, ProfileConfig>,
    #[serde(default)]
    pub settings: Settings,
}

impl ProfileRegistry {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the built-in profiles.
    pub fn load_default() -> Result<Self> {
        let content = include_str!("../../profiles.toml");
        Self::from_toml(content)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in profiles
    /// 2. `~/.config/widebase/profiles.toml`
    /// 3. `./profiles.toml`
    ///
    /// Later files override earlier ones per profile name.
    pub fn load_with_overrides() -> Result<Self> {
        let mut config = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("widebase").join("profiles.toml");
            config.merge_optional(&user_config_path);
        }

        config.merge_optional(Path::new("profiles.toml"));
        Ok(config)
    }

    fn merge_optional(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(other) => {
                tracing::debug!(path = %path.display(), "loaded profile overrides");
                self.merge(other);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load profile overrides");
            }
        }
    }

    /// Merges another registry into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: ProfileRegistry) {
        self.profiles.extend(other.profiles);
        if other.settings.default_profile.is_some() {
            self.settings.default_profile = other.settings.default_profile;
        }
    }

    pub fn get_profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.get(name)
    }

    /// Resolves `name`, falling back to the configured default profile.
    pub fn resolve(&self, name: Option<&str>) -> Result<(String, &ProfileConfig)> {
        let name = name
            .map(str::to_string)
            .or_else(|| self.settings.default_profile.clone())
            .ok_or_else(|| Error::Config("no profile given and no default_profile set".into()))?;
        let profile = self.get_profile(&name).ok_or_else(|| {
            let mut known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
            known.sort_unstable();
            Error::Config(format!(
                "unknown profile '{}' (available: {})",
                name,
                known.join(", ")
            ))
        })?;
        Ok((name, profile))
    }
}
