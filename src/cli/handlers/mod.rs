pub mod charset;
pub mod decode;
pub mod encode;
pub mod layout;
pub mod pack;
pub mod profiles;
pub mod unpack;

use std::path::Path;
use widebase::{Error, Result};

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    String::from_utf8(std::fs::read(path)?)
        .map_err(|e| Error::MalformedInput(format!("{} is not UTF-8: {}", path.display(), e)))
}
