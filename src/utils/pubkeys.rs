//! Validator public key helpers

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Hex characters in one BLS validator public key (48 bytes)
pub const PUBKEY_LENGTH: usize = 96;

/// Split concatenated deposit pubkey bytes into individual `0x`-prefixed keys
///
/// A trailing segment shorter than [`PUBKEY_LENGTH`] is returned as-is.
pub fn split_validator_pubkey_bytes(pubkeys: &str) -> Vec<String> {
    let raw: Vec<char> = pubkeys.strip_prefix("0x").unwrap_or(pubkeys).chars().collect();
    raw.chunks(PUBKEY_LENGTH)
        .map(|segment| format!("0x{}", segment.iter().collect::<String>()))
        .collect()
}

/// Load every non-empty line from the files in `dir` whose name starts with `prefix`
///
/// Files are read in name order so the result is stable across platforms.
pub fn load_public_keys_from_files(prefix: &str, dir: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix))
        .collect();
    names.sort();

    let mut keys = Vec::new();
    for name in names {
        let content = fs::read_to_string(dir.as_ref().join(&name))?;
        let before = keys.len();
        keys.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
        debug!("Loaded {} keys from {}", keys.len() - before, name);
    }

    Ok(keys)
}
