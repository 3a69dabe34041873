//! Reading candidate lists and writing check results

use crate::error::Error;
use crate::proxy::models::{Candidate, ProbeOutcome};
use crate::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Parse candidates from a string, one per line.
///
/// Blank lines and `#` comments are skipped. Duplicates are kept.
pub fn parse_candidates(content: &str) -> Vec<Candidate> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load candidates from a file
pub fn load_candidates<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::InputNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    Ok(parse_candidates(&content))
}

/// `<dir>/<stem>_results.json` next to the input list
pub fn results_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_results.json", stem))
}

/// Save outcomes as a pretty-printed JSON array
pub fn save_outcomes_json<P: AsRef<Path>>(outcomes: &[ProbeOutcome], path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(outcomes)?;
    fs::write(path, content)?;
    Ok(())
}

/// Save the candidate of each outcome, one per line
pub fn save_candidate_list<P: AsRef<Path>>(outcomes: &[ProbeOutcome], path: P) -> Result<()> {
    let content: String = outcomes
        .iter()
        .map(|o| format!("{}\n", o.proxy))
        .collect();
    fs::write(path, content)?;
    Ok(())
}
