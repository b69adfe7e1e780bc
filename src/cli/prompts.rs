//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user before writing into an output directory that already holds files
pub fn confirm_overwrite(dir: &Path, existing: usize) -> Result<bool> {
    let message = format!(
        "{} already contains {} file(s). Overwrite existing reports?",
        dir.display(),
        existing
    );
    confirm_step(&message)
}
