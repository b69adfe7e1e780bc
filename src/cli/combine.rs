//! Raw SECOM file combination

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use crate::pipeline::{load_secom, save_dataset};
use crate::utils::create_spinner;

/// Default output path: `<data stem>_combined.csv` next to the measurement file
pub fn default_combined_path(data: &Path) -> PathBuf {
    let parent = data.parent().unwrap_or_else(|| Path::new("."));
    let stem = data
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("secom");
    parent.join(format!("{}_combined.csv", stem))
}

/// Combine raw measurement and label files into one table and save it
///
/// # Arguments
/// * `data` - Space-separated measurement file
/// * `labels` - Space-separated labels file
/// * `output` - Optional output path (CSV or Parquet)
pub fn run_combine(data: &Path, labels: &Path, output: Option<&Path>) -> Result<()> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_combined_path(data));

    println!(
        "\n {} Combining raw measurements with labels",
        style("◆").cyan().bold()
    );
    println!("   Data:   {}", style(data.display()).dim());
    println!("   Labels: {}", style(labels.display()).dim());
    println!("   Output: {}", style(output_path.display()).dim());
    println!();

    let spinner = create_spinner("Reading raw files...");
    let mut df = load_secom(data, labels)?;
    spinner.finish_with_message(format!("{} Raw files loaded", style("✓").green()));

    let spinner = create_spinner("Writing combined table...");
    save_dataset(&mut df, &output_path)?;
    spinner.finish_with_message(format!("{} Combined table written", style("✓").green()));

    println!();
    println!(
        "   {} units × {} parameters",
        style(df.height()).yellow(),
        style(df.width().saturating_sub(1)).yellow()
    );
    println!();
    println!(" {} Combine complete!", style("✓").green().bold());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_combined_path() {
        let path = default_combined_path(Path::new("/data/secom.data"));
        assert_eq!(path, PathBuf::from("/data/secom_combined.csv"));
    }
}
