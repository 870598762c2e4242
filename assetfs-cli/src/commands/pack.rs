//! `pack`: build an archive from a directory tree.

use std::path::Path;

use assetfs::pool::{PackWriter, DEFAULT_PARTITION};

use crate::error::CliError;

/// Pack every file under `source` into `output`.
///
/// Returns the number of files written.
pub fn run(output: &Path, source: &Path, partition: Option<&str>) -> Result<usize, CliError> {
    let partition = partition.unwrap_or(DEFAULT_PARTITION);

    let mut writer = PackWriter::new();
    let count = writer.add_directory_tree(partition, source)?;
    writer.write_to(output)?;

    if partition.is_empty() {
        println!("Packed {} files into {}", count, output.display());
    } else {
        println!(
            "Packed {} files into {} (partition '{}')",
            count,
            output.display(),
            partition
        );
    }

    Ok(count)
}
