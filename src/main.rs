use std::env;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use rusty_nova::data::loader::{self, SNPCC_FILTERS};
use rusty_nova::features::{self, table};

/// Batch driver: fit every light curve in a data directory and write the
/// surviving feature rows to a table.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(data_dir), Some(features_file)) = (args.next(), args.next()) else {
        bail!("usage: rusty-nova <data-dir> <features-file>");
    };
    let data_dir = PathBuf::from(data_dir);
    let features_file = PathBuf::from(features_file);

    // one file per object; the SNPCC simulation names them DES_SN*
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&data_dir)
        .with_context(|| format!("reading data directory {}", data_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("DES_SN"))
        })
        .collect();
    paths.sort();
    if paths.is_empty() {
        bail!("no DES_SN* light-curve files in {}", data_dir.display());
    }

    let mut curves = Vec::with_capacity(paths.len());
    for path in &paths {
        match loader::load_file(path) {
            Ok(lc) => curves.push(lc),
            // a bad record (e.g. unknown simulation code) is reported and
            // skipped, never fatal for the batch
            Err(e) => log::warn!("skipping {}: {e:#}", path.display()),
        }
    }
    log::info!("loaded {} of {} light curves", curves.len(), paths.len());

    let rows = features::extract_batch(&curves);

    let bands: Vec<String> = SNPCC_FILTERS.iter().map(|b| b.to_string()).collect();
    let file = File::create(&features_file)
        .with_context(|| format!("creating {}", features_file.display()))?;
    let survivors = table::write_survivors(file, &bands, &rows)?;
    log::info!(
        "{survivors} of {} light curves survived with complete features",
        rows.len()
    );

    Ok(())
}
