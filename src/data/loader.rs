use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::model::{LightCurve, Observation, Sample, SnType};

/// Broad-band filters used by the SNPCC simulation, in output order.
pub const SNPCC_FILTERS: [&str; 4] = ["g", "r", "i", "z"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one light curve from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.dat` / `.txt` – SNPCC keyword-tagged flat file, one object per file
/// * `.json`         – a single JSON light-curve record
pub fn load_file(path: &Path) -> Result<LightCurve> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "dat" | "txt" => load_snpcc(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// SNPCC loader
// ---------------------------------------------------------------------------

/// Keyword-tagged SNPCC flat file: header lines like `SNID: 1234` followed by
/// a `VARLIST:` column header and one `OBS:` line per photometry row.
fn load_snpcc(path: &Path) -> Result<LightCurve> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading light-curve file {}", path.display()))?;
    parse_snpcc(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Parse the SNPCC text format.
///
/// Photometry column positions come from the `VARLIST:` line, not from fixed
/// offsets, so files carrying extra columns (e.g. `FIELD`) parse fine.
pub fn parse_snpcc(text: &str) -> Result<LightCurve> {
    let mut id: Option<u64> = None;
    let mut redshift: Option<f64> = None;
    let mut sample: Option<Sample> = None;
    let mut sim_code: Option<u32> = None;
    let mut sim_peakmag: Vec<f64> = Vec::new();
    let mut varlist: Option<Vec<String>> = None;
    let mut obs_rows: Vec<Vec<String>> = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // only keyword lines with at least one value are informative
        if fields.len() < 2 {
            continue;
        }
        match fields[0] {
            "SNID:" => {
                id = Some(fields[1].parse().context("invalid SNID")?);
            }
            "SNTYPE:" => {
                sample = Some(if fields[1] == "-9" {
                    Sample::Test
                } else {
                    Sample::Train
                });
            }
            "SIM_REDSHIFT:" => {
                redshift = Some(fields[1].parse().context("invalid SIM_REDSHIFT")?);
            }
            "SIM_NON1a:" => {
                sim_code = Some(fields[1].parse().context("invalid SIM_NON1a code")?);
            }
            "SIM_PEAKMAG:" => {
                sim_peakmag = fields[1..]
                    .iter()
                    .take(SNPCC_FILTERS.len())
                    .map(|v| v.parse().context("invalid SIM_PEAKMAG value"))
                    .collect::<Result<_>>()?;
            }
            "VARLIST:" => {
                varlist = Some(fields[1..].iter().map(|s| s.to_string()).collect());
            }
            "OBS:" => {
                obs_rows.push(fields[1..].iter().map(|s| s.to_string()).collect());
            }
            _ => {}
        }
    }

    let varlist = varlist.context("missing VARLIST: header")?;
    let column = |name: &str| -> Result<usize> {
        varlist
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("VARLIST missing column {name}"))
    };
    let mjd_col = column("MJD")?;
    let band_col = column("FLT")?;
    let flux_col = column("FLUXCAL")?;
    let flux_err_col = column("FLUXCALERR")?;
    let snr_col = column("SNR")?;

    let mut photometry = Vec::with_capacity(obs_rows.len());
    for (row_no, row) in obs_rows.iter().enumerate() {
        let cell = |col: usize| -> Result<&str> {
            row.get(col)
                .map(|s| s.as_str())
                .with_context(|| format!("OBS row {row_no}: missing column {col}"))
        };
        let value = |col: usize| -> Result<f64> {
            cell(col)?
                .parse()
                .with_context(|| format!("OBS row {row_no}: '{}' is not a number", row[col]))
        };
        photometry.push(Observation {
            mjd: value(mjd_col)?,
            band: cell(band_col)?.to_string(),
            flux: value(flux_col)?,
            flux_err: value(flux_err_col)?,
            snr: value(snr_col)?,
        });
    }

    let sim_code = sim_code.context("missing SIM_NON1a:")?;
    let sn_type = SnType::from_sim_code(sim_code)?;

    Ok(LightCurve {
        id: id.context("missing SNID:")?,
        redshift: redshift.context("missing SIM_REDSHIFT:")?,
        sample: sample.context("missing SNTYPE:")?,
        sn_type,
        sim_code,
        sim_peakmag,
        bands: SNPCC_FILTERS.iter().map(|b| b.to_string()).collect(),
        photometry,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema – one record per file:
///
/// ```json
/// {
///   "id": 1234,
///   "redshift": 0.42,
///   "sample": "test",
///   "sim_code": 0,
///   "bands": ["g", "r", "i", "z"],
///   "photometry": [
///     { "mjd": 56178.4, "band": "g", "flux": 12.5, "flux_err": 1.2, "snr": 10.4 },
///     ...
///   ]
/// }
/// ```
///
/// The class label is derived from `sim_code`, never stored in the file.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    id: u64,
    redshift: f64,
    sample: Sample,
    sim_code: u32,
    #[serde(default)]
    sim_peakmag: Vec<f64>,
    bands: Vec<String>,
    photometry: Vec<Observation>,
}

fn load_json(path: &Path) -> Result<LightCurve> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading JSON file {}", path.display()))?;
    let record: JsonRecord = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;

    let sn_type = SnType::from_sim_code(record.sim_code)?;
    Ok(LightCurve {
        id: record.id,
        redshift: record.redshift,
        sample: record.sample,
        sn_type,
        sim_code: record.sim_code,
        sim_peakmag: record.sim_peakmag,
        bands: record.bands,
        photometry: record.photometry,
    })
}
