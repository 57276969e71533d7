//! Plain-text feature table: `id redshift type code sample` followed by five
//! columns per band, whitespace separated.  A missing slot is the literal
//! token `None`, so a consumer can tell "value" from "no fit" without
//! sniffing NaNs.

use std::io::{BufWriter, Read, Write};

use anyhow::{bail, Context, Result};

use super::{BandFeatures, FeatureRow, FeatureVector};
use crate::fit::{BazinParams, N_PARAMS, PARAM_SUFFIXES};

/// Serialized form of a missing slot.
pub const MISSING_TOKEN: &str = "None";

/// Number of metadata columns before the per-band feature columns.
const META_COLUMNS: usize = 5;

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Column names for the given band order:
/// `id redshift type code sample gA gB gt0 gtfall gtrise rA ...`
pub fn header_columns(bands: &[String]) -> Vec<String> {
    let mut cols: Vec<String> = ["id", "redshift", "type", "code", "sample"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    for band in bands {
        for suffix in PARAM_SUFFIXES {
            cols.push(format!("{band}{suffix}"));
        }
    }
    cols
}

/// Write the full feature table.  One buffered writer for the whole session,
/// flushed once at the end.
pub fn write_features<W: Write>(writer: W, bands: &[String], rows: &[FeatureRow]) -> Result<()> {
    let mut w = BufWriter::new(writer);
    writeln!(w, "{}", header_columns(bands).join(" ")).context("writing feature-table header")?;
    for row in rows {
        write_row(&mut w, row)?;
    }
    w.flush().context("flushing feature table")?;
    Ok(())
}

/// Write only the rows whose vector is complete.  This is the strict
/// survivor policy: any missing slot, in any band, excludes the object.
/// Returns the survivor count so the caller can report it.
pub fn write_survivors<W: Write>(
    writer: W,
    bands: &[String],
    rows: &[FeatureRow],
) -> Result<usize> {
    let mut w = BufWriter::new(writer);
    writeln!(w, "{}", header_columns(bands).join(" ")).context("writing feature-table header")?;
    let mut survivors = 0;
    for row in rows.iter().filter(|r| r.features.is_complete()) {
        write_row(&mut w, row)?;
        survivors += 1;
    }
    w.flush().context("flushing feature table")?;
    Ok(survivors)
}

fn write_row<W: Write>(w: &mut W, row: &FeatureRow) -> Result<()> {
    write!(
        w,
        "{} {} {} {} {}",
        row.id, row.redshift, row.sn_type, row.sim_code, row.sample
    )?;
    for slot in row.features.slots() {
        match slot {
            Some(v) => write!(w, " {v}")?,
            None => write!(w, " {MISSING_TOKEN}")?,
        }
    }
    writeln!(w)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read a feature table back, recovering both values and missing markers.
/// Returns the band order declared by the header together with the rows.
pub fn read_features<R: Read>(reader: R) -> Result<(Vec<String>, Vec<FeatureRow>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .from_reader(reader);

    let headers = rdr.headers().context("reading feature-table header")?.clone();
    let cols: Vec<&str> = headers.iter().collect();
    if cols.len() < META_COLUMNS || (cols.len() - META_COLUMNS) % N_PARAMS != 0 {
        bail!("malformed feature-table header: {} columns", cols.len());
    }

    let bands: Vec<String> = cols[META_COLUMNS..]
        .chunks(N_PARAMS)
        .map(|chunk| -> Result<String> {
            let band = chunk[0]
                .strip_suffix('A')
                .with_context(|| format!("malformed feature column '{}'", chunk[0]))?
                .to_string();
            for (name, suffix) in chunk.iter().zip(PARAM_SUFFIXES) {
                if *name != format!("{band}{suffix}") {
                    bail!("malformed feature column '{name}', expected '{band}{suffix}'");
                }
            }
            Ok(band)
        })
        .collect::<Result<_>>()?;

    let mut rows = Vec::new();
    for (row_no, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("feature-table row {row_no}"))?;
        rows.push(
            parse_row(&record, &bands)
                .with_context(|| format!("feature-table row {row_no}"))?,
        );
    }
    Ok((bands, rows))
}

fn parse_row(record: &csv::StringRecord, bands: &[String]) -> Result<FeatureRow> {
    let expected = META_COLUMNS + bands.len() * N_PARAMS;
    if record.len() != expected {
        bail!("expected {expected} fields, found {}", record.len());
    }
    let field = |i: usize| record.get(i).unwrap_or("");

    let id = field(0).parse().context("invalid id")?;
    let redshift = field(1).parse().context("invalid redshift")?;
    let sn_type = field(2).parse().map_err(anyhow::Error::msg)?;
    let sim_code = field(3).parse().context("invalid code")?;
    let sample = field(4).parse().map_err(anyhow::Error::msg)?;

    let mut band_features = Vec::with_capacity(bands.len());
    for (b, band) in bands.iter().enumerate() {
        let start = META_COLUMNS + b * N_PARAMS;
        let cells: Vec<&str> = (start..start + N_PARAMS).map(field).collect();
        let missing = cells.iter().filter(|c| **c == MISSING_TOKEN).count();
        let fit = match missing {
            0 => {
                let mut values = [0.0; N_PARAMS];
                for (v, cell) in values.iter_mut().zip(&cells) {
                    *v = cell
                        .parse()
                        .with_context(|| format!("'{cell}' is not a number"))?;
                }
                Some(BazinParams::from_array(values))
            }
            n if n == N_PARAMS => None,
            // a band is all-or-nothing; a partial marker means a corrupt file
            _ => bail!("band {band} mixes values and {MISSING_TOKEN} markers"),
        };
        band_features.push(BandFeatures {
            band: band.clone(),
            fit,
        });
    }

    Ok(FeatureRow {
        id,
        redshift,
        sn_type,
        sim_code,
        sample,
        features: FeatureVector::from_bands(band_features),
    })
}
