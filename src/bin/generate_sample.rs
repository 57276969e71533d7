use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rusty_nova::fit::{bazin, N_PARAMS};

const BANDS: [&str; 4] = ["g", "r", "i", "z"];
const N_OBJECTS: usize = 60;
const EPOCHS_PER_BAND: usize = 25;
const MJD_START: f64 = 56170.0;

// a few representative simulation codes per class
const II_CODES: [u32; 3] = [2, 33, 42];
const IBC_CODES: [u32; 3] = [1, 23, 45];

/// Box-Muller transform for normal deviates.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(1e-15);
    let u2 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Synthetic Bazin parameters for one band: per-band amplitude scaling,
/// shared peak epoch and timescales with a little scatter.
fn band_params(rng: &mut StdRng, band_index: usize) -> [f64; N_PARAMS] {
    let amplitude = (80.0 + rng.gen::<f64>() * 80.0) * (1.0 - 0.1 * band_index as f64);
    let baseline = gauss(rng, 0.0, 2.0);
    let t0 = 25.0 + rng.gen::<f64>() * 15.0;
    let tau_fall = 30.0 + rng.gen::<f64>() * 20.0;
    let tau_rise = 3.0 + rng.gen::<f64>() * 4.0;
    [amplitude, baseline, t0, tau_fall, tau_rise]
}

fn main() {
    let out_dir = PathBuf::from(
        env::args()
            .nth(1)
            .unwrap_or_else(|| "sample_data".to_string()),
    );
    fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let mut rng = StdRng::seed_from_u64(42);

    for i in 0..N_OBJECTS {
        let id = 10_000 + i as u64;
        let sim_code = match i % 3 {
            0 => 0,
            1 => II_CODES[rng.gen_range(0..II_CODES.len())],
            _ => IBC_CODES[rng.gen_range(0..IBC_CODES.len())],
        };
        let redshift = 0.05 + rng.gen::<f64>() * 0.9;
        let is_test = i % 2 == 0;

        let params: Vec<[f64; N_PARAMS]> = (0..BANDS.len())
            .map(|b| band_params(&mut rng, b))
            .collect();

        let mut text = String::new();
        writeln!(text, "SURVEY: DES").unwrap();
        writeln!(text, "SNID: {id}").unwrap();
        writeln!(text, "SNTYPE: {}", if is_test { "-9" } else { "1" }).unwrap();
        writeln!(text, "FILTERS: griz").unwrap();
        writeln!(text, "SIM_REDSHIFT: {redshift:.4}").unwrap();
        writeln!(text, "SIM_NON1a: {sim_code}").unwrap();
        writeln!(
            text,
            "SIM_PEAKMAG: {:.2} {:.2} {:.2} {:.2}",
            22.0 + rng.gen::<f64>(),
            22.0 + rng.gen::<f64>(),
            22.0 + rng.gen::<f64>(),
            22.0 + rng.gen::<f64>()
        )
        .unwrap();
        writeln!(text, "VARLIST: MJD FLT FIELD FLUXCAL FLUXCALERR SNR").unwrap();

        for epoch in 0..EPOCHS_PER_BAND {
            for (b, band) in BANDS.iter().enumerate() {
                // every 7th object loses most of its z band, so the batch
                // driver has incomplete objects to drop
                if i % 7 == 0 && b == 3 && epoch >= 3 {
                    continue;
                }
                let t = epoch as f64 * 4.0 + rng.gen::<f64>();
                let flux_err = 1.0 + rng.gen::<f64>();
                let flux = bazin(t, &params[b]) + gauss(&mut rng, 0.0, flux_err);
                writeln!(
                    text,
                    "OBS: {:.3} {band} X1 {flux:.4} {flux_err:.4} {:.4}",
                    MJD_START + t,
                    flux / flux_err
                )
                .unwrap();
            }
        }
        writeln!(text, "END:").unwrap();

        let path = out_dir.join(format!("DES_SN{id:06}.DAT"));
        fs::write(&path, text).expect("Failed to write light-curve file");
    }

    println!(
        "Wrote {N_OBJECTS} light curves ({} bands each) to {}",
        BANDS.len(),
        out_dir.display()
    );
}
