//! Writes a synthetic Philippine earthquake catalogue next to the executable,
//! where the viewer looks for it. Pass `--parquet` to also write a Parquet copy.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const OUTPUT_NAME: &str = "phivolcs_earthquake_data_clean";
const EVENT_COUNT: usize = 2500;

/// Seismic source zones: (province, centre lat, centre lon, spread deg, typical depth km).
const ZONES: &[(&str, f64, f64, f64, f64)] = &[
    ("Davao Oriental", 7.0, 126.6, 0.8, 30.0),
    ("Surigao del Sur", 8.7, 126.5, 0.6, 25.0),
    ("Surigao del Norte", 9.8, 125.6, 0.4, 15.0),
    ("Sarangani", 5.6, 125.3, 0.7, 60.0),
    ("Batangas", 13.8, 120.7, 0.5, 100.0),
    ("Occidental Mindoro", 13.0, 120.4, 0.6, 40.0),
    ("Eastern Samar", 11.6, 125.9, 0.7, 20.0),
    ("Abra", 17.6, 120.8, 0.4, 15.0),
    ("Masbate", 12.2, 123.6, 0.4, 10.0),
    ("Cotabato", 6.9, 124.9, 0.5, 12.0),
];

const BEARINGS: &[&str] = &["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Gutenberg–Richter style magnitudes: many small, few large.
    fn magnitude(&mut self) -> f64 {
        let m = 1.5 - self.next_f64().max(1e-12).log10();
        (m.min(8.0) * 10.0).round() / 10.0
    }
}

struct Row {
    datetime: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    depth_km: f64,
    magnitude: f64,
    region: Option<String>,
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building catalogue start date")?;
    let span_secs = 6 * 365 * 24 * 3600;

    let mut rows: Vec<Row> = (0..EVENT_COUNT)
        .map(|_| {
            let &(province, lat, lon, spread, depth) = &ZONES[rng.below(ZONES.len())];
            let when = start + Duration::seconds((rng.next_f64() * span_secs as f64) as i64);
            let km = rng.below(60) + 1;
            let bearing = BEARINGS[rng.below(BEARINGS.len())];
            Row {
                datetime: when.format("%Y-%m-%d %H:%M:%S").to_string(),
                latitude: Some((rng.gauss(lat, spread) * 100.0).round() / 100.0),
                longitude: Some((rng.gauss(lon, spread) * 100.0).round() / 100.0),
                depth_km: rng.gauss(depth, depth / 3.0).abs().round().max(1.0),
                magnitude: rng.magnitude(),
                region: Some(format!("{km:03} km {bearing} of {province} ({province})")),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.datetime.cmp(&b.datetime));

    // A few imperfect rows, as real bulletins have.
    rows[3].latitude = None;
    rows[7].longitude = None;
    rows[11].region = None;
    rows[13].datetime = "pending review".to_string();
    Ok(rows)
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["datetime", "latitude", "longitude", "depth_km", "magnitude", "region"])?;
    for r in rows {
        writer.write_record([
            r.datetime.clone(),
            r.latitude.map(|v| v.to_string()).unwrap_or_default(),
            r.longitude.map(|v| v.to_string()).unwrap_or_default(),
            r.depth_km.to_string(),
            r.magnitude.to_string(),
            r.region.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("datetime", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, true),
        Field::new("longitude", DataType::Float64, true),
        Field::new("depth_km", DataType::Float64, false),
        Field::new("magnitude", DataType::Float64, false),
        Field::new("region", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.datetime.as_str()))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.latitude))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.longitude))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.depth_km))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.magnitude))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.region.as_deref()))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let with_parquet = std::env::args().any(|a| a == "--parquet");
    let exe = std::env::current_exe().context("locating the running executable")?;
    let dir = exe.parent().context("executable has no parent directory")?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng)?;

    let csv_path = dir.join(format!("{OUTPUT_NAME}.csv"));
    write_csv(&rows, &csv_path)?;
    println!("Wrote {} events to {}", rows.len(), csv_path.display());

    if with_parquet {
        let pq_path = dir.join(format!("{OUTPUT_NAME}.parquet"));
        write_parquet(&rows, &pq_path)?;
        println!("Wrote {} events to {}", rows.len(), pq_path.display());
    }
    Ok(())
}
