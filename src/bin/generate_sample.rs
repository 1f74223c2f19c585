use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let genres = [
        "Action",
        "Sports",
        "Racing",
        "Shooter",
        "Puzzle",
        "Role-Playing",
    ];
    let platforms = ["PS4", "X360", "PC", "Wii", "DS", "Switch"];

    // Collect all rows as parallel columns
    let mut all_genre: Vec<String> = Vec::new();
    let mut all_platform: Vec<String> = Vec::new();
    let mut all_year: Vec<Option<i32>> = Vec::new();
    let mut all_na: Vec<f64> = Vec::new();
    let mut all_eu: Vec<f64> = Vec::new();
    let mut all_jp: Vec<f64> = Vec::new();
    let mut all_global: Vec<f64> = Vec::new();

    for (gi, genre) in genres.iter().enumerate() {
        for (pi, platform) in platforms.iter().enumerate() {
            // Each genre/platform pairing gets its own sales magnitude
            let popularity = 0.4 + 0.25 * ((gi + 2 * pi) % 5) as f64;
            let releases = 8 + (gi * 7 + pi * 3) % 6;

            for _ in 0..releases {
                // A small share of releases has an unknown year, as in the
                // real vgsales table.
                let year = if rng.next_f64() < 0.03 {
                    None
                } else {
                    Some(2000 + (rng.next_f64() * 17.0) as i32)
                };

                let na = (rng.gauss(0.8, 0.5) * popularity).max(0.0);
                // EU sales track NA sales with noise
                let eu = (na * 0.7 + rng.gauss(0.1, 0.2)).max(0.0);
                let jp = (rng.gauss(0.3, 0.25) * popularity).max(0.0);
                let other = rng.gauss(0.05, 0.02).abs();

                all_genre.push(genre.to_string());
                all_platform.push(platform.to_string());
                all_year.push(year);
                all_na.push(round2(na));
                all_eu.push(round2(eu));
                all_jp.push(round2(jp));
                all_global.push(round2(na + eu + jp + other));
            }
        }
    }

    let n_rows = all_genre.len();

    // ---- CSV ----
    let csv_path = "sample_sales.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "Genre",
            "Platform",
            "Year",
            "NA_Sales",
            "EU_Sales",
            "JP_Sales",
            "Global_Sales",
        ])
        .expect("Failed to write CSV header");
    for i in 0..n_rows {
        let year = all_year[i]
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let (na, eu, jp, global) = (
            all_na[i].to_string(),
            all_eu[i].to_string(),
            all_jp[i].to_string(),
            all_global[i].to_string(),
        );
        writer
            .write_record([
                all_genre[i].as_str(),
                all_platform[i].as_str(),
                year.as_str(),
                na.as_str(),
                eu.as_str(),
                jp.as_str(),
                global.as_str(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let genre_array = StringArray::from(all_genre.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let platform_array =
        StringArray::from(all_platform.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let year_array = Int32Array::from(all_year);
    let na_array = Float64Array::from(all_na);
    let eu_array = Float64Array::from(all_eu);
    let jp_array = Float64Array::from(all_jp);
    let global_array = Float64Array::from(all_global);

    let schema = Arc::new(Schema::new(vec![
        Field::new("Genre", DataType::Utf8, false),
        Field::new("Platform", DataType::Utf8, false),
        Field::new("Year", DataType::Int32, true),
        Field::new("NA_Sales", DataType::Float64, false),
        Field::new("EU_Sales", DataType::Float64, false),
        Field::new("JP_Sales", DataType::Float64, false),
        Field::new("Global_Sales", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(genre_array),
            Arc::new(platform_array),
            Arc::new(year_array),
            Arc::new(na_array),
            Arc::new(eu_array),
            Arc::new(jp_array),
            Arc::new(global_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_sales.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} records to {csv_path} and {parquet_path}");
}
