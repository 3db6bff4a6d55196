use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One launch, serialized with the dashboard's column names.
#[derive(Serialize)]
struct LaunchRow {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
}

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (category, launches, typical payload kg, success probability), in
    // chronological order of the booster generations.
    let generations: [(&str, usize, f64, f64); 5] = [
        ("v1.0", 5, 300.0, 0.0),
        ("v1.1", 15, 2500.0, 0.35),
        ("FT", 24, 5000.0, 0.7),
        ("B4", 11, 6000.0, 0.55),
        ("B5", 1, 9600.0, 1.0),
    ];
    let early_sites = ["CCAFS LC-40", "VAFB SLC-4E"];
    let late_sites = ["KSC LC-39A", "CCAFS SLC-40", "VAFB SLC-4E"];

    let mut rows: Vec<LaunchRow> = Vec::new();
    for (generation, &(category, launches, payload, success_rate)) in generations.iter().enumerate() {
        let sites: &[&str] = if generation < 2 { &early_sites } else { &late_sites };
        for serial in 0..launches {
            let flight_number = rows.len() as i64 + 1;
            let payload_mass_kg = rng.gauss(payload, payload * 0.4).clamp(0.0, 15600.0).round();
            rows.push(LaunchRow {
                flight_number,
                launch_site: rng.pick(sites).to_string(),
                class: i64::from(rng.next_f64() < success_rate),
                payload_mass_kg,
                booster_version: format!("F9 {category} B{:04}", 1000 + flight_number * 3 + serial as i64),
                booster_category: category.to_string(),
            });
        }
    }

    // Write CSV
    let csv_path = "spacex_launch_dash.csv";
    let mut csv_writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        csv_writer.serialize(row).expect("Failed to write CSV row");
    }
    csv_writer.flush().expect("Failed to flush CSV");

    // Write the same table as Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.launch_site.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.booster_version.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.booster_category.as_str()))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "spacex_launch_dash.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} launches to {csv_path} and {parquet_path}",
        rows.len()
    );
}
