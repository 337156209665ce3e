use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

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

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// GISTEMP layout: a title line, then monthly columns and the J-D annual
/// mean, in hundredths of a degree, `***` where a month is not yet in.
fn write_temperature(dir: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let path = dir.join("GLB.Ts+dSST.csv");
    // Title and table rows differ in width.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Land-Ocean: Global Means"])?;
    writer.write_record([
        "Year", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        "J-D", "D-N", "DJF", "MAM", "JJA", "SON",
    ])?;

    let mut rows = 0;
    for year in 1880..=2024 {
        let t = (year - 1880) as f64;
        // Slow warming that accelerates after 1970.
        let base = -20.0 + 0.15 * t + if year > 1970 { 1.6 * (year - 1970) as f64 } else { 0.0 };
        let months: Vec<f64> = (0..12).map(|_| base + rng.gauss(0.0, 8.0)).collect();
        let annual = months.iter().sum::<f64>() / 12.0;

        let mut cells: Vec<String> = vec![year.to_string()];
        cells.extend(months.iter().map(|m| format!("{}", m.round() as i64)));
        if year == 2024 {
            cells.push("***".to_string());
        } else {
            cells.push(format!("{}", annual.round() as i64));
        }
        cells.extend(std::iter::repeat("***".to_string()).take(5));
        writer.write_record(&cells)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}

/// Our World in Data layout: `Entity,Code,Year,<value>`.
fn write_entity_table<F>(
    dir: &Path,
    file_name: &str,
    value_column: &str,
    entities: &[(&str, &str)],
    years: std::ops::RangeInclusive<i32>,
    mut value: F,
) -> Result<usize>
where
    F: FnMut(usize, i32) -> f64,
{
    let path = dir.join(file_name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Entity", "Code", "Year", value_column])?;

    let mut rows = 0;
    for (i, (entity, code)) in entities.iter().enumerate() {
        for year in years.clone() {
            let v = value(i, year);
            writer.write_record([
                entity.to_string(),
                code.to_string(),
                year.to_string(),
                format!("{v:.2}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let n = write_temperature(&dir, &mut rng)?;
    println!("GLB.Ts+dSST.csv: {n} rows");

    let disasters = [
        ("All disasters", ""),
        ("Flood", ""),
        ("Storm", ""),
        ("Drought", ""),
        ("Wildfire", ""),
    ];
    let share = [1.0, 0.42, 0.28, 0.06, 0.04];
    let n = write_entity_table(
        &dir,
        "number-of-natural-disaster-events.csv",
        "Disasters",
        &disasters,
        1970..=2024,
        |i, year| {
            let trend = 60.0 + 7.5 * (year - 1970) as f64;
            (share[i] * (trend + rng.gauss(0.0, 25.0))).max(0.0).round()
        },
    )?;
    println!("number-of-natural-disaster-events.csv: {n} rows");

    let countries = [("Brazil", "BRA"), ("China", "CHN"), ("Indonesia", "IDN"), ("United States", "USA")];
    let forest_base = [-1_500_000.0, 1_900_000.0, -700_000.0, 100_000.0];
    let n = write_entity_table(
        &dir,
        "annual-change-forest-area.csv",
        "Annual net change in forest area",
        &countries,
        1990..=2020,
        |i, _| forest_base[i] * (1.0 + rng.gauss(0.0, 0.15)),
    )?;
    println!("annual-change-forest-area.csv: {n} rows");

    let co2_base = [0.05e9, 0.8e9, 0.03e9, 2.5e9];
    let co2_growth: [f64; 4] = [0.035, 0.06, 0.045, 0.01];
    let n = write_entity_table(
        &dir,
        "annual-co2-emissions-per-country.csv",
        "Annual CO₂ emissions",
        &countries,
        1960..=2022,
        |i, year| {
            let t = (year - 1960) as f64;
            co2_base[i] * (1.0 + co2_growth[i]).powf(t) * (1.0 + rng.gauss(0.0, 0.03))
        },
    )?;
    println!("annual-co2-emissions-per-country.csv: {n} rows");

    let glaciers = [("Gulkana", ""), ("Lemon Creek", ""), ("South Cascade", ""), ("Wolverine", "")];
    let melt = [0.55, 0.8, 0.95, 0.6];
    let mut cumulative = [0.0f64; 4];
    let n = write_entity_table(
        &dir,
        "mass-us-glaciers.csv",
        "Cumulative mass balance",
        &glaciers,
        1965..=2023,
        |i, year| {
            if year == 1965 {
                cumulative[i] = 0.0;
            } else {
                cumulative[i] -= melt[i] * (1.0 + rng.gauss(0.0, 0.4));
            }
            cumulative[i]
        },
    )?;
    println!("mass-us-glaciers.csv: {n} rows");

    println!("Wrote sample climate data to {}", dir.display());
    Ok(())
}
