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

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Writes a noisy sensor log exercising every cleaning filter:
/// spikes on `temperature`, zeros and negatives on `pressure`, error tokens
/// in `flow` and a text-only `sensor` column that ingestion drops.
fn main() -> Result<()> {
    let rows: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid row count '{arg}'"))?,
        None => 50_000,
    };
    let output_path = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "sample_data.csv".to_string());

    let mut rng = SimpleRng::new(42);
    let sensors = ["north", "south", "east"];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["time", "temperature", "pressure", "flow", "sensor"])?;

    for i in 0..rows {
        let t = i as f64 * 0.1;

        let mut temperature = 20.0 + 5.0 * (t / 60.0).sin() + rng.gauss(0.0, 0.3);
        if rng.chance(0.002) {
            temperature += rng.gauss(0.0, 80.0);
        }

        let pressure = if rng.chance(0.01) {
            0.0
        } else {
            rng.gauss(3.0, 2.0)
        };

        let flow = if rng.chance(0.005) {
            "ERR".to_string()
        } else {
            format!("{:.3}", rng.gauss(12.0, 1.5))
        };

        writer.write_record([
            format!("{t:.1}"),
            format!("{temperature:.3}"),
            format!("{pressure:.3}"),
            flow,
            sensors[i % sensors.len()].to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
