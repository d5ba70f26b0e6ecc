//! Generate a deterministic sample panel CSV (`time_df.csv` layout) for
//! local exploration: two intervention groups, weekly observations, seven
//! wellbeing metrics with group-dependent drift plus noise.

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

/// Per-metric baseline, weekly drift for the intervention group, and noise.
struct MetricProfile {
    name: &'static str,
    baseline: f64,
    drift: f64,
    noise: f64,
}

const PROFILES: [MetricProfile; 7] = [
    MetricProfile { name: "assiduity", baseline: 0.85, drift: 0.005, noise: 0.05 },
    MetricProfile { name: "sleep_duration", baseline: 6.8, drift: 0.06, noise: 0.4 },
    MetricProfile { name: "sleep_quality", baseline: 5.5, drift: 0.12, noise: 0.7 },
    MetricProfile { name: "hydration", baseline: 1.6, drift: 0.04, noise: 0.3 },
    MetricProfile { name: "activity", baseline: 3.0, drift: 0.10, noise: 0.8 },
    MetricProfile { name: "stress", baseline: 6.0, drift: -0.15, noise: 0.9 },
    MetricProfile { name: "wellbeing", baseline: 5.0, drift: 0.14, noise: 0.6 },
];

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let groups = ["Intervention", "Control"];
    let users_per_group = 15;
    let weeks = 1..=12;

    let output_path = "time_df.csv";
    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = vec!["user_id", "group", "week"];
    header.extend(PROFILES.iter().map(|p| p.name));
    writer.write_record(&header)?;

    let mut rows = 0usize;
    for (g, group) in groups.iter().enumerate() {
        for u in 0..users_per_group {
            let user_id = format!("u{:03}", g * users_per_group + u + 1);
            // Stable per-user offset so individual series look coherent.
            let offsets: Vec<f64> = PROFILES.iter().map(|p| rng.gauss(0.0, p.noise)).collect();

            for week in weeks.clone() {
                let mut row = vec![user_id.clone(), group.to_string(), week.to_string()];
                for (profile, offset) in PROFILES.iter().zip(&offsets) {
                    // Only the intervention group drifts.
                    let drift = if g == 0 { profile.drift } else { 0.0 };
                    let value = profile.baseline
                        + offset
                        + drift * week as f64
                        + rng.gauss(0.0, profile.noise * 0.5);
                    row.push(format!("{value:.3}"));
                }
                writer.write_record(&row)?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!(
        "Wrote {rows} observations ({} users x {} weeks) to {output_path}",
        groups.len() * users_per_group,
        12
    );
    Ok(())
}
