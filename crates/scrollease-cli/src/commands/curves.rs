use anyhow::{bail, Result};

use scrollease_core::EasingType;

/// Sample every named curve at `samples` evenly spaced points in [0, 1]
pub fn table(samples: usize) -> Vec<(f64, Vec<f64>)> {
    let last = samples.saturating_sub(1).max(1) as f64;
    (0..samples)
        .map(|i| {
            let k = i as f64 / last;
            (k, EasingType::ALL.iter().map(|e| e.apply(k)).collect())
        })
        .collect()
}

pub fn run(samples: usize) -> Result<()> {
    if samples < 2 {
        bail!("need at least 2 samples, got {}", samples);
    }

    print!("{:>6}", "k");
    for easing in EasingType::ALL {
        print!("  {:>12}", easing.name());
    }
    println!();

    for (k, values) in table(samples) {
        print!("{:>6.3}", k);
        for v in values {
            print!("  {:>12.4}", v);
        }
        println!();
    }

    Ok(())
}
