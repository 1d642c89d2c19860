use ndarray::Array2;
use rand::prelude::*;
use relabel::{metrics, Relabeler, SimilarityMatrix};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=relabel=debug shows every accepted move.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relabel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut rng = StdRng::seed_from_u64(7);
    let classes = ["cat", "dog", "fox"];
    let per_class = 20;

    let truth: Vec<&str> = classes
        .iter()
        .flat_map(|&c| std::iter::repeat(c).take(per_class))
        .collect();
    let m = truth.len();

    // Noisy block structure: similar inside a class, weakly similar across.
    let mut s = Array2::<f64>::zeros((m, m));
    for i in 0..m {
        s[[i, i]] = 1.0;
        for j in (i + 1)..m {
            let w = if truth[i] == truth[j] {
                rng.random_range(0.5..0.9)
            } else {
                rng.random_range(0.0..0.35)
            };
            s[[i, j]] = w;
            s[[j, i]] = w;
        }
    }

    // Flip roughly 15% of the labels.
    let noisy: Vec<&str> = truth
        .iter()
        .map(|&t| {
            if rng.random_bool(0.15) {
                let others: Vec<&str> = classes.iter().copied().filter(|&c| c != t).collect();
                others[rng.random_range(0..others.len())]
            } else {
                t
            }
        })
        .collect();

    let similarity = SimilarityMatrix::new(s)?;
    let report = Relabeler::new().with_max_rounds(100).run(&similarity, &noisy)?;

    println!("samples={} rounds={}", m, report.rounds);
    println!(
        "accuracy before={:.3} after={:.3}",
        metrics::accuracy(&noisy, &truth),
        metrics::accuracy(&report.labels, &truth)
    );
    println!("modularity final={:.4}", report.modularity);
    println!("changed samples: {:?}", report.changed);

    Ok(())
}
