use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use clap::Parser;
use index_bench::trial::Trial;

#[derive(Parser, Debug)]
struct Args {
    /// Address of the search service.
    #[arg(long, default_value = "127.0.0.1")]
    addr: String,
    /// Port of the search service.
    #[arg(long, default_value_t = 8443)]
    port: u16,
    /// Number of measured trials.
    #[arg(long, default_value_t = 3)]
    trials: u32,
    /// Length of each measured trial in seconds.
    #[arg(long = "trial_secs", default_value_t = 120)]
    trial_secs: u64,
    /// Unmeasured warmup loop before each trial, in seconds.
    #[arg(long = "warmup_secs", default_value_t = 0)]
    warmup_secs: u64,
    /// Concurrent callers issuing requests within a trial.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    println!("{:?}", args);

    let addr = format!("http://{}:{}", args.addr, args.port);
    for trial_no in 1..=args.trials {
        let trial = Arc::new(Trial::start(addr.clone()).await?);

        if args.warmup_secs > 0 {
            let deadline = Instant::now() + Duration::from_secs(args.warmup_secs);
            while Instant::now() < deadline {
                if let Err(status) = trial.run_one_iteration().await {
                    tracing::warn!("warmup iteration failed: {}", status);
                }
            }
        }

        let started = Instant::now();
        let deadline = started + Duration::from_secs(args.trial_secs);
        let mut workers = Vec::with_capacity(args.concurrency);
        for _ in 0..args.concurrency {
            let trial = Arc::clone(&trial);
            workers.push(tokio::spawn(async move {
                let mut latencies = Vec::new();
                let mut failures = 0u64;
                while Instant::now() < deadline {
                    let call_started = Instant::now();
                    match trial.run_one_iteration().await {
                        Ok(()) => latencies.push(call_started.elapsed()),
                        Err(status) => {
                            failures += 1;
                            tracing::warn!("iteration failed: {}", status);
                        }
                    }
                }
                (latencies, failures)
            }));
        }

        let mut latencies = Vec::new();
        let mut failures = 0u64;
        for worker in workers {
            let (worker_latencies, worker_failures) = worker.await?;
            latencies.extend(worker_latencies);
            failures += worker_failures;
        }
        let elapsed = started.elapsed();

        // Every worker has quiesced, so the trial can be torn down.
        let trial = Arc::try_unwrap(trial).expect("no iterations outstanding");
        trial.end().await;

        report(trial_no, elapsed, &mut latencies, failures);
    }

    Ok(())
}

fn report(trial: u32, elapsed: Duration, latencies: &mut [Duration], failures: u64) {
    latencies.sort_unstable();
    let ok = latencies.len();
    if ok == 0 {
        println!("trial {}: 0 ok, {} failed in {:.1?}", trial, failures, elapsed);
        return;
    }
    let throughput = ok as f64 / elapsed.as_secs_f64();
    println!(
        "trial {}: {} ok, {} failed in {:.1?}: {:.1} ops/s, p50 {:?}, p90 {:?}, p99 {:?}, max {:?}",
        trial,
        ok,
        failures,
        elapsed,
        throughput,
        percentile(latencies, 0.50),
        percentile(latencies, 0.90),
        percentile(latencies, 0.99),
        latencies[ok - 1],
    );
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = (sorted.len() - 1) as f64 * p;
    sorted[rank.round() as usize]
}
