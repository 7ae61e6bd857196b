use anyhow::{Context, Result};
use timely::logging::{init_logging, LoggingConfig};
use timely::{Blocker, Stopwatch};

/// Blocker targets to probe, in seconds.
const TARGETS: [f64; 3] = [0.1, 0.25, 0.5];

/// Share of each target spent doing "work" inside the scope.
const WORK_SHARE: f64 = 0.2;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("probing blocker accuracy for {} targets", TARGETS.len());

    let (outcome, total) = Stopwatch::measure(|run| -> Result<()> {
        for target in TARGETS {
            let blocker = Blocker::new(target)
                .with_context(|| format!("invalid blocker target {target}s"))?;
            let work = std::time::Duration::from_secs_f64(target * WORK_SHARE);

            let (_, sw) = Stopwatch::measure(|_| blocker.run(|| std::thread::sleep(work)));
            run.tick();

            log::info!(
                "target {:>6.3}s  measured {:>8.6}s  overshoot {:>+9.6}s",
                target,
                sw.duration(),
                sw.duration() - target
            );

            if sw < target {
                log::warn!("blocker for {target}s closed early");
            }
        }
        Ok(())
    });
    outcome?;

    for (i, split) in total.splits().iter().enumerate() {
        log::debug!("probe {i} took {split:.6}s");
    }
    log::info!("probe finished in {:.6}s", total.duration());

    Ok(())
}
