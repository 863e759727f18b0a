/// Fixed-size worker pool for compiling countries.
///
/// A dispatcher thread feeds country codes into a bounded job channel; each
/// worker compiles one country at a time and sends the outcome back on a
/// results channel drained by the calling thread. Dropping the stop sender
/// tells the dispatcher and the workers to quit after whatever they are
/// doing now. A fetch already in flight is not interrupted.
use std::thread;

use addrule_core::CountryRule;
use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};

use crate::error::GenerateError;
use crate::process::compile_country;
use crate::upstream::Fetcher;

/// Result of compiling one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub code: String,
    pub result: Result<CountryRule, GenerateError>,
}

/// Pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Number of worker threads; `0` is treated as `1`.
    pub workers: usize,
    /// Stop dispatching after the first failed country.
    pub fail_fast: bool,
}

fn worker<F: Fetcher + ?Sized>(
    id: usize,
    fetcher: &F,
    jobs: &Receiver<String>,
    results: &Sender<Outcome>,
    stop: &Receiver<()>,
) {
    loop {
        select! {
            recv(stop) -> _ => {
                tracing::trace!(worker = id, "stop signal received");
                return;
            }
            recv(jobs) -> job => {
                let Ok(code) = job else {
                    return;
                };
                tracing::debug!(worker = id, country = %code, "compiling");
                let result = compile_country(fetcher, &code);
                if results.send(Outcome { code, result }).is_err() {
                    return;
                }
            }
        }
    }
}

fn dispatch(codes: Vec<String>, jobs: &Sender<String>, stop: &Receiver<()>) {
    for code in codes {
        select! {
            send(jobs, code) -> sent => {
                if sent.is_err() {
                    return;
                }
            }
            recv(stop) -> _ => return,
        }
    }
}

/// Compiles every country in `codes` on a pool of `options.workers` threads.
///
/// Outcomes arrive in completion order. With `fail_fast` set, the pool stops
/// after the first failure and the countries that were never dispatched have
/// no outcome.
///
/// # Errors
///
/// Returns [`GenerateError::Pool`] when the workers exit before reporting on
/// every dispatched country without a stop having been requested.
pub fn run<F: Fetcher + ?Sized>(
    fetcher: &F,
    codes: Vec<String>,
    options: PoolOptions,
) -> Result<Vec<Outcome>, GenerateError> {
    let workers = options.workers.max(1);
    let expected = codes.len();
    let (job_tx, job_rx) = bounded::<String>(workers);
    let (result_tx, result_rx) = unbounded::<Outcome>();
    let (stop_tx, stop_rx) = bounded::<()>(0);

    let (outcomes, stopped) = thread::scope(|scope| {
        for id in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let stop = stop_rx.clone();
            scope.spawn(move || worker(id, fetcher, &jobs, &results, &stop));
        }
        drop(job_rx);
        drop(result_tx);

        let dispatch_stop = stop_rx.clone();
        scope.spawn(move || dispatch(codes, &job_tx, &dispatch_stop));
        drop(stop_rx);

        let mut stop = Some(stop_tx);
        let mut outcomes = Vec::with_capacity(expected);
        for outcome in &result_rx {
            if let Err(e) = &outcome.result {
                tracing::warn!(country = %outcome.code, error = %e, "country failed");
                if options.fail_fast && stop.take().is_some() {
                    tracing::info!("stopping after first failure");
                }
            }
            outcomes.push(outcome);
        }
        (outcomes, stop.is_none())
    });

    if !stopped && outcomes.len() != expected {
        return Err(GenerateError::Pool {
            detail: format!("{} of {expected} countries reported back", outcomes.len()),
        });
    }
    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
