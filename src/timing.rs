//! Wall-clock measurement of a whole scan run.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Await `future` and report how long it took.
pub async fn timed<F: Future>(future: F) -> (F::Output, Duration) {
    let start = Instant::now();
    let output = future.await;
    (output, start.elapsed())
}
