//! Batch load generator
//!
//! Blunt-force convenience tool: fires N fully concurrent relay requests per
//! batch and tallies outcomes. No backoff, no pacing, no concurrency ceiling
//! beyond the batch size. The stop signal is honored between batches only;
//! an in-flight batch always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::client::transport::RelayClient;
use crate::core::types::Turn;

/// Fixed message carried by every stress request
pub const TEST_MESSAGE: &str = "Test";

/// Outcome tally for one batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub successful: usize,
    pub failed_429: usize,
    pub other_failed: usize,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "Batch Complete: ✅ {} / 🚫 {} / ❌ {}",
            self.successful, self.failed_429, self.other_failed
        )
    }
}

/// Fire one batch of `size` concurrent requests and tally the outcomes
///
/// Bodies are not consumed; only the response status counts. Transport
/// failures tally as other failures.
pub async fn run_batch(client: &RelayClient, size: usize) -> BatchReport {
    let body = client.request_body(vec![Turn::user(TEST_MESSAGE)]);

    let requests = (0..size).map(|_| {
        let body = body.clone();
        async move { client.http().post(client.endpoint()).json(&body).send().await }
    });
    let responses = futures::future::join_all(requests).await;

    let mut report = BatchReport::default();
    for response in responses {
        match response {
            Ok(res) if res.status().is_success() => report.successful += 1,
            Ok(res) if res.status().as_u16() == 429 => report.failed_429 += 1,
            _ => report.other_failed += 1,
        }
    }
    report
}

/// Run batches until the stop flag is observed between batches
///
/// Calls `on_report` with each batch's report as it completes.
pub async fn run_stress_loop(
    client: &RelayClient,
    batch_size: usize,
    stop: Arc<AtomicBool>,
    mut on_report: impl FnMut(&BatchReport),
) {
    if batch_size == 0 {
        return;
    }
    while !stop.load(Ordering::Relaxed) {
        info!("Starting stress batch: {batch_size} parallel requests");
        let report = run_batch(client, batch_size).await;
        on_report(&report);
    }
    info!("Stress loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_formats_tallies() {
        let report = BatchReport {
            successful: 3,
            failed_429: 2,
            other_failed: 1,
        };
        assert_eq!(report.summary(), "Batch Complete: ✅ 3 / 🚫 2 / ❌ 1");
    }
}
