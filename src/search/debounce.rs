use std::time::Duration;

use tokio::sync::mpsc;

/// Quiet period before a query edit is evaluated
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Spawn a debounce stage.
///
/// Raw query edits go into the returned sender; a query comes out of the
/// receiver once no further edit arrived for `quiet`. Intermediate values are
/// discarded, and a settled value equal to the previous one is not re-emitted.
pub fn spawn_debouncer(
    quiet: Duration,
) -> (mpsc::UnboundedSender<String>, mpsc::Receiver<String>) {
    let (edit_tx, edit_rx) = mpsc::unbounded_channel();
    let (settled_tx, settled_rx) = mpsc::channel(8);
    tokio::spawn(debounce(edit_rx, settled_tx, quiet));
    (edit_tx, settled_rx)
}

/// Debounce loop; runs until either side of the pipeline is closed
pub async fn debounce(
    mut edits: mpsc::UnboundedReceiver<String>,
    settled: mpsc::Sender<String>,
    quiet: Duration,
) {
    let mut last_emitted: Option<String> = None;

    while let Some(mut latest) = edits.recv().await {
        // restart the timer on every edit
        loop {
            tokio::select! {
                next = edits.recv() => match next {
                    Some(query) => latest = query,
                    None => break,
                },
                _ = tokio::time::sleep(quiet) => break,
            }
        }

        if last_emitted.as_deref() == Some(latest.as_str()) {
            tracing::trace!("Query '{}' unchanged, not re-evaluating", latest);
            continue;
        }

        tracing::debug!("Query settled: '{}'", latest);
        if settled.send(latest.clone()).await.is_err() {
            return;
        }
        last_emitted = Some(latest);
    }
}
