//! Raw event source reading newline-delimited JSON

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::domain::Event;

/// Decode one event per line from `reader` and forward it to `tx`.
///
/// Blank lines are ignored and malformed lines are logged and skipped.
/// Returns the number of events forwarded; stops early if the receiver
/// goes away.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<Event>) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0u64;
    let mut line_number = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match Event::from_json(line.as_bytes()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "Skipping malformed input event");
                continue;
            }
        };

        if tx.send(event).await.is_err() {
            tracing::info!("Event receiver closed, stopping input");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}
