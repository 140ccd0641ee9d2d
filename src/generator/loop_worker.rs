use chrono::{Local, Utc};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::source::ReadingSink;

use super::ReadingSynth;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    pub inserted: u64,
    pub failed: u64,
}

/// Append one synthetic reading per `period` until `cancel_token` fires.
///
/// The first reading is produced immediately. A failed insert is logged and
/// dropped; the next tick carries on with a fresh reading.
pub async fn generation_loop<K: ReadingSink>(
    sink: K,
    mut synth: ReadingSynth,
    period: Duration,
    cancel_token: CancellationToken,
) -> GeneratorStats {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = GeneratorStats::default();

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("generator loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let reading = synth.next_reading(Utc::now());
                let (time, temperature, humidity) = (
                    reading
                        .timestamp
                        .with_timezone(&Local)
                        .format("%H:%M:%S")
                        .to_string(),
                    reading.temperature,
                    reading.humidity,
                );

                match sink.append(reading).await {
                    Ok(()) => {
                        stats.inserted += 1;
                        log_info!("{time}  temperature {temperature:.1}℃  humidity {humidity:.1}%");
                    }
                    Err(err) => {
                        stats.failed += 1;
                        log_error!("failed to insert reading taken at {time}: {err:#}");
                    }
                }
            }
        }
    }

    stats
}
