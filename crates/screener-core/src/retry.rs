use crate::ScreenerError;
use std::future::Future;
use std::time::Duration;

const MAX_DELAY: Duration = Duration::from_secs(60);

/// Retry an async operation with exponential backoff and jitter.
///
/// Delay doubles per attempt starting from `base_delay`, capped at 60s, and
/// each wait is scaled by a random factor in [0.5, 1.0) so simultaneous
/// retries spread out.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, ScreenerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScreenerError>>,
{
    let mut last_err = None;

    for attempt in 0..=max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt == max_retries {
                    tracing::error!("Operation failed after {} retries: {}", max_retries, e);
                    return Err(e);
                }

                let exp = base_delay.as_secs_f64() * 2f64.powi(attempt as i32);
                let capped = exp.min(MAX_DELAY.as_secs_f64());
                let jittered = capped * (0.5 + rand::random::<f64>() * 0.5);

                tracing::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:.2}s",
                    attempt + 1,
                    max_retries + 1,
                    e,
                    jittered
                );
                last_err = Some(e);
                tokio::time::sleep(Duration::from_secs_f64(jittered)).await;
            }
        }
    }

    // Unreachable: the final failed attempt returns above.
    Err(last_err.unwrap_or_else(|| ScreenerError::Api("retry exhausted".to_string())))
}
