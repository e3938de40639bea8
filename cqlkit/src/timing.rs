use std::future::Future;
use std::time::{Duration, Instant};

/// Result of a measured operation: the operation's output plus the monotonic
/// wall-clock duration it took. Single-shot and in-memory only; timing is a
/// return value, never shared state.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Run `operation` and report how long it took.
pub async fn measure<T, F>(operation: F) -> Timed<T>
where
    F: Future<Output = T>,
{
    let started = Instant::now();
    let value = operation.await;
    Timed {
        value,
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn measure_returns_value_and_elapsed() {
        let timed = measure(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            42
        })
        .await;
        assert_eq!(timed.value, 42);
        assert!(timed.elapsed >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn millis_reflects_elapsed() {
        let timed = measure(async { "done" }).await;
        assert_eq!(timed.millis(), timed.elapsed.as_millis());
        assert_eq!(timed.into_inner(), "done");
    }
}
