use imposter_base::model::DelaySpec;
use rand::Rng;
use std::time::Duration;

/// Applies a configured response delay (spec.md §4.3 "Delay"), the sleep-based
/// idiom the teacher uses for retry backoff adapted to a fixed/ranged wait.
pub async fn apply_delay(delay: &DelaySpec) {
    let millis = if delay.exact > 0 {
        delay.exact
    } else if delay.min > 0 && delay.max >= delay.min {
        rand::thread_rng().gen_range(delay.min..=delay.max)
    } else {
        return;
    };
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
