// src/session/countdown.rs — One-second ticker driving the session clock

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Fires once per `period`, starting one period after creation. Missed
/// ticks are delayed, not bursted.
pub struct Countdown {
    interval: Interval,
}

impl Countdown {
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
