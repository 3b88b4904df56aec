use std::time::{Duration, Instant};

/// Paces the run loop to a fixed number of instructions per second.
#[derive(Debug)]
pub struct CycleTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl CycleTimer {
    pub fn new(cycles_per_second: u32) -> Self {
        let hz = cycles_per_second.max(1) as u64;
        Self {
            period: Duration::from_nanos(1_000_000_000 / hz),
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blocks until the next cycle is due. The first call never blocks.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let start = match self.deadline {
            Some(deadline) if deadline > now => {
                std::thread::sleep(deadline - now);
                deadline
            }
            // past deadline, don't try to catch up
            _ => now,
        };
        self.deadline = Some(start + self.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_from_rate() {
        assert_eq!(CycleTimer::new(500).period(), Duration::from_millis(2));
        assert_eq!(CycleTimer::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn waits_between_cycles() {
        let mut timer = CycleTimer::new(1000);
        let start = Instant::now();
        for _ in 0..5 {
            timer.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(4));
    }
}
