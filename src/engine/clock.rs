use std::time::{Duration, Instant};

/// Best-effort frame cap with a variable time-step.
///
/// `tick` sleeps away whatever is left of the frame budget. A frame that
/// ran long is not compensated: no sleep, no catch-up.
#[derive(Debug)]
pub struct FramePacer {
    budget: Duration,
    last: Instant,
}

impl FramePacer {
    /// `fps == 0` disables the cap.
    pub fn new(fps: u32) -> Self {
        let budget = if fps == 0 { Duration::ZERO } else { Duration::from_secs(1) / fps };
        Self { budget, last: Instant::now() }
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Wait out the rest of the frame and return seconds since the
    /// previous tick.
    pub fn tick(&mut self) -> f64 {
        let spent = self.last.elapsed();
        if let Some(rest) = self.budget.checked_sub(spent) {
            if !rest.is_zero() {
                std::thread::sleep(rest);
            }
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
