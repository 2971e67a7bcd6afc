use std::time::{Duration, Instant};

pub const FRAMES_PER_SECOND: u32 = 60;

/// How frame periods are measured against the wall clock.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// 1000 / 60 truncated to 16 ms per frame, measured from each frame's
    /// start. Runs about 4% fast, like most BytePusher VMs.
    #[default]
    Truncated,
    /// True 60 Hz: deadlines advance by 1/60 s from the previous deadline.
    Exact,
    /// Never wait.
    Unlimited,
}

impl Pacing {
    pub fn period(self) -> Duration {
        match self {
            Pacing::Truncated => Duration::from_millis(1_000 / FRAMES_PER_SECOND as u64),
            Pacing::Exact => Duration::from_secs(1) / FRAMES_PER_SECOND,
            Pacing::Unlimited => Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct FramePacer {
    pacing: Pacing,
    frame_start: Instant,
    deadline: Option<Instant>,
    overran: bool,
    overruns: u64,
}

impl FramePacer {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            frame_start: Instant::now(),
            deadline: None,
            overran: false,
            overruns: 0,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn start_frame(&mut self, now: Instant) {
        self.frame_start = now;
        // first frame, or the last one overran: no catching up. Waking a bit
        // late from a sleep isn't an overrun and keeps the old deadline.
        if self.pacing == Pacing::Exact && (self.deadline.is_none() || self.overran) {
            self.deadline = Some(now);
        }
        self.overran = false;
    }

    /// Time left in the current frame at `now`, and moves to the next deadline.
    pub fn remaining(&mut self, now: Instant) -> Duration {
        let target = match self.pacing {
            Pacing::Truncated => self.frame_start + self.pacing.period(),
            Pacing::Exact => {
                let next = self.deadline.unwrap_or(self.frame_start) + self.pacing.period();
                self.deadline = Some(next);
                next
            }
            Pacing::Unlimited => return Duration::ZERO,
        };
        if now > target {
            self.overran = true;
            self.overruns += 1;
            log::debug!(
                "frame overran: took {:?}, period {:?}",
                now - self.frame_start,
                self.pacing.period()
            );
        }
        target.saturating_duration_since(now)
    }

    /// Blocks until the current frame's period is used up.
    pub fn wait(&mut self) {
        let left = self.remaining(Instant::now());
        if !left.is_zero() {
            spin_sleep::sleep(left);
        }
    }
}
