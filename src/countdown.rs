/// Emitted by [`CountdownTimer::tick`] when a tick was consumed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// one second elapsed, carries the seconds still remaining
    Tick(u32),
    /// the countdown reached zero on its own
    Expired,
}

/// A restartable, pausable single countdown.
///
/// The timer does not own a clock. Whoever hosts it calls [`tick`](Self::tick)
/// once per second while it is [`scheduled`](Self::is_scheduled); pausing only
/// flips a flag so ticks keep arriving but are ignored.
#[derive(Debug, Default, Clone)]
pub struct CountdownTimer {
    remaining_seconds: u32,
    running: bool,
    scheduled: bool,
    generation: u64,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to `duration_minutes` and arm the periodic trigger.
    /// Calling this on a running timer restarts it.
    pub fn start(&mut self, duration_minutes: u32) {
        self.remaining_seconds = duration_minutes.saturating_mul(60);
        self.running = true;
        self.scheduled = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Consume one second. The decrement that reaches zero reports only
    /// [`TimerEvent::Expired`], never `Tick(0)`.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.scheduled || !self.running {
            return None;
        }

        if self.remaining_seconds < 1 {
            self.disarm();
            return Some(TimerEvent::Expired);
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            // the last second is the expiry itself, there is no 0:00 update
            self.disarm();
            Some(TimerEvent::Expired)
        } else {
            Some(TimerEvent::Tick(self.remaining_seconds))
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        if self.scheduled {
            self.running = true;
        }
    }

    /// Stop without reporting expiry.
    pub fn cancel(&mut self) {
        self.disarm();
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Bumped on every [`start`](Self::start) so a host can realign its
    /// periodic trigger with the new countdown.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn disarm(&mut self) {
        self.running = false;
        self.scheduled = false;
    }
}
