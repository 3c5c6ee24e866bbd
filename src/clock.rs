use core::cell::Cell;

use embassy_time::{Duration, Instant};

/// Monotonic time source used to measure integration steps
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Embassy time driver clock, used on the device
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Lets recorded or synthetic sample
/// streams be replayed with exact time steps.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_micros: u64) -> Self {
        Self {
            micros: Cell::new(start_micros),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.advance_micros(by.as_micros());
    }

    pub fn advance_micros(&self, micros: u64) {
        self.micros.set(self.micros.get() + micros);
    }

    pub fn set_micros(&self, micros: u64) {
        self.micros.set(micros);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.micros.get())
    }
}
