use chrono::Utc;
use std::cell::Cell;

/// Source of insertion timestamps, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
