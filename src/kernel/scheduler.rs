// Periodic task table driven by the poll loop
//
// Each task accumulates elapsed milliseconds and fires once it holds
// strictly more than its period. Firing subtracts one period and keeps
// the remainder, so long-run cadence survives jitter in loop timing.
// At most one firing per task per tick: a stalled loop does not replay
// its backlog, the surplus just stays in the accumulator.
//
// NOTE: No dynamic allocation; the table is a fixed array of N slots,
// filled once at startup in the order tasks should fire.
use core::fmt;

/// Task callback. Receives the loop's service context, so a task only
/// reaches the state it is handed.
pub type Action<C> = fn(&mut C);

pub struct TimerTask<C> {
    accumulated: u32,
    period: u32,
    action: Action<C>,
}

impl<C> TimerTask<C> {
    pub const fn new(period: u32, action: Action<C>) -> Self {
        Self {
            accumulated: 0,
            period,
            action,
        }
    }

    pub fn accumulated(&self) -> u32 {
        self.accumulated
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    // returns true if the action ran
    fn advance(&mut self, elapsed: u32, ctx: &mut C) -> bool {
        // saturates only after ~49 days of continuous starvation
        self.accumulated = self.accumulated.saturating_add(elapsed);
        if self.accumulated > self.period {
            (self.action)(ctx);
            self.accumulated -= self.period;
            true
        } else {
            false
        }
    }
}

// manual impls: fn pointers are Copy whatever C is
impl<C> Clone for TimerTask<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for TimerTask<C> {}

impl<C> fmt::Debug for TimerTask<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerTask")
            .field("accumulated", &self.accumulated)
            .field("period", &self.period)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// All N slots are taken
    Full,
    /// A zero period would fire on every tick that advances the clock
    ZeroPeriod,
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::Full => write!(f, "timer table full"),
            RegisterError::ZeroPeriod => write!(f, "timer period must be non-zero"),
        }
    }
}

pub struct Scheduler<C, const N: usize> {
    tasks: [Option<TimerTask<C>>; N],
    len: usize,
    last_now: u32,
}

impl<C, const N: usize> Scheduler<C, N> {
    /// Scheduler whose first tick measures from the clock's zero.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Scheduler whose first tick measures from `now`.
    pub const fn starting_at(now: u32) -> Self {
        Self {
            tasks: [const { None }; N],
            len: 0,
            last_now: now,
        }
    }

    /// Append a task; it fires after the tasks registered before it.
    /// Returns the task's slot index.
    pub fn register(&mut self, period: u32, action: Action<C>) -> Result<usize, RegisterError> {
        if period == 0 {
            return Err(RegisterError::ZeroPeriod);
        }
        if self.len >= N {
            return Err(RegisterError::Full);
        }
        let idx = self.len;
        self.tasks[idx] = Some(TimerTask::new(period, action));
        self.len += 1;
        log::debug!("sched: task {} every {} ms", idx, period);
        Ok(idx)
    }

    /// Advance every task by the time since the previous tick and run
    /// the due ones in registration order. Returns how many fired.
    ///
    /// A tick at the same millisecond as the last one is a no-op and
    /// leaves the reference point untouched.
    pub fn tick(&mut self, now: u32, ctx: &mut C) -> usize {
        let elapsed = now.wrapping_sub(self.last_now);
        if elapsed == 0 {
            return 0;
        }
        self.last_now = now;

        let mut fired = 0;
        for task in self.tasks[..self.len].iter_mut().flatten() {
            if task.advance(elapsed, ctx) {
                fired += 1;
            }
        }
        fired
    }

    pub fn task(&self, idx: usize) -> Option<&TimerTask<C>> {
        self.tasks.get(idx).and_then(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimerTask<C>> {
        self.tasks[..self.len].iter().flatten()
    }

    pub fn last_now(&self) -> u32 {
        self.last_now
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<C, const N: usize> Default for Scheduler<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
