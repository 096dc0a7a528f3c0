// Activation flags shared between edge ISRs and the poll loop
//
// One AtomicBool per channel. The edge handler owns the flag and flips
// it; the poll loop reads it (Acquire) to decide whether to drive the
// channel's output. Entering Inactive clears the output right away, in
// the ISR, so the output never stays lit after the channel stops.
//
// Toggle is a load + store inside a critical section: riscv32imc has no
// atomic RMW, and the main loop may toggle too (console commands).

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

/// Output side of a channel (LEDs on the reference board).
pub trait Outputs {
    fn set(&mut self, channel: usize);
    fn clear(&mut self, channel: usize);
    fn toggle(&mut self, channel: usize);
    fn is_active(&mut self, channel: usize) -> bool;
}

impl<T: Outputs + ?Sized> Outputs for &mut T {
    fn set(&mut self, channel: usize) {
        (**self).set(channel)
    }

    fn clear(&mut self, channel: usize) {
        (**self).clear(channel)
    }

    fn toggle(&mut self, channel: usize) {
        (**self).toggle(channel)
    }

    fn is_active(&mut self, channel: usize) -> bool {
        (**self).is_active(channel)
    }
}

// no outputs at all (network service loops)
impl Outputs for () {
    fn set(&mut self, _: usize) {}

    fn clear(&mut self, _: usize) {}

    fn toggle(&mut self, _: usize) {}

    fn is_active(&mut self, _: usize) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    #[default]
    Active,
    Inactive,
}

impl Activation {
    pub const fn is_active(self) -> bool {
        matches!(self, Activation::Active)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Activation::Active => Activation::Inactive,
            Activation::Inactive => Activation::Active,
        }
    }

    const fn from_bool(active: bool) -> Self {
        if active {
            Activation::Active
        } else {
            Activation::Inactive
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Active => write!(f, "active"),
            Activation::Inactive => write!(f, "inactive"),
        }
    }
}

pub struct ActivationFlag(AtomicBool);

impl ActivationFlag {
    pub const fn new(initial: Activation) -> Self {
        Self(AtomicBool::new(initial.is_active()))
    }

    #[inline]
    pub fn get(&self) -> Activation {
        Activation::from_bool(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, state: Activation) {
        self.0.store(state.is_active(), Ordering::Release);
    }

    /// Flip the flag and return the state it now holds.
    pub fn toggle(&self) -> Activation {
        critical_section::with(|_| {
            let next = !self.0.load(Ordering::Relaxed);
            self.0.store(next, Ordering::Release);
            Activation::from_bool(next)
        })
    }
}

impl Default for ActivationFlag {
    fn default() -> Self {
        Self::new(Activation::default())
    }
}

impl fmt::Debug for ActivationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActivationFlag").field(&self.get()).finish()
    }
}

/// Per-channel activation state, sized at compile time.
pub struct ActivationTable<const N: usize> {
    flags: [ActivationFlag; N],
}

impl<const N: usize> ActivationTable<N> {
    pub const fn new(initial: Activation) -> Self {
        let mut flags = [const { ActivationFlag::new(Activation::Active) }; N];
        let mut i = 0;
        while i < N {
            flags[i] = ActivationFlag::new(initial);
            i += 1;
        }
        Self { flags }
    }

    pub fn get(&self, channel: usize) -> Option<Activation> {
        self.flags.get(channel).map(ActivationFlag::get)
    }

    // out-of-range channels read as inactive
    pub fn is_active(&self, channel: usize) -> bool {
        self.flags.get(channel).is_some_and(ActivationFlag::is_active)
    }

    pub fn any_active(&self) -> bool {
        self.flags.iter().any(ActivationFlag::is_active)
    }

    pub fn set(&self, channel: usize, state: Activation) -> bool {
        match self.flags.get(channel) {
            Some(flag) => {
                flag.set(state);
                true
            }
            None => false,
        }
    }

    /// Debounced edge on `channel`: flip its flag and, when the channel
    /// drops to Inactive, clear its output before returning. Safe to
    /// call from interrupt context. `None` if the channel has no slot.
    pub fn on_edge<O: Outputs>(&self, channel: usize, outputs: &mut O) -> Option<Activation> {
        let flag = self.flags.get(channel)?;
        // flip + clear as one step against the loop's check + toggle
        critical_section::with(|_| {
            let state = flag.toggle();
            if !state.is_active() {
                outputs.clear(channel);
            }
            Some(state)
        })
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

// "0:active 1:inactive"
impl<const N: usize> fmt::Display for ActivationTable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ch, flag) in self.flags.iter().enumerate() {
            if ch > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", ch, flag.get())?;
        }
        Ok(())
    }
}

impl<const N: usize> Default for ActivationTable<N> {
    fn default() -> Self {
        Self::new(Activation::default())
    }
}
