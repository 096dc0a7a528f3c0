// The poll loop: one always-running body, no suspension points
//
// Each iteration, in order:
//   1. sample the clock
//   2. advance the periodic task table
//   3. service the device/network poll function once
//   4. drive outputs from the ISR-owned activation flags
//   5. fixed delay (skipped when 0 ms)
//
// SpinWhileInactive busy-waits on the flags in step 4. That is a
// polling wait, not a block: only an interrupt can end it, and
// interrupts always run. Timers accumulate meanwhile and catch up
// (once) on the next tick.

use embedded_hal::delay::DelayNs;

use super::activation::{ActivationTable, Outputs};
use super::clock::Clock;
use super::scheduler::Scheduler;

/// Non-blocking unit of device or protocol work, run once per
/// iteration right after the timers. Also the context handed to
/// timer tasks.
pub trait Service {
    fn poll(&mut self);
}

impl Service for () {
    fn poll(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrivePolicy {
    /// Wait (spinning) until some channel is active, then toggle every
    /// active channel.
    SpinWhileInactive,
    /// Toggle active channels, leave inactive ones dark.
    #[default]
    ToggleActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub delay_ms: u32,
    pub policy: DrivePolicy,
}

impl LoopConfig {
    /// Toggle active outputs every `delay_ms`.
    pub const fn blink(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            policy: DrivePolicy::ToggleActive,
        }
    }

    /// No delay between iterations (network service loops).
    pub const fn flat_out() -> Self {
        Self {
            delay_ms: 0,
            policy: DrivePolicy::ToggleActive,
        }
    }

    pub const fn with_policy(mut self, policy: DrivePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Iteration {
    pub now: u32,
    pub fired: usize,
    pub toggled: usize,
}

pub struct PollLoop<'a, K, S, O, D, const T: usize, const N: usize> {
    clock: K,
    scheduler: Scheduler<S, T>,
    service: S,
    outputs: O,
    delay: D,
    activation: &'a ActivationTable<N>,
    config: LoopConfig,
}

impl<'a, K, S, O, D, const T: usize, const N: usize> PollLoop<'a, K, S, O, D, T, N>
where
    K: Clock,
    S: Service,
    O: Outputs,
    D: DelayNs,
{
    pub fn new(
        clock: K,
        scheduler: Scheduler<S, T>,
        service: S,
        outputs: O,
        delay: D,
        activation: &'a ActivationTable<N>,
        config: LoopConfig,
    ) -> Self {
        log::info!(
            "poll: {} timers, {} channels, {:?} every {} ms",
            scheduler.len(),
            N,
            config.policy,
            config.delay_ms
        );
        Self {
            clock,
            scheduler,
            service,
            outputs,
            delay,
            activation,
            config,
        }
    }

    pub fn step(&mut self) -> Iteration {
        let now = self.clock.now_ms();
        let fired = self.scheduler.tick(now, &mut self.service);
        self.service.poll();
        let toggled = self.drive();
        if self.config.delay_ms > 0 {
            self.delay.delay_ms(self.config.delay_ms);
        }
        Iteration {
            now,
            fired,
            toggled,
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    fn drive(&mut self) -> usize {
        if N == 0 {
            return 0;
        }
        if self.config.policy == DrivePolicy::SpinWhileInactive {
            while !self.activation.any_active() {
                core::hint::spin_loop();
            }
        }

        let mut toggled = 0;
        for ch in 0..N {
            // check + toggle with the edge ISR masked, so a channel that
            // just went inactive is never relit
            let driven = critical_section::with(|_| {
                if self.activation.is_active(ch) {
                    self.outputs.toggle(ch);
                    true
                } else {
                    false
                }
            });
            if driven {
                toggled += 1;
            }
        }
        toggled
    }

    pub fn scheduler(&self) -> &Scheduler<S, T> {
        &self.scheduler
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn outputs_mut(&mut self) -> &mut O {
        &mut self.outputs
    }
}
