// Debounced edge inputs
//
// Edges arrive from the GPIO interrupt. A lockout filter accepts an
// edge only when the last accepted one is at least a filter period old,
// so contact bounce never reaches the activation table.
// Filter period is 1 / debounce_hz: 10 Hz -> 100 ms.

use core::fmt;

use crate::kernel::activation::ActivationTable;
use crate::kernel::clock::elapsed_ms;

pub const MIN_DEBOUNCE_HZ: u32 = 1;
pub const MAX_DEBOUNCE_HZ: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Debounce frequency outside MIN_DEBOUNCE_HZ..=MAX_DEBOUNCE_HZ
    DebounceFrequency(u32),
    /// Channel id has no activation slot
    ChannelOutOfRange(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DebounceFrequency(hz) => write!(
                f,
                "debounce {} Hz unsupported ({}..={} Hz)",
                hz, MIN_DEBOUNCE_HZ, MAX_DEBOUNCE_HZ
            ),
            ConfigError::ChannelOutOfRange(ch) => write!(f, "no activation slot for channel {}", ch),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DebounceFilter {
    window_ms: u32,
    last_accepted: Option<u32>,
}

impl DebounceFilter {
    pub const fn from_hz(hz: u32) -> Result<Self, ConfigError> {
        if hz < MIN_DEBOUNCE_HZ || hz > MAX_DEBOUNCE_HZ {
            return Err(ConfigError::DebounceFrequency(hz));
        }
        Ok(Self {
            window_ms: 1000 / hz,
            last_accepted: None,
        })
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Returns true if an edge seen at `now` is a real transition.
    pub fn accept(&mut self, now: u32) -> bool {
        let settled = match self.last_accepted {
            None => true,
            Some(last) => elapsed_ms(last, now) >= self.window_ms,
        };
        if settled {
            self.last_accepted = Some(now);
        }
        settled
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Callback bound to a channel at configuration time; receives the
/// channel id. Runs in interrupt context.
pub type EdgeCallback = fn(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub edge: Edge,
    pub debounce_hz: u32,
}

impl InputConfig {
    pub const fn new(edge: Edge, debounce_hz: u32) -> Self {
        Self { edge, debounce_hz }
    }
}

pub struct InputChannel {
    id: usize,
    config: InputConfig,
    filter: DebounceFilter,
    callback: EdgeCallback,
}

impl InputChannel {
    /// Configure channel `id` to drive slot `id` of `table`.
    pub fn bind<const N: usize>(
        id: usize,
        config: InputConfig,
        table: &ActivationTable<N>,
        callback: EdgeCallback,
    ) -> Result<Self, ConfigError> {
        if id >= table.len() {
            return Err(ConfigError::ChannelOutOfRange(id));
        }
        let filter = DebounceFilter::from_hz(config.debounce_hz)?;
        log::info!(
            "input: channel {} on {:?} edge, debounce {} Hz -> {} ms window",
            id,
            config.edge,
            config.debounce_hz,
            filter.window_ms()
        );
        Ok(Self {
            id,
            config,
            filter,
            callback,
        })
    }

    /// Raw edge from the interrupt at `now`. Runs the callback if the
    /// edge survives the debounce filter.
    pub fn on_edge(&mut self, now: u32) -> bool {
        if self.filter.accept(now) {
            (self.callback)(self.id);
            true
        } else {
            false
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn edge(&self) -> Edge {
        self.config.edge
    }

    pub fn config(&self) -> InputConfig {
        self.config
    }

    pub fn window_ms(&self) -> u32 {
        self.filter.window_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::activation::{Activation, Outputs};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn filter_window_from_frequency() {
        assert_eq!(DebounceFilter::from_hz(10).unwrap().window_ms(), 100);
        assert_eq!(DebounceFilter::from_hz(1000).unwrap().window_ms(), 1);
        assert_eq!(DebounceFilter::from_hz(1).unwrap().window_ms(), 1000);
    }

    #[test]
    fn unsupported_frequency_is_rejected() {
        assert_eq!(
            DebounceFilter::from_hz(0).unwrap_err(),
            ConfigError::DebounceFrequency(0)
        );
        assert!(DebounceFilter::from_hz(1001).is_err());
    }

    #[test]
    fn bounces_inside_window_are_dropped() {
        let mut filter = DebounceFilter::from_hz(10).unwrap();
        let seen: Vec<bool> = [0, 3, 20, 99, 100, 150, 199, 200]
            .into_iter()
            .map(|t| filter.accept(t))
            .collect();
        assert_eq!(
            seen,
            [true, false, false, false, true, false, false, true]
        );
    }

    #[test]
    fn filter_across_clock_wrap() {
        let mut filter = DebounceFilter::from_hz(10).unwrap();
        assert!(filter.accept(u32::MAX - 49));
        assert!(!filter.accept(20));
        assert!(filter.accept(50));

        filter.reset();
        assert!(filter.accept(51));
    }

    static EDGES: AtomicUsize = AtomicUsize::new(0);

    fn count_edge(ch: usize) {
        assert_eq!(ch, 1);
        EDGES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn channel_dispatches_debounced_edges() {
        let table: ActivationTable<2> = ActivationTable::default();
        let config = InputConfig::new(Edge::Rising, 10);
        let mut ch = InputChannel::bind(1, config, &table, count_edge).unwrap();
        assert_eq!(ch.id(), 1);
        assert_eq!(ch.edge(), Edge::Rising);
        assert_eq!(ch.window_ms(), 100);

        assert!(ch.on_edge(1000));
        assert!(!ch.on_edge(1010));
        assert!(ch.on_edge(1100));
        assert_eq!(EDGES.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn bind_checks_channel_and_frequency() {
        let table: ActivationTable<1> = ActivationTable::default();
        let cfg = InputConfig::new(Edge::Any, 10);
        assert_eq!(
            InputChannel::bind(1, cfg, &table, count_edge).err(),
            Some(ConfigError::ChannelOutOfRange(1))
        );
        let cfg = InputConfig::new(Edge::Falling, 5000);
        assert_eq!(
            InputChannel::bind(0, cfg, &table, count_edge).err(),
            Some(ConfigError::DebounceFrequency(5000))
        );
    }

    // bounce burst through the filter into the activation table
    #[test]
    fn burst_of_bounces_is_one_transition() {
        struct Lamp(bool);
        impl Outputs for Lamp {
            fn set(&mut self, _: usize) {
                self.0 = true;
            }
            fn clear(&mut self, _: usize) {
                self.0 = false;
            }
            fn toggle(&mut self, _: usize) {
                self.0 = !self.0;
            }
            fn is_active(&mut self, _: usize) -> bool {
                self.0
            }
        }

        let table: ActivationTable<1> = ActivationTable::new(Activation::Active);
        let mut lamp = Lamp(true);
        let mut filter = DebounceFilter::from_hz(10).unwrap();
        for t in [500, 502, 505, 530, 560] {
            if filter.accept(t) {
                table.on_edge(0, &mut lamp);
            }
        }
        assert_eq!(table.get(0), Some(Activation::Inactive));
        assert!(!lamp.0);
    }

    #[test]
    fn config_error_messages() {
        assert_eq!(
            std::format!("{}", ConfigError::DebounceFrequency(0)),
            "debounce 0 Hz unsupported (1..=1000 Hz)"
        );
        assert_eq!(
            std::format!("{}", ConfigError::ChannelOutOfRange(4)),
            "no activation slot for channel 4"
        );
    }
}
