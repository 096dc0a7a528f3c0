// Peripheral cell shared between an ISR and the main loop
//
// Installed once after bring-up. Both contexts borrow the value inside
// a critical section; before install every access is a no-op.

use core::cell::RefCell;

use critical_section::Mutex;

use super::activation::Outputs;

pub struct Shared<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> Shared<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store `value`, handing back whatever was installed before.
    pub fn install(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(value))
    }

    /// Store `value`, then run `arm` on it inside the same critical
    /// section. An interrupt source enabled by `arm` cannot fire before
    /// its handler's state is in place. Any previous value is dropped.
    pub fn install_with<R>(&self, value: T, arm: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            arm(slot.insert(value))
        })
    }

    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Run `f` on the value with interrupts masked. `None` if nothing
    /// is installed yet.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<T> Default for Shared<T> {
    fn default() -> Self {
        Self::new()
    }
}

// lets the main loop and an ISR drive the same output bank
impl<T: Outputs> Outputs for &Shared<T> {
    fn set(&mut self, channel: usize) {
        self.with(|o| o.set(channel));
    }

    fn clear(&mut self, channel: usize) {
        self.with(|o| o.clear(channel));
    }

    fn toggle(&mut self, channel: usize) {
        self.with(|o| o.toggle(channel));
    }

    fn is_active(&mut self, channel: usize) -> bool {
        self.with(|o| o.is_active(channel)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lamp {
        on: bool,
    }

    impl Outputs for Lamp {
        fn set(&mut self, _: usize) {
            self.on = true;
        }
        fn clear(&mut self, _: usize) {
            self.on = false;
        }
        fn toggle(&mut self, _: usize) {
            self.on = !self.on;
        }
        fn is_active(&mut self, _: usize) -> bool {
            self.on
        }
    }

    #[test]
    fn access_before_install_is_noop() {
        let cell: Shared<Lamp> = Shared::new();
        assert!(!cell.is_installed());
        assert_eq!(cell.with(|l| l.on), None);

        let mut out = &cell;
        out.set(0);
        assert!(!out.is_active(0));
    }

    #[test]
    fn install_then_drive() {
        static LAMP: Shared<Lamp> = Shared::new();
        assert!(LAMP.install(Lamp::default()).is_none());

        let mut out = &LAMP;
        out.toggle(0);
        assert!(out.is_active(0));
        out.clear(0);
        assert!(!out.is_active(0));

        let lamp = LAMP.take().unwrap();
        assert!(!lamp.on);
        assert!(!LAMP.is_installed());
    }

    #[test]
    fn arm_runs_on_the_installed_value() {
        static LAMP: Shared<Lamp> = Shared::new();
        LAMP.install(Lamp { on: true });

        let was_on = LAMP.install_with(Lamp::default(), |lamp| {
            let was_on = lamp.on;
            lamp.set(0);
            was_on
        });
        // the fresh value was armed, the old one replaced
        assert!(!was_on);
        assert_eq!(LAMP.with(|l| l.on), Some(true));
    }

    #[test]
    fn handler_never_sees_an_empty_cell_once_armed() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        static LAMP: Shared<Lamp> = Shared::new();
        static ARMED: AtomicBool = AtomicBool::new(false);

        // stands in for the interrupt: once the source is armed, every
        // run must find the value installed
        let isr = thread::spawn(|| {
            let mut runs = 0;
            while runs < 1000 {
                let armed = ARMED.load(Ordering::Acquire);
                let seen = LAMP.with(|_| ()).is_some();
                if armed {
                    assert!(seen);
                    runs += 1;
                }
            }
        });

        LAMP.install_with(Lamp::default(), |_| ARMED.store(true, Ordering::Release));
        isr.join().unwrap();
    }
}
