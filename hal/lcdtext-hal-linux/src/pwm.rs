//! Software PWM on a GPIO line
//!
//! Used for backlight dimming on boards without a free hardware PWM channel.
//! The PWM thread owns the line while running; the handle only shares the
//! duty cycle and the stop flag with it.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lcdtext_hal::OutputPin;
use log::{debug, error};

/// Frequency used when a non-positive one is requested
pub const FALLBACK_FREQUENCY_HZ: u32 = 500;

/// Highest frequency with a whole-nanosecond period
pub const MAX_FREQUENCY_HZ: u32 = 1_000_000_000;

/// Clamp a duty request to 0..=100 %
pub fn clamp_duty(duty_percent: i32) -> u8 {
    duty_percent.clamp(0, 100) as u8
}

/// On/off split of one period for a given duty cycle
///
/// 0 Hz selects [`FALLBACK_FREQUENCY_HZ`]; anything above
/// [`MAX_FREQUENCY_HZ`] is capped so the period never collapses to zero.
pub fn split_period(frequency_hz: u32, duty: u8) -> (Duration, Duration) {
    let hz = match frequency_hz {
        0 => FALLBACK_FREQUENCY_HZ,
        hz => hz.min(MAX_FREQUENCY_HZ),
    };
    let period_ns = 1_000_000_000u64 / hz as u64;
    let on_ns = period_ns * duty.min(100) as u64 / 100;
    (
        Duration::from_nanos(on_ns),
        Duration::from_nanos(period_ns - on_ns),
    )
}

struct Shared {
    stop: AtomicBool,
    duty: AtomicU8,
}

/// Running software PWM
pub struct SoftPwm<P> {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<P>>,
    frequency_hz: u32,
}

impl<P> SoftPwm<P>
where
    P: OutputPin + Send + 'static,
    P::Error: Display,
{
    /// Take ownership of `line` and start toggling it
    pub fn start(line: P, frequency_hz: u32, duty_percent: i32) -> Self {
        let shared = Arc::new(Shared {
            stop: AtomicBool::new(false),
            duty: AtomicU8::new(clamp_duty(duty_percent)),
        });

        let thread_shared = Arc::clone(&shared);
        let thread = thread::spawn(move || pwm_loop(line, frequency_hz, &thread_shared));

        debug!(
            "soft PWM started: {} Hz, {}%",
            frequency_hz,
            clamp_duty(duty_percent)
        );

        Self {
            shared,
            thread: Some(thread),
            frequency_hz,
        }
    }

    /// Change the duty cycle, effective from the next period
    pub fn set_duty(&self, duty_percent: i32) {
        self.shared
            .duty
            .store(clamp_duty(duty_percent), Ordering::Relaxed);
    }

    /// Current duty cycle in percent
    pub fn duty(&self) -> u8 {
        self.shared.duty.load(Ordering::Relaxed)
    }

    /// Configured frequency
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Stop the thread, leaving the line low, and hand the line back
    ///
    /// Returns `None` if the PWM thread panicked.
    pub fn stop(mut self) -> Option<P> {
        self.join()
    }

    fn join(&mut self) -> Option<P> {
        self.shared.stop.store(true, Ordering::Relaxed);
        self.thread.take().and_then(|t| t.join().ok())
    }
}

impl<P> Drop for SoftPwm<P> {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

fn pwm_loop<P>(mut line: P, frequency_hz: u32, shared: &Shared) -> P
where
    P: OutputPin,
    P::Error: Display,
{
    while !shared.stop.load(Ordering::Relaxed) {
        let (on, off) = split_period(frequency_hz, shared.duty.load(Ordering::Relaxed));

        if !on.is_zero() {
            if let Err(e) = line.set_high() {
                error!("soft PWM: {}", e);
                break;
            }
            thread::sleep(on);
        }
        if !off.is_zero() {
            if let Err(e) = line.set_low() {
                error!("soft PWM: {}", e);
                break;
            }
            thread::sleep(off);
        }
    }

    if let Err(e) = line.set_low() {
        error!("soft PWM: failed to park line low: {}", e);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Line that counts edges and remembers its last level
    #[derive(Clone, Default)]
    struct CountingLine {
        state: Arc<Mutex<(u32, bool)>>,
    }

    impl OutputPin for CountingLine {
        type Error = &'static str;

        fn set(&mut self, high: bool) -> Result<(), Self::Error> {
            let mut s = self.state.lock().unwrap();
            if high {
                s.0 += 1;
            }
            s.1 = high;
            Ok(())
        }
    }

    #[test]
    fn test_clamp_duty() {
        assert_eq!(clamp_duty(-5), 0);
        assert_eq!(clamp_duty(40), 40);
        assert_eq!(clamp_duty(250), 100);
    }

    #[test]
    fn test_split_period() {
        let (on, off) = split_period(1000, 40);
        assert_eq!(on, Duration::from_micros(400));
        assert_eq!(off, Duration::from_micros(600));

        let (on, off) = split_period(0, 100);
        assert_eq!(on, Duration::from_millis(2));
        assert!(off.is_zero());
    }

    #[test]
    fn test_split_period_above_max_frequency() {
        for hz in [MAX_FREQUENCY_HZ, MAX_FREQUENCY_HZ + 1, u32::MAX] {
            let (on, off) = split_period(hz, 100);
            assert_eq!(on + off, Duration::from_nanos(1));
        }
        let (on, off) = split_period(u32::MAX, 0);
        assert!(on.is_zero());
        assert_eq!(off, Duration::from_nanos(1));
    }

    #[test]
    fn test_stop_returns_line_low() {
        let line = CountingLine::default();
        let probe = line.clone();

        let pwm = SoftPwm::start(line, 1000, 50);
        thread::sleep(Duration::from_millis(20));
        pwm.set_duty(80);
        assert_eq!(pwm.duty(), 80);

        let returned = pwm.stop();
        assert!(returned.is_some());

        let (pulses, high) = *probe.state.lock().unwrap();
        assert!(pulses > 0);
        assert!(!high);
    }

    #[test]
    fn test_zero_duty_never_goes_high() {
        let line = CountingLine::default();
        let probe = line.clone();

        let pwm = SoftPwm::start(line, 1000, 0);
        thread::sleep(Duration::from_millis(10));
        drop(pwm);

        assert_eq!(probe.state.lock().unwrap().0, 0);
    }
}
