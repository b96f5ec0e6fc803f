//! GPIO line abstractions
//!
//! Lines on a Linux GPIO chip can fail on every access (the request may have
//! been revoked, the chip removed), so unlike a register-mapped MCU pin every
//! operation here returns a `Result`.

/// Digital output line
pub trait OutputPin {
    /// Error type for line operations
    type Error;

    /// Drive the line to a specific level
    fn set(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Drive the line high (logic 1)
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }

    /// Drive the line low (logic 0)
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }
}

/// Digital input line
pub trait InputPin {
    /// Error type for line operations
    type Error;

    /// Read the current line level
    fn get(&self) -> Result<bool, Self::Error>;

    /// Check if the line reads high (logic 1)
    fn is_high(&self) -> Result<bool, Self::Error> {
        self.get()
    }

    /// Check if the line reads low (logic 0)
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.get().map(|v| !v)
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    type Error = T::Error;

    fn set(&mut self, high: bool) -> Result<(), Self::Error> {
        T::set(self, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        type Error = ();

        fn set(&mut self, high: bool) -> Result<(), ()> {
            self.high = high;
            Ok(())
        }
    }

    impl InputPin for MockPin {
        type Error = ();

        fn get(&self) -> Result<bool, ()> {
            Ok(self.high)
        }
    }

    #[test]
    fn test_default_helpers() {
        let mut pin = MockPin { high: false };

        pin.set_high().unwrap();
        assert_eq!(pin.is_high(), Ok(true));

        pin.set_low().unwrap();
        assert_eq!(pin.is_low(), Ok(true));
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn drive<P: OutputPin<Error = ()>>(mut p: P) {
            p.set_high().unwrap();
        }

        let mut pin = MockPin { high: false };
        drive(&mut pin);
        assert!(pin.high);
    }
}
