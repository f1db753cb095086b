#![deny(unsafe_code)]

use time::PrimitiveDateTime;

#[cfg(test)]
use mockall::automock;

pub const MILLIS_PER_SECOND: u32 = 1_000;

/// Milliseconds of a free running, wrapping monotonic counter.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeMillis(u32);

impl RelativeMillis {

    #[inline(always)]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds.wrapping_mul(MILLIS_PER_SECOND))
    }

    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn seconds(&self) -> u32 {
        self.0 / MILLIS_PER_SECOND
    }

    /// Milliseconds passed since `earlier`, correct across one counter wrap.
    #[inline(always)]
    pub fn elapsed_since(&self, earlier: RelativeMillis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}

pub trait MonotonicClock {
    fn now(&mut self) -> RelativeMillis;
}

/// Wall clock of the host the driver feeds and is fed from.
#[cfg_attr(test, automock(type Error = ();))]
pub trait SystemClock {
    type Error;

    /// `None` until the host has been given a valid time.
    fn get_datetime(&mut self) -> Option<PrimitiveDateTime>;
    fn set_datetime(&mut self, date: &PrimitiveDateTime) -> Result<(), Self::Error>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_since() {
        let earlier = RelativeMillis::new(1_000);
        assert_eq!(RelativeMillis::new(1_250).elapsed_since(earlier), 250);
        assert_eq!(earlier.elapsed_since(earlier), 0);
    }

    #[test]
    fn test_elapsed_since_over_wrap() {
        let earlier = RelativeMillis::new(u32::MAX - 9);
        assert_eq!(RelativeMillis::new(5).elapsed_since(earlier), 15);
    }

    #[test]
    fn test_seconds_conversion() {
        assert_eq!(RelativeMillis::from_seconds(900).value(), 900_000);
        assert_eq!(RelativeMillis::new(61_999).seconds(), 61);
    }
}
