#![deny(unsafe_code)]

use embedded_hal::i2c::ErrorKind;


/// Calendar field a validation error refers to.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Weekday,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Errors {
    /// No acknowledge, timeout or arbitration loss on the bus. Never retried by the driver.
    BusTransactionError(ErrorKind),
    /// Caller supplied an out-of-range field; rejected before touching the bus.
    InvalidTimeValue(TimeField),
    /// Register bytes failed the BCD or range check.
    CorruptRegisterData(TimeField),
    /// Chip reports voltage low / oscillation stop, the time it keeps is not trusted.
    VoltageLow,
    /// Read requested inside the minimal read interval with nothing valid cached.
    AccessTooFrequent,
    SystemClockNotSet,
    SystemClockRejected,
    InvalidAddress(u8),
    InvalidInterval,
    InvalidErrorThreshold,
    FromAfterTo,
    OutOfRange,
}

impl Errors {
    #[inline(always)]
    pub fn from_bus<E: embedded_hal::i2c::Error>(error: E) -> Self {
        Errors::BusTransactionError(error.kind())
    }
}
