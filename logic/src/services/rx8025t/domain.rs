#![deny(unsafe_code)]

use core::convert::TryFrom;
use time::{Date, Month, PrimitiveDateTime, Time};
use crate::errors::{Errors, TimeField};
use crate::utils::{BitsU8, from_bcd, to_bcd};


pub const DEFAULT_ADDRESS: u8 = 0x32;

pub const BASE_YEAR: u16 = 2000;
pub const MAX_YEAR: u16 = 2099;

pub mod registers {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const WEEKDAY: u8 = 0x03;
    pub const DAY: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const RAM: u8 = 0x07;
    pub const EXTENSION: u8 = 0x0D;
    pub const FLAG: u8 = 0x0E;
    pub const CONTROL: u8 = 0x0F;
}

/// Registers covered by one read: the time frame up to and including FLAG.
pub const READ_BLOCK_LEN: usize = registers::FLAG as usize + 1;
pub const FRAME_LEN: usize = 7;

const FLAG_VDET_BIT: u8 = 0;
const FLAG_VLF_BIT: u8 = 1;

/// Civil time as the chip keeps it, no timezone. `weekday` is 0 for Sunday.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: u8,
}

impl RtcTime {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8, weekday: u8) -> Self {
        Self { year, month, day, hour, minute, second, weekday }
    }

    /// Builds a time with the weekday derived from the date.
    pub fn from_calendar(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self, Errors> {
        let mut result = Self::new(year, month, day, hour, minute, second, 0);
        result.weekday = result.to_date_time()?.weekday().number_days_from_sunday();
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), Errors> {
        self.check().map_err(Errors::InvalidTimeValue)
    }

    fn check(&self) -> Result<(), TimeField> {
        if self.year < BASE_YEAR || self.year > MAX_YEAR {
            return Err(TimeField::Year);
        }
        let month = Month::try_from(self.month).map_err(|_| TimeField::Month)?;
        if self.day == 0 || self.day > month.length(self.year as i32) {
            return Err(TimeField::Day);
        }
        if self.hour > 23 {
            return Err(TimeField::Hour);
        }
        if self.minute > 59 {
            return Err(TimeField::Minute);
        }
        if self.second > 59 {
            return Err(TimeField::Second);
        }
        if self.weekday > 6 {
            return Err(TimeField::Weekday);
        }
        Ok(())
    }

    pub fn to_date_time(&self) -> Result<PrimitiveDateTime, Errors> {
        self.validate()?;
        let month = Month::try_from(self.month).map_err(|_| Errors::InvalidTimeValue(TimeField::Month))?;
        let date = Date::from_calendar_date(self.year as i32, month, self.day)
            .map_err(|_| Errors::InvalidTimeValue(TimeField::Day))?;
        let time = Time::from_hms(self.hour, self.minute, self.second)
            .map_err(|_| Errors::InvalidTimeValue(TimeField::Hour))?;
        Ok(PrimitiveDateTime::new(date, time))
    }
}

impl TryFrom<PrimitiveDateTime> for RtcTime {
    type Error = Errors;

    fn try_from(date_time: PrimitiveDateTime) -> Result<Self, Self::Error> {
        let year = date_time.year();
        if year < BASE_YEAR as i32 || year > MAX_YEAR as i32 {
            return Err(Errors::InvalidTimeValue(TimeField::Year));
        }
        Ok(Self {
            year: year as u16,
            month: date_time.month() as u8,
            day: date_time.day(),
            hour: date_time.hour(),
            minute: date_time.minute(),
            second: date_time.second(),
            weekday: date_time.weekday().number_days_from_sunday(),
        })
    }
}

/// The seven time registers in chip order: seconds, minutes, hours, weekday, day, month, year.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterFrame([u8; FRAME_LEN]);

impl RegisterFrame {
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn encode(time: &RtcTime) -> Result<Self, Errors> {
        time.validate()?;
        let mut bytes = [0_u8; FRAME_LEN];
        bytes[registers::SECONDS as usize] = to_bcd(time.second);
        bytes[registers::MINUTES as usize] = to_bcd(time.minute);
        bytes[registers::HOURS as usize] = to_bcd(time.hour);
        bytes[registers::WEEKDAY as usize] = 1 << time.weekday;
        bytes[registers::DAY as usize] = to_bcd(time.day);
        bytes[registers::MONTH as usize] = to_bcd(time.month);
        bytes[registers::YEAR as usize] = to_bcd((time.year - BASE_YEAR) as u8);
        Ok(Self(bytes))
    }

    pub fn decode(&self) -> Result<RtcTime, Errors> {
        let time = RtcTime {
            year: BASE_YEAR + self.field(registers::YEAR, TimeField::Year)? as u16,
            month: self.field(registers::MONTH, TimeField::Month)?,
            day: self.field(registers::DAY, TimeField::Day)?,
            hour: self.field(registers::HOURS, TimeField::Hour)?,
            minute: self.field(registers::MINUTES, TimeField::Minute)?,
            second: self.field(registers::SECONDS, TimeField::Second)?,
            weekday: self.weekday()?,
        };
        time.check().map_err(Errors::CorruptRegisterData)?;
        Ok(time)
    }

    fn field(&self, register: u8, field: TimeField) -> Result<u8, Errors> {
        from_bcd(self.0[register as usize]).ok_or(Errors::CorruptRegisterData(field))
    }

    fn weekday(&self) -> Result<u8, Errors> {
        let mask = self.0[registers::WEEKDAY as usize];
        if mask.count_ones() == 1 && mask < 0x80 {
            Ok(mask.trailing_zeros() as u8)
        } else {
            Err(Errors::CorruptRegisterData(TimeField::Weekday))
        }
    }
}

/// FLAG register (0x0E).
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlagRegister(BitsU8);

impl FlagRegister {
    pub const fn new(bits: u8) -> Self {
        Self(BitsU8::new(bits))
    }

    #[inline(always)]
    pub fn bits(&self) -> u8 {
        self.0.bits
    }

    /// Supply dropped low enough that the oscillator may have stopped.
    #[inline(always)]
    pub fn voltage_low(&self) -> bool {
        self.0.get(FLAG_VLF_BIT)
    }

    #[inline(always)]
    pub fn voltage_detected(&self) -> bool {
        self.0.get(FLAG_VDET_BIT)
    }

    pub fn with_voltage_low_cleared(&self) -> Self {
        let mut bits = self.0;
        bits.clear(FLAG_VLF_BIT);
        Self(bits)
    }
}
