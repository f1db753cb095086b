#![deny(unsafe_code)]

use serde_derive::{Deserialize, Serialize};
use crate::errors::Errors;
use crate::hal_ext::clock::MILLIS_PER_SECOND;
use crate::services::rx8025t::domain::DEFAULT_ADDRESS;

pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 15 * 60 * MILLIS_PER_SECOND;
/// One I2C read of the time block plus the chip's bus free time, with margin.
pub const DEFAULT_MIN_READ_INTERVAL_MS: u32 = 100;
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u8 = 3;

const FIRST_ADDRESS: u8 = 0x08;
const LAST_ADDRESS: u8 = 0x77;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rx8025tConfig {
    pub address: u8,
    pub update_interval_ms: u32,
    pub min_read_interval_ms: u32,
    pub max_consecutive_errors: u8,
}

impl Default for Rx8025tConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            min_read_interval_ms: DEFAULT_MIN_READ_INTERVAL_MS,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }
}

impl Rx8025tConfig {
    pub fn with_address(self, address: u8) -> Self {
        Self { address, ..self }
    }

    pub fn with_update_interval_ms(self, update_interval_ms: u32) -> Self {
        Self { update_interval_ms, ..self }
    }

    pub fn with_min_read_interval_ms(self, min_read_interval_ms: u32) -> Self {
        Self { min_read_interval_ms, ..self }
    }

    pub fn with_max_consecutive_errors(self, max_consecutive_errors: u8) -> Self {
        Self { max_consecutive_errors, ..self }
    }

    pub fn validate(self) -> Result<Self, Errors> {
        validate_address(self.address)?;
        validate_min_read_interval(self.min_read_interval_ms)?;
        validate_update_interval(self.update_interval_ms, self.min_read_interval_ms)?;
        validate_error_threshold(self.max_consecutive_errors)?;
        Ok(self)
    }
}

/// 7-bit address outside the ranges reserved by the I2C specification.
pub fn validate_address(address: u8) -> Result<u8, Errors> {
    if (FIRST_ADDRESS..=LAST_ADDRESS).contains(&address) {
        Ok(address)
    } else {
        Err(Errors::InvalidAddress(address))
    }
}

pub fn validate_min_read_interval(min_read_interval_ms: u32) -> Result<u32, Errors> {
    if min_read_interval_ms == 0 {
        Err(Errors::InvalidInterval)
    } else {
        Ok(min_read_interval_ms)
    }
}

pub fn validate_update_interval(update_interval_ms: u32, min_read_interval_ms: u32) -> Result<u32, Errors> {
    if update_interval_ms < min_read_interval_ms {
        Err(Errors::InvalidInterval)
    } else {
        Ok(update_interval_ms)
    }
}

pub fn validate_error_threshold(max_consecutive_errors: u8) -> Result<u8, Errors> {
    if max_consecutive_errors == 0 {
        Err(Errors::InvalidErrorThreshold)
    } else {
        Ok(max_consecutive_errors)
    }
}
