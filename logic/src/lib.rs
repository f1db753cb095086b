#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// must stay first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod errors;
pub mod utils;
pub mod hal_ext;
pub mod services;
