pub mod monotonic;
pub mod rtc;
pub mod rx8025t;
