use stm32f4xx_hal::i2c::I2c;
use stm32f4xx_hal::pac::I2C1;
use logic::errors::Errors;
use logic::services::rx8025t::Rx8025t;
use logic::services::rx8025t::config::Rx8025tConfig;
use crate::implementations::monotonic::DwtMillis;

pub type Rx8025tOnI2c1 = Rx8025t<I2c<I2C1>, DwtMillis>;

/// Bus must already run in standard (100 kHz) or fast (400 kHz) mode.
pub fn rx8025t_on_i2c1(i2c: I2c<I2C1>, monotonic: DwtMillis, config: Rx8025tConfig) -> Result<Rx8025tOnI2c1, Errors> {
    Rx8025t::new(i2c, monotonic, config)
}
