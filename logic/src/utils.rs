#![deny(unsafe_code)]
#![deny(warnings)]
use crate::errors::Errors;


#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitsU8 {
    pub bits: u8,
}

impl BitsU8 {

    #[inline(always)]
    pub const fn new(bits: u8) -> Self {
        Self { bits }
    }

    #[inline(always)]
    pub fn clear(&mut self, bit: u8) {
        self.bits &= !(1 << bit);
    }

    #[inline(always)]
    pub fn get(&self, bit: u8) -> bool {
        self.bits & (1 << bit) != 0
    }

    /**
    Value of bits from `from` to `to` (inclusive).
     */
    pub fn bits(&self, from: u8, to: u8) -> Result<u8, Errors> {
        if from > to {
            return Err(Errors::FromAfterTo);
        }
        if from >= 8 || to >= 8 {
            return Err(Errors::OutOfRange);
        }
        let mask = ((1_u16 << (to - from + 1)) - 1) as u8;
        Ok((self.bits >> from) & mask)
    }

}

/// Packs `value` (0..=99) into two decimal nibbles.
#[inline(always)]
pub const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Unpacks a two nibble BCD byte, `None` when either nibble is above 9.
pub fn from_bcd(byte: u8) -> Option<u8> {
    let bits = BitsU8::new(byte);
    let low = bits.bits(0, 3).ok()?;
    let high = bits.bits(4, 7).ok()?;
    if low > 9 || high > 9 {
        None
    } else {
        Some(high * 10 + low)
    }
}


#[cfg(test)]
mod tests {
    use crate::errors::Errors;
    use crate::utils::{BitsU8, from_bcd, to_bcd};

    #[test]
    fn test_clear() {
        for i in 0..8 {
            let mut value = BitsU8::new(0b1111_1111);
            value.clear(i);
            assert_eq!(value.bits, 0b1111_1111 & !(1 << i));
        }
    }

    #[test]
    fn test_bits() {
        let d = BitsU8::new(0b1001_0111);
        assert_eq!(d.bits(0, 2).unwrap(), 7);
        assert_eq!(d.bits(0, 3).unwrap(), 7);
        assert_eq!(d.bits(4, 7).unwrap(), 9);
        assert_eq!(d.bits(0, 7).unwrap(), 0b1001_0111);
        assert_eq!(d.bits(6, 6).unwrap(), 0);
    }

    #[test]
    fn test_bits_errors() {
        let d = BitsU8::new(0);
        assert_eq!(Err(Errors::FromAfterTo), d.bits(3, 2));
        assert_eq!(Err(Errors::OutOfRange), d.bits(4, 8));
    }

    #[test]
    fn test_to_bcd() {
        assert_eq!(to_bcd(0), 0x00);
        assert_eq!(to_bcd(9), 0x09);
        assert_eq!(to_bcd(10), 0x10);
        assert_eq!(to_bcd(59), 0x59);
        assert_eq!(to_bcd(99), 0x99);
    }

    #[test]
    fn test_from_bcd() {
        assert_eq!(from_bcd(0x00), Some(0));
        assert_eq!(from_bcd(0x45), Some(45));
        assert_eq!(from_bcd(0x99), Some(99));
    }

    #[test]
    fn test_from_bcd_rejects_nibbles_above_nine() {
        for nibble in 10..16_u8 {
            assert_eq!(from_bcd(nibble), None);
            assert_eq!(from_bcd(nibble << 4), None);
            assert_eq!(from_bcd((nibble << 4) | nibble), None);
        }
    }
}
