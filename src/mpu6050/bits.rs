//! Register bit helpers. Bit fields are addressed by their highest bit and
//! length, so `BitBlock { bit: 4, length: 2 }` covers bits 4:3.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitBlock {
    pub bit: u8,
    pub length: u8,
}

impl BitBlock {
    const fn shift(&self) -> u8 {
        self.bit + 1 - self.length
    }

    const fn mask(&self) -> u8 {
        (((1u16 << self.length) - 1) as u8) << self.shift()
    }
}

pub fn get_bit(byte: u8, n: u8) -> u8 {
    (byte >> n) & 1
}

pub fn set_bit(byte: &mut u8, n: u8, enable: bool) {
    if enable {
        *byte |= 1 << n;
    } else {
        *byte &= !(1 << n);
    }
}

pub fn get_bits(byte: u8, block: BitBlock) -> u8 {
    (byte & block.mask()) >> block.shift()
}

pub fn set_bits(byte: &mut u8, block: BitBlock, data: u8) {
    let mask = block.mask();
    *byte = (*byte & !mask) | ((data << block.shift()) & mask);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS_SEL: BitBlock = BitBlock { bit: 4, length: 2 };
    const CLKSEL: BitBlock = BitBlock { bit: 2, length: 3 };

    #[test]
    fn single_bits() {
        let mut byte = 0b0000_0000;
        set_bit(&mut byte, 6, true);
        assert_eq!(byte, 0b0100_0000);
        assert_eq!(get_bit(byte, 6), 1);
        set_bit(&mut byte, 6, false);
        assert_eq!(byte, 0);
    }

    #[test]
    fn bit_blocks_leave_other_bits_alone() {
        let mut byte = 0b1110_0111;
        set_bits(&mut byte, FS_SEL, 0b10);
        assert_eq!(byte, 0b1111_0111);
        assert_eq!(get_bits(byte, FS_SEL), 0b10);

        set_bits(&mut byte, CLKSEL, 0b001);
        assert_eq!(byte, 0b1111_0001);
        assert_eq!(get_bits(byte, CLKSEL), 0b001);
    }
}
