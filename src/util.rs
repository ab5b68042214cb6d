/// Returns bit `index` of `byte`, counting from the least significant bit.
pub fn get_bit(byte: u8, index: usize) -> bool {
    byte >> index & 0b1 == 1
}

pub fn nibbles(op: u16) -> (u8, u8, u8, u8) {
    (
        (op >> 12) as u8,
        (op >> 8 & 15) as u8,
        (op >> 4 & 15) as u8,
        (op & 15) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_bit_reads_msb_and_lsb() {
        assert!(get_bit(0b1000_0001, 7));
        assert!(get_bit(0b1000_0001, 0));
        assert!(!get_bit(0b1000_0001, 3));
    }

    #[test]
    fn nibbles_split_big_endian_word() {
        assert_eq!(nibbles(0xD12A), (0xD, 0x1, 0x2, 0xA));
    }
}
