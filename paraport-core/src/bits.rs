//! Bit and bitfield helpers
//!
//! Every register operation in the crate reduces to one of these. They are
//! branch-free `const fn`s over a single byte. `index` must be below 8.

/// Check whether bit `index` of `value` is set
#[inline]
pub const fn check_bit(value: u8, index: u8) -> bool {
    check_bits(value, 1, index) != 0
}

/// Extract the field `mask` located at bit `index`, shifted down to bit 0
///
/// `check_bits(0b0110_0000, 0b11, 5)` is `0b11`.
#[inline]
pub const fn check_bits(value: u8, mask: u8, index: u8) -> u8 {
    (value >> index) & mask
}

/// Return `value` with bit `index` set to `on`
#[inline]
pub const fn set_bit(value: u8, index: u8, on: bool) -> u8 {
    set_bits(value, 1, index, on)
}

/// Return `value` with every bit of the field `mask << index` set to `on`
#[inline]
pub const fn set_bits(value: u8, mask: u8, index: u8, on: bool) -> u8 {
    let field = mask << index;
    // 0x00 or 0xFF
    let fill = (on as u8).wrapping_neg();
    (value & !field) | (field & fill)
}
