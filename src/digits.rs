/// Returns the number of decimal digits needed to write `num`.
///
/// Zero has one digit. The result is in the range [1, 20].
///
/// ```rust
/// use qrbits::digits::digit_count;
///
/// assert_eq!(digit_count(0), 1);
/// assert_eq!(digit_count(673), 3);
/// assert_eq!(digit_count(u64::MAX), 20);
/// ```
#[inline]
pub fn digit_count(num: u64) -> usize {
    num.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Splits `num` into its decimal digits, most significant first.
pub(crate) fn decimal_digits(mut num: u64) -> Vec<u8> {
    let mut digits = vec![0u8; digit_count(num)];
    for digit in digits.iter_mut().rev() {
        *digit = (num % 10) as u8;
        num /= 10;
    }
    digits
}
