//! The 45-symbol alphanumeric alphabet of QR code alphanumeric mode.

/// Characters encodable in alphanumeric mode. The position of a character in
/// this string is its code (0 to 44).
pub const ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Marks table slots that hold no alphanumeric character.
const INVALID: u8 = u8::MAX;

/// First and last characters covered by [`CODE_TABLE`].
const TABLE_START: char = ' ';
const TABLE_END: char = 'Z';

/// Codes indexed by `ch - ' '` for every `ch` in `' '..='Z'`.
static CODE_TABLE: [u8; TABLE_END as usize - TABLE_START as usize + 1] = build_table();

const fn build_table() -> [u8; TABLE_END as usize - TABLE_START as usize + 1] {
    let mut table = [INVALID; TABLE_END as usize - TABLE_START as usize + 1];
    let charset = ALPHANUMERIC_CHARSET.as_bytes();
    let mut code = 0;
    while code < charset.len() {
        table[(charset[code] - TABLE_START as u8) as usize] = code as u8;
        code += 1;
    }
    table
}

/// Returns the alphanumeric code of `ch`, or `None` if `ch` is not one of
/// the 45 symbols in [`ALPHANUMERIC_CHARSET`].
///
/// # Example
///
/// ```rust
/// use qrbits::codes::lookup;
///
/// assert_eq!(lookup('A'), Some(10));
/// assert_eq!(lookup(':'), Some(44));
/// assert_eq!(lookup('a'), None);
/// ```
#[inline]
pub fn lookup(ch: char) -> Option<u8> {
    if !(TABLE_START..=TABLE_END).contains(&ch) {
        return None;
    }

    match CODE_TABLE[ch as usize - TABLE_START as usize] {
        INVALID => None,
        code => Some(code),
    }
}

/// Range and equality based equivalent of [`lookup`].
///
/// Kept as a reference implementation for equivalence tests and benchmarks;
/// encoding always goes through [`lookup`].
pub fn lookup_branching(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'A'..='Z' => Some(ch as u8 - b'A' + 10),
        ' ' => Some(36),
        '$' => Some(37),
        '%' => Some(38),
        '*' => Some(39),
        '+' => Some(40),
        '-' => Some(41),
        '.' => Some(42),
        '/' => Some(43),
        ':' => Some(44),
        _ => None,
    }
}

/// Returns whether every character of `text` is encodable in alphanumeric mode.
pub fn is_alphanumeric(text: &str) -> bool {
    text.chars().all(|c| lookup(c).is_some())
}
