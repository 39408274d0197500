//! Leverage common functionality across the Antelope codec crates.

/// Converts bytes to a lowercase hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(DIGITS[(byte >> 4) as usize] as char);
        hex.push(DIGITS[(byte & 0x0f) as usize] as char);
    }
    hex
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Converts a hexadecimal string (either case) to bytes.
///
/// Returns `None` if the string has an odd length or contains a non-hex character.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.as_bytes();
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.chunks_exact(2)
        .map(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

/// Converts a hexadecimal string to bytes, stripping whitespace and/or a `0x` prefix. Commonly used
/// in testing to encode external test vectors without modification.
pub fn from_hex_formatted(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.replace(['\t', '\n', '\r', ' '], "");
    let res = hex.strip_prefix("0x").unwrap_or(&hex);
    from_hex(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        // Test case 0: empty bytes
        assert_eq!(hex(&[]), "");
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());

        // Test case 1: multiple bytes
        let b = &[0x00, 0x85, 0x5c, 0x34, 0xff];
        let h = hex(b);
        assert_eq!(h, "00855c34ff");
        assert_eq!(from_hex(&h).unwrap(), b.to_vec());

        // Test case 2: uppercase input
        assert_eq!(from_hex("00855C34FF").unwrap(), b.to_vec());

        // Test case 3: odd number of digits
        assert!(from_hex("0102030").is_none());

        // Test case 4: invalid hexadecimal character
        assert!(from_hex("01g3").is_none());

        // Test case 5: multi-byte characters never split a boundary
        assert!(from_hex("é1").is_none());
    }

    #[test]
    fn test_from_hex_formatted() {
        let b = vec![0x01, 0x02, 0x03];
        assert_eq!(from_hex_formatted("0x010203").unwrap(), b);
        assert_eq!(from_hex_formatted("01 02\t03\n").unwrap(), b);
        assert!(from_hex_formatted("0x0102030").is_none());
    }
}
