//! EAN-13 check digit

/// True when `code` is exactly 13 ASCII digits
pub fn looks_like_ean13(code: &str) -> bool {
    code.len() == 13 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Check digit for the first 12 digits of an EAN-13
///
/// Digits in odd positions (1st, 3rd, ...) weigh 1, even positions weigh 3.
/// Returns `None` unless given exactly 12 ASCII digits.
pub fn check_digit(first_twelve: &str) -> Option<u8> {
    if first_twelve.len() != 12 || !first_twelve.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = first_twelve
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 0 { digit } else { digit * 3 }
        })
        .sum();
    Some(((10 - sum % 10) % 10) as u8)
}

/// Validate a full 13-digit code
pub fn is_valid(code: &str) -> bool {
    if !looks_like_ean13(code) {
        return false;
    }
    let (body, last) = code.split_at(12);
    match check_digit(body) {
        Some(expected) => last.as_bytes()[0] - b'0' == expected,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_GOOD: &str = "4006381333931";

    #[test]
    fn test_known_code_is_valid() {
        assert!(is_valid(KNOWN_GOOD));
        assert_eq!(check_digit("400638133393"), Some(1));
        assert!(is_valid("5901234123457"));
    }

    #[test]
    fn test_every_single_digit_mutation_is_rejected() {
        let original: Vec<u8> = KNOWN_GOOD.bytes().collect();
        for pos in 0..original.len() {
            for digit in b'0'..=b'9' {
                if digit == original[pos] {
                    continue;
                }
                let mut mutated = original.clone();
                mutated[pos] = digit;
                let code = String::from_utf8(mutated).unwrap();
                assert!(!is_valid(&code), "mutation {} accepted", code);
            }
        }
    }

    #[test]
    fn test_shape_checks() {
        assert!(!looks_like_ean13("400638133393"));
        assert!(!looks_like_ean13("40063813339a1"));
        assert!(looks_like_ean13(KNOWN_GOOD));
        assert_eq!(check_digit("12345"), None);
        assert!(!is_valid("ABCDEFGHIJKLM"));
    }
}
