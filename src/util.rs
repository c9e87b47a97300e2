//! Leading-content number scanning.
//!
//! Config payloads like `"5432 # primary"` or `"  -12abc"` still carry a number at the front.
//! These helpers cut that prefix out so the standard `FromStr` impls can take it from there,
//! independent of any locale.

/// Returns the longest prefix of `text` that reads as a base-10 integer, leading whitespace
/// excluded. `None` if no digit follows the optional sign.
pub(crate) fn integer_prefix(text: &str) -> Option<&str> {
    let text = trim_c_whitespace(text);
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);

    let digits = count_digits(&bytes[end..]);
    if digits == 0 {
        return None;
    }
    end += digits;

    Some(&text[..end])
}

/// Returns the longest prefix of `text` that reads as a decimal floating point number,
/// including the `inf`, `infinity` and `nan` spellings.
pub(crate) fn real_prefix(text: &str) -> Option<&str> {
    let text = trim_c_whitespace(text);
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let rest = &text[sign..];

    for word in ["infinity", "inf", "nan"] {
        if rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
        {
            return Some(&text[..sign + word.len()]);
        }
    }

    let mut end = sign;
    let whole = count_digits(&bytes[end..]);
    end += whole;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = count_digits(&bytes[end + 1..]);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }

    if whole == 0 && fraction == 0 {
        return None;
    }

    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        exp_end += sign_len(&bytes[exp_end..]);
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&text[..end])
}

fn trim_c_whitespace(text: &str) -> &str {
    // Same set as C's `isspace` in the "C" locale.
    text.trim_start_matches([' ', '\t', '\n', '\x0B', '\x0C', '\r'])
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
