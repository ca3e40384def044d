use std::collections::BTreeMap;
use std::num::IntErrorKind;

use crate::MAX_BENCODE_DEPTH;

use super::{BencodeError, BencodedValue};

/// Decodes one complete bencoded document.
///
/// The whole input must be consumed; bytes left over after the top-level
/// value are a [`BencodeError::TrailingInput`] error, since the grammar is
/// not a prefix code at the top level.
pub fn decode(input: &[u8]) -> Result<BencodedValue, BencodeError> {
    let mut decoder = Decoder::new(input);

    let value = decoder.decode_value()?;
    if !decoder.is_empty() {
        return Err(BencodeError::TrailingInput);
    }

    Ok(value)
}

/// Cursor over the raw input plus the nesting allowance of one decode call.
///
/// The depth counter lives here and nowhere else, so concurrent decodes
/// cannot interfere with each other.
struct Decoder<'a> {
    input: &'a [u8],
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Decoder { input, depth: 0 }
    }

    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn decode_value(&mut self) -> Result<BencodedValue, BencodeError> {
        self.depth += 1;
        if self.depth > MAX_BENCODE_DEPTH {
            self.depth -= 1;
            return Err(BencodeError::MaxDepthExceeded);
        }

        let result = match self.input.first() {
            None => Err(BencodeError::EmptyInput),
            Some(b'i') => self.decode_integer().map(BencodedValue::Integer),
            Some(b'l') => self.decode_list().map(BencodedValue::List),
            Some(b'd') => self.decode_dict().map(BencodedValue::Dict),
            Some(b'0'..=b'9' | b'+' | b'-') => {
                self.decode_string().map(BencodedValue::ByteString)
            }
            Some(_) => Err(BencodeError::InvalidType),
        };

        self.depth -= 1;
        result
    }

    fn decode_integer(&mut self) -> Result<i64, BencodeError> {
        self.input = &self.input[1..];

        let end = self
            .input
            .iter()
            .position(|&byte| byte == b'e')
            .ok_or(BencodeError::MissingIntegerTerminator)?;

        let span = &self.input[..end];
        validate_integer_span(span)?;

        // the span is all digits at this point, so a parse failure can
        // only mean the value does not fit an i64
        let number = std::str::from_utf8(span)
            .map_err(|_| BencodeError::InvalidInteger)?
            .parse::<i64>()
            .map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    BencodeError::OutOfRangeInteger
                }
                _ => BencodeError::InvalidInteger,
            })?;

        self.input = &self.input[end + 1..];
        Ok(number)
    }

    fn decode_string(&mut self) -> Result<Vec<u8>, BencodeError> {
        let colon = self
            .input
            .iter()
            .position(|&byte| byte == b':')
            .ok_or(BencodeError::MissingColon)?;

        let span = &self.input[..colon];
        validate_length_span(span)?;

        let length = std::str::from_utf8(span)
            .map_err(|_| BencodeError::InvalidStringLength)?
            .parse::<usize>()
            .map_err(|_| BencodeError::StringTooLarge)?;

        let rest = &self.input[colon + 1..];
        if rest.len() < length {
            return Err(BencodeError::LengthMismatch);
        }

        let bytes = rest[..length].to_vec();
        self.input = &rest[length..];
        Ok(bytes)
    }

    fn decode_list(&mut self) -> Result<Vec<BencodedValue>, BencodeError> {
        self.input = &self.input[1..];

        let mut list = Vec::new();
        loop {
            match self.input.first() {
                None => return Err(BencodeError::MissingListTerminator),
                Some(b'e') => {
                    self.input = &self.input[1..];
                    return Ok(list);
                }
                Some(_) => {
                    let element = self.decode_value().map_err(|e| match e {
                        BencodeError::MaxDepthExceeded => e,
                        _ => BencodeError::InvalidListElement,
                    })?;
                    list.push(element);
                }
            }
        }
    }

    fn decode_dict(&mut self) -> Result<BTreeMap<Vec<u8>, BencodedValue>, BencodeError> {
        self.input = &self.input[1..];

        let mut dict = BTreeMap::new();
        let mut last_key: Option<Vec<u8>> = None;
        loop {
            match self.input.first() {
                None => return Err(BencodeError::MissingDictTerminator),
                Some(b'e') => {
                    self.input = &self.input[1..];
                    return Ok(dict);
                }
                Some(_) => {
                    let key = match self.decode_value()? {
                        BencodedValue::ByteString(key) => key,
                        _ => return Err(BencodeError::NonStringKey),
                    };

                    // canonical bencode: keys must strictly ascend bytewise
                    if let Some(previous) = &last_key {
                        if *previous == key {
                            return Err(BencodeError::DuplicateKey);
                        }
                        if *previous > key {
                            return Err(BencodeError::UnorderedKeys);
                        }
                    }

                    let value = self.decode_value()?;
                    dict.insert(key.clone(), value);
                    last_key = Some(key);
                }
            }
        }
    }
}

fn validate_integer_span(span: &[u8]) -> Result<(), BencodeError> {
    let digits = match span.split_first() {
        None => return Err(BencodeError::InvalidInteger),
        Some((b'+', _)) => return Err(BencodeError::InvalidInteger),
        Some((b'-', rest)) => {
            if rest.first() == Some(&b'0') {
                // covers both -0 and -0<digits>
                return Err(BencodeError::InvalidInteger);
            }
            rest
        }
        Some(_) => span,
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(BencodeError::InvalidInteger);
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return Err(BencodeError::InvalidInteger);
    }

    Ok(())
}

fn validate_length_span(span: &[u8]) -> Result<(), BencodeError> {
    match span.first() {
        None => return Err(BencodeError::InvalidStringLength),
        Some(b'-') => return Err(BencodeError::NegativeStringLength),
        Some(b'+') => return Err(BencodeError::SignedStringLength),
        Some(_) => {}
    }

    if !span.iter().all(u8::is_ascii_digit) {
        return Err(BencodeError::InvalidStringLength);
    }
    if span.len() > 1 && span[0] == b'0' {
        return Err(BencodeError::InvalidStringLength);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_positive_integer() {
        let result = decode(b"i42e").unwrap();
        assert_eq!(BencodedValue::Integer(42), result);
    }

    #[test]
    fn test_decode_negative_integer() {
        let result = decode(b"i-17e").unwrap();
        assert_eq!(BencodedValue::Integer(-17), result);
    }

    #[test]
    fn test_decode_zero() {
        let result = decode(b"i0e").unwrap();
        assert_eq!(BencodedValue::Integer(0), result);
    }

    #[test]
    fn test_decode_integer_boundaries() {
        let result = decode(b"i9223372036854775807e").unwrap();
        assert_eq!(BencodedValue::Integer(i64::MAX), result);

        let result = decode(b"i-9223372036854775808e").unwrap();
        assert_eq!(BencodedValue::Integer(i64::MIN), result);
    }

    #[test]
    fn test_decode_integer_out_of_range() {
        assert_eq!(
            Err(BencodeError::OutOfRangeInteger),
            decode(b"i9223372036854775808e")
        );
        assert_eq!(
            Err(BencodeError::OutOfRangeInteger),
            decode(b"i-9223372036854775809e")
        );
    }

    #[test]
    fn test_decode_integer_malformed() {
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"ie"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i042e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i-0e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i-01e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i--1e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i+1e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i1.0e"));
        assert_eq!(Err(BencodeError::InvalidInteger), decode(b"i e"));
    }

    #[test]
    fn test_decode_integer_missing_terminator() {
        assert_eq!(Err(BencodeError::MissingIntegerTerminator), decode(b"i1"));
    }

    #[test]
    fn test_decode_string() {
        let result = decode(b"4:spam").unwrap();
        assert_eq!(BencodedValue::ByteString(b"spam".to_vec()), result);
    }

    #[test]
    fn test_decode_empty_string() {
        let result = decode(b"0:").unwrap();
        assert_eq!(BencodedValue::ByteString(Vec::new()), result);
    }

    #[test]
    fn test_decode_string_length_mismatch() {
        assert_eq!(Err(BencodeError::LengthMismatch), decode(b"5:spam"));
    }

    #[test]
    fn test_decode_string_invalid_length() {
        assert_eq!(Err(BencodeError::InvalidStringLength), decode(b"01:a"));
        assert_eq!(Err(BencodeError::NegativeStringLength), decode(b"-1:a"));
        assert_eq!(Err(BencodeError::SignedStringLength), decode(b"+1:a"));
    }

    #[test]
    fn test_decode_string_length_overflow() {
        let input = format!("{}0:", u64::MAX);
        assert_eq!(Err(BencodeError::StringTooLarge), decode(input.as_bytes()));
    }

    #[test]
    fn test_decode_string_missing_colon() {
        assert_eq!(Err(BencodeError::MissingColon), decode(b"4spam"));
    }

    #[test]
    fn test_decode_list() {
        let result = decode(b"l3:abci45ee").unwrap();
        let expected = BencodedValue::List(vec![
            BencodedValue::ByteString(b"abc".to_vec()),
            BencodedValue::Integer(45),
        ]);

        assert_eq!(expected, result);
    }

    #[test]
    fn test_decode_empty_list() {
        assert_eq!(BencodedValue::List(Vec::new()), decode(b"le").unwrap());
    }

    #[test]
    fn test_decode_nested_list() {
        let result = decode(b"l4:spami90elee").unwrap();
        let expected = BencodedValue::List(vec![
            BencodedValue::ByteString(b"spam".to_vec()),
            BencodedValue::Integer(90),
            BencodedValue::List(Vec::new()),
        ]);

        assert_eq!(expected, result);
    }

    #[test]
    fn test_decode_list_missing_terminator() {
        assert_eq!(Err(BencodeError::MissingListTerminator), decode(b"lle"));
    }

    #[test]
    fn test_decode_list_invalid_element() {
        assert_eq!(Err(BencodeError::InvalidListElement), decode(b"lxe"));
    }

    #[test]
    fn test_decode_dict() {
        let result = decode(b"d5:seveni43e4:spam3:abce").unwrap();

        let mut expected = BTreeMap::new();
        expected.insert(b"seven".to_vec(), BencodedValue::Integer(43));
        expected.insert(b"spam".to_vec(), BencodedValue::ByteString(b"abc".to_vec()));

        assert_eq!(BencodedValue::Dict(expected), result);
    }

    #[test]
    fn test_decode_empty_dict() {
        assert_eq!(BencodedValue::Dict(BTreeMap::new()), decode(b"de").unwrap());
    }

    #[test]
    fn test_decode_dict_missing_terminator() {
        assert_eq!(
            Err(BencodeError::MissingDictTerminator),
            decode(b"d4:spami1e")
        );
    }

    #[test]
    fn test_decode_dict_non_string_key() {
        assert_eq!(Err(BencodeError::NonStringKey), decode(b"di1ei2ee"));
    }

    #[test]
    fn test_decode_dict_duplicate_key() {
        assert_eq!(
            Err(BencodeError::DuplicateKey),
            decode(b"d4:spami43e4:spami56ee")
        );
    }

    #[test]
    fn test_decode_dict_unordered_keys() {
        assert_eq!(
            Err(BencodeError::UnorderedKeys),
            decode(b"d4:bbbbi1e4:aaaai2ee")
        );
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(Err(BencodeError::EmptyInput), decode(b""));
    }

    #[test]
    fn test_decode_invalid_type() {
        assert_eq!(Err(BencodeError::InvalidType), decode(b"x"));
    }

    #[test]
    fn test_decode_trailing_input() {
        assert_eq!(Err(BencodeError::TrailingInput), decode(b"i1ei2e"));
        assert_eq!(Err(BencodeError::TrailingInput), decode(b"4:spam "));
    }

    #[test]
    fn test_decode_at_nesting_ceiling() {
        let mut input = Vec::new();
        input.extend(std::iter::repeat(b'l').take(MAX_BENCODE_DEPTH));
        input.extend(std::iter::repeat(b'e').take(MAX_BENCODE_DEPTH));

        assert!(decode(&input).is_ok());
    }

    #[test]
    fn test_decode_one_past_nesting_ceiling() {
        let mut input = Vec::new();
        input.extend(std::iter::repeat(b'l').take(MAX_BENCODE_DEPTH + 1));
        input.extend(std::iter::repeat(b'e').take(MAX_BENCODE_DEPTH + 1));

        assert_eq!(Err(BencodeError::MaxDepthExceeded), decode(&input));
    }

    #[test]
    fn test_decode_deeply_nested_does_not_overflow() {
        let input = vec![b'l'; 100_000];

        assert_eq!(Err(BencodeError::MaxDepthExceeded), decode(&input));
    }

    #[test]
    fn test_decode_deeply_nested_dicts_do_not_overflow() {
        let mut input = Vec::new();
        for _ in 0..100_000 {
            input.extend_from_slice(b"d1:a");
        }

        assert_eq!(Err(BencodeError::MaxDepthExceeded), decode(&input));
    }
}
