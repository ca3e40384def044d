use super::BencodedValue;

/// Serializes a value back into bencode bytes.
///
/// Total by construction; dictionary keys come out in ascending byte order
/// because [`BencodedValue::Dict`] stores them sorted, so the output is the
/// canonical encoding of the value.
pub fn encode(value: &BencodedValue) -> Vec<u8> {
    let mut output = Vec::new();
    encode_into(value, &mut output);
    output
}

fn encode_into(value: &BencodedValue, output: &mut Vec<u8>) {
    match value {
        BencodedValue::Integer(number) => {
            output.push(b'i');
            output.extend_from_slice(number.to_string().as_bytes());
            output.push(b'e');
        }
        BencodedValue::ByteString(bytes) => encode_bytes(bytes, output),
        BencodedValue::List(list) => {
            output.push(b'l');
            for element in list {
                encode_into(element, output);
            }
            output.push(b'e');
        }
        BencodedValue::Dict(dict) => {
            output.push(b'd');
            for (key, element) in dict {
                encode_bytes(key, output);
                encode_into(element, output);
            }
            output.push(b'e');
        }
    }
}

fn encode_bytes(bytes: &[u8], output: &mut Vec<u8>) {
    output.extend_from_slice(bytes.len().to_string().as_bytes());
    output.push(b':');
    output.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::super::decode;
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn test_encode_integer() {
        assert_eq!(b"i42e".to_vec(), encode(&BencodedValue::Integer(42)));
        assert_eq!(b"i-17e".to_vec(), encode(&BencodedValue::Integer(-17)));
        assert_eq!(b"i0e".to_vec(), encode(&BencodedValue::Integer(0)));
    }

    #[test]
    fn test_encode_byte_string() {
        assert_eq!(
            b"4:spam".to_vec(),
            encode(&BencodedValue::ByteString(b"spam".to_vec()))
        );
        assert_eq!(
            b"0:".to_vec(),
            encode(&BencodedValue::ByteString(Vec::new()))
        );
    }

    #[test]
    fn test_encode_list() {
        let list = BencodedValue::List(vec![
            BencodedValue::ByteString(b"spam".to_vec()),
            BencodedValue::Integer(90),
            BencodedValue::List(Vec::new()),
        ]);

        assert_eq!(b"l4:spami90elee".to_vec(), encode(&list));
    }

    #[test]
    fn test_encode_dict_sorts_keys() {
        let mut dict = BTreeMap::new();
        dict.insert(b"spam".to_vec(), BencodedValue::ByteString(b"abc".to_vec()));
        dict.insert(b"seven".to_vec(), BencodedValue::Integer(43));

        assert_eq!(
            b"d5:seveni43e4:spam3:abce".to_vec(),
            encode(&BencodedValue::Dict(dict))
        );
    }

    #[test]
    fn test_roundtrip_decode_encode_decode() {
        let input = b"d8:announce5:url:)4:infod6:lengthi89e4:name4:name12:piece lengthi262144e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";

        let value = decode(input).unwrap();
        let encoded = encode(&value);

        assert_eq!(value, decode(&encoded).unwrap());
    }

    #[test]
    fn test_canonical_input_is_idempotent() {
        let input: &[u8] = b"d3:bar4:spam3:fooi42e5:itemsli1ei2ei3eee";

        assert_eq!(input.to_vec(), encode(&decode(input).unwrap()));
    }
}
