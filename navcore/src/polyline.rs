//! Encoded polyline codec (Google polyline algorithm format).
//!
//! Each coordinate is stored as a latitude delta followed by a longitude
//! delta, in 1e-5 degree units. A delta is zig-zag encoded and split into
//! 5-bit chunks, low chunk first, each written as `chunk + 63` with `0x20`
//! set on every chunk but the last.

use crate::models::Coordinate;

const PRECISION: f64 = 1e5;
const CHUNK_OFFSET: u8 = 63;
const CONTINUATION: u8 = 0x20;
const CHUNK_MASK: u8 = 0x1f;
/// Largest shift that still leaves room for a full 5-bit chunk in an i64.
const MAX_SHIFT: u32 = 55;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("encoded path ends inside a value at byte {0}")]
    Truncated(usize),
    #[error("encoded path ends after a latitude at byte {0} with no longitude")]
    MissingLongitude(usize),
    #[error("byte {byte:#04x} at offset {offset} is not a polyline character")]
    InvalidCharacter { byte: u8, offset: usize },
    #[error("value starting before byte {0} does not fit in 64 bits")]
    Overflow(usize),
}

/// Decode an encoded path into coordinates.
///
/// The empty string decodes to an empty path. Malformed input is rejected
/// as a whole rather than returning the points decoded so far.
pub fn decode_path(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut path = Vec::with_capacity(bytes.len() / 4);

    while cursor < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut cursor)?)
            .ok_or(DecodeError::Overflow(cursor))?;
        if cursor >= bytes.len() {
            return Err(DecodeError::MissingLongitude(cursor));
        }
        lon = lon
            .checked_add(next_value(bytes, &mut cursor)?)
            .ok_or(DecodeError::Overflow(cursor))?;

        path.push(Coordinate {
            lat: lat as f64 / PRECISION,
            lon: lon as f64 / PRECISION,
        });
    }

    Ok(path)
}

fn next_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*cursor) else {
            return Err(DecodeError::Truncated(*cursor));
        };
        if !(CHUNK_OFFSET..=b'~').contains(&byte) {
            return Err(DecodeError::InvalidCharacter {
                byte,
                offset: *cursor,
            });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow(*cursor));
        }
        *cursor += 1;

        let chunk = byte - CHUNK_OFFSET;
        result |= i64::from(chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode coordinates, rounding each to 5 decimal places.
///
/// Non-finite or out-of-range values saturate and deltas wrap, so the output
/// is well-formed but only meaningful for finite coordinates.
pub fn encode_path(path: &[Coordinate]) -> String {
    let mut encoded = String::with_capacity(path.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for coord in path {
        let lat = (coord.lat * PRECISION).round() as i64;
        let lon = (coord.lon * PRECISION).round() as i64;
        encode_value(lat.wrapping_sub(prev_lat), &mut encoded);
        encode_value(lon.wrapping_sub(prev_lon), &mut encoded);
        prev_lat = lat;
        prev_lon = lon;
    }

    encoded
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 {
        !(delta << 1) as u64
    } else {
        (delta << 1) as u64
    };

    while value >= u64::from(CONTINUATION) {
        let chunk = (value as u8 & CHUNK_MASK) | CONTINUATION;
        out.push(char::from(chunk + CHUNK_OFFSET));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHUNK_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn assert_close(actual: Coordinate, lat: f64, lon: f64) {
        assert!(
            (actual.lat - lat).abs() < 1e-9 && (actual.lon - lon).abs() < 1e-9,
            "expected ({lat}, {lon}), got {actual:?}"
        );
    }

    #[test]
    fn decodes_reference_vector() {
        let path = decode_path(REFERENCE).expect("reference vector");
        assert_eq!(path.len(), 3);
        assert_close(path[0], 38.5, -120.2);
        assert_close(path[1], 40.7, -120.95);
        assert_close(path[2], 43.252, -126.453);
    }

    #[test]
    fn encodes_reference_vector() {
        let path = [
            Coordinate { lat: 38.5, lon: -120.2 },
            Coordinate { lat: 40.7, lon: -120.95 },
            Coordinate { lat: 43.252, lon: -126.453 },
        ];
        assert_eq!(encode_path(&path), REFERENCE);
    }

    #[test]
    fn empty_input_decodes_to_empty_path() {
        assert_eq!(decode_path(""), Ok(Vec::new()));
        assert_eq!(encode_path(&[]), "");
    }

    #[test]
    fn decoding_is_deterministic() {
        assert_eq!(decode_path(REFERENCE), decode_path(REFERENCE));
    }

    #[test]
    fn truncated_value_is_rejected() {
        // "_p~i" stops while the continuation bit is still set.
        assert_eq!(decode_path("_p~i"), Err(DecodeError::Truncated(4)));
        assert!(matches!(
            decode_path(&REFERENCE[..REFERENCE.len() - 1]),
            Err(DecodeError::Truncated(_))
        ));
    }

    #[test]
    fn latitude_without_longitude_is_rejected() {
        assert_eq!(decode_path("_p~iF"), Err(DecodeError::MissingLongitude(5)));
    }

    #[test]
    fn characters_outside_alphabet_are_rejected() {
        assert_eq!(
            decode_path("_p~iF ps|U"),
            Err(DecodeError::InvalidCharacter {
                byte: b' ',
                offset: 5
            })
        );
        assert!(matches!(
            decode_path("_p~iF~ps|Ué"),
            Err(DecodeError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn runaway_continuation_is_rejected() {
        let encoded = "~".repeat(20);
        assert_eq!(decode_path(&encoded), Err(DecodeError::Overflow(12)));
    }

    #[test]
    fn encoding_non_finite_coordinates_does_not_panic() {
        let path = [
            Coordinate { lat: f64::INFINITY, lon: f64::NEG_INFINITY },
            Coordinate { lat: f64::NEG_INFINITY, lon: f64::INFINITY },
            Coordinate { lat: f64::NAN, lon: 0.0 },
        ];
        let encoded = encode_path(&path);
        assert!(!encoded.is_empty());
        assert!(encoded.bytes().all(|b| (CHUNK_OFFSET..=b'~').contains(&b)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn rounded_coord() -> impl Strategy<Value = Coordinate> {
            (-9_000_000_i64..=9_000_000, -18_000_000_i64..=18_000_000).prop_map(|(lat, lon)| {
                Coordinate {
                    lat: lat as f64 / PRECISION,
                    lon: lon as f64 / PRECISION,
                }
            })
        }

        proptest! {
            #[test]
            fn prop_encoded_path_decodes_to_input(
                path in prop::collection::vec(rounded_coord(), 0..40)
            ) {
                let decoded = decode_path(&encode_path(&path)).expect("encoder output decodes");
                prop_assert_eq!(decoded, path);
            }

            #[test]
            fn prop_decode_never_panics(input in "[?-~]{0,64}") {
                let _ = decode_path(&input);
            }
        }
    }
}
