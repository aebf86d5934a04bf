//! Fixed-width UART telemetry codec
//!
//! Records arriving on the serial transmit channel are framed as
//! `type (1B) | received timestamp (8B) | length (1B) | payload (N B)`,
//! all big-endian. Type 1 carries wheel telemetry, type 2 a GPS fix.
//! Independent of the frame pipeline; shares only the repository.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

pub const TYPE_WHEEL: u8 = 1;
pub const TYPE_LOCATION: u8 = 2;

const WHEEL_PAYLOAD_LEN: u8 = 2;
const LOCATION_PAYLOAD_LEN: u8 = 22;
const HEADER_LEN: usize = 1 + 8 + 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("record truncated: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("unknown record type {0}")]
    UnknownType(u8),

    #[error("payload length {actual} does not match type {kind} (expected {expected})")]
    PayloadLength { kind: u8, expected: u8, actual: u8 },
}

/// Wheel telemetry: battery power 0-100, speed 0-25 km/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelData {
    pub power: i8,
    pub speed: i8,
}

/// GPS fix. Scaled integers as transmitted: `22631426` is 22.631426
/// degrees, attitude in decimeters, heading/speed/hdop in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationData {
    pub timestamp: i32,
    pub longitude: i32,
    pub latitude: i32,
    pub attitude: i32,
    pub heading: i16,
    pub speed: i16,
    pub hdop: i16,
}

/// One framed record off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Channel-side receive timestamp, milliseconds.
    pub recv_timestamp: u64,
    pub payload: Payload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Wheel(WheelData),
    Location(LocationData),
}

impl Record {
    pub fn decode(mut data: &[u8]) -> Result<Record, CodecError> {
        if data.len() < HEADER_LEN {
            return Err(CodecError::Truncated {
                need: HEADER_LEN,
                have: data.len(),
            });
        }
        let kind = data.get_u8();
        let recv_timestamp = data.get_u64();
        let len = data.get_u8();

        let expected = match kind {
            TYPE_WHEEL => WHEEL_PAYLOAD_LEN,
            TYPE_LOCATION => LOCATION_PAYLOAD_LEN,
            other => return Err(CodecError::UnknownType(other)),
        };
        if len != expected {
            return Err(CodecError::PayloadLength {
                kind,
                expected,
                actual: len,
            });
        }
        if data.len() < len as usize {
            return Err(CodecError::Truncated {
                need: HEADER_LEN + len as usize,
                have: HEADER_LEN + data.len(),
            });
        }

        let payload = match kind {
            TYPE_WHEEL => Payload::Wheel(WheelData {
                power: data.get_i8(),
                speed: data.get_i8(),
            }),
            TYPE_LOCATION => Payload::Location(LocationData {
                timestamp: data.get_i32(),
                longitude: data.get_i32(),
                latitude: data.get_i32(),
                attitude: data.get_i32(),
                heading: data.get_i16(),
                speed: data.get_i16(),
                hdop: data.get_i16(),
            }),
            _ => unreachable!(),
        };

        Ok(Record {
            recv_timestamp,
            payload,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + LOCATION_PAYLOAD_LEN as usize);
        match self.payload {
            Payload::Wheel(wheel) => {
                buf.put_u8(TYPE_WHEEL);
                buf.put_u64(self.recv_timestamp);
                buf.put_u8(WHEEL_PAYLOAD_LEN);
                buf.put_i8(wheel.power);
                buf.put_i8(wheel.speed);
            }
            Payload::Location(loc) => {
                buf.put_u8(TYPE_LOCATION);
                buf.put_u64(self.recv_timestamp);
                buf.put_u8(LOCATION_PAYLOAD_LEN);
                buf.put_i32(loc.timestamp);
                buf.put_i32(loc.longitude);
                buf.put_i32(loc.latitude);
                buf.put_i32(loc.attitude);
                buf.put_i16(loc.heading);
                buf.put_i16(loc.speed);
                buf.put_i16(loc.hdop);
            }
        }
        buf.to_vec()
    }
}

/// Upstream AI result, bit-packed into one byte: inference verdict in the
/// low nibble, pedestrian flag in bit 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiResult {
    pub inference: u8,
    pub pedestrian: bool,
}

impl AiResult {
    pub fn encode(&self) -> u8 {
        (self.inference & 0x0f) | ((self.pedestrian as u8) << 4)
    }

    pub fn decode(byte: u8) -> AiResult {
        AiResult {
            inference: byte & 0x0f,
            pedestrian: byte & 0x10 != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_round_trip() {
        let record = Record {
            recv_timestamp: 1_725_000_123,
            payload: Payload::Wheel(WheelData {
                power: 87,
                speed: 19,
            }),
        };
        let wire = record.encode();
        assert_eq!(wire.len(), HEADER_LEN + 2);
        assert_eq!(wire[0], TYPE_WHEEL);
        assert_eq!(Record::decode(&wire).unwrap(), record);
    }

    #[test]
    fn location_round_trip_with_negative_longitude() {
        let record = Record {
            recv_timestamp: 42,
            payload: Payload::Location(LocationData {
                timestamp: 1_700_000_000,
                longitude: -114_123_922,
                latitude: 22_631_426,
                attitude: 12_345,
                heading: 456,
                speed: 123,
                hdop: 98,
            }),
        };
        let wire = record.encode();
        assert_eq!(wire.len(), HEADER_LEN + 22);
        assert_eq!(Record::decode(&wire).unwrap(), record);
    }

    #[test]
    fn wire_layout_is_big_endian() {
        let record = Record {
            recv_timestamp: 0x0102,
            payload: Payload::Wheel(WheelData { power: 1, speed: 2 }),
        };
        let wire = record.encode();
        assert_eq!(&wire[1..9], &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(wire[9], 2);
        assert_eq!(&wire[10..], &[1, 2]);
    }

    #[test]
    fn rejects_truncation_and_bad_headers() {
        assert_eq!(
            Record::decode(&[TYPE_WHEEL, 0, 0]),
            Err(CodecError::Truncated { need: 10, have: 3 })
        );

        let mut wire = Record {
            recv_timestamp: 0,
            payload: Payload::Wheel(WheelData { power: 0, speed: 0 }),
        }
        .encode();
        wire.truncate(wire.len() - 1);
        assert!(matches!(
            Record::decode(&wire),
            Err(CodecError::Truncated { .. })
        ));

        let mut wire = [0u8; 12];
        wire[0] = 9;
        assert_eq!(Record::decode(&wire), Err(CodecError::UnknownType(9)));

        let mut wire = [0u8; 12];
        wire[0] = TYPE_WHEEL;
        wire[9] = 3; // wrong length for wheel payload
        assert_eq!(
            Record::decode(&wire),
            Err(CodecError::PayloadLength {
                kind: TYPE_WHEEL,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn ai_result_bit_packing() {
        let result = AiResult {
            inference: 0b0110,
            pedestrian: true,
        };
        assert_eq!(result.encode(), 0b0001_0110);
        assert_eq!(AiResult::decode(0b0001_0110), result);

        // High nibble beyond the flag bit is ignored on decode
        assert_eq!(
            AiResult::decode(0b1110_0101),
            AiResult {
                inference: 0b0101,
                pedestrian: false
            }
        );
    }
}
