use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{DecodeError, EncodeError, Result};
use crate::hex;
use crate::kind::{MessageKind, DEVICE_READINGS, MAX_KIND_TAG};
use crate::readings::{self, SensorReading};

/// Frame header: one byte, `[kind:4][device id length:4]`.
pub const HEADER_SIZE: usize = 1;

/// Largest device id the 4-bit length field can announce.
pub const MAX_DEVICE_ID_LEN: usize = 0x0F;

/// The decoded header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Raw 4-bit kind tag, kept even when it falls back to echo.
    pub kind_tag: u8,
    /// Number of device id bytes following the header.
    pub device_id_len: usize,
}

impl Header {
    /// Split a header byte into its two nibbles.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            kind_tag: byte >> 4,
            device_id_len: (byte & 0x0F) as usize,
        }
    }

    /// Read the header from the first byte of a frame.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        raw.first()
            .copied()
            .map(Self::from_byte)
            .ok_or(DecodeError::TooShortForHeader)
    }

    /// Message kind, with unrecognized tags mapped to echo.
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_tag(self.kind_tag)
    }
}

/// Readings reported by one device in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReadings {
    /// Lowercase, hyphen-separated hex of the device id bytes (`"de-0a-ff"`).
    pub device_id: String,
    /// Readings in order of appearance in the payload.
    pub readings: Vec<SensorReading>,
}

/// A fully decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedMessage {
    /// The whole raw frame, header included, for diagnostic display.
    Echo(Bytes),
    DeviceReadings(DeviceReadings),
}

impl DecodedMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            DecodedMessage::Echo(_) => MessageKind::Echo,
            DecodedMessage::DeviceReadings(_) => MessageKind::DeviceReadings,
        }
    }
}

/// Decode one received frame.
///
/// Wire format:
/// ```text
/// ┌────────┬──────────┬──────────────────────┬──────────────────────────┐
/// │ Kind   │ IdLen    │ Device id            │ Payload (UTF-8)          │
/// │ (4b)   │ (4b)     │ (IdLen bytes)        │ "id1 v1,id2 v2,..."      │
/// └────────┴──────────┴──────────────────────┴──────────────────────────┘
/// ```
///
/// Any kind tag other than device-readings decodes as [`DecodedMessage::Echo`]
/// carrying the frame unchanged; that path never fails once the header is
/// present.
pub fn decode(raw: &[u8]) -> Result<DecodedMessage> {
    let header = Header::parse(raw)?;

    match header.kind() {
        MessageKind::Echo => Ok(DecodedMessage::Echo(Bytes::copy_from_slice(raw))),
        MessageKind::DeviceReadings => {
            decode_device_readings(header, raw).map(DecodedMessage::DeviceReadings)
        }
    }
}

fn decode_device_readings(header: Header, raw: &[u8]) -> Result<DeviceReadings> {
    let payload_start = HEADER_SIZE + header.device_id_len;
    if raw.len() < payload_start {
        return Err(DecodeError::TooShortForDeviceId {
            needed: payload_start,
            actual: raw.len(),
        });
    }

    let device_id = hex::encode_dashed_lower(&raw[HEADER_SIZE..payload_start]);

    if raw.len() == payload_start {
        return Err(DecodeError::NoPayload);
    }

    let payload = std::str::from_utf8(&raw[payload_start..])?;
    let readings = readings::tokenize(payload)?;
    if readings.is_empty() {
        return Err(DecodeError::NoReadings);
    }

    Ok(DeviceReadings {
        device_id,
        readings,
    })
}

/// Encode a frame into the wire format.
pub fn encode_frame(
    kind_tag: u8,
    device_id: &[u8],
    payload: &[u8],
    dst: &mut BytesMut,
) -> std::result::Result<(), EncodeError> {
    if kind_tag > MAX_KIND_TAG {
        return Err(EncodeError::KindOutOfRange(kind_tag));
    }
    if device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(EncodeError::DeviceIdTooLong {
            len: device_id.len(),
            max: MAX_DEVICE_ID_LEN,
        });
    }

    dst.reserve(HEADER_SIZE + device_id.len() + payload.len());
    dst.put_u8((kind_tag << 4) | device_id.len() as u8);
    dst.put_slice(device_id);
    dst.put_slice(payload);
    Ok(())
}

/// Build a device-readings frame.
pub fn encode_readings(
    device_id: &[u8],
    readings: &[SensorReading],
) -> std::result::Result<Bytes, EncodeError> {
    let payload = readings::render(readings)?;
    let mut buf = BytesMut::new();
    encode_frame(DEVICE_READINGS, device_id, payload.as_bytes(), &mut buf)?;
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ECHO;

    fn frame(header: u8, device_id: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut raw = vec![header];
        raw.extend_from_slice(device_id);
        raw.extend_from_slice(payload);
        raw
    }

    #[test]
    fn empty_frame_is_too_short_for_header() {
        assert_eq!(decode(&[]), Err(DecodeError::TooShortForHeader));
    }

    #[test]
    fn decodes_device_readings_end_to_end() {
        let raw = frame(0x11, &[0xAB], b"t 21.5,h 60");
        let message = decode(&raw).unwrap();

        assert_eq!(
            message,
            DecodedMessage::DeviceReadings(DeviceReadings {
                device_id: "ab".to_string(),
                readings: vec![SensorReading::new("t", "21.5"), SensorReading::new("h", "60")],
            })
        );
    }

    #[test]
    fn device_id_length_boundary() {
        for n in 0..=MAX_DEVICE_ID_LEN {
            let header = 0x10 | n as u8;
            for len in 1..=(n + 2) {
                let mut raw = vec![0x01; len];
                raw[0] = header;
                let result = decode(&raw);
                let too_short = matches!(result, Err(DecodeError::TooShortForDeviceId { .. }));
                assert_eq!(too_short, len < 1 + n, "n={n} len={len}");
            }
        }
    }

    #[test]
    fn too_short_reports_needed_and_actual() {
        assert_eq!(
            decode(&[0x13, 0xAA]),
            Err(DecodeError::TooShortForDeviceId {
                needed: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn header_and_device_id_only_is_no_payload() {
        assert_eq!(decode(&[0x12, 0xAA, 0xBB]), Err(DecodeError::NoPayload));
        assert_eq!(decode(&[0x10]), Err(DecodeError::NoPayload));
    }

    #[test]
    fn zero_length_device_id() {
        let message = decode(&frame(0x10, &[], b"t 1")).unwrap();
        let DecodedMessage::DeviceReadings(readings) = message else {
            panic!("expected device readings");
        };
        assert_eq!(readings.device_id, "");
        assert_eq!(readings.readings, vec![SensorReading::new("t", "1")]);
    }

    #[test]
    fn multi_byte_device_id_is_dashed_lowercase_hex() {
        let message = decode(&frame(0x13, &[0xDE, 0x0A, 0xFF], b"x 1")).unwrap();
        let DecodedMessage::DeviceReadings(readings) = message else {
            panic!("expected device readings");
        };
        assert_eq!(readings.device_id, "de-0a-ff");
        let feeds = crate::map_to_feeds(&readings.device_id, &readings.readings);
        assert_eq!(feeds[0].key, "de-0a-ffx");
    }

    #[test]
    fn invalid_utf8_is_rejected_not_replaced() {
        let result = decode(&frame(0x11, &[0xAB], &[b't', b' ', 0xC3, 0x28]));
        assert!(matches!(
            result,
            Err(DecodeError::InvalidPayloadEncoding(_))
        ));
    }

    #[test]
    fn separators_only_payload_is_no_readings() {
        assert_eq!(
            decode(&frame(0x11, &[0xAB], b",,,")),
            Err(DecodeError::NoReadings)
        );
    }

    #[test]
    fn malformed_reading_rejects_frame() {
        assert_eq!(
            decode(&frame(0x11, &[0xAB], b"t 21.5,h60")),
            Err(DecodeError::MalformedReading("h60".to_string()))
        );
    }

    #[test]
    fn echo_returns_full_frame() {
        let raw = frame(0x05, &[], b"hello");
        assert_eq!(decode(&raw), Ok(DecodedMessage::Echo(Bytes::from(raw))));
    }

    #[test]
    fn echo_ignores_length_nibble() {
        // Low nibble announces more bytes than exist; echo does not care.
        let raw = [0x0F];
        assert_eq!(
            decode(&raw),
            Ok(DecodedMessage::Echo(Bytes::from_static(&[0x0F])))
        );
    }

    #[test]
    fn unknown_kind_is_treated_as_echo() {
        let raw = frame(0x21, &[0xAB], b"t 21.5");
        let message = decode(&raw).unwrap();
        assert_eq!(message.kind(), MessageKind::Echo);
        assert_eq!(message, DecodedMessage::Echo(Bytes::from(raw)));
    }

    #[test]
    fn header_splits_nibbles() {
        let header = Header::from_byte(0x2C);
        assert_eq!(header.kind_tag, 2);
        assert_eq!(header.device_id_len, 12);
        assert_eq!(header.kind(), MessageKind::Echo);
    }

    #[test]
    fn encode_readings_builds_decodable_frame() {
        let readings = vec![SensorReading::new("t", "21.5"), SensorReading::new("h", "60")];
        let raw = encode_readings(&[0xAB], &readings).unwrap();
        assert_eq!(raw.as_ref(), frame(0x11, &[0xAB], b"t 21.5,h 60").as_slice());
    }

    #[test]
    fn encode_rejects_long_device_id() {
        let mut buf = BytesMut::new();
        let result = encode_frame(DEVICE_READINGS, &[0u8; 16], b"t 1", &mut buf);
        assert_eq!(
            result,
            Err(EncodeError::DeviceIdTooLong { len: 16, max: 15 })
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_rejects_wide_kind_tag() {
        let mut buf = BytesMut::new();
        assert_eq!(
            encode_frame(16, &[], b"", &mut buf),
            Err(EncodeError::KindOutOfRange(16))
        );
    }

    #[test]
    fn encode_echo() {
        let mut buf = BytesMut::new();
        encode_frame(ECHO, &[], b"ping", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"\x00ping");
    }
}
