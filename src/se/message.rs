use crate::error::DecodeError;
use crate::se::device_list::{decode_device_list, DeviceData};
use crate::se::function::{FunctionCode, PayloadKind};
use crate::se::primitive::*;
use crate::unixtime::UnixTime;

use log::debug;
use serde::Serialize;

/// One protocol message, already lifted out of its frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub function: u16,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(function: FunctionCode, payload: Vec<u8>) -> Self {
        Self {
            function: function.into(),
            payload,
        }
    }

    pub fn function_code(&self) -> Option<FunctionCode> {
        FunctionCode::try_from(self.function).ok()
    }

    pub fn decode(&self) -> Result<Decoded, DecodeError> {
        decode(self.function, &self.payload)
    }
}

/// Result of decoding one message. Serializes to the flat JSON object for
/// its function; no-argument and encrypted messages give `{}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    Empty {},
    Devices(DeviceData),
    Status(Status),
    Param(Param),
    Long(Long),
    ValueType(ValueType),
    Version { version: String },
    ParamValue(ParamValue),
    Upgrade(UpgradeChunk),
    Time(GmtTime),
}

impl Decoded {
    pub fn devices(&self) -> Option<&DeviceData> {
        match self {
            Self::Devices(d) => Some(d),
            _ => None,
        }
    }
}

pub fn decode(function: u16, payload: &[u8]) -> Result<Decoded, DecodeError> {
    let code =
        FunctionCode::try_from(function).map_err(|_| DecodeError::UnknownFunction(function))?;

    if payload.is_empty() && !code.accepts_empty() {
        return Err(DecodeError::TooShort(function));
    }

    let r = match code.payload_kind() {
        PayloadKind::NoArgs | PayloadKind::Encrypted => Decoded::Empty {},
        PayloadKind::DeviceData => Decoded::Devices(decode_device_list(payload)?),
        PayloadKind::Status => {
            let status = Status::decode(payload)?;
            if let Some(words) = status.status {
                debug!("status: {:?}", words);
            }
            Decoded::Status(status)
        }
        PayloadKind::Param => {
            let p = Param::decode(payload)?;
            debug!("param: {:04x}", p.param);
            Decoded::Param(p)
        }
        PayloadKind::Long => {
            let p = Long::decode(payload)?;
            debug!("param: {:08x}", p.param);
            Decoded::Long(p)
        }
        PayloadKind::ValueType => {
            let v = ValueType::decode(payload)?;
            debug!("value: {:08x}", v.value);
            debug!("type: {:04x}", v.data_type);
            Decoded::ValueType(v)
        }
        PayloadKind::Version => {
            let version = Version::decode(payload)?.to_string();
            debug!("version: {}", version);
            Decoded::Version { version }
        }
        PayloadKind::ParamValue => {
            let p = ParamValue::decode(payload)?;
            debug!("param: {:04x}", p.param);
            debug!("value: {:08x}", p.value);
            Decoded::ParamValue(p)
        }
        PayloadKind::UpgradeChunk => {
            let chunk = UpgradeChunk::decode(payload)?;
            debug!("offset: {:08x}", chunk.offset);
            debug!("length: {:08x}", chunk.length);
            Decoded::Upgrade(chunk)
        }
        PayloadKind::Time => {
            let t = GmtTime::decode(payload)?;
            debug!("time: {}", UnixTime::from(t.time).asctime_utc());
            debug!("tz: UTC{:+}", t.tz / 3600);
            Decoded::Time(t)
        }
    };

    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(d: &Decoded) -> String {
        serde_json::to_string(d).unwrap()
    }

    #[test]
    fn unknown_function() {
        assert_eq!(decode(0x1234, &[1, 2]), Err(DecodeError::UnknownFunction(0x1234)));
        assert_eq!(decode(0x1234, &[]), Err(DecodeError::UnknownFunction(0x1234)));
    }

    #[test]
    fn no_args_ignore_payload() {
        assert_eq!(decode(0x0080, &[]), Ok(Decoded::Empty {}));
        assert_eq!(decode(0x0501, &[1, 2, 3]), Ok(Decoded::Empty {}));
        assert_eq!(json(&decode(0x0081, &[]).unwrap()), "{}");
    }

    #[test]
    fn encrypted_is_opaque() {
        assert_eq!(decode(0x0503, &[0xde, 0xad, 0xbe, 0xef]), Ok(Decoded::Empty {}));
        assert_eq!(decode(0x003d, &[]), Ok(Decoded::Empty {}));
    }

    #[test]
    fn too_short() {
        assert_eq!(decode(0x0500, &[]), Err(DecodeError::TooShort(0x0500)));
        assert_eq!(decode(0x0012, &[]), Err(DecodeError::TooShort(0x0012)));
        assert_eq!(
            DecodeError::TooShort(0x0580).to_string(),
            "message too short (function 0x0580)"
        );
    }

    #[test]
    fn shapes() {
        assert_eq!(json(&decode(0x0012, &[0x34, 0x12]).unwrap()), r#"{"param":4660}"#);
        assert_eq!(json(&decode(0x00b1, &[0x01, 0x00]).unwrap()), r#"{"param":1}"#);
        assert_eq!(
            json(&decode(0x00a1, &[0, 0, 1, 0]).unwrap()),
            r#"{"param":65536}"#
        );
        assert_eq!(
            json(&decode(0x0090, &[1, 0, 0, 0, 2, 0]).unwrap()),
            r#"{"value":1,"type":2}"#
        );
        assert_eq!(
            json(&decode(0x0011, &[1, 0, 2, 0, 0, 0]).unwrap()),
            r#"{"param":1,"value":2}"#
        );
        assert_eq!(
            json(&decode(0x00b0, &[4, 0, 21, 0]).unwrap()),
            r#"{"version":"0004.0021"}"#
        );
        assert_eq!(
            json(&decode(0x0021, &[1, 0, 0, 0, 2, 0, 0, 0, 7, 8]).unwrap()),
            r#"{"offset":1,"length":2,"data":[7,8]}"#
        );
    }

    #[test]
    fn gmt_response() {
        let mut payload = 1_500_000_000i32.to_le_bytes().to_vec();
        payload.extend_from_slice(&(-7200i32).to_le_bytes());
        assert_eq!(
            decode(0x0580, &payload),
            Ok(Decoded::Time(GmtTime {
                time: 1_500_000_000,
                tz: -7200
            }))
        );
    }

    #[test]
    fn status_response() {
        assert_eq!(json(&decode(0x0e83, &[]).unwrap()), "{}");
        assert_eq!(
            json(&decode(0x0e83, &[0; 14]).unwrap()),
            r#"{"status":[0,0,0,0,0,0,0]}"#
        );
    }

    #[test]
    fn malformed_propagates() {
        assert!(matches!(
            decode(0x0012, &[1, 2, 3]),
            Err(DecodeError::MalformedPayload { what: "param", .. })
        ));
    }

    #[test]
    fn message_decode() {
        let m = Message::new(FunctionCode::ServerPostData, vec![]);
        assert_eq!(m.function, 0x0500);
        assert_eq!(m.function_code(), Some(FunctionCode::ServerPostData));
        assert_eq!(m.decode(), Err(DecodeError::TooShort(0x0500)));
    }
}
