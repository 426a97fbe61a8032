//! Fixed-layout payload fields and their encoders.
//!
//! Every decoder insists on the exact byte count of its layout; anything else
//! is a `MalformedPayload`. The encoders build the same layouts for outbound
//! commands.

use crate::error::DecodeError;

use nom::{multi::count, number::complete::le_u16, IResult};
use nom_derive::{Nom, Parse};
use serde::Serialize;
use serde_with::skip_serializing_none;

pub trait Primitive: Sized {
    const LEN: usize;
    const NAME: &'static str;

    fn decode(input: &[u8]) -> Result<Self, DecodeError>;
    fn bytes(&self) -> Vec<u8>;
}

fn malformed(what: &'static str, expected: usize, input: &[u8]) -> DecodeError {
    DecodeError::MalformedPayload {
        what,
        expected,
        actual: input.len(),
    }
}

fn check_len<T: Primitive>(input: &[u8]) -> Result<(), DecodeError> {
    if input.len() != T::LEN {
        return Err(malformed(T::NAME, T::LEN, input));
    }
    Ok(())
}

fn finish<T: Primitive>(input: &[u8], parsed: IResult<&[u8], T>) -> Result<T, DecodeError> {
    match parsed {
        Ok((_, r)) => Ok(r),
        Err(_) => Err(malformed(T::NAME, T::LEN, input)),
    }
}

// {{{ Param
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Nom)]
#[nom(LittleEndian)]
pub struct Param {
    pub param: u16,
}

impl Primitive for Param {
    const LEN: usize = 2;
    const NAME: &'static str = "param";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        self.param.to_le_bytes().to_vec()
    }
}
// }}}

// {{{ Long
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Nom)]
#[nom(LittleEndian)]
pub struct Long {
    pub param: u32,
}

impl Primitive for Long {
    const LEN: usize = 4;
    const NAME: &'static str = "long";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        self.param.to_le_bytes().to_vec()
    }
}
// }}}

// {{{ ValueType
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Nom)]
#[nom(LittleEndian)]
pub struct ValueType {
    pub value: u32,
    #[serde(rename = "type")]
    pub data_type: u16,
}

impl Primitive for ValueType {
    const LEN: usize = 6;
    const NAME: &'static str = "value/type";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(Self::LEN);
        r.extend_from_slice(&self.value.to_le_bytes());
        r.extend_from_slice(&self.data_type.to_le_bytes());
        r
    }
}
// }}}

// {{{ ParamValue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Nom)]
#[nom(LittleEndian)]
pub struct ParamValue {
    pub param: u16,
    pub value: u32,
}

impl Primitive for ParamValue {
    const LEN: usize = 6;
    const NAME: &'static str = "param/value";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(Self::LEN);
        r.extend_from_slice(&self.param.to_le_bytes());
        r.extend_from_slice(&self.value.to_le_bytes());
        r
    }
}
// }}}

// {{{ GmtTime
/// Device clock and its offset from UTC in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Nom)]
#[nom(LittleEndian)]
pub struct GmtTime {
    pub time: i32,
    pub tz: i32,
}

impl Primitive for GmtTime {
    const LEN: usize = 8;
    const NAME: &'static str = "time";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(Self::LEN);
        r.extend_from_slice(&self.time.to_le_bytes());
        r.extend_from_slice(&self.tz.to_le_bytes());
        r
    }
}
// }}}

// {{{ Version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Nom)]
#[nom(LittleEndian)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Primitive for Version {
    const LEN: usize = 4;
    const NAME: &'static str = "version";

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        check_len::<Self>(input)?;
        finish(input, Self::parse(input))
    }

    fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(Self::LEN);
        r.extend_from_slice(&self.major.to_le_bytes());
        r.extend_from_slice(&self.minor.to_le_bytes());
        r
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}.{:04}", self.major, self.minor)
    }
}
// }}}

// {{{ UpgradeChunk
/// Firmware block: offset and length followed by the raw bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpgradeChunk {
    pub offset: u32,
    pub length: u32,
    pub data: Vec<u8>,
}

impl UpgradeChunk {
    pub const HEADER_LEN: usize = 8;

    pub fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        if input.len() < Self::HEADER_LEN {
            return Err(malformed("upgrade", Self::HEADER_LEN, input));
        }
        let (header, data) = input.split_at(Self::HEADER_LEN);
        let offset = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let length = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        Ok(Self {
            offset,
            length,
            data: data.to_vec(),
        })
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(Self::HEADER_LEN + self.data.len());
        r.extend_from_slice(&self.offset.to_le_bytes());
        r.extend_from_slice(&self.length.to_le_bytes());
        r.extend_from_slice(&self.data);
        r
    }
}
// }}}

// {{{ Status
/// Polestar status words. An empty payload leaves `status` out entirely.
#[skip_serializing_none]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub status: Option<[u16; 7]>,
}

impl Status {
    pub const LEN: usize = 14;

    pub fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        if input.is_empty() {
            return Ok(Self::default());
        }
        if input.len() != Self::LEN {
            return Err(malformed("status", Self::LEN, input));
        }

        let parsed: IResult<&[u8], Vec<u16>> = count(le_u16, 7)(input);
        match parsed.map(|(_, words)| <[u16; 7]>::try_from(words)) {
            Ok(Ok(words)) => Ok(Self {
                status: Some(words),
            }),
            _ => Err(malformed("status", Self::LEN, input)),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.status
            .iter()
            .flatten()
            .flat_map(|word| word.to_le_bytes())
            .collect()
    }
}
// }}}
