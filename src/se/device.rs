use crate::error::DecodeError;
use crate::unixtime::UnixTime;
use crate::utils::Utils;

use enum_dispatch::*;
use nom::{multi::count, number::complete::le_u32, IResult};
use nom_derive::{Nom, Parse};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Serialize, Serializer};

/// Set on some device ids by the monitoring unit; not part of the id itself.
pub const DEVICE_ID_FLAG: u32 = 0x0080_0000;

pub const INVERTER_COLUMNS: [&str; 15] = [
    "Date", "Time", "ID", "Uptime", "Interval", "Temp", "Eday", "Eac", "Vac", "Iac", "Freq", "Vdc",
    "Etot", "Pmax", "Pac",
];

pub const OPTIMIZER_COLUMNS: [&str; 10] = [
    "Date", "Time", "ID", "Inverter", "Uptime", "Vmod", "Vopt", "Imod", "Eday", "Temp",
];

pub const EVENT_COLUMNS: [&str; 9] = [
    "Date", "Time", "ID", "Time0", "Time1", "Time2", "Time3", "Time4", "Time5",
];

// {{{ DeviceId
/// Device serial with the flag bit masked off. Displays as uppercase hex.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(u32);

impl DeviceId {
    pub fn new(raw: u32) -> Self {
        Self(raw & !DEVICE_ID_FLAG)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl std::fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str_radix(s, 16).map(Self::new)
    }
}

impl Serialize for DeviceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
// }}}

// {{{ InverterRef
/// The inverter an optimizer reports to. Only the legacy optimizer layout
/// carries it; the bit-packed layout reports 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InverterRef {
    Id(DeviceId),
    #[default]
    Absent,
}

impl std::fmt::Display for InverterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Absent => write!(f, "0"),
        }
    }
}

impl Serialize for InverterRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Id(id) => id.serialize(serializer),
            Self::Absent => serializer.serialize_u32(0),
        }
    }
}
// }}}

#[enum_dispatch]
pub trait DeviceCommon {
    fn id(&self) -> DeviceId;
    fn columns(&self) -> &'static [&'static str];
    /// Column values as written to the delimited output files.
    fn values(&self) -> Vec<String>;
}

#[enum_dispatch(DeviceCommon)]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceRecord {
    Inverter(InverterRecord),
    Optimizer(OptimizerRecord),
    Event(EventRecord),
}

// {{{ DeviceKind
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum DeviceKind {
    LegacyOptimizer = 0x0000,
    Inverter = 0x0010,
    BitPackedOptimizer = 0x0080,
    Event = 0x0300,
}

impl DeviceKind {
    pub fn decode(self, id: DeviceId, body: &[u8]) -> Result<DeviceRecord, DecodeError> {
        match self {
            Self::LegacyOptimizer => OptimizerRecord::decode_legacy(id, body).map(Into::into),
            Self::BitPackedOptimizer => OptimizerRecord::decode_bit_packed(id, body).map(Into::into),
            Self::Inverter => InverterRecord::decode(id, body).map(Into::into),
            Self::Event => EventRecord::decode(id, body).map(Into::into),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LegacyOptimizer | Self::BitPackedOptimizer => "optimizer",
            Self::Inverter => "inverter",
            Self::Event => "time",
        }
    }
}
// }}}

fn too_short(what: &'static str, expected: usize, body: &[u8]) -> DecodeError {
    DecodeError::MalformedPayload {
        what,
        expected,
        actual: body.len(),
    }
}

/// Six decimals, with non-finite values spelled the way C's `%f` does.
fn f6(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.6}", v)
    }
}

// {{{ InverterRecord
#[derive(Clone, Debug, Default, PartialEq, Serialize, Nom)]
#[nom(LittleEndian)]
#[serde(rename_all = "PascalCase")]
pub struct InverterRecord {
    #[nom(Ignore)]
    pub date: String,
    #[nom(Ignore)]
    pub time: String,
    #[nom(Ignore)]
    #[serde(rename = "ID")]
    pub id: DeviceId,

    #[serde(skip)]
    pub timestamp: u32,
    pub uptime: u32, // secs
    pub interval: u32, // secs in the last interval
    #[nom(Parse = "Utils::le_f32_f64")]
    pub temp: f64, // C
    #[nom(Parse = "Utils::le_f32_f64")]
    pub eday: f64, // Wh today
    #[nom(Parse = "Utils::le_f32_f64")]
    pub eac: f64, // Wh in the last interval
    #[nom(Parse = "Utils::le_f32_f64")]
    pub vac: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    pub iac: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    pub freq: f64,
    #[nom(SkipBefore(8))]
    #[nom(Parse = "Utils::le_f32_f64")]
    pub vdc: f64,
    #[nom(SkipBefore(4))]
    #[nom(Parse = "Utils::le_f32_f64")]
    pub etot: f64, // Wh lifetime
    #[nom(SkipBefore(16))]
    #[nom(Parse = "Utils::le_f32_f64")]
    pub pmax: f64,
    #[nom(SkipBefore(16))]
    #[nom(Parse = "Utils::le_f32_f64")]
    pub pac: f64,
    // two more words follow that nobody has decoded yet
}

impl InverterRecord {
    /// Full wire layout: 26 little-endian words.
    pub const LEN: usize = 104;

    pub fn decode(id: DeviceId, body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < Self::LEN {
            return Err(too_short("inverter", Self::LEN, body));
        }
        match Self::parse(&body[..Self::LEN]) {
            Ok((_, mut r)) => {
                let t = UnixTime::from(r.timestamp);
                r.date = t.date_stamp();
                r.time = t.time_stamp();
                r.id = id;
                Ok(r)
            }
            Err(_) => Err(too_short("inverter", Self::LEN, body)),
        }
    }
}

impl DeviceCommon for InverterRecord {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn columns(&self) -> &'static [&'static str] {
        &INVERTER_COLUMNS
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.id.to_string(),
            self.uptime.to_string(),
            self.interval.to_string(),
            f6(self.temp),
            f6(self.eday),
            f6(self.eac),
            f6(self.vac),
            f6(self.iac),
            f6(self.freq),
            f6(self.vdc),
            f6(self.etot),
            f6(self.pmax),
            f6(self.pac),
        ]
    }
}
// }}}

// {{{ OptimizerRecord
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptimizerRecord {
    pub date: String,
    pub time: String,
    #[serde(rename = "ID")]
    pub id: DeviceId,

    #[serde(skip)]
    pub timestamp: u32,
    pub inverter: InverterRef,
    pub uptime: u32, // secs
    pub vmod: f64, // panel volts
    pub vopt: f64, // optimizer output volts
    pub imod: f64, // panel amps
    pub eday: f64, // Wh today
    pub temp: f64, // C
}

#[derive(Clone, Debug, PartialEq, Nom)]
#[nom(LittleEndian)]
struct LegacyOptimizerLayout {
    timestamp: u32,
    #[nom(Parse = "Utils::le_device_id")]
    inverter: DeviceId,
    #[nom(SkipBefore(4))]
    uptime: u32,
    #[nom(Parse = "Utils::le_f32_f64")]
    vmod: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    vopt: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    imod: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    eday: f64,
    #[nom(Parse = "Utils::le_f32_f64")]
    temp: f64,
}

impl OptimizerRecord {
    /// Legacy layout: four words then five floats.
    pub const LEGACY_LEN: usize = 36;
    /// Bit-packed layout: timestamp, uptime and seven packed bytes.
    pub const BIT_PACKED_LEN: usize = 13;

    pub fn decode_legacy(id: DeviceId, body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < Self::LEGACY_LEN {
            return Err(too_short("optimizer", Self::LEGACY_LEN, body));
        }
        let layout = match LegacyOptimizerLayout::parse(&body[..Self::LEGACY_LEN]) {
            Ok((_, layout)) => layout,
            Err(_) => return Err(too_short("optimizer", Self::LEGACY_LEN, body)),
        };

        Ok(Self::stamped(
            id,
            Self {
                timestamp: layout.timestamp,
                inverter: InverterRef::Id(layout.inverter),
                uptime: layout.uptime,
                vmod: layout.vmod,
                vopt: layout.vopt,
                imod: layout.imod,
                eday: layout.eday,
                temp: layout.temp,
                ..Default::default()
            },
        ))
    }

    // Byte map, most significant first:
    //
    //   0c 0b 0a 09 08 07 06 05 04 03 02 01 00
    //   Tt Ee ee Cc cO o# pp Uu uu Dd dd dd dd      # = oo|Pp
    //
    //   D  timestamp, 32 bits (secs)
    //   U  uptime, 16 bits (secs)
    //   P  panel volts, 10 bits (1/8 V)
    //   O  output volts, 10 bits (1/8 V)
    //   C  panel current, 12 bits (1/160 A)
    //   E  energy today, 16 bits (1/4 Wh)
    //   T  temperature, signed 8 bits (1.6 C)
    //
    // Scale factors come from reverse engineering and have not been checked
    // against the vendor; the temperature factor in particular is a guess.
    pub fn decode_bit_packed(id: DeviceId, body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < Self::BIT_PACKED_LEN {
            return Err(too_short("optimizer", Self::BIT_PACKED_LEN, body));
        }
        let b: Vec<u16> = body[..Self::BIT_PACKED_LEN].iter().map(|&x| u16::from(x)).collect();

        let vpan = (b[6] | ((b[7] << 8) & 0x300)) as f64 * 0.125;
        let vopt = ((b[7] >> 2) | ((b[8] << 6) & 0x3c0)) as f64 * 0.125;
        let imod = ((b[9] << 4) | ((b[8] >> 4) & 0xf)) as f64 * 0.00625;
        let eday = ((b[11] << 8) | b[10]) as f64 * 0.25;
        let temp = f64::from(body[12] as i8) * 1.6;

        Ok(Self::stamped(
            id,
            Self {
                timestamp: Utils::u32ify(body, 0),
                inverter: InverterRef::Absent,
                uptime: u32::from(Utils::u16ify(body, 4)),
                vmod: vpan,
                vopt,
                imod,
                eday,
                temp,
                ..Default::default()
            },
        ))
    }

    fn stamped(id: DeviceId, mut r: Self) -> Self {
        let t = UnixTime::from(r.timestamp);
        r.date = t.date_stamp();
        r.time = t.time_stamp();
        r.id = id;
        r
    }
}

impl DeviceCommon for OptimizerRecord {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn columns(&self) -> &'static [&'static str] {
        &OPTIMIZER_COLUMNS
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.id.to_string(),
            self.inverter.to_string(),
            self.uptime.to_string(),
            f6(self.vmod),
            f6(self.vopt),
            f6(self.imod),
            f6(self.eday),
            f6(self.temp),
        ]
    }
}
// }}}

// {{{ EventRecord
/// Unidentified record made of seven timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    pub date: String,
    pub time: String,
    #[serde(rename = "ID")]
    pub id: DeviceId,

    #[serde(skip)]
    pub timestamp: u32,
    pub time0: String,
    pub time1: String,
    pub time2: String,
    pub time3: String,
    pub time4: String,
    pub time5: String,
}

impl EventRecord {
    pub const LEN: usize = 28;

    pub fn decode(id: DeviceId, body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < Self::LEN {
            return Err(too_short("time", Self::LEN, body));
        }
        let parsed: IResult<&[u8], Vec<u32>> = count(le_u32, 7)(&body[..Self::LEN]);
        let words = match parsed {
            Ok((_, words)) => words,
            Err(_) => return Err(too_short("time", Self::LEN, body)),
        };
        let stamps: Vec<String> = words[1..]
            .iter()
            .map(|&w| UnixTime::from(w).asctime())
            .collect();

        let t = UnixTime::from(words[0]);
        Ok(Self {
            date: t.date_stamp(),
            time: t.time_stamp(),
            id,
            timestamp: words[0],
            time0: stamps[0].clone(),
            time1: stamps[1].clone(),
            time2: stamps[2].clone(),
            time3: stamps[3].clone(),
            time4: stamps[4].clone(),
            time5: stamps[5].clone(),
        })
    }
}

impl DeviceCommon for EventRecord {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn columns(&self) -> &'static [&'static str] {
        &EVENT_COLUMNS
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.id.to_string(),
            self.time0.clone(),
            self.time1.clone(),
            self.time2.clone(),
            self.time3.clone(),
            self.time4.clone(),
            self.time5.clone(),
        ]
    }
}
// }}}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn inverter_body() -> Vec<u8> {
        let mut words: Vec<[u8; 4]> = vec![[0xff, 0xff, 0x7f, 0xff]; 26];
        words[0] = 1_500_000_000u32.to_le_bytes();
        words[1] = 3600u32.to_le_bytes();
        words[2] = 300u32.to_le_bytes();
        words[3] = 41.5f32.to_le_bytes();
        words[4] = 12000.0f32.to_le_bytes();
        words[5] = 250.25f32.to_le_bytes();
        words[6] = 240.5f32.to_le_bytes();
        words[7] = 12.5f32.to_le_bytes();
        words[8] = 50.0f32.to_le_bytes();
        words[11] = 380.0f32.to_le_bytes();
        words[13] = 1_000_000.0f32.to_le_bytes();
        words[18] = 5000.0f32.to_le_bytes();
        words[23] = 3000.5f32.to_le_bytes();
        words.concat()
    }

    #[test]
    fn delimited_floats() {
        assert_eq!(f6(35.125), "35.125000");
        assert_eq!(f6(-0.5), "-0.500000");
        assert_eq!(f6(f64::NAN), "nan");
        assert_eq!(f6(f64::INFINITY), "inf");
        assert_eq!(f6(f64::NEG_INFINITY), "-inf");

        // JSON has no NaN, serde_json writes null
        let r = InverterRecord {
            vdc: f64::NAN,
            ..Default::default()
        };
        assert!(r.values().contains(&"nan".to_string()));
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["Vdc"].is_null());
    }

    #[test]
    fn device_id_masks_flag() {
        let plain = DeviceId::new(0x1234_5678);
        let flagged = DeviceId::new(0x1234_5678 | DEVICE_ID_FLAG);
        assert_eq!(plain, flagged);
        assert_eq!(flagged.to_string(), "12345678");
        assert_eq!(DeviceId::new(0x00ab_cdef).to_string(), "2BCDEF");
    }

    #[test]
    fn device_id_normalize_idempotent() {
        for raw in [0, 0x0080_0000, 0x7f80_0001, 0xffff_ffff, 0x1000_0abc] {
            let once = DeviceId::new(raw);
            assert_eq!(DeviceId::new(once.value()), once);
            assert_eq!(DeviceId::from_str(&once.to_string()), Ok(once));
        }
    }

    #[test]
    fn device_id_serializes_as_hex_string() {
        let json = serde_json::to_string(&DeviceId::new(0x0012_abcd)).unwrap();
        assert_eq!(json, r#""12ABCD""#);
    }

    #[test]
    fn inverter_keeps_selected_fields() {
        let id = DeviceId::new(0x7e12_3456);
        let r = InverterRecord::decode(id, &inverter_body()).unwrap();

        let t = UnixTime::from(1_500_000_000u32);
        assert_eq!(r.date, t.date_stamp());
        assert_eq!(r.time, t.time_stamp());
        assert_eq!(r.id, id);
        assert_eq!(r.uptime, 3600);
        assert_eq!(r.interval, 300);
        assert_eq!(r.temp, 41.5);
        assert_eq!(r.eday, 12000.0);
        assert_eq!(r.eac, 250.25);
        assert_eq!(r.vac, 240.5);
        assert_eq!(r.iac, 12.5);
        assert_eq!(r.freq, 50.0);
        assert_eq!(r.vdc, 380.0);
        assert_eq!(r.etot, 1_000_000.0);
        assert_eq!(r.pmax, 5000.0);
        assert_eq!(r.pac, 3000.5);
    }

    #[test]
    fn inverter_ignores_trailing_bytes() {
        let mut body = inverter_body();
        body.extend_from_slice(&[0xaa; 12]);
        let r = InverterRecord::decode(DeviceId::new(1), &body).unwrap();
        assert_eq!(r.pac, 3000.5);
    }

    #[test]
    fn inverter_short_body() {
        let body = inverter_body();
        assert_eq!(
            InverterRecord::decode(DeviceId::new(1), &body[..100]),
            Err(DecodeError::MalformedPayload {
                what: "inverter",
                expected: 104,
                actual: 100
            })
        );
    }

    #[test]
    fn inverter_values_format() {
        let r = InverterRecord::decode(DeviceId::new(0xabc), &inverter_body()).unwrap();
        let values = r.values();
        assert_eq!(values.len(), INVERTER_COLUMNS.len());
        assert_eq!(values[2], "ABC");
        assert_eq!(values[3], "3600");
        assert_eq!(values[4], "300");
        assert_eq!(values[5], "41.500000");
        assert_eq!(values[14], "3000.500000");
    }

    #[test]
    fn legacy_optimizer() {
        let mut body = Vec::new();
        body.extend_from_slice(&1_500_000_000u32.to_le_bytes());
        body.extend_from_slice(&(0x7e12_3456u32 | DEVICE_ID_FLAG).to_le_bytes());
        body.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        body.extend_from_slice(&86400u32.to_le_bytes());
        for v in [35.5f32, 40.25, 8.5, 1234.0, 45.0] {
            body.extend_from_slice(&v.to_le_bytes());
        }

        let r = OptimizerRecord::decode_legacy(DeviceId::new(0x100), &body).unwrap();
        assert_eq!(r.inverter, InverterRef::Id(DeviceId::new(0x7e12_3456)));
        assert_eq!(r.uptime, 86400);
        assert_eq!(r.vmod, 35.5);
        assert_eq!(r.vopt, 40.25);
        assert_eq!(r.imod, 8.5);
        assert_eq!(r.eday, 1234.0);
        assert_eq!(r.temp, 45.0);
        assert_eq!(r.values()[3], "7E123456");

        assert!(OptimizerRecord::decode_legacy(DeviceId::new(0x100), &body[..35]).is_err());
    }

    #[test]
    fn bit_packed_all_zero() {
        let r = OptimizerRecord::decode_bit_packed(DeviceId::new(7), &[0; 13]).unwrap();
        assert_eq!(r.inverter, InverterRef::Absent);
        assert_eq!(r.uptime, 0);
        assert_eq!(r.vmod, 0.0);
        assert_eq!(r.vopt, 0.0);
        assert_eq!(r.imod, 0.0);
        assert_eq!(r.eday, 0.0);
        assert_eq!(r.temp, 0.0);
        assert_eq!(r.values()[3], "0");
    }

    #[test]
    fn bit_packed_fields() {
        // vpan raw 0x2a5, vopt raw 0x1f3, imod raw 0xabc, eday raw 0x1234, temp raw -5
        let vpan: u16 = 0x2a5;
        let vopt: u16 = 0x1f3;
        let imod: u16 = 0xabc;

        let mut body = Vec::new();
        body.extend_from_slice(&1_600_000_000u32.to_le_bytes());
        body.extend_from_slice(&1200u16.to_le_bytes());
        body.push((vpan & 0xff) as u8);
        body.push(((vpan >> 8) as u8 & 0x03) | ((vopt & 0x3f) as u8) << 2);
        body.push(((vopt >> 6) as u8 & 0x0f) | ((imod & 0x0f) as u8) << 4);
        body.push((imod >> 4) as u8);
        body.extend_from_slice(&0x1234u16.to_le_bytes());
        body.push((-5i8) as u8);

        let r = OptimizerRecord::decode_bit_packed(DeviceId::new(7), &body).unwrap();
        assert_eq!(r.timestamp, 1_600_000_000);
        assert_eq!(r.uptime, 1200);
        assert_eq!(r.vmod, 0x2a5 as f64 * 0.125);
        assert_eq!(r.vopt, 0x1f3 as f64 * 0.125);
        assert_eq!(r.imod, 0xabc as f64 * 0.00625);
        assert_eq!(r.eday, 0x1234 as f64 * 0.25);
        // 1.6 C per unit is unverified
        assert_eq!(r.temp, -5.0 * 1.6);
    }

    #[test]
    fn bit_packed_short_body() {
        assert_eq!(
            OptimizerRecord::decode_bit_packed(DeviceId::new(7), &[0; 12]),
            Err(DecodeError::MalformedPayload {
                what: "optimizer",
                expected: 13,
                actual: 12
            })
        );
    }

    #[test]
    fn optimizer_json_inverter_ref() {
        let legacy = OptimizerRecord {
            inverter: InverterRef::Id(DeviceId::new(0xabc)),
            ..Default::default()
        };
        let json = serde_json::to_value(&legacy).unwrap();
        assert_eq!(json["Inverter"], "ABC");

        let packed = OptimizerRecord::default();
        let json = serde_json::to_value(&packed).unwrap();
        assert_eq!(json["Inverter"], 0);
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn event_record() {
        let mut body = Vec::new();
        for w in [1_500_000_000u32, 0, 1, 2, 3, 4, 740_618_465] {
            body.extend_from_slice(&w.to_le_bytes());
        }

        let r = EventRecord::decode(DeviceId::new(0x300), &body).unwrap();
        assert_eq!(r.timestamp, 1_500_000_000);
        assert_eq!(r.date, UnixTime::from(1_500_000_000u32).date_stamp());
        assert_eq!(r.time0, UnixTime(0).asctime());
        assert_eq!(r.time5, UnixTime(740_618_465).asctime());
        assert_eq!(r.values().len(), EVENT_COLUMNS.len());

        assert!(EventRecord::decode(DeviceId::new(0x300), &body[..27]).is_err());
    }

    #[test]
    fn kind_dispatch() {
        assert_eq!(DeviceKind::try_from(0x0010u16).ok(), Some(DeviceKind::Inverter));
        assert_eq!(DeviceKind::try_from(0x0080u16).ok(), Some(DeviceKind::BitPackedOptimizer));
        assert!(DeviceKind::try_from(0x0042u16).is_err());

        let record = DeviceKind::BitPackedOptimizer
            .decode(DeviceId::new(9), &[0; 13])
            .unwrap();
        assert!(matches!(record, DeviceRecord::Optimizer(_)));
        assert_eq!(record.id(), DeviceId::new(9));
        assert_eq!(record.columns(), &OPTIMIZER_COLUMNS);
    }

    #[test]
    fn json_field_names() {
        let r = InverterRecord::decode(DeviceId::new(0xabc), &inverter_body()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        for column in INVERTER_COLUMNS {
            assert!(keys.iter().any(|k| k.as_str() == column), "{}", column);
        }
        assert_eq!(keys.len(), INVERTER_COLUMNS.len());
    }
}
