#![allow(dead_code)]

use se_monitor::prelude::*;
use se_monitor::se::DeviceHeader;

pub const INVERTER_ID: u32 = 0x7e12_3456;
pub const OPTIMIZER_ID: u32 = 0x1000_0abc;
pub const PACKED_OPTIMIZER_ID: u32 = 0x1000_0def;
pub const EVENT_ID: u32 = 0x0300_0001;
pub const TIMESTAMP: u32 = 1_500_000_000;

pub struct Factory;
impl Factory {
    pub fn device(device_type: u16, raw_id: u32, body: &[u8]) -> Vec<u8> {
        let mut r = DeviceHeader {
            device_type,
            raw_id,
            length: body.len() as u16,
        }
        .bytes();
        r.extend_from_slice(body);
        r
    }

    pub fn inverter_body(pac: f32) -> Vec<u8> {
        let mut words: Vec<[u8; 4]> = vec![[0; 4]; 26];
        words[0] = TIMESTAMP.to_le_bytes();
        words[1] = 7200u32.to_le_bytes();
        words[2] = 300u32.to_le_bytes();
        words[3] = 38.5f32.to_le_bytes();
        words[4] = 8000.0f32.to_le_bytes();
        words[5] = 250.0f32.to_le_bytes();
        words[6] = 241.0f32.to_le_bytes();
        words[7] = 10.5f32.to_le_bytes();
        words[8] = 50.0f32.to_le_bytes();
        words[11] = 375.0f32.to_le_bytes();
        words[13] = 2_000_000.0f32.to_le_bytes();
        words[18] = 6000.0f32.to_le_bytes();
        words[23] = pac.to_le_bytes();
        words.concat()
    }

    pub fn legacy_optimizer_body(inverter: u32) -> Vec<u8> {
        let mut r = Vec::new();
        r.extend_from_slice(&TIMESTAMP.to_le_bytes());
        r.extend_from_slice(&inverter.to_le_bytes());
        r.extend_from_slice(&0u32.to_le_bytes());
        r.extend_from_slice(&3600u32.to_le_bytes());
        for v in [36.0f32, 38.5, 7.25, 900.0, 42.0] {
            r.extend_from_slice(&v.to_le_bytes());
        }
        r
    }

    pub fn bit_packed_body(uptime: u16) -> Vec<u8> {
        let mut r = Vec::new();
        r.extend_from_slice(&TIMESTAMP.to_le_bytes());
        r.extend_from_slice(&uptime.to_le_bytes());
        r.extend_from_slice(&[0; 7]);
        r
    }

    pub fn event_body() -> Vec<u8> {
        [TIMESTAMP, 1, 2, 3, 4, 5, 6]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect()
    }

    /// One of each device kind.
    pub fn device_list() -> Vec<u8> {
        let mut r = Self::device(0x0010, INVERTER_ID, &Self::inverter_body(3000.0));
        r.extend(Self::device(0x0000, OPTIMIZER_ID, &Self::legacy_optimizer_body(INVERTER_ID)));
        r.extend(Self::device(0x0080, PACKED_OPTIMIZER_ID, &Self::bit_packed_body(120)));
        r.extend(Self::device(0x0300, EVENT_ID, &Self::event_body()));
        r
    }

    pub fn frame(seq: u16, function: FunctionCode, payload: Vec<u8>) -> Vec<u8> {
        Frame {
            seq,
            from: 0x7e12_3456,
            to: 0xffff_fffd,
            message: Message::new(function, payload),
        }
        .bytes()
        .unwrap()
    }
}
