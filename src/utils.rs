use nom::{
    combinator::map,
    number::complete::{le_f32, le_u32},
    IResult,
};

use crate::se::DeviceId;

pub struct Utils;

impl Utils {
    pub fn u16ify(array: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([array[offset], array[offset + 1]])
    }

    pub fn u32ify(array: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            array[offset],
            array[offset + 1],
            array[offset + 2],
            array[offset + 3],
        ])
    }

    // widened so JSON output carries the same digits as the f32 on the wire
    pub fn le_f32_f64(input: &[u8]) -> IResult<&[u8], f64> {
        map(le_f32, f64::from)(input)
    }

    pub fn le_device_id(input: &[u8]) -> IResult<&[u8], DeviceId> {
        map(le_u32, DeviceId::new)(input)
    }
}
