use crate::error::DecodeError;
use crate::se::device::*;

use log::debug;
use nom_derive::{Nom, Parse};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEVICE_HEADER_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Nom)]
#[nom(LittleEndian)]
pub struct DeviceHeader {
    pub device_type: u16,
    pub raw_id: u32,
    pub length: u16,
}

impl DeviceHeader {
    pub fn id(&self) -> DeviceId {
        DeviceId::new(self.raw_id)
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut r = Vec::with_capacity(DEVICE_HEADER_LEN);
        r.extend_from_slice(&self.device_type.to_le_bytes());
        r.extend_from_slice(&self.raw_id.to_le_bytes());
        r.extend_from_slice(&self.length.to_le_bytes());
        r
    }
}

/// Every device reported in one post, keyed by id. A later record for the
/// same id replaces an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeviceData {
    pub inverters: BTreeMap<DeviceId, InverterRecord>,
    pub optimizers: BTreeMap<DeviceId, OptimizerRecord>,
    #[serde(rename = "event")]
    pub events: BTreeMap<DeviceId, EventRecord>,
}

impl DeviceData {
    pub fn is_empty(&self) -> bool {
        self.inverters.is_empty() && self.optimizers.is_empty() && self.events.is_empty()
    }

    fn insert(&mut self, record: DeviceRecord) {
        match record {
            DeviceRecord::Inverter(r) => {
                self.inverters.insert(r.id, r);
            }
            DeviceRecord::Optimizer(r) => {
                self.optimizers.insert(r.id, r);
            }
            DeviceRecord::Event(r) => {
                self.events.insert(r.id, r);
            }
        }
    }
}

pub fn decode_device_list(payload: &[u8]) -> Result<DeviceData, DecodeError> {
    let mut data = DeviceData::default();
    let mut offset = 0;

    while offset < payload.len() {
        let header = read_header(payload, offset)?;
        let kind = DeviceKind::try_from(header.device_type)
            .map_err(|_| DecodeError::UnknownDeviceType(header.device_type))?;

        let start = offset + DEVICE_HEADER_LEN;
        let len = usize::from(header.length);
        let body = payload
            .get(start..start + len)
            .ok_or(DecodeError::Truncated {
                offset: start,
                needed: len,
                available: payload.len() - start,
            })?;

        let record = kind.decode(header.id(), body)?;
        log_device(kind, &header, &record);
        data.insert(record);

        offset = start + len;
    }

    Ok(data)
}

fn read_header(payload: &[u8], offset: usize) -> Result<DeviceHeader, DecodeError> {
    let truncated = DecodeError::Truncated {
        offset,
        needed: DEVICE_HEADER_LEN,
        available: payload.len() - offset,
    };
    let input = payload
        .get(offset..offset + DEVICE_HEADER_LEN)
        .ok_or_else(|| truncated.clone())?;

    match DeviceHeader::parse(input) {
        Ok((_, header)) => Ok(header),
        Err(_) => Err(truncated),
    }
}

fn log_device(kind: DeviceKind, header: &DeviceHeader, record: &DeviceRecord) {
    debug!(
        "{} type: {:04x} id: {} len: {:04x}",
        kind.name(),
        header.device_type,
        record.id(),
        header.length
    );
    for (column, value) in record.columns().iter().zip(record.values()) {
        debug!("    {}: {}", column, value);
    }
}
