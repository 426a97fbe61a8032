pub use anyhow::{anyhow, bail, Result};
pub use log::{debug, error, info, trace, warn};
pub use std::str::FromStr;

pub use crate::config::{self, Config};
pub use crate::error::DecodeError;
pub use crate::options::Options;
pub use crate::output_writer::{OutputWriter, SequenceCounters};
pub use crate::se::{
    self, decode, Decoded, DeviceCommon, DeviceData, DeviceId, DeviceKind, DeviceRecord,
    EventRecord, Frame, FrameCodec, FunctionCode, InverterRecord, Message, OptimizerRecord,
};
pub use crate::unixtime::UnixTime;
pub use crate::utils::Utils;
