pub mod device;
pub mod device_list;
pub mod frame;
pub mod function;
pub mod message;
pub mod primitive;

pub use device::{
    DeviceCommon, DeviceId, DeviceKind, DeviceRecord, EventRecord, InverterRecord, InverterRef,
    OptimizerRecord,
};
pub use device_list::{decode_device_list, DeviceData, DeviceHeader};
pub use frame::{Frame, FrameCodec};
pub use function::{FunctionCode, PayloadKind};
pub use message::{decode, Decoded, Message};
pub use primitive::{GmtTime, Long, Param, ParamValue, Primitive, Status, UpgradeChunk, ValueType, Version};
