use num_enum::{IntoPrimitive, TryFromPrimitive};

// {{{ FunctionCode
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum FunctionCode {
    MiscReset = 0x0000,
    MiscGetVer = 0x0003,
    MiscGetType = 0x0004,
    ParamsSetSingle = 0x0011,
    ParamsGetSingle = 0x0012,
    UpgradeStart = 0x0020,
    UpgradeWrite = 0x0021,
    EncryptedLegacy = 0x003d,

    RespAck = 0x0080,
    RespNack = 0x0081,
    RespParamsSingle = 0x0090,
    RespUpgradeSize = 0x00a1,
    RespMiscGetVer = 0x00b0,
    RespMiscGetType = 0x00b1,

    ServerPostData = 0x0500,
    ServerGetGmt = 0x0501,
    ServerGetName = 0x0502,
    Encrypted = 0x0503,
    RespServerGmt = 0x0580,

    PolestarGetStatus = 0x0e03,
    RespPolestarGetStatus = 0x0e83,
}
// }}}

/// Payload shape carried by a function code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayloadKind {
    NoArgs,
    Encrypted,
    DeviceData,
    Status,
    Param,
    ValueType,
    Version,
    ParamValue,
    UpgradeChunk,
    Long,
    Time,
}

/// Requests and acknowledgements that carry no arguments.
pub const NO_ARGS: [FunctionCode; 7] = [
    FunctionCode::RespAck,
    FunctionCode::RespNack,
    FunctionCode::MiscGetVer,
    FunctionCode::MiscGetType,
    FunctionCode::ServerGetGmt,
    FunctionCode::ServerGetName,
    FunctionCode::PolestarGetStatus,
];

/// Payload is opaque; passed through undecoded.
pub const ENCRYPTED: [FunctionCode; 2] = [FunctionCode::Encrypted, FunctionCode::EncryptedLegacy];

impl FunctionCode {
    pub fn payload_kind(self) -> PayloadKind {
        use FunctionCode::*;

        // arms for the two no-op sets must stay in step with NO_ARGS and ENCRYPTED
        match self {
            ServerPostData => PayloadKind::DeviceData,
            RespPolestarGetStatus => PayloadKind::Status,
            ParamsGetSingle | UpgradeStart | RespMiscGetType => PayloadKind::Param,
            MiscReset | RespParamsSingle => PayloadKind::ValueType,
            RespMiscGetVer => PayloadKind::Version,
            ParamsSetSingle => PayloadKind::ParamValue,
            UpgradeWrite => PayloadKind::UpgradeChunk,
            RespUpgradeSize => PayloadKind::Long,
            RespServerGmt => PayloadKind::Time,
            RespAck | RespNack | MiscGetVer | MiscGetType | ServerGetGmt | ServerGetName
            | PolestarGetStatus => PayloadKind::NoArgs,
            Encrypted | EncryptedLegacy => PayloadKind::Encrypted,
        }
    }

    /// Functions that decode without any payload bytes.
    pub fn accepts_empty(self) -> bool {
        matches!(
            self.payload_kind(),
            PayloadKind::NoArgs | PayloadKind::Encrypted | PayloadKind::Status
        )
    }
}
