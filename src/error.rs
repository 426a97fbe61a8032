use thiserror::Error;

/// Outcomes that stop a single message from decoding.
///
/// None of these are fatal to a run: the caller logs the error and moves on
/// to the next message. Output failures are reported separately through
/// `anyhow` since they do end the run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Function expects a payload but none was sent.
    #[error("message too short (function 0x{0:04x})")]
    TooShort(u16),

    #[error("unknown function 0x{0:04x}")]
    UnknownFunction(u16),

    #[error("unknown device 0x{0:04x}")]
    UnknownDeviceType(u16),

    #[error("malformed {what} payload: expected {expected} bytes, got {actual}")]
    MalformedPayload {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A device header or body runs past the end of the device list.
    #[error("device list truncated at offset {offset}: need {needed} bytes, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Creates an anyhow error with the current file and line number
#[macro_export]
macro_rules! file_error {
    ($($arg:tt)*) => {
        ::anyhow::anyhow!(
            "[{}:{}] {}",
            std::path::Path::new(file!())
                .file_name()
                .map(|f| f.to_string_lossy())
                .unwrap_or_default(),
            line!(),
            format!($($arg)*)
        )
    };
}

/// Creates an anyhow error with the current file and line number, and includes a source error
#[macro_export]
macro_rules! file_error_with_source {
    ($source:expr, $($arg:tt)*) => {
        ::anyhow::anyhow!(
            "[{}:{}] {}: {}",
            std::path::Path::new(file!())
                .file_name()
                .map(|f| f.to_string_lossy())
                .unwrap_or_default(),
            line!(),
            format!($($arg)*),
            $source
        )
    };
}
