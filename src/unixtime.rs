use chrono::{DateTime, Local, Utc};

/// Seconds since the epoch as carried on the wire, rendered in local time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnixTime(pub i64);

impl UnixTime {
    pub fn utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    pub fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    /// `YYYY-MM-DD`
    pub fn date_stamp(&self) -> String {
        self.local().format("%Y-%m-%d").to_string()
    }

    /// `HH:MM:SS`
    pub fn time_stamp(&self) -> String {
        self.local().format("%H:%M:%S").to_string()
    }

    /// asctime layout, e.g. `Sun Jun 20 23:21:05 1993`
    pub fn asctime(&self) -> String {
        self.local().format(ASCTIME).to_string()
    }

    pub fn asctime_utc(&self) -> String {
        self.utc().format(ASCTIME).to_string()
    }
}

const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

impl From<u32> for UnixTime {
    fn from(secs: u32) -> Self {
        Self(i64::from(secs))
    }
}

impl From<i32> for UnixTime {
    fn from(secs: i32) -> Self {
        Self(i64::from(secs))
    }
}
