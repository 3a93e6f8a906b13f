use serde::{Deserialize, Serialize};

/// A change notification from the system key-value store.
///
/// Keys mirror the platform's monitored configuration set; the runtime
/// re-dispatches these to registered application handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum SystemNotice {
    LowMemory { level: MemoryLevel },
    LowBattery { level: BatteryLevel },
    LanguageChanged { locale: String },
    RegionChanged { region: String },
    TimeFormatChanged { use_24_hour: bool },
}

/// Memory pressure levels, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLevel {
    Normal,
    SoftWarning,
    HardWarning,
}

/// Battery charge levels, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    Normal,
    Warning,
    CriticalLow,
    PowerOff,
}
