//! Labels assigned by the threshold classifiers.
//!
//! Each enum belongs to exactly one view. The display strings are the values that
//! appear in the output tables, so they must not change.

use serde::Serialize;
use std::fmt;

/// Temperature flag of the extreme-weather audit (Celsius based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemperatureAlert {
    #[serde(rename = "Extreme Heat")]
    ExtremeHeat,
    #[serde(rename = "Freezing")]
    Freezing,
    #[serde(rename = "Normal")]
    Normal,
}

impl TemperatureAlert {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureAlert::ExtremeHeat => "Extreme Heat",
            TemperatureAlert::Freezing => "Freezing",
            TemperatureAlert::Normal => "Normal",
        }
    }
}

/// Wind flag of the extreme-weather audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WindAlert {
    #[serde(rename = "High Wind")]
    HighWind,
    #[serde(rename = "Normal")]
    Normal,
}

impl WindAlert {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindAlert::HighWind => "High Wind",
            WindAlert::Normal => "Normal",
        }
    }
}

/// Frozen precipitation flag of the extreme-weather audit. Snow wins over ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrecipitationAlert {
    #[serde(rename = "Snow Present")]
    SnowPresent,
    #[serde(rename = "Ice Present")]
    IcePresent,
    #[serde(rename = "None")]
    None,
}

impl PrecipitationAlert {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationAlert::SnowPresent => "Snow Present",
            PrecipitationAlert::IcePresent => "Ice Present",
            PrecipitationAlert::None => "None",
        }
    }
}

/// Highest-priority public alert for a reading (Fahrenheit based).
///
/// Variants are declared in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ActiveAlertType {
    #[serde(rename = "Extreme Heat")]
    ExtremeHeat,
    #[serde(rename = "Freeze Warning")]
    FreezeWarning,
    #[serde(rename = "High Wind")]
    HighWind,
    #[serde(rename = "Precipitation")]
    Precipitation,
}

impl ActiveAlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveAlertType::ExtremeHeat => "Extreme Heat",
            ActiveAlertType::FreezeWarning => "Freeze Warning",
            ActiveAlertType::HighWind => "High Wind",
            ActiveAlertType::Precipitation => "Precipitation",
        }
    }
}

/// Internal triage tier. Every reading gets exactly one.
///
/// Variants are declared from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SeverityLevel {
    Critical,
    Warning,
    Advisory,
    Normal,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Critical => "Critical",
            SeverityLevel::Warning => "Warning",
            SeverityLevel::Advisory => "Advisory",
            SeverityLevel::Normal => "Normal",
        }
    }
}

/// Status of an hourly mean pressure against the fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PressureStatus {
    High,
    Low,
    Normal,
}

impl PressureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PressureStatus::High => "High",
            PressureStatus::Low => "Low",
            PressureStatus::Normal => "Normal",
        }
    }
}

impl fmt::Display for TemperatureAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WindAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PrecipitationAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActiveAlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PressureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_display() {
        let pairs = [
            (
                serde_json::to_value(TemperatureAlert::ExtremeHeat).unwrap(),
                TemperatureAlert::ExtremeHeat.to_string(),
            ),
            (
                serde_json::to_value(PrecipitationAlert::None).unwrap(),
                PrecipitationAlert::None.to_string(),
            ),
            (
                serde_json::to_value(ActiveAlertType::FreezeWarning).unwrap(),
                ActiveAlertType::FreezeWarning.to_string(),
            ),
            (
                serde_json::to_value(SeverityLevel::Advisory).unwrap(),
                SeverityLevel::Advisory.to_string(),
            ),
            (
                serde_json::to_value(WindAlert::HighWind).unwrap(),
                WindAlert::HighWind.to_string(),
            ),
        ];
        for (json, display) in pairs {
            assert_eq!(json, serde_json::Value::String(display));
        }
    }

    #[test]
    fn severity_orders_from_most_severe() {
        assert!(SeverityLevel::Critical < SeverityLevel::Warning);
        assert!(SeverityLevel::Advisory < SeverityLevel::Normal);
    }
}
