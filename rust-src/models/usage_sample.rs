//! Usage sample models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};


/// Transmitted/received byte pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Traffic {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
}


impl Traffic {
    pub fn new(tx_bytes: u64, rx_bytes: u64) -> Self {
        Self { tx_bytes, rx_bytes }
    }

    /// Calculate total bytes in both directions.
    pub fn total(&self) -> u64 {
        self.tx_bytes.saturating_add(self.rx_bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.tx_bytes == 0 && self.rx_bytes == 0
    }

    /// Difference from an earlier cumulative reading.
    ///
    /// A counter lower than its previous reading has been reset (reboot),
    /// so the current reading is the traffic since the reset.
    pub fn since(&self, previous: &Traffic) -> Traffic {
        let diff = |current: u64, prev: u64| {
            if current >= prev { current - prev } else { current }
        };
        Traffic {
            tx_bytes: diff(self.tx_bytes, previous.tx_bytes),
            rx_bytes: diff(self.rx_bytes, previous.rx_bytes),
        }
    }
}


/// Label attached to a sample by its writer.
///
/// Not derived from the timestamp; aggregation buckets by timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}


impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}


impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown period '{other}' (expected daily, weekly or monthly)")),
        }
    }
}


/// Per-app cumulative traffic at sampling time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUsage {
    pub uid: u32,
    pub package_name: String,
    pub app_name: String,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub total_bytes: u64,
}


impl AppUsage {
    pub fn new(uid: u32, package_name: &str, app_name: &str, traffic: Traffic) -> Self {
        Self {
            uid,
            package_name: package_name.to_string(),
            app_name: app_name.to_string(),
            tx_bytes: traffic.tx_bytes,
            rx_bytes: traffic.rx_bytes,
            total_bytes: traffic.total(),
        }
    }
}


/// A sample ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUsageSample {
    pub timestamp: DateTime<Utc>,
    /// Traffic since the previous sample.
    pub delta: Traffic,
    /// Raw cumulative counter reading the delta was computed from.
    pub counters: Traffic,
    pub top_consumers: Vec<AppUsage>,
    pub period: Period,
}


/// A persisted usage sample.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSample {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub delta: Traffic,
    pub counters: Traffic,
    pub top_consumers: Vec<AppUsage>,
    pub period: Period,
}


impl UsageSample {
    pub fn from_new(id: i64, sample: NewUsageSample) -> Self {
        Self {
            id,
            timestamp: sample.timestamp,
            delta: sample.delta,
            counters: sample.counters,
            top_consumers: sample.top_consumers,
            period: sample.period,
        }
    }

    /// Total bytes transferred since the previous sample.
    pub fn total_bytes(&self) -> u64 {
        self.delta.total()
    }

    /// Timestamp in the device's local timezone.
    pub fn local_time(&self) -> DateTime<Local> {
        self.timestamp.with_timezone(&Local)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_since() {
        let previous = Traffic::new(1_000, 5_000);
        let current = Traffic::new(1_500, 5_000);
        assert_eq!(current.since(&previous), Traffic::new(500, 0));
    }

    #[test]
    fn test_traffic_since_counter_reset() {
        let previous = Traffic::new(90_000, 80_000);
        let current = Traffic::new(300, 90_000);
        assert_eq!(current.since(&previous), Traffic::new(300, 10_000));
    }

    #[test]
    fn test_unchanged_counters_give_zero_delta() {
        let reading = Traffic::new(42, 7);
        assert!(reading.since(&reading).is_zero());
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!(Period::Monthly.to_string(), "monthly");
        assert!("yearly".parse::<Period>().is_err());
    }

    #[test]
    fn test_app_usage_total() {
        let app = AppUsage::new(10_123, "com.example", "Example", Traffic::new(10, 32));
        assert_eq!(app.total_bytes, 42);
    }
}
