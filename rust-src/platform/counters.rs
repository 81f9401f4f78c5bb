//! Cumulative traffic counters read from procfs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{GuardError, GuardResult};
use crate::models::Traffic;

use super::TrafficCounters;


/// Counters exposed by the kernel under `/proc/net`.
///
/// Device totals come from `/proc/net/dev`, per-UID totals from the
/// `xt_qtaguid` stats table. Only interfaces matching `interfaces` count.
pub struct ProcNetCounters {
    dev_path: PathBuf,
    uid_stats_path: PathBuf,
    interfaces: Regex,
}


impl ProcNetCounters {
    pub fn new(dev_path: PathBuf, uid_stats_path: PathBuf, interfaces: Regex) -> Self {
        Self {
            dev_path,
            uid_stats_path,
            interfaces,
        }
    }
}


impl TrafficCounters for ProcNetCounters {
    fn mobile_totals(&self) -> GuardResult<Traffic> {
        let content = read_counter_file(&self.dev_path)?;
        parse_net_dev(&content, &self.interfaces).map_err(|details| GuardError::CounterRead {
            path: self.dev_path.clone(),
            details,
        })
    }

    fn uid_totals(&self) -> GuardResult<HashMap<u32, Traffic>> {
        let content = read_counter_file(&self.uid_stats_path)?;
        parse_uid_stats(&content, &self.interfaces).map_err(|details| GuardError::CounterRead {
            path: self.uid_stats_path.clone(),
            details,
        })
    }
}


fn read_counter_file(path: &Path) -> GuardResult<String> {
    std::fs::read_to_string(path).map_err(|e| GuardError::CounterRead {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}


/// Sum rx/tx bytes of matching interfaces in `/proc/net/dev` format.
///
/// Each data line is `iface: rx_bytes rx_packets ... (8 rx fields) tx_bytes ...`.
pub(crate) fn parse_net_dev(content: &str, interfaces: &Regex) -> Result<Traffic, String> {
    let mut total = Traffic::default();

    for line in content.lines() {
        let Some((name, fields)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if !interfaces.is_match(name) {
            continue;
        }

        let fields: Vec<&str> = fields.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(format!("truncated counter line for {name}"));
        }
        let rx = parse_field(fields[0], name)?;
        let tx = parse_field(fields[8], name)?;

        total.rx_bytes = total.rx_bytes.saturating_add(rx);
        total.tx_bytes = total.tx_bytes.saturating_add(tx);
    }

    Ok(total)
}


/// Per-UID totals from `xt_qtaguid/stats`.
///
/// Columns: `idx iface acct_tag_hex uid_tag_int cnt_set rx_bytes rx_packets
/// tx_bytes tx_packets ...`. Only untagged (`0x0`) rows are counted so that
/// socket tags do not double-count; both counter sets are summed.
pub(crate) fn parse_uid_stats(
    content: &str,
    interfaces: &Regex,
) -> Result<HashMap<u32, Traffic>, String> {
    let mut per_uid: HashMap<u32, Traffic> = HashMap::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 9 {
            return Err(format!("truncated stats row: {line}"));
        }
        if fields[2] != "0x0" || !interfaces.is_match(fields[1]) {
            continue;
        }

        let uid: u32 = fields[3]
            .parse()
            .map_err(|_| format!("invalid uid '{}'", fields[3]))?;
        let rx = parse_field(fields[5], fields[1])?;
        let tx = parse_field(fields[7], fields[1])?;

        let entry = per_uid.entry(uid).or_default();
        entry.rx_bytes = entry.rx_bytes.saturating_add(rx);
        entry.tx_bytes = entry.tx_bytes.saturating_add(tx);
    }

    Ok(per_uid)
}


fn parse_field(raw: &str, iface: &str) -> Result<u64, String> {
    raw.parse()
        .map_err(|_| format!("invalid byte count '{raw}' on {iface}"))
}
