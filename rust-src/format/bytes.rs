//! Byte count formatting.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Bytes in one mebibyte, the unit limits are configured in.
pub const BYTES_PER_MB: u64 = MB;


/// Format a byte count with two decimals (`"2.00 KB"`), plain bytes below 1 KiB.
pub fn format_bytes(bytes: u64) -> String {
    format_tiered(bytes, 2)
}


/// Format a byte count with one decimal (`"250.0 MB"`).
pub fn format_bytes_short(bytes: u64) -> String {
    format_tiered(bytes, 1)
}


/// Convert bytes to fractional megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MB as f64
}


/// Convert a whole-megabyte limit to bytes, saturating on overflow.
pub fn mb_to_bytes(mb: u64) -> u64 {
    mb.saturating_mul(MB)
}


fn format_tiered(bytes: u64, precision: usize) -> String {
    if bytes >= GB {
        format!("{:.*} GB", precision, bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.*} MB", precision, bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.*} KB", precision, bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
