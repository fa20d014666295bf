// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable byte sizes for the preview list.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const STEP: f64 = 1024.0;

/// Format a byte count with 1024-based units and at most two decimals.
///
/// Trailing zeros are dropped, so 1024 is `"1 KB"` and 1536 is `"1.5 KB"`.
/// Sizes beyond the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut threshold: u64 = 1024;
    while exponent < UNITS.len() - 1 && bytes >= threshold {
        exponent += 1;
        threshold = threshold.saturating_mul(1024);
    }
    let scaled = bytes as f64 / STEP.powi(exponent as i32);

    format!("{} {}", trim_decimals(scaled), UNITS[exponent])
}

// Ties round up (1.125 -> "1.13"); `{:.2}` alone would round them to even.
fn trim_decimals(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let fixed = format!("{rounded:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_special_cased() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn whole_units() {
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_073_741_824), "1 GB");
    }

    #[test]
    fn fractional_units() {
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_258_291), "1.2 MB");
        assert_eq!(format_bytes(123_456), "120.56 KB");
    }

    #[test]
    fn halfway_hundredths_round_up() {
        // 1152 bytes is exactly 1.125 KB.
        assert_eq!(format_bytes(1152), "1.13 KB");
        // 1.375 KB
        assert_eq!(format_bytes(1408), "1.38 KB");
    }

    #[test]
    fn terabytes_stay_in_gb() {
        assert_eq!(format_bytes(1024 * 1_073_741_824), "1024 GB");
    }
}
