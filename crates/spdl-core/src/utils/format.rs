//! Human-readable sizes and durations.

/// Format a byte count as `"1.5MB"` (B, KB, MB, GB, TB with one decimal).
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1}TB")
}

/// Format elapsed seconds as `"45s"`, `"3m 5s"` or `"1h 2m"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    if total < 60 {
        format!("{total}s")
    } else if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0B");
        assert_eq!(format_size(512), "512.0B");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(1_572_864), "1.5MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0GB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024 * 1024), "2.0TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.4), "0s");
        assert_eq!(format_duration(45.9), "45s");
        assert_eq!(format_duration(185.0), "3m 5s");
        assert_eq!(format_duration(3720.0), "1h 2m");
        assert_eq!(format_duration(-3.0), "0s");
    }
}
