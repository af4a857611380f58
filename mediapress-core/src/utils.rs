//! Formatting helpers shared with the CLI.

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Percentage size reduction from input to output. Zero when the input size
/// is unknown, saturating when the output grew.
#[must_use]
pub fn calculate_size_reduction(input_size: u64, output_size: u64) -> u64 {
    if input_size == 0 {
        return 0;
    }
    100u64.saturating_sub(output_size.saturating_mul(100) / input_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pick_the_right_unit() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
    }

    #[test]
    fn size_reduction_handles_edge_cases() {
        assert_eq!(calculate_size_reduction(1000, 250), 75);
        assert_eq!(calculate_size_reduction(0, 250), 0);
        // Output grew: clamp at zero rather than underflow
        assert_eq!(calculate_size_reduction(100, 200), 0);
    }
}
