const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Render a byte count with one decimal place in the largest unit up to GB.
///
/// Zero is special-cased to `"0B"`. Values never scale past GB, so five terabytes come out as
/// `"5120.0 GB"`.
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0B".to_string();
    }

    let mut size = size_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.1} {}", UNITS[unit])
}
