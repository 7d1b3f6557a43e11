/// Characters that are illegal in file names on at least one common filesystem
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names Windows refuses as file stems
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Longest file name (in bytes) accepted by common filesystems
pub const MAX_FILENAME_BYTES: usize = 255;

/// Name used when nothing usable is left after sanitization
pub const FALLBACK_FILENAME: &str = "unnamed";

/// Longest extension kept intact when a name has to be truncated
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Turns an arbitrary string into a single, filesystem-safe path component
///
/// # Rules
///
/// - Reserved characters (`<>:"/\|?*`) and control characters are removed
/// - Leading whitespace and trailing dots/whitespace are trimmed
///   (so `.` and `..` collapse to nothing)
/// - Windows device names (`CON`, `NUL`, `COM1`, ...) get a `_` prefix
/// - The result is truncated to 255 bytes on a char boundary, keeping a
///   short extension such as `.txt`
/// - An empty result becomes `unnamed`
///
/// # Examples
///
/// ```
/// use bookshelf_mirror::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("12_Dune: Messiah?.txt"), "12_Dune Messiah.txt");
/// assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
/// assert_eq!(sanitize_filename(".."), "unnamed");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !RESERVED_CHARS.contains(c) && !c.is_control())
        .collect();

    let trimmed = stripped
        .trim_start()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if trimmed.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    let mut sanitized = if is_reserved_name(trimmed) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if sanitized.len() > MAX_FILENAME_BYTES {
        sanitized = truncate_keeping_extension(&sanitized, MAX_FILENAME_BYTES);
    }

    sanitized
}

/// Checks whether the stem (text before the first dot) is a device name
fn is_reserved_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).trim_end();
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

/// Truncates `name` to at most `max_bytes`, preserving a short extension
fn truncate_keeping_extension(name: &str, max_bytes: usize) -> String {
    let extension = name
        .rfind('.')
        .map(|idx| &name[idx..])
        .filter(|ext| ext.len() <= MAX_KEPT_EXTENSION_BYTES && ext.len() < name.len());

    match extension {
        Some(ext) => {
            let stem = &name[..name.len() - ext.len()];
            let stem = truncate_at_char_boundary(stem, max_bytes - ext.len());
            format!("{}{}", stem, ext)
        }
        None => truncate_at_char_boundary(name, max_bytes).to_string(),
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
