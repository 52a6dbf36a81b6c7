//! Best-effort readable rendering of opaque payload bytes.

/// Render `data` as readable text: printable ASCII passes through, NUL
/// shows as `\0`, everything else becomes `.`.
pub fn readable_text(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &byte in data {
        match byte {
            0x20..=0x7E => out.push(char::from(byte)),
            0x00 => out.push_str("\\0"),
            _ => out.push('.'),
        }
    }
    out
}

/// Whether a readable rendering is worth showing: more than five printable
/// characters that are not the `.` placeholder.
pub fn looks_readable(data: &[u8]) -> bool {
    data.iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b) && b != b'.')
        .count()
        > 5
}
