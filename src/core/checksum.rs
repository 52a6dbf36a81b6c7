//! Fletcher-16 rolling checksum used by the frame envelope.

/// Compute the Fletcher-16 checksum of `data`.
///
/// Both running sums start at zero and are reduced modulo 255 per byte.
/// The result packs the second sum into the high byte: `(sum2 << 8) | sum1`.
pub fn fletcher16(data: &[u8]) -> u16 {
    let mut sum1: u16 = 0;
    let mut sum2: u16 = 0;
    for &byte in data {
        sum1 = (sum1 + u16::from(byte)) % 255;
        sum2 = (sum2 + sum1) % 255;
    }
    (sum2 << 8) | sum1
}
