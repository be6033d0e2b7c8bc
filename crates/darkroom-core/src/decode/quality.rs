//! JPEG quality estimation from quantization tables.
//!
//! Exporting an unedited-quality JPEG should reuse the source's encoding
//! quality. The `image` crate does not expose decoder tables, so the
//! luminance table is read straight from the DQT segment and compared with
//! the IJG reference table that encoders scale by quality.

/// IJG reference luminance quantization table (Annex K.1).
const STD_LUMA_QTABLE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

const MARKER_SOI: u8 = 0xD8;
const MARKER_SOS: u8 = 0xDA;
const MARKER_DQT: u8 = 0xDB;
const MARKER_EOI: u8 = 0xD9;

/// Estimate the quality (1-100) a JPEG was encoded with.
///
/// Returns `None` when the bytes are not a JPEG or carry no luminance
/// table before the first scan.
pub fn estimate_jpeg_quality(bytes: &[u8]) -> Option<u8> {
    let table = find_luma_table(bytes)?;

    if table.iter().all(|&q| q == 1) {
        return Some(100);
    }

    let sum: u32 = table.iter().map(|&q| q as u32).sum();
    let std_sum: u32 = STD_LUMA_QTABLE.iter().map(|&q| q as u32).sum();
    let scale = sum as f64 * 100.0 / std_sum as f64;

    let quality = if scale <= 100.0 {
        (200.0 - scale) / 2.0
    } else {
        5000.0 / scale
    };
    Some(quality.round().clamp(1.0, 100.0) as u8)
}

/// Walk marker segments up to the first scan and return table 0.
fn find_luma_table(bytes: &[u8]) -> Option<[u16; 64]> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != MARKER_SOI {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        // Fill bytes and parameterless markers
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        if marker == MARKER_SOS || marker == MARKER_EOI {
            return None;
        }

        let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if len < 2 {
            return None;
        }
        let end = (pos + 2 + len).min(bytes.len());
        if marker == MARKER_DQT {
            if let Some(table) = parse_dqt(&bytes[pos + 4..end]) {
                return Some(table);
            }
        }
        pos += 2 + len;
    }
    None
}

/// Parse the tables of one DQT segment body, returning table id 0.
fn parse_dqt(mut body: &[u8]) -> Option<[u16; 64]> {
    while !body.is_empty() {
        let precision = body[0] >> 4;
        let id = body[0] & 0x0F;
        let entry_size = if precision == 0 { 1 } else { 2 };
        let table_len = 64 * entry_size;
        if body.len() < 1 + table_len {
            return None;
        }

        let values = &body[1..1 + table_len];
        if id == 0 {
            let mut table = [0u16; 64];
            for (i, q) in table.iter_mut().enumerate() {
                *q = if entry_size == 1 {
                    values[i] as u16
                } else {
                    u16::from_be_bytes([values[i * 2], values[i * 2 + 1]])
                };
            }
            return Some(table);
        }
        body = &body[1 + table_len..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;
    use crate::DecodedImage;

    fn gradient_jpeg(quality: u8) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(32 * 32 * 3);
        for y in 0..32u32 {
            for x in 0..32u32 {
                pixels.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, 96]);
            }
        }
        encode_jpeg(&DecodedImage::new(32, 32, pixels), quality).unwrap()
    }

    #[test]
    fn test_estimate_matches_encoder_quality() {
        for quality in [30u8, 50, 75, 90] {
            let estimate = estimate_jpeg_quality(&gradient_jpeg(quality)).unwrap();
            assert!(
                (estimate as i32 - quality as i32).abs() <= 2,
                "quality {} estimated as {}",
                quality,
                estimate
            );
        }
    }

    #[test]
    fn test_reference_table_is_quality_50() {
        let mut segment = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 67, 0x00];
        segment.extend(STD_LUMA_QTABLE.iter().map(|&q| q as u8));
        assert_eq!(estimate_jpeg_quality(&segment), Some(50));
    }

    #[test]
    fn test_all_ones_table_is_quality_100() {
        let mut segment = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 67, 0x00];
        segment.extend([1u8; 64]);
        assert_eq!(estimate_jpeg_quality(&segment), Some(100));
    }

    #[test]
    fn test_non_jpeg_bytes() {
        assert_eq!(estimate_jpeg_quality(&[]), None);
        assert_eq!(estimate_jpeg_quality(&[0x89, b'P', b'N', b'G']), None);
    }

    #[test]
    fn test_truncated_table() {
        let segment = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 67, 0x00, 1, 2, 3];
        assert_eq!(estimate_jpeg_quality(&segment), None);
    }
}
