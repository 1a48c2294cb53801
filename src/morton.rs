use crate::vec3::Point3;

/// Spreads the bottom 10 bits of `x` across 30 bits, inserting two zero bits
/// between every input bit, via the standard magic-number shift sequence.
/// Credit: the bit-twiddling trick is the one documented in the PBR book's
/// BVH chapter, not anything original here.
#[inline]
fn left_shift_3(x: u32) -> u32 {
    let mut x = x & 0x3ff;
    x = (x | (x << 16)) & 0x0300_00ff;
    x = (x | (x << 8)) & 0x0300_f00f;
    x = (x | (x << 4)) & 0x030c_30c3;
    x = (x | (x << 2)) & 0x0924_9249;
    x
}

/// Inverse of `left_shift_3`: compacts every third bit back into the bottom 10.
#[inline]
fn compact_3(x: u32) -> u32 {
    let mut x = x & 0x0924_9249;
    x = (x | (x >> 2)) & 0x030c_30c3;
    x = (x | (x >> 4)) & 0x0300_f00f;
    x = (x | (x >> 8)) & 0x0300_00ff;
    x = (x | (x >> 16)) & 0x3ff;
    x
}

#[inline]
fn quantize_axis(p: f32) -> u32 {
    (p * 1024.0).min(1023.0).max(0.0) as u32
}

/// Encodes a point in `[0,1]^3` as a 30-bit Morton code (top 2 bits zero).
/// Each axis is quantized to 10 bits, then bit-interleaved as `(Z<<2)|(Y<<1)|X`.
pub fn encode(p: Point3) -> u32 {
    let x = left_shift_3(quantize_axis(p.x));
    let y = left_shift_3(quantize_axis(p.y));
    let z = left_shift_3(quantize_axis(p.z));
    (z << 2) | (y << 1) | x
}

/// Recovers the three 10-bit quantized axis values from a Morton code.
/// Exposed for testing the encode/decode round-trip; not used by the builder.
pub fn decode(code: u32) -> (u32, u32, u32) {
    let x = compact_3(code);
    let y = compact_3(code >> 1);
    let z = compact_3(code >> 2);
    (x, y, z)
}

/// Scales a centroid into `[0,1]^3` relative to the scene's centroid bounds.
/// An axis with zero extent gets divisor 1, so it maps to 0 rather than NaN.
pub fn normalize_centroid(centroid: Point3, min: Point3, max: Point3) -> Point3 {
    let scale = |c: f32, lo: f32, hi: f32| {
        let extent = hi - lo;
        if extent > 0.0 {
            (c - lo) / extent
        } else {
            0.0
        }
    };
    Point3::new(
        scale(centroid.x, min.x, max.x),
        scale(centroid.y, min.y, max.y),
        scale(centroid.z, min.z, max.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_recovers_quantized_axes() {
        for &(x, y, z) in &[(0u32, 0u32, 0u32), (1023, 0, 0), (0, 1023, 512), (731, 4, 999)] {
            let p = Point3::new(x as f32 / 1024.0, y as f32 / 1024.0, z as f32 / 1024.0);
            let code = encode(p);
            assert_eq!(decode(code), (x, y, z));
        }
    }

    #[test]
    fn top_two_bits_are_always_zero() {
        let code = encode(Point3::ones());
        assert_eq!(code & 0xc000_0000, 0);
    }

    #[test]
    fn zero_extent_axis_maps_to_zero() {
        let p = normalize_centroid(Point3::new(5.0, 1.0, 2.0), Point3::new(5.0, 0.0, 0.0), Point3::new(5.0, 2.0, 4.0));
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.5);
        assert_eq!(p.z, 0.5);
    }

    #[test]
    fn ordering_preserves_spatial_locality_along_x() {
        let a = encode(Point3::new(0.1, 0.0, 0.0));
        let b = encode(Point3::new(0.9, 0.0, 0.0));
        assert!(a < b);
    }
}
