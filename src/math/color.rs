/// Packed color of pixels that never escaped
pub const BACKGROUND_COLOR: u32 = 0;

/// Pack channels as RGBA with red in the low byte (R,G,B,A in memory order
/// on little endian targets)
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

#[inline]
pub fn unpack_rgba(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}

/// Palette entry for an escape count `index < cap`
pub fn table_color(index: u32, cap: u32) -> u32 {
    let red = 256 - 256 * u64::from(index) / u64::from(cap.max(1));
    let red = red.min(255) as u8;

    let green = 128.0 + 127.0 * (10000.0 / (f64::from(index) + 200.0)).sin();
    let green = green as u8;

    // ln(0) is undefined
    let blue = if index == 0 {
        0
    } else {
        (40.0 * f64::from(index).ln()) as u8
    };

    pack_rgba(red, green, blue, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_byte_order() {
        let color = pack_rgba(1, 2, 3, 4);
        assert_eq!(color, 0x0403_0201);
        assert_eq!(unpack_rgba(color), [1, 2, 3, 4]);
    }

    #[test]
    fn test_index_zero_is_defined() {
        let [r, g, b, a] = unpack_rgba(table_color(0, 256));
        assert_eq!(r, 255);
        assert_eq!(b, 0);
        assert_eq!(a, 255);
        // sin(50) ≈ -0.2624
        assert_eq!(g, 94);
    }

    #[test]
    fn test_red_fades_with_count() {
        let [r_low, ..] = unpack_rgba(table_color(10, 100));
        let [r_high, ..] = unpack_rgba(table_color(90, 100));
        assert_eq!(r_low, 231);
        assert_eq!(r_high, 26);
    }

    #[test]
    fn test_blue_is_log_of_index() {
        let [.., b, _] = unpack_rgba(table_color(1, 100));
        assert_eq!(b, 0);
        let [.., b, _] = unpack_rgba(table_color(100, 1000));
        // 40 * ln(100) ≈ 184.2
        assert_eq!(b, 184);
    }

    #[test]
    fn test_blue_saturates() {
        let [.., b, _] = unpack_rgba(table_color(100_000, 200_000));
        assert_eq!(b, 255);
    }

    #[test]
    fn test_never_background() {
        for index in 0..512 {
            assert_ne!(table_color(index, 512), BACKGROUND_COLOR);
        }
    }
}
