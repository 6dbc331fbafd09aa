use crate::math::{table_color, BACKGROUND_COLOR};

/// Upper bound on table entries; larger caps index modulo the length
pub const MAX_COLOR_TABLE_LEN: usize = 4096;

/// Escape count → packed RGBA lookup table for one iteration cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    cap: u32,
    entries: Vec<u32>,
}

impl ColorTable {
    /// Build entries `0..min(cap, MAX_COLOR_TABLE_LEN)` for `cap`
    ///
    /// `cap` is a validated iteration cap, so the table is never empty.
    pub fn build(cap: u32) -> Self {
        debug_assert!(cap > 0, "color table needs a positive iteration cap");
        let len = (cap as usize).min(MAX_COLOR_TABLE_LEN);
        let entries = (0..len as u32).map(|index| table_color(index, cap)).collect();
        Self { cap, entries }
    }

    /// Iteration cap the table was built for
    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Color of one escape count; the cap itself is the background sentinel
    #[inline]
    pub fn color_for(&self, count: u32) -> u32 {
        if count == self.cap {
            BACKGROUND_COLOR
        } else {
            self.entries[count as usize % self.entries.len()]
        }
    }

    /// Color every pixel; `pixels` must be as long as `counts`
    pub fn apply(&self, counts: &[u32], pixels: &mut [u32]) {
        debug_assert_eq!(counts.len(), pixels.len());
        for (pixel, &count) in pixels.iter_mut().zip(counts) {
            *pixel = self.color_for(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_length_follows_cap() {
        assert_eq!(ColorTable::build(256).len(), 256);
        assert_eq!(ColorTable::build(100_000).len(), MAX_COLOR_TABLE_LEN);
    }

    #[test]
    fn test_sentinel_is_background() {
        let table = ColorTable::build(50);
        assert_eq!(table.color_for(50), BACKGROUND_COLOR);
        for count in 0..50 {
            assert_ne!(table.color_for(count), BACKGROUND_COLOR);
        }
    }

    #[test]
    fn test_large_cap_wraps_modulo_length() {
        let table = ColorTable::build(10_000);
        let len = table.len() as u32;
        assert_eq!(table.color_for(len + 3), table.color_for(3));
        assert_eq!(table.color_for(10_000), BACKGROUND_COLOR);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "positive iteration cap")]
    fn test_zero_cap_is_rejected() {
        ColorTable::build(0);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        assert_eq!(ColorTable::build(300), ColorTable::build(300));
    }

    #[test]
    fn test_apply_maps_whole_buffer() {
        let table = ColorTable::build(8);
        let counts = [0, 8, 3, 8, 7];
        let mut pixels = [u32::MAX; 5];
        table.apply(&counts, &mut pixels);
        assert_eq!(pixels[1], BACKGROUND_COLOR);
        assert_eq!(pixels[3], BACKGROUND_COLOR);
        assert_eq!(pixels[0], table.entries()[0]);
        assert_eq!(pixels[2], table.entries()[3]);
        assert_eq!(pixels[4], table.entries()[7]);
    }
}
