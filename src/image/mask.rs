use super::ImageU8;

/// Foreground / background map of a page, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize, bits: Vec<bool>) -> Self {
        assert_eq!(
            bits.len(),
            width * height,
            "mask length must be width*height ({}x{})",
            width,
            height
        );
        Self {
            width,
            height,
            bits,
        }
    }

    /// All-background mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![false; width * height])
    }

    /// Global threshold: pixels strictly darker than `threshold` are ink.
    pub fn from_gray(image: &ImageU8<'_>, threshold: u8) -> Self {
        let mut bits = Vec::with_capacity(image.w * image.h);
        for y in 0..image.h {
            bits.extend(image.row(y).iter().map(|&v| v < threshold));
        }
        Self::new(image.w, image.h, bits)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.bits[y * self.width + x] = value;
    }

    /// Set every pixel of `x0 ..= x1` × `y0 ..= y1`, clipped to the mask.
    pub fn fill(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..=y1.min(self.height.saturating_sub(1)) {
            for x in x0..=x1.min(self.width.saturating_sub(1)) {
                self.set(x, y, true);
            }
        }
    }

    pub fn count_foreground(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_keeps_dark_pixels() {
        let data = [0u8, 200, 10, 255, 127, 128];
        let view = ImageU8 {
            w: 3,
            h: 2,
            stride: 3,
            data: &data,
        };
        let mask = BinaryMask::from_gray(&view, 128);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert!(!mask.get(0, 1));
        assert!(mask.get(1, 1));
        assert!(!mask.get(2, 1));
        assert_eq!(mask.count_foreground(), 3);
    }

    #[test]
    fn fill_is_clipped() {
        let mut mask = BinaryMask::empty(4, 3);
        mask.fill(2, 1, 10, 10);
        assert_eq!(mask.count_foreground(), 4);
    }
}
