pub const PAPER: u8 = 250;
pub const INK: u8 = 10;

/// Blank page buffer, row-major, one byte per pixel.
pub fn blank_page(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "page dimensions must be positive");
    vec![PAPER; width * height]
}

/// Ink every pixel of `x0 ..= x1` × `y0 ..= y1`.
pub fn draw_box(page: &mut [u8], width: usize, x0: usize, y0: usize, x1: usize, y1: usize) {
    assert!(x0 <= x1 && y0 <= y1, "box corners out of order");
    for y in y0..=y1 {
        for x in x0..=x1 {
            page[y * width + x] = INK;
        }
    }
}

/// Horizontal line of `thickness` rows starting at `y`, interrupted by the
/// given `[gap_start, gap_stop]` coordinate ranges.
pub fn draw_broken_line(
    page: &mut [u8],
    width: usize,
    y: usize,
    thickness: usize,
    (x0, x1): (usize, usize),
    gaps: &[(usize, usize)],
) {
    for row in y..y + thickness {
        for x in x0..=x1 {
            if !gaps.iter().any(|&(g0, g1)| (g0..=g1).contains(&x)) {
                page[row * width + x] = INK;
            }
        }
    }
}
