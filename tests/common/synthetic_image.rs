/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            img[y * width + x] = checker_value(x, y, cell);
        }
    }
    img
}

/// RGB image whose left `busy_cols` columns hold a checkerboard and whose
/// remainder is a flat `fill` color.
pub fn half_checker_rgb(
    width: usize,
    height: usize,
    busy_cols: usize,
    cell: usize,
    fill: [u8; 3],
) -> Vec<u8> {
    assert!(cell > 0, "cell size must be positive");
    let mut img = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            if x < busy_cols {
                let v = checker_value(x, y, cell);
                img.extend_from_slice(&[v, v, v]);
            } else {
                img.extend_from_slice(&fill);
            }
        }
    }
    img
}

/// Solid color RGB buffer.
pub fn solid_rgb(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    (0..width * height).flat_map(|_| rgb).collect()
}

fn checker_value(x: usize, y: usize, cell: usize) -> u8 {
    if ((x / cell) + (y / cell)) & 1 == 0 {
        32
    } else {
        220
    }
}
