#![allow(dead_code)]

use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::{Array3, Axis};
use tiff::encoder::{colortype, TiffEncoder};

/// Build an (h, w, 4) array where every pixel carries the given Red and NIR
/// values at band indices 2 and 3. Bands 0 and 1 are filled with 1000.
pub fn make_red_nir_pixels(h: usize, w: usize, red_nir: &[(u16, u16)]) -> Array3<u16> {
    assert_eq!(red_nir.len(), h * w, "one (red, nir) pair per pixel");
    let mut data = Array3::<u16>::from_elem((h, w, 4), 1000);
    for (i, &(red, nir)) in red_nir.iter().enumerate() {
        let (row, col) = (i / w, i % w);
        data[[row, col, 2]] = red;
        data[[row, col, 3]] = nir;
    }
    data
}

/// The 2x2 scene used by the end-to-end checks: NDVI of roughly
/// 0.333, -0.333, 0.0099 and 0.0 (both bands zero).
pub fn reference_scene() -> Array3<u16> {
    make_red_nir_pixels(2, 2, &[(100, 200), (200, 100), (50, 51), (0, 0)])
}

/// Write a 4-band 16-bit TIFF from an (h, w, 4) array.
pub fn write_rgba16_tiff(path: &Path, pixels: &Array3<u16>) {
    let (h, w, bands) = pixels.dim();
    assert_eq!(bands, 4);
    let data: Vec<u16> = pixels.iter().copied().collect();
    let file = std::fs::File::create(path).expect("create tiff");
    let mut enc = TiffEncoder::new(file).expect("tiff encoder");
    enc.write_image::<colortype::RGBA16>(w as u32, h as u32, &data)
        .expect("write tiff");
}

/// Write a 3-band 16-bit TIFF filled with `value`.
pub fn write_rgb16_tiff(path: &Path, h: usize, w: usize, value: u16) {
    let data = vec![value; h * w * 3];
    let file = std::fs::File::create(path).expect("create tiff");
    let mut enc = TiffEncoder::new(file).expect("tiff encoder");
    enc.write_image::<colortype::RGB16>(w as u32, h as u32, &data)
        .expect("write tiff");
}

/// Write a single-band 8-bit TIFF from row-major samples.
pub fn write_gray8_tiff(path: &Path, h: usize, w: usize, data: &[u8]) {
    let file = std::fs::File::create(path).expect("create tiff");
    let mut enc = TiffEncoder::new(file).expect("tiff encoder");
    enc.write_image::<colortype::Gray8>(w as u32, h as u32, data)
        .expect("write tiff");
}

/// Write a 16-bit BlackIsZero TIFF with one sample per band, as GDAL does for
/// non-byte multispectral data. `planar` stores each band as its own strip.
pub fn write_multiband16_tiff(path: &Path, pixels: &Array3<u16>, planar: bool) {
    let (h, w, bands) = pixels.dim();
    assert!(bands >= 3, "band arrays must not fit inline in the IFD");
    let strips = if planar { bands } else { 1 };
    let strip_bytes = if planar { h * w * 2 } else { h * w * bands * 2 };

    const ENTRIES: u16 = 10;
    let ifd_len = 2 + ENTRIES as usize * 12 + 4;
    let bits_offset = 8 + ifd_len;
    let offsets_offset = bits_offset + bands * 2;
    let counts_offset = offsets_offset + strips * 4;
    let data_offset = counts_offset + strips * 4;

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"II");
    buf.write_u16::<LittleEndian>(42).unwrap();
    buf.write_u32::<LittleEndian>(8).unwrap();

    buf.write_u16::<LittleEndian>(ENTRIES).unwrap();
    let (short, long) = (3u16, 4u16);
    let single_or = |array_offset: usize, single: usize| {
        if strips == 1 {
            single as u32
        } else {
            array_offset as u32
        }
    };
    for (tag, kind, count, value) in [
        (256u16, long, 1usize, w as u32),
        (257, long, 1, h as u32),
        (258, short, bands, bits_offset as u32),
        (259, short, 1, 1),
        (262, short, 1, 1),
        (273, long, strips, single_or(offsets_offset, data_offset)),
        (277, short, 1, bands as u32),
        (278, long, 1, h as u32),
        (279, long, strips, single_or(counts_offset, strip_bytes)),
        (284, short, 1, if planar { 2 } else { 1 }),
    ] {
        buf.write_u16::<LittleEndian>(tag).unwrap();
        buf.write_u16::<LittleEndian>(kind).unwrap();
        buf.write_u32::<LittleEndian>(count as u32).unwrap();
        buf.write_u32::<LittleEndian>(value).unwrap();
    }
    buf.write_u32::<LittleEndian>(0).unwrap();

    for _ in 0..bands {
        buf.write_u16::<LittleEndian>(16).unwrap();
    }
    for i in 0..strips {
        buf.write_u32::<LittleEndian>((data_offset + i * strip_bytes) as u32)
            .unwrap();
    }
    for _ in 0..strips {
        buf.write_u32::<LittleEndian>(strip_bytes as u32).unwrap();
    }
    assert_eq!(buf.len(), data_offset);

    if planar {
        for band in pixels.axis_iter(Axis(2)) {
            for &v in band.iter() {
                buf.write_u16::<LittleEndian>(v).unwrap();
            }
        }
    } else {
        for &v in pixels.iter() {
            buf.write_u16::<LittleEndian>(v).unwrap();
        }
    }
    std::fs::write(path, buf).expect("write tiff");
}

/// An (h, w, bands) array whose samples are all distinct.
pub fn distinct_pixels(h: usize, w: usize, bands: usize) -> Array3<u16> {
    Array3::from_shape_fn((h, w, bands), |(r, c, b)| {
        (1000 * b + 10 * r + c) as u16
    })
}
