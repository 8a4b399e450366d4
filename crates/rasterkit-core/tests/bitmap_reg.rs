//! Depth-erased bitmap regression test
//!
//! Construction for every depth code, parameter record round trips over
//! a caller-owned buffer, and the depth-checked absolute difference.

use rasterkit_core::{
    BUFFER_KEY, Bitmap, CHANNELS_KEY, Color, DEPTH_KEY, Error, HEIGHT_KEY, IMAGE_KEYS,
    MAX_BRIGHTNESS_KEY, MIN_BRIGHTNESS_KEY, ParamRecord, ParamValue, WIDTH_KEY,
};
use rasterkit_test::{RegParams, synthetic_bitmap};

const DEPTHS: [(i32, usize); 5] = [(1, 1), (2, 2), (4, 4), (8, 8), (-8, 8)];

#[test]
fn bitmap_reg() {
    let mut rp = RegParams::new("bitmap");

    // --- Test 1: construction per depth ---
    for (depth, bytes) in DEPTHS {
        for channels in [1u32, 3, 4] {
            let bmp = Bitmap::new(7, 5, channels, depth).unwrap();
            rp.compare_values(depth as f64, bmp.depth() as f64, 0.0);
            rp.compare_values((7 * channels) as f64, bmp.stride() as f64, 0.0);
            rp.compare_values(
                (7 * 5 * channels as usize * bytes) as f64,
                bmp.size() as f64,
                0.0,
            );
            rp.compare_values(
                (channels as usize * bytes) as f64,
                bmp.bytes_per_pixel() as f64,
                0.0,
            );
        }
    }

    // --- Test 2: default display range is the full sample range ---
    let bmp = Bitmap::new(1, 1, 1, 2).unwrap();
    rp.compare_values(0.0, bmp.min_displayed_brightness(), 0.0);
    rp.compare_values(65535.0, bmp.max_displayed_brightness(), 0.0);

    // --- Test 3: absolute difference is symmetric on every depth ---
    for (depth, _) in DEPTHS {
        let a = synthetic_bitmap(6, 4, 3, depth).unwrap();
        let mut b = Bitmap::new(6, 4, 3, depth).unwrap();
        let zero_diff = a.absolute_diff(&b).unwrap();
        rp.compare_bitmaps(&a, &zero_diff);

        match &mut b {
            Bitmap::U8(d) => d.set(Color::rgb(100, 100, 100)).unwrap(),
            Bitmap::U16(d) => d.set(Color::rgb(100, 100, 100)).unwrap(),
            Bitmap::U32(d) => d.set(Color::rgb(100, 100, 100)).unwrap(),
            Bitmap::U64(d) => d.set(Color::rgb(100, 100, 100)).unwrap(),
            Bitmap::F64(d) => d.set(Color::rgb(100.0, 100.0, 100.0)).unwrap(),
        }
        let ab = a.absolute_diff(&b).unwrap();
        let ba = b.absolute_diff(&a).unwrap();
        rp.compare_bitmaps(&ab, &ba);

        let self_diff = a.absolute_diff(&a).unwrap();
        rp.compare_bitmaps(&Bitmap::new(6, 4, 3, depth).unwrap(), &self_diff);
    }

    // --- Test 4: color detection ---
    let rgb = synthetic_bitmap(4, 4, 3, 4).unwrap();
    rp.compare_values(1.0, rgb.contains_colors() as u8 as f64, 0.0);
    let gray = synthetic_bitmap(4, 4, 1, 4).unwrap();
    rp.compare_values(0.0, gray.contains_colors() as u8 as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn test_unsupported_configuration() {
    assert_eq!(Bitmap::new(2, 2, 1, 16).unwrap_err(), Error::UnsupportedDepth(16));
    assert_eq!(Bitmap::new(2, 2, 2, 1).unwrap_err(), Error::UnsupportedChannels(2));
}

#[test]
fn test_params_roundtrip_keeps_buffer() {
    let mut samples: Vec<u16> = (0..24).collect();
    let addr = samples.as_ptr() as usize;

    let mut bmp =
        unsafe { Bitmap::from_raw_parts(samples.as_mut_ptr().cast(), 4, 2, 3, 2) }.unwrap();
    bmp.set_min_displayed_brightness(100.0);
    bmp.set_max_displayed_brightness(4000.0);

    let record = bmp.to_params().unwrap();
    drop(bmp);
    for key in IMAGE_KEYS {
        assert!(record.contains_key(key), "missing {key}");
    }
    assert_eq!(record.get(DEPTH_KEY), Some(&ParamValue::Integer(2)));
    assert_eq!(record.get(MIN_BRIGHTNESS_KEY), Some(&ParamValue::Float(100.0)));

    let mut back = unsafe { Bitmap::from_params(&record) }.unwrap();
    assert!(back.is_borrowed());
    assert_eq!(back.as_ptr() as usize, addr);
    assert_eq!((back.width(), back.height(), back.channels()), (4, 2, 3));
    assert_eq!(back.min_displayed_brightness(), 100.0);
    assert_eq!(back.max_displayed_brightness(), 4000.0);

    let data = back.as_u16_mut().unwrap();
    assert_eq!(data.get(1, 1), Color::rgb(15, 16, 17));
    data.plot(0, 0, Color::rgb(7, 8, 9)).unwrap();
    drop(back);
    assert_eq!(samples[..3], [7, 8, 9]);
}

#[test]
fn test_params_errors_name_the_key() {
    let mut bytes = vec![0u8; 4];
    let mut record = ParamRecord::new();
    record.insert(BUFFER_KEY, bytes.as_mut_ptr());
    record.insert(WIDTH_KEY, "four");
    record.insert(HEIGHT_KEY, 1i64);
    record.insert(CHANNELS_KEY, 1i64);
    record.insert(DEPTH_KEY, 1i64);

    let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
    assert_eq!(
        err,
        Error::FieldType {
            key: WIDTH_KEY.to_string(),
            expected: "integer",
            site: "Bitmap::from_params"
        }
    );

    record.insert(WIDTH_KEY, -4i64);
    let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
    assert_eq!(err, Error::InvalidDimension { width: -4, height: 1 });

    record.insert(WIDTH_KEY, 4i64);
    record.insert(CHANNELS_KEY, -3i64);
    let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(ref msg) if msg.contains("-3")));

    record.insert(CHANNELS_KEY, 1i64);
    record.insert(DEPTH_KEY, 1i64 << 40);
    let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(ref msg) if msg.contains("1099511627776")));

    record.remove(DEPTH_KEY);
    let err = unsafe { Bitmap::from_params(&record) }.unwrap_err();
    assert!(matches!(err, Error::MissingField { ref key, .. } if key == DEPTH_KEY));
}

#[test]
fn test_params_inverted_range_is_kept() {
    let mut bytes = vec![0u8; 4];
    let mut record = ParamRecord::new();
    record.insert(BUFFER_KEY, bytes.as_mut_ptr());
    record.insert(WIDTH_KEY, 2i64);
    record.insert(HEIGHT_KEY, 2i64);
    record.insert(CHANNELS_KEY, 1i64);
    record.insert(DEPTH_KEY, 1i64);
    record.insert(MIN_BRIGHTNESS_KEY, 200i64);
    record.insert(MAX_BRIGHTNESS_KEY, 20.0);

    let bmp = unsafe { Bitmap::from_params(&record) }.unwrap();
    assert_eq!(bmp.min_displayed_brightness(), 200.0);
    assert_eq!(bmp.max_displayed_brightness(), 20.0);
}

#[test]
fn test_owned_copy_detaches() {
    let mut samples = vec![1.5f64, 2.5];
    let borrowed =
        unsafe { Bitmap::from_raw_parts(samples.as_mut_ptr().cast(), 2, 1, 1, -8) }.unwrap();
    let mut owned = borrowed.to_owned_bitmap();
    drop(borrowed);

    owned.as_f64_mut().unwrap().plot(0, 0, Color::gray(9.0)).unwrap();
    assert_eq!(samples, [1.5, 2.5]);
    assert_eq!(owned.as_f64().unwrap().get_gray(0, 0), 9.0);
}
