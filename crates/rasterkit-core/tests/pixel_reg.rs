//! Pixel access regression test
//!
//! Plot and read back on every sample type, the alpha rule, sub-pixel
//! sampling, and local maximum detection.

use rasterkit_core::{BitmapData, Color, Error, Sample};
use rasterkit_test::RegParams;

fn plot_roundtrip<T: Sample>(rp: &mut RegParams, a: T, b: T, c: T) {
    let mut rgb = BitmapData::<T>::new(5, 3, 3).unwrap();
    rgb.plot(4, 2, Color::rgb(a, b, c)).unwrap();
    let got = rgb.get(4, 2);
    rp.compare_values(a.to_f64(), got.red().to_f64(), 0.0);
    rp.compare_values(b.to_f64(), got.green().to_f64(), 0.0);
    rp.compare_values(c.to_f64(), got.blue().to_f64(), 0.0);
    rp.compare_values(T::MAX.to_f64(), got.alpha().to_f64(), 0.0);

    let mut argb = BitmapData::<T>::new(5, 3, 4).unwrap();
    argb.plot(0, 1, Color::rgba(a, b, c, b)).unwrap();
    rp.compare_values(b.to_f64(), argb.get_alpha(0, 1).to_f64(), 0.0);
    rp.compare_values(c.to_f64(), argb.get_blue(0, 1).to_f64(), 0.0);

    let mut gray = BitmapData::<T>::new(5, 3, 1).unwrap();
    gray.plot(2, 2, Color::gray(c)).unwrap();
    rp.compare_values(c.to_f64(), gray.get_gray(2, 2).to_f64(), 0.0);
    rp.compare_values(c.to_f64(), gray.get_red(2, 2).to_f64(), 0.0);
}

#[test]
fn pixel_reg() {
    let mut rp = RegParams::new("pixel");

    // --- Test 1: plot then get on every sample type ---
    plot_roundtrip::<u8>(&mut rp, 1, 128, 255);
    plot_roundtrip::<u16>(&mut rp, 1, 40000, 65535);
    plot_roundtrip::<u32>(&mut rp, 7, 70000, u32::MAX);
    plot_roundtrip::<u64>(&mut rp, 7, 1 << 40, 1 << 52);
    plot_roundtrip::<f64>(&mut rp, -0.5, 0.25, 1e9);

    // --- Test 2: sub-pixel sampling is exact at integer positions ---
    let samples: Vec<u64> = (0..30).map(|i| i * 1000 + 7).collect();
    let bmp = BitmapData::from_vec(samples, 5, 2, 3).unwrap();
    for y in 0..2 {
        for x in 0..5 {
            let exact = bmp.get(x, y);
            let sub = bmp.get_subpixel(x as f64, y as f64);
            rp.compare_values(exact.red() as f64, sub.red() as f64, 0.0);
            rp.compare_values(exact.blue() as f64, sub.blue() as f64, 0.0);
        }
    }

    // --- Test 3: 1-D mixes between two neighbors ---
    let ramp = BitmapData::<f64>::from_vec(vec![0.0, 10.0, 20.0, 30.0], 2, 2, 1).unwrap();
    rp.compare_values(5.0, ramp.get_gray_subpixel(0.5, 0.0), 1e-12);
    rp.compare_values(15.0, ramp.get_gray_subpixel(0.0, 0.75), 1e-12);
    // positions are clamped into the image
    rp.compare_values(30.0, ramp.get_gray_subpixel(9.0, 9.0), 0.0);
    rp.compare_values(0.0, ramp.get_gray_subpixel(-3.0, -1.0), 0.0);

    assert!(rp.cleanup());
}

#[test]
fn test_alpha_rule() {
    let mut rgb = BitmapData::<u16>::new(2, 2, 3).unwrap();
    let err = rgb.plot(1, 1, Color::rgba(1, 2, 3, 100)).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidAlpha {
            alpha: "100".to_string(),
            channels: 3
        }
    );
    // positions outside the image are a no-op whatever the alpha
    assert!(rgb.plot(-5, 9, Color::rgba(1, 2, 3, 100)).is_ok());
    assert!(rgb.plot(2, 0, Color::rgba(1, 2, 3, 100)).is_ok());
    assert!(rgb.set(Color::gray_alpha(4, 0)).is_err());
    assert!(rgb.as_slice().iter().all(|&s| s == 0));

    let mut argb = BitmapData::<u16>::new(2, 2, 4).unwrap();
    argb.plot(1, 1, Color::rgba(1, 2, 3, 100)).unwrap();
    assert_eq!(argb.get(1, 1), Color::rgba(1, 2, 3, 100));
}

#[test]
fn test_borrowed_writes_reach_caller() {
    let mut samples = vec![0u32; 2 * 2 * 3];
    {
        let mut bmp = BitmapData::from_slice(&mut samples, 2, 2, 3).unwrap();
        bmp.plot(1, 0, Color::rgb(4, 5, 6)).unwrap();
        assert!(bmp.is_borrowed());
    }
    assert_eq!(samples[3..6], [4, 5, 6]);
}

#[test]
fn test_local_maxima() {
    #[rustfmt::skip]
    let bmp = BitmapData::<u8>::from_vec(vec![
        0, 0, 0, 0, 0,
        0, 9, 0, 0, 0,
        0, 0, 0, 7, 7,
        0, 0, 0, 0, 0,
    ], 5, 4, 1).unwrap();
    let maxima: Vec<(u32, u32)> = (0..4)
        .flat_map(|y| (0..5).map(move |x| (x, y)))
        .filter(|&(x, y)| bmp.is_brighter_than_neighbours(x, y))
        .collect();
    // the 7 plateau ties with itself
    assert_eq!(maxima, [(1, 1)]);
}
