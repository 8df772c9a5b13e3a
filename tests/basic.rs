use colorthief::{quantize, quantize_with_config, QuantizeConfig, QuantizeError, RGB8, RGBA8};

/// Deterministic pseudo-random pixels (64-bit LCG).
fn noise(n: usize, mut seed: u64) -> Vec<RGB8> {
    (0..n)
        .map(|_| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let v = (seed >> 40) as u32;
            RGB8::new(v as u8, (v >> 8) as u8, (v >> 16) as u8)
        })
        .collect()
}

fn gradient_cube() -> Vec<RGB8> {
    (0..4096u32)
        .map(|i| {
            RGB8::new(
                (i % 16 * 16) as u8,
                (i / 16 % 16 * 16) as u8,
                (i / 256 * 16) as u8,
            )
        })
        .collect()
}

fn close(a: RGB8, b: RGB8, tolerance: u8) -> bool {
    a.r.abs_diff(b.r) <= tolerance && a.g.abs_diff(b.g) <= tolerance && a.b.abs_diff(b.b) <= tolerance
}

#[test]
fn palette_size_stays_near_request() {
    let samples = noise(2000, 7);
    for k in [2u32, 3, 5, 8, 16, 64, 256] {
        let cmap = quantize(&samples, k).unwrap();
        assert!(cmap.len() >= 1, "k={k}");
        assert!(cmap.len() <= k as usize + 1, "k={k} produced {}", cmap.len());
    }
}

#[test]
fn gradient_palette_sizes() {
    // Both phases count from one box, so larger requests end one short and
    // k = 2 ends one over.
    let samples = gradient_cube();
    for (k, expected) in [(2u32, 3usize), (4, 4), (5, 4), (12, 11), (32, 31)] {
        let cmap = quantize(&samples, k).unwrap();
        assert_eq!(cmap.len(), expected, "k={k}");
    }
}

#[test]
fn error_empty_input() {
    assert!(matches!(quantize(&[], 5), Err(QuantizeError::EmptyInput)));
}

#[test]
fn error_invalid_max_colors() {
    let samples = vec![RGB8::new(1, 2, 3); 4];
    assert!(matches!(
        quantize(&samples, 1),
        Err(QuantizeError::InvalidMaxColors(1))
    ));
    assert!(matches!(
        quantize(&samples, 257),
        Err(QuantizeError::InvalidMaxColors(257))
    ));
}

#[test]
fn error_invalid_config() {
    let samples = vec![RGB8::new(1, 2, 3); 4];
    assert!(matches!(
        quantize_with_config(&samples, &QuantizeConfig::new().sigbits(0)),
        Err(QuantizeError::InvalidSigbits(0))
    ));
    assert!(matches!(
        quantize_with_config(&samples, &QuantizeConfig::new().fract_by_population(1.5)),
        Err(QuantizeError::InvalidPopulationFraction(_))
    ));
}

#[test]
fn single_color_gives_single_entry() {
    let target = RGB8::new(200, 100, 50);
    let samples = vec![target; 1000];
    let cmap = quantize(&samples, 5).unwrap();
    assert_eq!(cmap.len(), 1);
    assert!(close(cmap.palette()[0], target, 8), "{:?}", cmap.palette());
}

#[test]
fn bimodal_gives_black_and_white() {
    let mut samples = Vec::with_capacity(1000);
    for i in 0..500u32 {
        samples.push(RGB8::new((i % 6) as u8, (i / 6 % 6) as u8, (i / 36 % 6) as u8));
    }
    for i in 0..500u32 {
        samples.push(RGB8::new(
            250 + (i % 6) as u8,
            250 + (i / 6 % 6) as u8,
            250 + (i / 36 % 6) as u8,
        ));
    }

    let cmap = quantize(&samples, 2).unwrap();
    let palette = cmap.palette();
    assert_eq!(palette.len(), 2);
    assert!(palette.iter().any(|c| close(*c, RGB8::new(0, 0, 0), 10)));
    assert!(palette.iter().any(|c| close(*c, RGB8::new(255, 255, 255), 10)));
}

#[test]
fn entries_are_disjoint_and_cover_samples() {
    let samples = noise(3000, 42);
    let cmap = quantize(&samples, 16).unwrap();
    let total: u64 = cmap.entries().iter().map(|e| e.vbox.count()).sum();
    assert_eq!(total, samples.len() as u64);

    for px in &samples {
        let holders = cmap.entries().iter().filter(|e| e.vbox.contains(*px)).count();
        assert_eq!(holders, 1, "pixel {px:?} in {holders} boxes");
    }
}

#[test]
fn nearest_is_brute_force_minimum() {
    let cmap = quantize(&noise(1500, 3), 8).unwrap();
    let palette = cmap.palette();
    for px in noise(200, 99) {
        let dist = |c: &RGB8| {
            let dr = px.r as i32 - c.r as i32;
            let dg = px.g as i32 - c.g as i32;
            let db = px.b as i32 - c.b as i32;
            dr * dr + dg * dg + db * db
        };
        let best = palette.iter().map(dist).min().unwrap();
        let got = cmap.nearest(px).unwrap();
        assert_eq!(dist(&got), best);
    }
}

#[test]
fn averages_map_to_themselves() {
    let cmap = quantize(&gradient_cube(), 8).unwrap();
    for entry in cmap.entries() {
        if entry.vbox.count() == 0 {
            continue;
        }
        assert!(entry.vbox.contains(entry.color));
        assert_eq!(cmap.map(entry.color), Some(entry.color));
    }

    // Quantizing the palette again stays within the same budget.
    let palette = cmap.palette();
    let again = quantize(&palette, 8).unwrap();
    assert!(!again.is_empty() && again.len() <= 8);
    for color in &palette {
        assert!(again.nearest(*color).is_some());
    }
}

#[test]
fn fresh_map_lists_largest_region_first() {
    let cmap = quantize(&noise(2000, 11), 10).unwrap();
    let keys: Vec<u64> = cmap.entries().iter().map(|e| e.vbox.weighted_volume()).collect();
    assert!(keys.windows(2).all(|w| w[0] >= w[1]), "{keys:?}");

    let mut sorted = cmap.clone();
    sorted.sort();
    let keys: Vec<u64> = sorted.entries().iter().map(|e| e.vbox.weighted_volume()).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{keys:?}");
}

#[test]
fn zero_iterations_keeps_root_box() {
    let config = QuantizeConfig::new().max_colors(8).max_iterations(0);
    let cmap = quantize_with_config(&gradient_cube(), &config).unwrap();
    assert_eq!(cmap.len(), 1);
}

#[test]
fn coarser_histogram_still_quantizes() {
    let config = QuantizeConfig::new().max_colors(6).sigbits(3);
    let cmap = quantize_with_config(&gradient_cube(), &config).unwrap();
    assert!(!cmap.is_empty() && cmap.len() <= 6);
}

#[test]
fn independent_runs_in_parallel() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| std::thread::spawn(move || quantize(&noise(1000, seed), 6).map(|c| c.len())))
        .collect();
    for handle in handles {
        let len = handle.join().unwrap().unwrap();
        assert!((1..=6).contains(&len));
    }
}

#[test]
fn sampling_feeds_only_opaque_pixels() {
    let pixels: Vec<RGBA8> = (0..400u32)
        .map(|i| {
            if i % 2 == 0 {
                RGBA8::new(0, 200, 0, 0)
            } else {
                RGBA8::new(200, 0, 0, 255)
            }
        })
        .collect();
    let samples = colorthief::sample::sample_pixels(&pixels, 1);
    assert_eq!(samples.len(), 200);
    assert!(samples.iter().all(|px| *px == RGB8::new(200, 0, 0)));

    let palette = colorthief::get_palette(&pixels, colorthief::PaletteOptions::new().quality(1));
    assert_eq!(palette.len(), 1);
    assert!(close(palette[0], RGB8::new(200, 0, 0), 8));
}
