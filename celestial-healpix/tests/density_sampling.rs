use celestial_healpix::{
    DensityMap, Error, ErrorKind, HealPix, Map, SampleRegion, SamplerConfig, Scheme,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn uniform(scheme: Scheme, nside: u64) -> DensityMap {
    let hp = HealPix::new(scheme, nside).unwrap();
    DensityMap::new(hp, vec![1.0; hp.npix() as usize]).unwrap()
}

/// Pearson chi-square of counts against a flat expectation.
fn chi_square(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

// --- Uniform density ---

#[test]
fn uniform_map_fills_equal_area_bins_evenly() {
    let density = uniform(Scheme::Ring, 1);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let (ra, dec) = density.genrand(&mut rng, 19_200, None).unwrap();

    // bins finer than the sampling pixels also test placement inside a pixel
    let bins = HealPix::new(Scheme::Nested, 4).unwrap();
    let mut counts = vec![0u64; bins.npix() as usize];
    for pix in bins.eq2pix_many(&ra, &dec).unwrap() {
        counts[pix as usize] += 1;
    }
    // 191 degrees of freedom: mean 191, standard deviation about 19.5
    let chi2 = chi_square(&counts);
    assert!(chi2 < 320.0, "chi-square {chi2}");
}

#[test]
fn uniform_map_has_flat_sin_dec() {
    let density = uniform(Scheme::Nested, 8);
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let (_, dec) = density.genrand(&mut rng, 20_000, None).unwrap();
    let mean_sin: f64 =
        dec.iter().map(|d| d.to_radians().sin()).sum::<f64>() / dec.len() as f64;
    // sin(dec) is uniform on [-1, 1]: standard error of the mean about 0.004
    assert!(mean_sin.abs() < 0.02, "mean sin(dec) {mean_sin}");
}

// --- Weighted density ---

#[test]
fn pixel_frequencies_follow_weights() {
    let hp = HealPix::new(Scheme::Ring, 1).unwrap();
    let mut weights = vec![0.0; 12];
    weights[1] = 1.0;
    weights[6] = 3.0;
    let density = DensityMap::new(hp, weights).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let (ra, dec) = density.genrand(&mut rng, 8000, None).unwrap();

    let pixels = hp.eq2pix_many(&ra, &dec).unwrap();
    let in_six = pixels.iter().filter(|&&p| p == 6).count();
    assert_eq!(pixels.iter().filter(|&&p| p != 1 && p != 6).count(), 0);
    // expected 6000, binomial standard deviation about 39
    assert!((5800..6200).contains(&in_six), "{in_six}");
}

#[test]
fn map_built_density_matches_direct_construction() {
    let hp = HealPix::new(Scheme::Nested, 2).unwrap();
    let data: Vec<f64> = (0..hp.npix()).map(|p| (p % 5) as f64).collect();
    let map = Map::with_healpix(hp, data.clone()).unwrap();
    let a = DensityMap::from_map(&map).unwrap();
    let b = DensityMap::new(hp, data).unwrap();
    assert_eq!(a.cumulative(), b.cumulative());
    assert_eq!(a.total_weight(), b.total_weight());
}

// --- Restricted regions ---

#[test]
fn restricted_region_is_respected_exactly() {
    let density = uniform(Scheme::Ring, 16);
    let region = SampleRegion::new(Some((60.0, 95.0)), Some((-62.0, -42.0))).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let (ra, dec) = density.genrand(&mut rng, 5000, Some(&region)).unwrap();
    assert_eq!(ra.len(), 5000);
    assert!(ra.iter().all(|r| (60.0..95.0).contains(r)));
    assert!(dec.iter().all(|d| (-62.0..=-42.0).contains(d)));
}

#[test]
fn restricted_region_is_unbiased() {
    let density = uniform(Scheme::Nested, 16);
    let region = SampleRegion::new(None, Some((-10.0, 10.0))).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let (_, dec) = density.genrand(&mut rng, 20_000, Some(&region)).unwrap();
    let inner = dec.iter().filter(|d| d.abs() < 5.0).count() as f64 / dec.len() as f64;
    let expected = 5.0_f64.to_radians().sin() / 10.0_f64.to_radians().sin();
    assert!((inner - expected).abs() < 0.02, "{inner} vs {expected}");
}

#[test]
fn region_around_the_pole_and_across_ra_zero() {
    let density = uniform(Scheme::Ring, 8);
    let mut rng = ChaCha8Rng::seed_from_u64(13);

    let cap = SampleRegion::new(None, Some((80.0, 90.0))).unwrap();
    let (_, dec) = density.genrand(&mut rng, 1000, Some(&cap)).unwrap();
    assert!(dec.iter().all(|&d| d >= 80.0));

    let edge = SampleRegion::new(Some((355.0, 360.0)), Some((-5.0, 5.0))).unwrap();
    let (ra, _) = density.genrand(&mut rng, 1000, Some(&edge)).unwrap();
    assert!(ra.iter().all(|&r| (355.0..360.0).contains(&r)));
}

#[test]
fn region_without_weight_is_empty() {
    let hp = HealPix::new(Scheme::Nested, 8).unwrap();
    let weights: Vec<f64> = (0..hp.npix())
        .map(|p| if hp.pix2eq(p).unwrap().0 < 90.0 { 1.0 } else { 0.0 })
        .collect();
    let density = DensityMap::new(hp, weights).unwrap();
    let region = SampleRegion::new(Some((180.0, 270.0)), Some((-30.0, 30.0))).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(14);
    let err = density.genrand(&mut rng, 100, Some(&region)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyRegion);
}

#[test]
fn sliver_regions_hit_the_rejection_cap() {
    let density = uniform(Scheme::Ring, 2).with_config(SamplerConfig {
        max_attempts_per_point: 50,
        ..SamplerConfig::default()
    });
    let region = SampleRegion::new(Some((10.0, 10.000_000_001)), None).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let err = density.genrand(&mut rng, 10, Some(&region)).unwrap_err();
    assert!(matches!(err, Error::RejectionLimit { requested: 10, .. }));
    assert_eq!(err.kind(), ErrorKind::EmptyRegion);
}

// --- Reproducibility and sharing ---

#[test]
fn seeded_draws_are_reproducible() {
    let density = uniform(Scheme::Nested, 4);
    let mut a = ChaCha8Rng::seed_from_u64(99);
    let mut b = ChaCha8Rng::seed_from_u64(99);
    assert_eq!(
        density.genrand(&mut a, 100, None).unwrap(),
        density.genrand(&mut b, 100, None).unwrap()
    );
}

#[test]
fn one_density_serves_many_threads() {
    let density = uniform(Scheme::Ring, 8);
    let region = SampleRegion::new(Some((0.0, 180.0)), None).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let density = &density;
                let region = &region;
                s.spawn(move || {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    density.genrand(&mut rng, 500, Some(region)).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let (ra, _) = handle.join().unwrap();
            assert_eq!(ra.len(), 500);
            assert!(ra.iter().all(|&r| r < 180.0));
        }
    });
}
