use celestial_healpix::coords::angular_separation_deg;
use celestial_healpix::{DensityMap, HealPix, Map, Position, SampleRegion, Scheme};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .try_init();

    let n: usize = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(10);

    let hp = HealPix::new(Scheme::Ring, 64)?;
    println!("{hp}\n");

    // a Gaussian blob of density around the Large Magellanic Cloud
    let (ra0, dec0, sigma) = (80.9, -69.8, 4.0);
    let mut weights = Vec::with_capacity(hp.npix() as usize);
    for pix in 0..hp.npix() {
        let (ra, dec) = hp.pix2eq(pix)?;
        let d = angular_separation_deg(ra0, dec0, ra, dec);
        weights.push((-0.5 * (d / sigma).powi(2)).exp());
    }
    let map = Map::new(Scheme::Ring, weights)?;
    let density = DensityMap::from_map(&map)?;

    let disc = hp.query_disc_eq(ra0, dec0, 2.0 * sigma, true)?;
    let inside: f64 = disc.iter().map(|&p| map[p]).sum();
    println!(
        "{} pixels within {:.1} deg of ({ra0}, {dec0}) hold {:.1}% of the weight\n",
        disc.len(),
        2.0 * sigma,
        100.0 * inside / density.total_weight(),
    );

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let (ra, dec) = density.genrand(&mut rng, n, None)?;
    println!("{n} points drawn from the full map:");
    for (r, d) in ra.iter().zip(&dec) {
        println!("  RA {r:>10.5}  Dec {d:>+10.5}");
    }

    let region = SampleRegion::new(Some((60.0, 95.0)), Some((-62.0, -42.0)))?;
    let (ra, dec) = density.genrand(&mut rng, n, Some(&region))?;
    println!("\n{n} points restricted to RA [60, 95), Dec [-62, -42]:");
    for (r, d) in ra.iter().zip(&dec) {
        let pix = hp.query_disc(Position::Eq { ra: *r, dec: *d }, 0.0, false)?[0];
        println!("  RA {r:>10.5}  Dec {d:>+10.5}  pixel {pix}");
    }

    Ok(())
}
