//! Band power by trapezoidal integration of a PSD.

use crate::band::Band;
use crate::spectrum::Spectrum;

/// Integrates the density over the bins whose frequency lies in `band`.
///
/// Uses the trapezoidal rule over the in-band bins only; no interpolation
/// to the band edges. Fewer than two in-band bins integrate to 0.0.
pub fn band_power(spectrum: &Spectrum, band: &Band) -> f64 {
    let freqs = spectrum.frequencies();
    let psd = spectrum.psd();

    // Frequencies are sorted, so in-band bins are contiguous
    let start = freqs.partition_point(|&f| f < band.low_hz);
    let end = freqs.partition_point(|&f| f <= band.high_hz);
    if end <= start + 1 {
        return 0.0;
    }

    freqs[start..end]
        .windows(2)
        .zip(psd[start..end].windows(2))
        .map(|(f, p)| (f[1] - f[0]) * (p[0] + p[1]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(psd: &[f64]) -> Spectrum {
        let freqs = (0..psd.len()).map(|k| k as f64 * 0.1).collect();
        Spectrum::new(freqs, psd.to_vec()).unwrap()
    }

    #[test]
    fn flat_density_integrates_to_width() {
        let s = spectrum(&[2.0; 101]);
        // Bins 1.0..=3.0 span exactly 2 Hz
        let p = band_power(&s, &Band::from_edges(0.95, 3.05));
        assert!((p - 4.0).abs() < 1e-9, "{p}");
    }

    #[test]
    fn trapezoid_of_ramp() {
        let s = spectrum(&[0.0, 1.0, 2.0, 3.0]);
        let p = band_power(&s, &Band::from_edges(0.0, 0.35));
        // Area under a ramp from 0 to 3 over 0.3 Hz
        assert!((p - 0.45).abs() < 1e-12, "{p}");
    }

    #[test]
    fn empty_or_single_bin_is_zero() {
        let s = spectrum(&[5.0; 10]);
        assert_eq!(band_power(&s, &Band::from_edges(0.31, 0.39)), 0.0);
        assert_eq!(band_power(&s, &Band::from_edges(0.29, 0.31)), 0.0);
        assert_eq!(band_power(&s, &Band::from_edges(4.0, 9.0)), 0.0);
    }

    #[test]
    fn adjoining_bands_add_up() {
        let psd: Vec<f64> = (0..200).map(|k| ((k as f64) * 0.37).sin().abs()).collect();
        let s = spectrum(&psd);
        let whole = band_power(&s, &Band::from_edges(1.0, 9.0));
        // Split on a bin frequency so the shared bin closes one band and opens the other
        let split = s.frequencies()[42];
        let left = band_power(&s, &Band::from_edges(1.0, split));
        let right = band_power(&s, &Band::from_edges(split, 9.0));
        assert!((whole - left - right).abs() < 1e-9);
    }
}
