//! Heart-rate peak search.

use crate::band::Band;
use crate::spectrum::Spectrum;

/// The strongest bin of a spectrum inside a band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralPeak {
    /// Frequency of the bin in Hz
    pub frequency_hz: f64,
    /// Density at the bin
    pub power: f64,
    /// Index of the bin in the spectrum
    pub bin: usize,
}

/// Finds the bin of maximum density with frequency inside `band`.
///
/// Returns `None` if no bin lies in the band or every in-band density is NaN.
/// When several bins share the maximum, the lowest frequency wins.
pub fn find_peak(spectrum: &Spectrum, band: &Band) -> Option<SpectralPeak> {
    let mut best: Option<SpectralPeak> = None;

    for (bin, (frequency_hz, power)) in spectrum.iter().enumerate() {
        if !band.contains(frequency_hz) || power.is_nan() {
            continue;
        }
        if best.is_none_or(|peak| power > peak.power) {
            best = Some(SpectralPeak {
                frequency_hz,
                power,
                bin,
            });
        }
    }

    best
}
