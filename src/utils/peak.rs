use crate::float::Float;

/// A spectral peak: the bin it was found in and that bin's magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak<T: Float> {
    pub bin: usize,
    pub magnitude: T,
}

/// Centre frequency of bin `i` of an `n`-point spectrum at `sample_rate` Hz.
pub fn bin_frequency(i: usize, n: usize, sample_rate: usize) -> f64 {
    i as f64 * (sample_rate as f64 / n as f64)
}

/// Inclusive range of bins, within the non-redundant half of an `n`-point
/// spectrum, whose centre frequencies lie in `[min_frequency, max_frequency]`.
/// Returns `None` when no bin falls in the band.
///
/// Compared in `f64` whatever the working float, so a bin sitting exactly on
/// a band edge is kept.
pub fn band_bins(
    n: usize,
    sample_rate: usize,
    min_frequency: f64,
    max_frequency: f64,
) -> Option<(usize, usize)> {
    let half = n / 2;
    let in_band = |i: &usize| {
        let frequency = bin_frequency(*i, n, sample_rate);
        frequency >= min_frequency && frequency <= max_frequency
    };
    let first = (0..half).find(in_band)?;
    let last = (first..half).rev().find(in_band)?;
    Some((first, last))
}

/// Largest strictly positive magnitude in `spectrum[first..=last]`. Scans in
/// ascending order and only replaces the best on a strictly greater value, so
/// the lowest bin wins a tie.
pub fn choose_peak<T: Float>(spectrum: &[T], first: usize, last: usize) -> Option<Peak<T>> {
    spectrum[first..=last]
        .iter()
        .enumerate()
        .fold(None, |best: Option<Peak<T>>, (offset, &magnitude)| {
            let threshold = best.map_or(T::zero(), |p| p.magnitude);
            if magnitude > threshold {
                Some(Peak {
                    bin: first + offset,
                    magnitude,
                })
            } else {
                best
            }
        })
}
