//! Progress scaling for operations made of several commands

/// The slice `[base, base + step)` of overall progress owned by one
/// sub-command of a composite operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSlice {
    pub base: f64,
    pub step: f64,
}

impl ProgressSlice {
    /// Equal-width slice for sub-command `index` (0-based) of `total`.
    pub fn for_step(index: usize, total: usize) -> Self {
        let total = total.max(1) as f64;
        Self {
            base: index as f64 / total,
            step: 1.0 / total,
        }
    }

    /// Map a sub-command's own fraction into overall progress.
    pub fn scale(&self, fraction: f64) -> f64 {
        self.base + fraction * self.step
    }

    /// Wrap `sink` so every reported fraction is rescaled into this slice.
    /// The sink's answer (keep going / cancel) is passed back unchanged.
    pub fn wrap<'a, F>(self, sink: &'a mut F) -> impl FnMut(f64, &str) -> bool + 'a
    where
        F: FnMut(f64, &str) -> bool + ?Sized,
    {
        move |fraction: f64, message: &str| sink(self.scale(fraction), message)
    }
}
