//! Compute backend selection.
//!
//! The backend decides how per-path array work is scheduled: plain
//! sequential loops, or rayon data parallelism across paths. It never
//! changes the arithmetic, so both backends produce bit-identical prices
//! for the same seed.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::ValidationError;
use rayon::prelude::*;

/// Array-operations backend for one pricing engine.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::lsm::ComputeBackend;
///
/// let backend: ComputeBackend = "rayon".parse().unwrap();
/// assert_eq!(backend, ComputeBackend::Rayon);
/// assert_eq!(ComputeBackend::default(), ComputeBackend::Cpu);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ComputeBackend {
    /// Sequential loops on the calling thread.
    #[default]
    Cpu,
    /// Data-parallel loops over paths on the rayon global pool.
    Rayon,
}

impl ComputeBackend {
    /// Lowercase name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            ComputeBackend::Cpu => "cpu",
            ComputeBackend::Rayon => "rayon",
        }
    }

    /// Applies `op` to every `(row, input_row)` pair of two row-major buffers.
    ///
    /// `out` is split into rows of `out_width`, `input` into rows of
    /// `in_width`; both must hold the same number of rows.
    pub(crate) fn zip_rows<F>(
        self,
        out: &mut [f64],
        out_width: usize,
        input: &[f64],
        in_width: usize,
        op: F,
    ) where
        F: Fn(&mut [f64], &[f64]) + Sync + Send,
    {
        debug_assert_eq!(out.len() / out_width, input.len() / in_width.max(1));
        match self {
            ComputeBackend::Cpu => out
                .chunks_mut(out_width)
                .zip(input.chunks(in_width.max(1)))
                .for_each(|(o, i)| op(o, i)),
            ComputeBackend::Rayon => out
                .par_chunks_mut(out_width)
                .zip(input.par_chunks(in_width.max(1)))
                .for_each(|(o, i)| op(o, i)),
        }
    }

    /// Maps every element of `input` into the matching slot of `out`.
    pub(crate) fn map_into<F>(self, out: &mut [f64], input: &[f64], op: F)
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        debug_assert_eq!(out.len(), input.len());
        match self {
            ComputeBackend::Cpu => out
                .iter_mut()
                .zip(input)
                .for_each(|(o, &i)| *o = op(i)),
            ComputeBackend::Rayon => out
                .par_iter_mut()
                .zip(input.par_iter())
                .for_each(|(o, &i)| *o = op(i)),
        }
    }

    /// Evaluates `op` for every index in `0..n` and collects the results in order.
    pub(crate) fn collect_indexed<T, F>(self, n: usize, op: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            ComputeBackend::Cpu => (0..n).map(op).collect(),
            ComputeBackend::Rayon => (0..n).into_par_iter().map(op).collect(),
        }
    }
}

impl FromStr for ComputeBackend {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" | "sequential" => Ok(ComputeBackend::Cpu),
            "rayon" | "parallel" => Ok(ComputeBackend::Rayon),
            other => Err(ValidationError::parameter(
                "backend",
                format!("unknown compute backend '{}': expected 'cpu' or 'rayon'", other),
            )),
        }
    }
}

impl fmt::Display for ComputeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
