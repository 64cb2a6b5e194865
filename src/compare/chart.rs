//! Series handed to the chart renderers

use serde::Serialize;

use crate::model::{Number, Sign};

/// Equal-width histogram of diff values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    /// Values falling in each bin; the last bin is closed on the right
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin values over their [min, max] range. A single distinct value is
    /// centred in a range of width one, and no values give empty bins over
    /// [0, 1].
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);

        let (mut lo, mut hi) = values
            .iter()
            .fold(None, |range: Option<(f64, f64)>, &v| match range {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 1.0));
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);

        let mut counts = vec![0; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    /// Iterate `(lower edge, upper edge, count)` per bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// One bar of the per-id chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub diff: Number,
    pub sign: Sign,
}
