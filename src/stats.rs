// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Summary statistics for repeated, timed renders.

use std::fmt;
use std::time::Duration;

/// Mean and spread of a set of wall-clock samples, in seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation; `None` below two samples.
    pub stdev: Option<f64>,
}

impl Summary {
    /// `None` for an empty set.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let secs: Vec<f64> = samples
            .iter()
            .map(|d| d.as_secs() as f64 + f64::from(d.subsec_nanos()) * 1e-9)
            .collect();
        let count = secs.len();
        let mean = secs.iter().sum::<f64>() / count as f64;
        let stdev = if count < 2 {
            None
        } else {
            let var = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(var.sqrt())
        };
        Some(Summary { count, mean, stdev })
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> Option<f64> {
        self.stdev.map(|s| s / (self.count as f64).sqrt())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\tNumber of repetition: {}", self.count)?;
        match (self.stdev, self.std_error()) {
            (Some(stdev), Some(sem)) => {
                writeln!(f, "\tAverage of sample is {:.6}s", self.mean)?;
                writeln!(f, "\tStandard Deviation of sample is {:.6}s", stdev)?;
                write!(f, "\tStandard error of the mean is {:.6}s", sem)
            }
            _ => write!(f, "\tTime: {:.6}s", self.mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(Summary::from_samples(&[]), None);
    }

    #[test]
    fn single_sample_has_no_spread() {
        let s = Summary::from_samples(&[Duration::from_millis(1500)]).unwrap();
        assert_eq!(s.count, 1);
        assert!((s.mean - 1.5).abs() < 1e-9);
        assert_eq!(s.stdev, None);
        assert!(s.to_string().contains("Time: 1.500000s"));
    }

    #[test]
    fn spread_of_several_samples() {
        let samples: Vec<Duration> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .map(|&s| Duration::from_secs(s))
            .collect();
        let s = Summary::from_samples(&samples).unwrap();
        assert!((s.mean - 5.0).abs() < 1e-9);
        // Sample variance is 32 / 7.
        assert!((s.stdev.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
        assert!((s.std_error().unwrap() - (32.0f64 / 7.0).sqrt() / 8f64.sqrt()).abs() < 1e-9);
        assert!(s.to_string().contains("Number of repetition: 8"));
    }
}
