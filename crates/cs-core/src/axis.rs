/// Number of ticks on each panel's time axis.
pub const TICK_COUNT: usize = 5;

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// # Example
/// ```
/// use cs_core::axis::linspace;
/// assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
/// ```
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Formate une position en secondes en `minutes:secondes` (secondes sur 2 chiffres).
///
/// Minutes are truncated toward zero and seconds use a floored modulo, so
/// `125.9` reads `2:05`.
///
/// # Example
/// ```
/// use cs_core::axis::format_tick;
/// assert_eq!(format_tick(1200.0), "20:00");
/// assert_eq!(format_tick(65.4), "1:05");
/// ```
#[must_use]
pub fn format_tick(secs: f64) -> String {
    let minutes = (secs / 60.0).trunc() as i64;
    let seconds = secs.rem_euclid(60.0).trunc() as i64;
    format!("{minutes}:{seconds:02}")
}

/// Shared x-axis of the three analysis panels, in seconds on the global timeline.
///
/// # Example
/// ```
/// use cs_core::axis::TimeAxis;
/// let axis = TimeAxis::new(600.0, 300.0);
/// assert_eq!(axis.end, 900.0);
/// assert_eq!(axis.tick_labels().first().map(String::as_str), Some("10:00"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeAxis {
    pub start: f64,
    pub end: f64,
}

impl TimeAxis {
    /// Axis covering `[offset, offset + duration]`.
    #[must_use]
    pub fn new(offset_secs: f64, duration_secs: f64) -> Self {
        Self {
            start: offset_secs,
            end: offset_secs + duration_secs,
        }
    }

    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// The [`TICK_COUNT`] tick positions.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        linspace(self.start, self.end, TICK_COUNT)
    }

    /// Labels matching [`TimeAxis::ticks`].
    #[must_use]
    pub fn tick_labels(&self) -> Vec<String> {
        self.ticks().into_iter().map(format_tick).collect()
    }

    /// Fraction in `[0, 1]` of `t` along the axis. Degenerate axes map to 0.
    #[must_use]
    pub fn fraction(&self, t: f64) -> f64 {
        let span = self.span();
        if span.abs() < f64::EPSILON {
            0.0
        } else {
            ((t - self.start) / span).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_include_offset() {
        let axis = TimeAxis::new(1200.0, 600.0);
        assert_eq!(axis.ticks(), vec![1200.0, 1350.0, 1500.0, 1650.0, 1800.0]);
        assert_eq!(
            axis.tick_labels(),
            vec!["20:00", "22:30", "25:00", "27:30", "30:00"]
        );
    }

    #[test]
    fn labels_are_monotonic() {
        let axis = TimeAxis::new(600.0, 300.0);
        let ticks = axis.ticks();
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        let labels = axis.tick_labels();
        let as_secs: Vec<i64> = labels
            .iter()
            .map(|l| {
                let (m, s) = l.split_once(':').unwrap_or(("0", "0"));
                m.parse::<i64>().unwrap_or(0) * 60 + s.parse::<i64>().unwrap_or(0)
            })
            .collect();
        assert!(as_secs.windows(2).all(|w| w[0] < w[1]), "{labels:?}");
    }

    #[test]
    fn seconds_are_zero_padded() {
        assert_eq!(format_tick(0.0), "0:00");
        assert_eq!(format_tick(9.99), "0:09");
        assert_eq!(format_tick(3599.5), "59:59");
        assert_eq!(format_tick(3600.0), "60:00");
    }

    #[test]
    fn degenerate_axis() {
        let axis = TimeAxis::new(0.0, 0.0);
        assert_eq!(axis.tick_labels(), vec!["0:00"; 5]);
        assert!(axis.fraction(10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        let v = linspace(0.0, 0.1, 7);
        assert_eq!(v.len(), 7);
        assert!((v[6] - 0.1).abs() < f64::EPSILON);
    }
}
