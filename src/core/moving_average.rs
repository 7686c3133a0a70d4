use serde::{Deserialize, Serialize};

/// Where the averaging window sits relative to the timestep being smoothed.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub enum MovingAverageAlignment {
    /// Window spans the timestep with (window - 1) / 2 steps before it and the rest after it.
    #[default]
    Centered,
    /// Window ends at the timestep being smoothed.
    Trailing,
}

/// Running mean over a day of timesteps. The day is treated as periodic, so windows that run
/// off either end wrap round to the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovingAverage {
    window: usize,
    alignment: MovingAverageAlignment,
}

impl MovingAverage {
    pub fn new(window: usize, alignment: MovingAverageAlignment) -> Self {
        Self { window, alignment }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    fn steps_before(&self, window: usize) -> usize {
        match self.alignment {
            MovingAverageAlignment::Centered => (window - 1) / 2,
            MovingAverageAlignment::Trailing => window - 1,
        }
    }

    /// Smoothed value of `values` at `index`
    pub fn value_at(&self, values: &[f64], index: usize) -> f64 {
        let count = values.len();
        if count == 0 {
            return 0.;
        }
        let window = self.window.min(count);
        if window <= 1 {
            return values[index];
        }

        let start = index + count - self.steps_before(window);
        let sum: f64 = (start..start + window)
            .map(|position| values[position % count])
            .sum();
        sum / window as f64
    }

    /// Smoothed copy of the whole sequence
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        (0..values.len())
            .map(|index| self.value_at(values, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_leave_constant_sequence_unchanged(
        #[values(1, 2, 4, 5, 24, 30)] window: usize,
        #[values(MovingAverageAlignment::Centered, MovingAverageAlignment::Trailing)]
        alignment: MovingAverageAlignment,
    ) {
        let values = vec![42.5; 24];
        let smoothed = MovingAverage::new(window, alignment).apply(&values);
        for value in smoothed {
            assert_relative_eq!(value, 42.5, max_relative = 1e-12);
        }
    }

    #[rstest]
    fn should_not_smooth_with_window_of_one() {
        let values = [1., 5., 3.];
        let moving_average = MovingAverage::new(1, MovingAverageAlignment::Centered);
        assert_eq!(moving_average.apply(&values), values.to_vec());
    }

    #[rstest]
    fn should_center_window() {
        let values = [0., 0., 3., 6., 9., 0., 0., 0.];
        let moving_average = MovingAverage::new(3, MovingAverageAlignment::Centered);
        assert_relative_eq!(moving_average.value_at(&values, 3), 6.);
        assert_relative_eq!(moving_average.value_at(&values, 1), 1.);
    }

    #[rstest]
    fn should_trail_window_and_wrap_round_the_day() {
        let values = [8., 0., 0., 0., 0., 4.];
        let moving_average = MovingAverage::new(3, MovingAverageAlignment::Trailing);
        // window for the first timestep is [0., 4., 8.] from the end of the day
        assert_relative_eq!(moving_average.value_at(&values, 0), 4.);
        assert_relative_eq!(moving_average.value_at(&values, 2), 8. / 3.);
        assert_relative_eq!(moving_average.value_at(&values, 4), 0.);
    }

    #[rstest]
    fn should_average_whole_day_when_window_exceeds_day() {
        let values = [1., 2., 3., 6.];
        let moving_average = MovingAverage::new(10, MovingAverageAlignment::Centered);
        assert_relative_eq!(moving_average.value_at(&values, 2), 3.);
    }
}
