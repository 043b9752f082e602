use serde::{Deserialize, Serialize};

/// Row height and block spacing as a function of how many dates the grid
/// holds. Longer periods get shorter rows so the whole sheet stays on one
/// page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Above this many dates the reduced row height applies.
    pub threshold: usize,
    pub standard_row_height: f32,
    pub reduced_row_height: f32,
    /// Gap between the bottom of the grid and the certification line.
    pub standard_spacing: f32,
    pub reduced_spacing: f32,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            threshold: 12,
            standard_row_height: 32.0,
            reduced_row_height: 26.0,
            standard_spacing: 40.0,
            reduced_spacing: 44.0,
        }
    }
}

impl LayoutPolicy {
    fn is_reduced(&self, date_count: usize) -> bool {
        date_count > self.threshold
    }

    pub fn row_height(&self, date_count: usize) -> f32 {
        if self.is_reduced(date_count) {
            self.reduced_row_height
        } else {
            self.standard_row_height
        }
    }

    pub fn inter_block_spacing(&self, date_count: usize) -> f32 {
        if self.is_reduced(date_count) {
            self.reduced_spacing
        } else {
            self.standard_spacing
        }
    }
}

/// [`LayoutPolicy::row_height`] with the default policy.
pub fn row_height(date_count: usize) -> f32 {
    LayoutPolicy::default().row_height(date_count)
}

/// [`LayoutPolicy::inter_block_spacing`] with the default policy.
pub fn inter_block_spacing(date_count: usize) -> f32 {
    LayoutPolicy::default().inter_block_spacing(date_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_dates_keep_the_standard_row() {
        assert_eq!(row_height(12), 32.0);
        assert_eq!(inter_block_spacing(12), 40.0);
    }

    #[test]
    fn thirteen_dates_switch_to_the_reduced_row() {
        assert_eq!(row_height(13), 26.0);
        assert_eq!(inter_block_spacing(13), 44.0);
    }

    #[test]
    fn row_height_never_grows_with_more_dates() {
        let heights: Vec<f32> = (0..60).map(row_height).collect();
        assert!(heights.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn zero_dates_is_total() {
        assert_eq!(row_height(0), 32.0);
    }
}
