use crate::{
    core::{energy_level::EnergyLevel, outputs_mode::OutputsMode},
    quantity::currency::Gbp,
};

/// Best decision in a given state.
#[derive(Copy, Clone, Debug)]
pub struct Decision {
    pub mode: OutputsMode,

    /// Cost of this segment and all the following ones.
    pub cost_to_go: Gbp,
}

/// Memoized decisions indexed by `(segment, energy level)`.
pub struct Memo {
    /// Energy dimension size.
    n_levels: usize,

    /// Flattened 2D array of decisions to speed up the lookups.
    ///
    /// Here, [`None`] means the state has not been solved.
    flat_matrix: Vec<Option<Decision>>,
}

impl Memo {
    pub fn new(n_segments: usize, max_level: EnergyLevel) -> Self {
        let n_levels = max_level.0 + 1;
        Self { n_levels, flat_matrix: vec![None; n_segments * n_levels] }
    }

    /// Get the decision for the state, if the state is within the table and solved.
    pub fn get(&self, segment_index: usize, energy_level: EnergyLevel) -> Option<&Decision> {
        if energy_level.0 >= self.n_levels {
            return None;
        }
        self.flat_matrix.get(self.flat_index(segment_index, energy_level))?.as_ref()
    }

    pub fn get_mut(
        &mut self,
        segment_index: usize,
        energy_level: EnergyLevel,
    ) -> &mut Option<Decision> {
        let flat_index = self.flat_index(segment_index, energy_level);
        &mut self.flat_matrix[flat_index]
    }

    /// Convert the indices into the respective index in the flattened array.
    #[must_use]
    const fn flat_index(&self, segment_index: usize, energy_level: EnergyLevel) -> usize {
        segment_index * self.n_levels + energy_level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_missing() {
        let mut memo = Memo::new(2, EnergyLevel(3));
        *memo.get_mut(1, EnergyLevel(3)) =
            Some(Decision { mode: OutputsMode::Discharge, cost_to_go: Gbp::ZERO });
        assert!(memo.get(1, EnergyLevel(3)).is_some());
        assert!(memo.get(1, EnergyLevel(4)).is_none());
        assert!(memo.get(0, EnergyLevel(3)).is_none());
        assert!(memo.get(2, EnergyLevel(0)).is_none());
    }
}
