use crate::{
    core::{battery::Battery, outputs_mode::OutputsMode, time_segment::TimeSegment},
    quantity::energy::Kwh,
};

impl Battery {
    /// Simulate the segment in its assigned mode, starting at its start battery charge.
    ///
    /// Updates the end battery charge, the grid usage and the wasted solar generation.
    pub fn simulate(&self, segment: &mut TimeSegment) {
        let start = segment.start_battery_charge;
        let solar = segment.expected_solar_generation;
        let load = segment.expected_consumption;

        let (end, grid_usage, wasted_solar) = match segment.mode {
            OutputsMode::ChargeSolarOnly => {
                let transfer = self.transfer(start, solar);
                (transfer.charge, load, transfer.overflow)
            }

            OutputsMode::ChargeFromGridAndSolar => {
                let grid_rate = self.grid_charge_per_segment;
                let transfer = self.transfer(start, solar + grid_rate);
                if transfer.overflow > Kwh::ZERO {
                    // Solar fills up to a half of the remaining room first, the grid tops up the rest:
                    let room = (self.capacity - start).max(Kwh::ZERO);
                    let solar_first = solar.min(room / 2.0);
                    let grid_used = (room - solar_first).min(grid_rate);
                    let solar_used = room - grid_used;
                    (transfer.charge, grid_used + load, (solar - solar_used).max(Kwh::ZERO))
                } else {
                    // The entire scheduled grid charge is drawn:
                    (transfer.charge, grid_rate + load, Kwh::ZERO)
                }
            }

            OutputsMode::Discharge => {
                // Positive is excess, negative is deficit:
                let surplus = solar - load;
                if surplus.is_negative() {
                    let deficit = -surplus;
                    let discharge = start.min(deficit);
                    (start - discharge, deficit - discharge, Kwh::ZERO)
                } else {
                    let transfer = self.transfer(start, surplus);
                    (transfer.charge, Kwh::ZERO, transfer.overflow)
                }
            }
        };

        segment.set_end_battery_charge(end);
        segment.actual_grid_usage = grid_usage;
        segment.wasted_solar_generation = wasted_solar;
    }

    /// Simulate the segments in order, carrying the battery charge forward.
    ///
    /// The first segment's start charge is the initial charge.
    pub fn simulate_all(&self, segments: &mut [TimeSegment]) {
        let Some(first) = segments.first() else {
            return;
        };
        let mut charge = first.start_battery_charge;
        for segment in segments {
            segment.start_battery_charge = charge;
            self.simulate(segment);
            charge = segment.end_battery_charge();
        }
    }
}
