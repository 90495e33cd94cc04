use std::fmt::{Debug, Display, Formatter};

use crate::prelude::*;

/// Number of half-hour segments in a planning day.
pub const N_SEGMENTS: usize = 48;

/// One of the 48 fixed half-hour slots covering 00:00–24:00.
#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct HalfHourSegment(usize);

impl HalfHourSegment {
    /// Iterate all the segments of a day in order.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..N_SEGMENTS).map(Self)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// Start hour and minute.
    pub const fn start(self) -> (u32, u32) {
        Self::hour_minute(self.0)
    }

    /// End hour and minute, the last segment ends at `(24, 0)`.
    pub const fn end(self) -> (u32, u32) {
        Self::hour_minute(self.0 + 1)
    }

    #[expect(clippy::cast_possible_truncation)]
    const fn hour_minute(index: usize) -> (u32, u32) {
        ((index / 2) as u32, (index % 2) as u32 * 30)
    }
}

impl TryFrom<usize> for HalfHourSegment {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        ensure!(index < N_SEGMENTS, "segment index {index} is out of range");
        Ok(Self(index))
    }
}

impl Display for HalfHourSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (start_hour, start_minute) = self.start();
        let (end_hour, end_minute) = self.end();
        write!(f, "{start_hour:02}:{start_minute:02}-{end_hour:02}:{end_minute:02}")
    }
}

impl Debug for HalfHourSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
