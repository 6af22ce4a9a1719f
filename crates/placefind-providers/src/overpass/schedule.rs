//! Bounded radius escalation for POI queries.

use placefind_core::RadiusSettings;

/// The sequence of radii a POI search tries, smallest first.
///
/// Radii start at `initial_m` and grow by `step_m` until the next one would
/// exceed `max_m`. A zero step yields the initial radius only, so the sequence
/// is always finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusSchedule {
    initial_m: u32,
    step_m: u32,
    max_m: u32,
}

impl RadiusSchedule {
    #[must_use]
    pub const fn new(initial_m: u32, step_m: u32, max_m: u32) -> Self {
        Self {
            initial_m,
            step_m,
            max_m,
        }
    }

    #[must_use]
    pub fn radii(&self) -> impl Iterator<Item = u32> {
        let Self {
            initial_m,
            step_m,
            max_m,
        } = *self;
        std::iter::successors((initial_m <= max_m).then_some(initial_m), move |r| {
            if step_m == 0 {
                return None;
            }
            r.checked_add(step_m).filter(|next| *next <= max_m)
        })
    }

    /// Number of requests a search issues when every radius comes back empty.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        if self.initial_m > self.max_m {
            0
        } else if self.step_m == 0 {
            1
        } else {
            (self.max_m - self.initial_m) / self.step_m + 1
        }
    }
}

impl Default for RadiusSchedule {
    fn default() -> Self {
        RadiusSettings::default().into()
    }
}

impl From<RadiusSettings> for RadiusSchedule {
    fn from(settings: RadiusSettings) -> Self {
        Self::new(settings.initial_m, settings.step_m, settings.max_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_runs_eight_to_twenty_km() {
        let radii: Vec<u32> = RadiusSchedule::default().radii().collect();
        assert_eq!(
            radii,
            vec![8_000, 10_000, 12_000, 14_000, 16_000, 18_000, 20_000]
        );
        assert_eq!(RadiusSchedule::default().attempts(), 7);
    }

    #[test]
    fn attempts_never_exceed_ceiling_bound() {
        for (initial, step, max) in [(8_000, 2_000, 20_000), (8_000, 5_000, 20_000), (1, 3, 10)] {
            let schedule = RadiusSchedule::new(initial, step, max);
            let count = u32::try_from(schedule.radii().count()).unwrap();
            let bound = (max - initial).div_ceil(step) + 1;
            assert_eq!(count, schedule.attempts());
            assert!(count <= bound, "{count} > {bound}");
        }
    }

    #[test]
    fn uneven_step_stops_before_exceeding_max() {
        let radii: Vec<u32> = RadiusSchedule::new(8_000, 5_000, 20_000).radii().collect();
        assert_eq!(radii, vec![8_000, 13_000, 18_000]);
    }

    #[test]
    fn zero_step_is_a_single_attempt() {
        let schedule = RadiusSchedule::new(500, 0, 1_000);
        assert_eq!(schedule.radii().collect::<Vec<_>>(), vec![500]);
        assert_eq!(schedule.attempts(), 1);
    }

    #[test]
    fn initial_above_max_is_empty() {
        let schedule = RadiusSchedule::new(5_000, 1_000, 1_000);
        assert_eq!(schedule.radii().count(), 0);
        assert_eq!(schedule.attempts(), 0);
    }

    #[test]
    fn overflow_terminates() {
        let schedule = RadiusSchedule::new(u32::MAX - 1, 10, u32::MAX);
        assert_eq!(schedule.radii().count(), 1);
    }
}
