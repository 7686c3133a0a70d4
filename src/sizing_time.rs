use crate::core::units::{HOURS_PER_DAY, MINUTES_PER_HOUR};
use serde::Deserialize;

/// Whether a sizing day came from a design day definition or a weather-file sizing period.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum SizingDayKind {
    #[default]
    DesignDay,
    WeatherFilePeriod,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SizingDay {
    pub name: String,
    pub month: u32,
    pub day_of_month: u32,
    #[serde(default)]
    pub kind: SizingDayKind,
}

/// The time frame of the sizing calculation: every sizing day is simulated as a 24 hour
/// period of `timesteps_per_hour * 24` zone timesteps.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizingTime {
    timesteps_per_hour: usize,
    days: Vec<SizingDay>,
}

impl SizingTime {
    pub fn new(timesteps_per_hour: usize, days: Vec<SizingDay>) -> Self {
        Self {
            timesteps_per_hour,
            days,
        }
    }

    pub fn timesteps_per_hour(&self) -> usize {
        self.timesteps_per_hour
    }

    pub fn timesteps_per_day(&self) -> usize {
        self.timesteps_per_hour * HOURS_PER_DAY as usize
    }

    pub fn minutes_per_timestep(&self) -> usize {
        MINUTES_PER_HOUR as usize / self.timesteps_per_hour
    }

    pub fn number_of_days(&self) -> usize {
        self.days.len()
    }

    pub fn day(&self, day: usize) -> Option<&SizingDay> {
        self.days.get(day)
    }

    pub fn days(&self) -> &[SizingDay] {
        &self.days
    }

    /// Clock time at the end of the given timestep of the day, as HH:MM:SS.
    /// A timestep that ends on the hour is reported as the following hour.
    pub fn time_text(&self, timestep: usize) -> String {
        let hour = timestep / self.timesteps_per_hour;
        let minutes = (timestep % self.timesteps_per_hour + 1) * self.minutes_per_timestep();
        if minutes == MINUTES_PER_HOUR as usize {
            format!("{:02}:00:00", hour + 1)
        } else {
            format!("{hour:02}:{minutes:02}:00")
        }
    }

    /// Date and time of a timestep on a sizing day, as M/D HH:MM:SS
    pub fn peak_date_time(&self, day: usize, timestep: usize) -> String {
        match self.day(day) {
            Some(sizing_day) => format!(
                "{}/{} {}",
                sizing_day.month,
                sizing_day.day_of_month,
                self.time_text(timestep)
            ),
            None => self.time_text(timestep),
        }
    }
}
