use thiserror::Error;

/// Problems found while resolving an input document into a project.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Zone '{name}' referenced by {referenced_by} was not provided")]
    UnknownZone { name: String, referenced_by: String },
    #[error("Surface '{name}' referenced by {referenced_by} was not provided")]
    UnknownSurface { name: String, referenced_by: String },
    #[error("Radiant enclosure '{name}' referenced by {referenced_by} does not contain any zone")]
    UnknownEnclosure { name: String, referenced_by: String },
    #[error("Air loop '{name}' referenced by {referenced_by} was not provided")]
    UnknownAirLoop { name: String, referenced_by: String },
    #[error("{kind} names must be unique, but '{name}' was given more than once")]
    DuplicateName { kind: &'static str, name: String },
    #[error("Sequence for {name} has {actual} values, expected one per timestep ({expected})")]
    SequenceLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Sizing day {day} referenced by {referenced_by} is out of range, there are {days} sizing days")]
    DayOutOfRange {
        day: usize,
        days: usize,
        referenced_by: String,
    },
    #[error("Timestep {timestep} referenced by {referenced_by} is out of range, there are {timesteps_per_day} timesteps per day")]
    TimestepOutOfRange {
        timestep: usize,
        timesteps_per_day: usize,
        referenced_by: String,
    },
    #[error("Timesteps per hour must be a divisor of 60, but was {0}")]
    InvalidTimestepsPerHour(usize),
}
