pub mod decay_curve;
pub mod delay_sequence;
pub mod peak_conditions;
pub mod report;
pub mod sequence_store;
pub mod sizing;
pub mod table;
pub mod table_builder;
pub mod unit_conversion;
