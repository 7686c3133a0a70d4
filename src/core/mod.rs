pub mod building;
pub mod load_components;
pub mod moving_average;
pub mod psychrometrics;
pub mod units;
