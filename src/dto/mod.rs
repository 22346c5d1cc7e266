pub mod coerce;
pub mod products;
