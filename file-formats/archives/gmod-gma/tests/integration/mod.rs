//! Feature integration tests

mod browse;
mod extract_round_trip;
mod open;
