//! Behavioral patterns: how objects pass work between each other.

pub mod chain;
