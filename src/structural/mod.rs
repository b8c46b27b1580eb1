//! Structural patterns: how objects are composed and wrapped.

pub mod adapter;
pub mod decorator;
pub mod facade;
