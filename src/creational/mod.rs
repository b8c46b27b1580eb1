//! Creational patterns: how objects come into existence.

pub mod abstract_factory;
pub mod builder;
pub mod prototype;
pub mod singleton;
