//! # Design Patterns Catalog
//!
//! Runnable versions of the classic object-oriented patterns, written the way
//! they come out naturally in Rust.
//!
//! ## Creational
//! - Builder (director-driven, resettable builder)
//! - Abstract Factory (trait objects, runtime factory choice)
//! - Prototype (boxed clones, shared registry)
//! - Singleton (double-checked lazy initialization)
//!
//! ## Structural
//! - Adapter
//! - Decorator
//! - Facade
//!
//! ## Behavioral
//! - Chain of Responsibility (arena of handlers, index links)
//!
//! Run the demos with:
//! ```bash
//! cargo run --bin chain_of_responsibility
//! cargo run --bin singleton
//! cargo run --bin catalog -- builder facade
//! ```
//!
//! Set `PATTERNS_CONFIG=path/to/patterns.toml` to change the chain's handlers
//! and requests or the singleton race seeds.

pub mod behavioral;
pub mod catalog;
pub mod config;
pub mod creational;
pub mod error;
pub mod logging;
pub mod structural;

pub use behavioral::chain::{Handler, HandlerChain, HandlerId, TokenHandler};
pub use config::PatternsConfig;
pub use creational::singleton::{LazySingleton, Singleton};
pub use error::{PatternError, Result};
