//! Scheduler, reactive primitives, commands, notification bus and settings.
//!
//! # Examples
//!
//! ```
//! use appshell::core::reactive::Property;
//!
//! let count = Property::new(1);
//! count.set(2);
//! assert_eq!(count.get(), 2);
//! ```

pub use appshell_core::*;
