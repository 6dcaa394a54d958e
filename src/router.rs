//! URL-hash routing.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "router")]
//! use appshell::router::codec::HashCodec;
//! # #[cfg(feature = "router")]
//! assert_eq!(HashCodec::new().decode("#/a/../b").path, "/b");
//! ```

pub use appshell_router::*;
