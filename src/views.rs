//! View-model lifecycle, binding runtime and route host.

pub use appshell_views::*;
