//! Terminal arcade core: game modules reached only through their exported
//! operation table, a memoizing module registry, and the session controller
//! that drives a loaded module frame by frame.

pub mod cell;
pub mod config;
pub mod error;
pub mod games;
pub mod module;
pub mod scores;
pub mod session;
