//! camgrid
//!
//! Responsive live camera grid: picks the grid shape that shows every feed
//! as large as possible, asks each feed for the smallest resolution that
//! covers its on-screen box, and drives full-screen selection and automatic
//! scanning through feeds.
//!
//! The library is a pure core (`model`, `layout`, `state`) plus an impure
//! terminal shell (`view`, `logging`, `config`).

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod state;
pub mod view;

// Re-export main loop integration
pub mod integration;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
