//! Carousel Timer System
//!
//! Repeating intervals for auto-advancing widgets.
//!
//! # Features
//!
//! - **Virtual Clock**: `advance()` moves time deterministically for tests and scripts
//! - **Wall Clock**: `tick()` advances by real elapsed time for interactive hosts
//! - **Lock-free Dispatch**: Callbacks run without the scheduler lock held, so they
//!   may cancel or start intervals
//! - **TimerAccess**: `SchedulerHandle` plugs into `carousel_core::TimerAccess`

pub mod scheduler;

pub use scheduler::{IntervalId, SchedulerHandle, TimerScheduler, MIN_PERIOD};
