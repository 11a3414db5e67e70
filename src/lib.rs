//! Weekly timetable assignment by chronological backtracking.
//!
//! Instructors declare the slots they can teach in and the courses they
//! teach; every course needs one two-hour block per two weekly hours. The
//! search places every block so that no hard constraint is broken, or
//! reports that no such timetable exists.

pub mod cli;
pub mod constraints;
pub mod data;
pub mod report;
pub mod server;
pub mod slots;
pub mod solver;
pub mod tasks;
pub mod validation;

pub use data::{SchedulingInput, SchedulingOutput};
pub use solver::{Outcome, SearchLimits, SearchReport, search, solve};
pub use validation::{InvalidInput, Problem, validate};
