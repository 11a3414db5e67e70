use serde::{Deserialize, Serialize};
use std::fmt;

use crate::slots::{Day, TimeSlot};

/// A course as supplied by the data-entry layer, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub name: String,
    pub semester: i64,
    pub weekly_hours: i64,
}

/// An instructor with their declared availability and the courses they teach.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorInput {
    pub name: String,
    #[serde(default)]
    pub available_slots: Vec<String>,
    #[serde(default)]
    pub courses: Vec<CourseInput>,
}

/// The complete input for one timetable computation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub instructors: Vec<InstructorInput>,
}

/// One two-hour block of a course placed in the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBlock {
    pub instructor: String,
    pub course: String,
    pub semester: u8,
    pub weekly_hours: u8,
    pub day: Day,
    pub slot: TimeSlot,
}

impl fmt::Display for ScheduledBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} (semester {}) | {}",
            self.slot, self.course, self.semester, self.instructor
        )
    }
}

/// Weekly teaching load of one instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    pub instructor: String,
    pub blocks_assigned: u32,
    pub total_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Solved,
    Infeasible,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub tasks: usize,
    pub steps: u64,
    pub backtracks: u64,
    pub elapsed_ms: u64,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    pub status: Status,
    pub assignments: Vec<ScheduledBlock>,
    pub workload: Vec<Workload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
    pub stats: StatsOutput,
}
