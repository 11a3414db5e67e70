use std::sync::Arc;

use log::{debug, warn};

use crate::slots::TimeSlot;
use crate::validation::Problem;

/// One two-hour block of one course, the unit the search assigns.
#[derive(Debug, Clone)]
pub struct Task {
    pub instructor: usize,
    pub course: usize,
    pub block: usize,
    pub semester: u8,
    /// Instructor's usable slots in declared order, shared by all of their tasks.
    pub candidates: Arc<[TimeSlot]>,
}

/// Expands every (instructor, course) pair into its blocks.
///
/// Tasks come out in instructor order, then course order, then block index.
/// The search relies on this order for reproducible results.
pub fn expand(problem: &Problem) -> Vec<Task> {
    let mut tasks = Vec::new();

    for (instructor_idx, instructor) in problem.instructors.iter().enumerate() {
        let candidates: Arc<[TimeSlot]> = instructor
            .available_slots
            .iter()
            .copied()
            .filter(|slot| !slot.is_lunch())
            .collect();

        if candidates.is_empty() && !instructor.courses.is_empty() {
            warn!(
                "Instructor '{}' has no usable slots outside lunch; the timetable cannot be feasible.",
                instructor.name
            );
        }

        for (course_idx, course) in instructor.courses.iter().enumerate() {
            for block in 0..course.weekly_hours.blocks() {
                tasks.push(Task {
                    instructor: instructor_idx,
                    course: course_idx,
                    block,
                    semester: course.semester,
                    candidates: Arc::clone(&candidates),
                });
            }
        }
    }

    debug!(
        "Expanded {} instructors into {} block tasks.",
        problem.instructors.len(),
        tasks.len()
    );
    tasks
}
