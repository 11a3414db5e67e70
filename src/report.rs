use itertools::Itertools;

use crate::data::{ScheduledBlock, Workload};
use crate::slots::{BLOCK_HOURS, TimeSlot};
use crate::tasks::Task;
use crate::validation::Problem;

/// A complete weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timetable {
    /// One record per block, in task order.
    pub assignments: Vec<ScheduledBlock>,
    pub workload: Vec<Workload>,
}

/// Maps the slot chosen for every task back onto instructor and course
/// records. `slots[i]` is the slot of `tasks[i]`.
pub fn project(problem: &Problem, tasks: &[Task], slots: &[TimeSlot]) -> Timetable {
    assert_eq!(
        tasks.len(),
        slots.len(),
        "projection needs exactly one slot per task"
    );

    let assignments: Vec<ScheduledBlock> = tasks
        .iter()
        .zip(slots)
        .map(|(task, &slot)| {
            let instructor = &problem.instructors[task.instructor];
            let course = &instructor.courses[task.course];
            ScheduledBlock {
                instructor: instructor.name.clone(),
                course: course.name.clone(),
                semester: course.semester,
                weekly_hours: course.weekly_hours.hours(),
                day: slot.day(),
                slot,
            }
        })
        .collect();

    let workload = workload(&assignments);
    Timetable {
        assignments,
        workload,
    }
}

/// Blocks and hours per instructor, in the order instructors first appear.
pub fn workload(assignments: &[ScheduledBlock]) -> Vec<Workload> {
    let mut summary = Vec::new();
    let chunks = assignments.iter().chunk_by(|block| block.instructor.as_str());
    for (instructor, blocks) in &chunks {
        let blocks_assigned = blocks.count() as u32;
        summary.push(Workload {
            instructor: instructor.to_string(),
            blocks_assigned,
            total_hours: blocks_assigned * u32::from(BLOCK_HOURS),
        });
    }
    summary
}
