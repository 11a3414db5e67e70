//! Hard constraints and the incremental search state they are checked against.
//!
//! Every index here is updated by [`SearchState::commit`] and restored by
//! [`SearchState::revert`]; a revert that follows its commit leaves the state
//! exactly as it was.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::slots::{Day, TimeSlot};
use crate::tasks::Task;

/// Blocks one instructor may teach per week (40 hours).
pub const MAX_BLOCKS_PER_INSTRUCTOR: u32 = 20;

/// Distinct courses one instructor may teach on the same day.
pub const MAX_COURSES_PER_DAY: u32 = 2;

/// The first constraint a candidate slot failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Lunch,
    WeeklyCapacity,
    InstructorSlotTaken,
    DailyCourseLimit,
    SemesterClash,
    InstructorDoubleBooked,
    CourseSlotReused,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Violation::Lunch => "slot overlaps lunch",
            Violation::WeeklyCapacity => "instructor weekly capacity reached",
            Violation::InstructorSlotTaken => "instructor already uses this slot",
            Violation::DailyCourseLimit => "instructor already teaches two courses that day",
            Violation::SemesterClash => "another course of the same semester uses this slot",
            Violation::InstructorDoubleBooked => "instructor is booked in this slot",
            Violation::CourseSlotReused => "course already has a block in this slot",
        };
        f.write_str(text)
    }
}

type CourseKey = (usize, usize);

/// Mutable bookkeeping owned by one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    assignment: Vec<Option<TimeSlot>>,
    used_slots: Vec<HashSet<TimeSlot>>,
    blocks: Vec<u32>,
    // distinct courses per (instructor, day)
    day_courses: HashMap<(usize, Day), u32>,
    // blocks per (instructor, course, day), so the distinct count can be undone
    course_day_blocks: HashMap<(usize, usize, Day), u32>,
    semester_slots: HashMap<(u8, TimeSlot), CourseKey>,
    instructor_slots: HashMap<(usize, TimeSlot), usize>,
    course_slots: HashMap<CourseKey, HashSet<TimeSlot>>,
}

impl SearchState {
    pub fn new(instructor_count: usize, task_count: usize) -> Self {
        Self {
            assignment: vec![None; task_count],
            used_slots: vec![HashSet::new(); instructor_count],
            blocks: vec![0; instructor_count],
            day_courses: HashMap::new(),
            course_day_blocks: HashMap::new(),
            semester_slots: HashMap::new(),
            instructor_slots: HashMap::new(),
            course_slots: HashMap::new(),
        }
    }

    /// Checks whether `slot` may be given to `task` right now.
    pub fn check(&self, task: &Task, slot: TimeSlot) -> Result<(), Violation> {
        let instructor = task.instructor;
        let course: CourseKey = (task.instructor, task.course);
        let day = slot.day();

        if slot.is_lunch() {
            return Err(Violation::Lunch);
        }
        if self.blocks[instructor] >= MAX_BLOCKS_PER_INSTRUCTOR {
            return Err(Violation::WeeklyCapacity);
        }
        if self.used_slots[instructor].contains(&slot) {
            return Err(Violation::InstructorSlotTaken);
        }
        let course_already_that_day = self
            .course_day_blocks
            .contains_key(&(instructor, task.course, day));
        let courses_that_day = self.day_courses.get(&(instructor, day)).copied().unwrap_or(0);
        if !course_already_that_day && courses_that_day >= MAX_COURSES_PER_DAY {
            return Err(Violation::DailyCourseLimit);
        }
        if let Some(&occupant) = self.semester_slots.get(&(task.semester, slot)) {
            if occupant != course {
                return Err(Violation::SemesterClash);
            }
        }
        if self.instructor_slots.contains_key(&(instructor, slot)) {
            return Err(Violation::InstructorDoubleBooked);
        }
        if self
            .course_slots
            .get(&course)
            .is_some_and(|used| used.contains(&slot))
        {
            return Err(Violation::CourseSlotReused);
        }
        Ok(())
    }

    pub fn admits(&self, task: &Task, slot: TimeSlot) -> bool {
        self.check(task, slot).is_ok()
    }

    /// Records `slot` as the assignment of task `index`.
    pub fn commit(&mut self, index: usize, task: &Task, slot: TimeSlot) {
        debug_assert!(self.assignment[index].is_none(), "task {index} committed twice");
        let instructor = task.instructor;
        let course: CourseKey = (task.instructor, task.course);
        let day = slot.day();

        self.assignment[index] = Some(slot);
        self.used_slots[instructor].insert(slot);
        self.blocks[instructor] += 1;

        let course_blocks = self
            .course_day_blocks
            .entry((instructor, task.course, day))
            .or_insert(0);
        *course_blocks += 1;
        if *course_blocks == 1 {
            *self.day_courses.entry((instructor, day)).or_insert(0) += 1;
        }

        self.semester_slots.insert((task.semester, slot), course);
        self.instructor_slots.insert((instructor, slot), index);
        self.course_slots.entry(course).or_default().insert(slot);
    }

    /// Undoes the commit of task `index`, returning the slot it held.
    pub fn revert(&mut self, index: usize, task: &Task) -> Option<TimeSlot> {
        let slot = self.assignment[index].take()?;
        let instructor = task.instructor;
        let course: CourseKey = (task.instructor, task.course);
        let day = slot.day();

        self.used_slots[instructor].remove(&slot);
        self.blocks[instructor] -= 1;

        let key = (instructor, task.course, day);
        if let Some(course_blocks) = self.course_day_blocks.get_mut(&key) {
            *course_blocks -= 1;
            if *course_blocks == 0 {
                self.course_day_blocks.remove(&key);
                if let Some(count) = self.day_courses.get_mut(&(instructor, day)) {
                    *count -= 1;
                    if *count == 0 {
                        self.day_courses.remove(&(instructor, day));
                    }
                }
            }
        }

        self.semester_slots.remove(&(task.semester, slot));
        self.instructor_slots.remove(&(instructor, slot));
        if let Some(used) = self.course_slots.get_mut(&course) {
            used.remove(&slot);
            if used.is_empty() {
                self.course_slots.remove(&course);
            }
        }
        Some(slot)
    }

    pub fn assignment(&self) -> &[Option<TimeSlot>] {
        &self.assignment
    }

    pub fn into_assignment(self) -> Vec<Option<TimeSlot>> {
        self.assignment
    }

    pub fn blocks_of(&self, instructor: usize) -> u32 {
        self.blocks[instructor]
    }
}
