//! Precondition checks on the raw input.
//!
//! Turns a [`SchedulingInput`] into a [`Problem`] the engine can trust, or
//! reports every violated field at once. Nothing here decides feasibility;
//! an instructor with no usable slots is valid input.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::data::SchedulingInput;
use crate::slots::{BLOCK_HOURS, SlotParseError, TimeSlot};

pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 12;

/// Weekly contact hours a course may require.
pub const ALLOWED_WEEKLY_HOURS: [u8; 4] = [1, 2, 4, 6];

/// A weekly contact-hour load from [`ALLOWED_WEEKLY_HOURS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeeklyHours(u8);

impl WeeklyHours {
    pub fn new(hours: i64) -> Option<Self> {
        ALLOWED_WEEKLY_HOURS
            .into_iter()
            .find(|&allowed| i64::from(allowed) == hours)
            .map(WeeklyHours)
    }

    pub fn hours(self) -> u8 {
        self.0
    }

    /// Two-hour blocks needed to cover the load; odd loads round up.
    pub fn blocks(self) -> usize {
        usize::from(self.0.div_ceil(BLOCK_HOURS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSpec {
    pub name: String,
    pub semester: u8,
    pub weekly_hours: WeeklyHours,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorSpec {
    pub name: String,
    pub available_slots: Vec<TimeSlot>,
    pub courses: Vec<CourseSpec>,
}

/// Validated engine input. Order of instructors, courses and slots is kept
/// exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Problem {
    pub instructors: Vec<InstructorSpec>,
}

/// One violated field of the input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("instructor #{index}: name must not be empty")]
    EmptyInstructorName { index: usize },

    #[error("instructor '{0}' is listed more than once")]
    DuplicateInstructor(String),

    #[error("instructor '{instructor}', course #{index}: name must not be empty")]
    EmptyCourseName { instructor: String, index: usize },

    #[error("instructor '{instructor}': course '{course}' is listed more than once")]
    DuplicateCourse { instructor: String, course: String },

    #[error(
        "instructor '{instructor}', course '{course}': semester {semester} is outside {min}-{max}",
        min = MIN_SEMESTER,
        max = MAX_SEMESTER
    )]
    SemesterOutOfRange {
        instructor: String,
        course: String,
        semester: i64,
    },

    #[error(
        "instructor '{instructor}', course '{course}': weekly hours {hours} not in {allowed:?}",
        allowed = ALLOWED_WEEKLY_HOURS
    )]
    WeeklyHoursNotAllowed {
        instructor: String,
        course: String,
        hours: i64,
    },

    #[error("instructor '{instructor}': slot '{slot}': {reason}")]
    MalformedSlot {
        instructor: String,
        slot: String,
        reason: SlotParseError,
    },
}

/// All reasons an input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct InvalidInput(pub Vec<InputError>);

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input ({} problem(s))", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl InvalidInput {
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

/// Validates the raw input, collecting every violation rather than stopping
/// at the first one.
pub fn validate(input: &SchedulingInput) -> Result<Problem, InvalidInput> {
    let mut errors = Vec::new();
    let mut instructors = Vec::with_capacity(input.instructors.len());
    let mut seen_instructors = HashSet::new();

    for (index, raw) in input.instructors.iter().enumerate() {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            errors.push(InputError::EmptyInstructorName { index });
        } else if !seen_instructors.insert(name.clone()) {
            errors.push(InputError::DuplicateInstructor(name.clone()));
        }

        let mut available_slots = Vec::with_capacity(raw.available_slots.len());
        for slot in &raw.available_slots {
            match slot.parse::<TimeSlot>() {
                Ok(parsed) => available_slots.push(parsed),
                Err(reason) => errors.push(InputError::MalformedSlot {
                    instructor: name.clone(),
                    slot: slot.clone(),
                    reason,
                }),
            }
        }

        let mut courses = Vec::with_capacity(raw.courses.len());
        let mut seen_courses = HashSet::new();
        for (course_index, course) in raw.courses.iter().enumerate() {
            let course_name = course.name.trim().to_string();
            if course_name.is_empty() {
                errors.push(InputError::EmptyCourseName {
                    instructor: name.clone(),
                    index: course_index,
                });
            } else if !seen_courses.insert(course_name.clone()) {
                errors.push(InputError::DuplicateCourse {
                    instructor: name.clone(),
                    course: course_name.clone(),
                });
            }

            let semester = u8::try_from(course.semester)
                .ok()
                .filter(|s| (MIN_SEMESTER..=MAX_SEMESTER).contains(s));
            if semester.is_none() {
                errors.push(InputError::SemesterOutOfRange {
                    instructor: name.clone(),
                    course: course_name.clone(),
                    semester: course.semester,
                });
            }

            let weekly_hours = WeeklyHours::new(course.weekly_hours);
            if weekly_hours.is_none() {
                errors.push(InputError::WeeklyHoursNotAllowed {
                    instructor: name.clone(),
                    course: course_name.clone(),
                    hours: course.weekly_hours,
                });
            }

            if let (Some(semester), Some(weekly_hours)) = (semester, weekly_hours) {
                courses.push(CourseSpec {
                    name: course_name,
                    semester,
                    weekly_hours,
                });
            }
        }

        instructors.push(InstructorSpec {
            name,
            available_slots,
            courses,
        });
    }

    if errors.is_empty() {
        Ok(Problem { instructors })
    } else {
        Err(InvalidInput(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CourseInput, InstructorInput};

    fn course(name: &str, semester: i64, weekly_hours: i64) -> CourseInput {
        CourseInput {
            name: name.to_string(),
            semester,
            weekly_hours,
        }
    }

    fn instructor(name: &str, slots: &[&str], courses: Vec<CourseInput>) -> InstructorInput {
        InstructorInput {
            name: name.to_string(),
            available_slots: slots.iter().map(|s| s.to_string()).collect(),
            courses,
        }
    }

    #[test]
    fn blocks_round_odd_hours_up() {
        let blocks: Vec<usize> = ALLOWED_WEEKLY_HOURS
            .iter()
            .map(|&h| WeeklyHours::new(i64::from(h)).unwrap().blocks())
            .collect();
        assert_eq!(blocks, vec![1, 1, 2, 3]);
    }

    #[test]
    fn accepts_well_formed_input_and_keeps_order() {
        let input = SchedulingInput {
            instructors: vec![
                instructor(
                    "Ana",
                    &["Martes 9-11", "Lunes 7-9", "Lunes 11-13"],
                    vec![course("Cálculo", 1, 4), course("Física", 2, 1)],
                ),
                instructor("Luis", &[], vec![]),
            ],
        };
        let problem = validate(&input).unwrap();
        assert_eq!(problem.instructors.len(), 2);
        let ana = &problem.instructors[0];
        let slots: Vec<String> = ana.available_slots.iter().map(|s| s.to_string()).collect();
        assert_eq!(slots, vec!["Martes 9-11", "Lunes 7-9", "Lunes 11-13"]);
        assert_eq!(ana.courses[0].name, "Cálculo");
        assert_eq!(ana.courses[1].weekly_hours.hours(), 1);
    }

    #[test]
    fn reports_every_violation() {
        let input = SchedulingInput {
            instructors: vec![
                instructor(
                    "Ana",
                    &["Lunes 7-9", "Domingo 7-9", "Lunes 8-10"],
                    vec![
                        course("", 1, 2),
                        course("Álgebra", 13, 2),
                        course("Geometría", 3, 3),
                        course("Álgebra", 0, 2),
                    ],
                ),
                instructor("  ", &[], vec![]),
                instructor("Ana", &[], vec![]),
            ],
        };
        let errors = validate(&input).unwrap_err().0;
        assert_eq!(errors.len(), 9, "{errors:#?}");
        assert!(errors.contains(&InputError::EmptyInstructorName { index: 1 }));
        assert!(errors.contains(&InputError::DuplicateInstructor("Ana".to_string())));
        assert!(errors.contains(&InputError::WeeklyHoursNotAllowed {
            instructor: "Ana".to_string(),
            course: "Geometría".to_string(),
            hours: 3,
        }));
        assert!(errors.contains(&InputError::DuplicateCourse {
            instructor: "Ana".to_string(),
            course: "Álgebra".to_string(),
        }));
        assert!(errors.contains(&InputError::SemesterOutOfRange {
            instructor: "Ana".to_string(),
            course: "Álgebra".to_string(),
            semester: 13,
        }));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, InputError::MalformedSlot { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn error_messages_name_the_field() {
        let input = SchedulingInput {
            instructors: vec![instructor("Ana", &["Lunes 7-10"], vec![course("Química", 1, 5)])],
        };
        let messages = validate(&input).unwrap_err().messages();
        assert_eq!(
            messages,
            vec![
                "instructor 'Ana': slot 'Lunes 7-10': 7-10 is not one of the catalog periods",
                "instructor 'Ana', course 'Química': weekly hours 5 not in [1, 2, 4, 6]",
            ]
        );
    }
}
