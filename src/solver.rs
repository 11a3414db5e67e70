use crate::constraints::SearchState;
use crate::data::{SchedulingInput, SchedulingOutput, StatsOutput, Status};
use crate::report::{self, Timetable};
use crate::slots::TimeSlot;
use crate::tasks::{self, Task};
use crate::validation::{self, InvalidInput, Problem};
use log::{debug, info, trace};
use std::fmt;
use std::time::{Duration, Instant};

// Deadline is polled once every this many steps.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Bounds on a single search. The default is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of candidate slots to examine.
    pub max_steps: Option<u64>,
    /// Wall-clock budget for the whole search.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    StepLimit(u64),
    TimeLimit(Duration),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::StepLimit(steps) => write!(f, "step limit of {steps} reached"),
            AbortReason::TimeLimit(limit) => write!(f, "time limit of {limit:.2?} reached"),
        }
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Timetable),
    /// The whole search space was exhausted; no timetable exists.
    Infeasible,
    /// A limit was hit before the search could decide.
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub tasks: usize,
    pub steps: u64,
    pub backtracks: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

enum Exit {
    Complete,
    Exhausted,
    Aborted(AbortReason),
}

/// Validates the input and searches for a timetable.
///
/// Infeasible and aborted searches are ordinary outputs; only input that
/// breaks the contract is an error.
pub fn solve(
    input: &SchedulingInput,
    limits: &SearchLimits,
) -> Result<SchedulingOutput, InvalidInput> {
    let problem = validation::validate(input)?;
    Ok(search(&problem, limits).into())
}

/// Depth-first search over the block tasks, trying each task's candidate
/// slots in declared order and taking the first complete timetable found.
pub fn search(problem: &Problem, limits: &SearchLimits) -> SearchReport {
    let start_time = Instant::now();
    let tasks = tasks::expand(problem);
    info!(
        "Searching timetable for {} instructors, {} block tasks...",
        problem.instructors.len(),
        tasks.len()
    );

    let mut state = SearchState::new(problem.instructors.len(), tasks.len());
    let mut stats = SearchStats {
        tasks: tasks.len(),
        ..SearchStats::default()
    };
    let exit = run(&tasks, &mut state, limits, start_time, &mut stats);
    stats.elapsed = start_time.elapsed();

    let outcome = match exit {
        Exit::Complete => {
            let slots: Vec<TimeSlot> = state
                .into_assignment()
                .into_iter()
                .collect::<Option<_>>()
                .expect("a complete search assigns every task");
            info!(
                "Solution found in {:.2?} ({} steps, {} backtracks)",
                stats.elapsed, stats.steps, stats.backtracks
            );
            Outcome::Solved(report::project(problem, &tasks, &slots))
        }
        Exit::Exhausted => {
            info!(
                "No feasible timetable; search space exhausted after {} steps in {:.2?}",
                stats.steps, stats.elapsed
            );
            Outcome::Infeasible
        }
        Exit::Aborted(reason) => {
            info!("Search aborted: {reason} after {:.2?}", stats.elapsed);
            Outcome::Aborted(reason)
        }
    };

    SearchReport { outcome, stats }
}

// cursors[d] is the position of the next candidate to try for task d
fn run(
    tasks: &[Task],
    state: &mut SearchState,
    limits: &SearchLimits,
    start_time: Instant,
    stats: &mut SearchStats,
) -> Exit {
    let mut cursors = vec![0usize; tasks.len()];
    let mut depth = 0;

    loop {
        if depth == tasks.len() {
            return Exit::Complete;
        }

        let task = &tasks[depth];
        let mut placed = false;
        while cursors[depth] < task.candidates.len() {
            if let Some(reason) = limit_reached(limits, stats.steps, start_time) {
                return Exit::Aborted(reason);
            }
            let slot = task.candidates[cursors[depth]];
            cursors[depth] += 1;
            stats.steps += 1;

            match state.check(task, slot) {
                Ok(()) => {
                    state.commit(depth, task, slot);
                    trace!("task {depth}: committed {slot}");
                    placed = true;
                    break;
                }
                Err(violation) => trace!("task {depth}: {slot} rejected, {violation}"),
            }
        }

        if placed {
            depth += 1;
            continue;
        }

        cursors[depth] = 0;
        if depth == 0 {
            return Exit::Exhausted;
        }
        depth -= 1;
        stats.backtracks += 1;
        if let Some(slot) = state.revert(depth, &tasks[depth]) {
            debug!("backtrack to task {depth}: released {slot}");
        }
    }
}

fn limit_reached(limits: &SearchLimits, steps: u64, start_time: Instant) -> Option<AbortReason> {
    if let Some(max_steps) = limits.max_steps {
        if steps >= max_steps {
            return Some(AbortReason::StepLimit(max_steps));
        }
    }
    if let Some(limit) = limits.time_limit {
        if steps % DEADLINE_CHECK_INTERVAL == 0 && start_time.elapsed() >= limit {
            return Some(AbortReason::TimeLimit(limit));
        }
    }
    None
}

impl From<SearchReport> for SchedulingOutput {
    fn from(report: SearchReport) -> Self {
        let stats = StatsOutput {
            tasks: report.stats.tasks,
            steps: report.stats.steps,
            backtracks: report.stats.backtracks,
            elapsed_ms: report.stats.elapsed.as_millis() as u64,
        };
        match report.outcome {
            Outcome::Solved(timetable) => SchedulingOutput {
                status: Status::Solved,
                assignments: timetable.assignments,
                workload: timetable.workload,
                abort_reason: None,
                stats,
            },
            Outcome::Infeasible => SchedulingOutput {
                status: Status::Infeasible,
                assignments: Vec::new(),
                workload: Vec::new(),
                abort_reason: None,
                stats,
            },
            Outcome::Aborted(reason) => SchedulingOutput {
                status: Status::Aborted,
                assignments: Vec::new(),
                workload: Vec::new(),
                abort_reason: Some(reason.to_string()),
                stats,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{CourseSpec, InstructorSpec, WeeklyHours};

    fn slots(ids: &[&str]) -> Vec<TimeSlot> {
        ids.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn course(name: &str, semester: u8, hours: i64) -> CourseSpec {
        CourseSpec {
            name: name.to_string(),
            semester,
            weekly_hours: WeeklyHours::new(hours).unwrap(),
        }
    }

    fn instructor(name: &str, available: &[&str], courses: Vec<CourseSpec>) -> InstructorSpec {
        InstructorSpec {
            name: name.to_string(),
            available_slots: slots(available),
            courses,
        }
    }

    fn solved(report: SearchReport) -> Timetable {
        match report.outcome {
            Outcome::Solved(timetable) => timetable,
            other => panic!("expected a timetable, got {other:?}"),
        }
    }

    #[test]
    fn empty_problem_is_trivially_solved() {
        let report = search(&Problem::default(), &SearchLimits::unbounded());
        assert_eq!(report.outcome, Outcome::Solved(Timetable::default()));
        assert_eq!(report.stats.steps, 0);
    }

    #[test]
    fn takes_first_declared_slot_when_nothing_conflicts() {
        let problem = Problem {
            instructors: vec![instructor(
                "Ana",
                &["Miércoles 13-15", "Lunes 7-9"],
                vec![course("Cálculo", 1, 2)],
            )],
        };
        let timetable = solved(search(&problem, &SearchLimits::unbounded()));
        assert_eq!(timetable.assignments[0].slot, slots(&["Miércoles 13-15"])[0]);
    }

    #[test]
    fn backtracks_out_of_an_early_greedy_choice() {
        // Ana grabs Lunes 7-9 first; Luis (same semester) can only use it,
        // so Ana has to move to her second slot.
        let problem = Problem {
            instructors: vec![
                instructor("Ana", &["Lunes 7-9", "Lunes 9-11"], vec![course("Cálculo", 1, 2)]),
                instructor("Luis", &["Lunes 7-9"], vec![course("Física", 1, 2)]),
            ],
        };
        let report = search(&problem, &SearchLimits::unbounded());
        assert_eq!(report.stats.backtracks, 1);
        let timetable = solved(report);
        let chosen: Vec<String> = timetable
            .assignments
            .iter()
            .map(|b| b.slot.to_string())
            .collect();
        assert_eq!(chosen, vec!["Lunes 9-11", "Lunes 7-9"]);
    }

    #[test]
    fn exhausted_search_is_infeasible() {
        let problem = Problem {
            instructors: vec![instructor("Ana", &["Lunes 7-9"], vec![course("Cálculo", 1, 4)])],
        };
        let report = search(&problem, &SearchLimits::unbounded());
        assert_eq!(report.outcome, Outcome::Infeasible);
    }

    #[test]
    fn step_limit_aborts_instead_of_reporting_infeasible() {
        let problem = Problem {
            instructors: vec![instructor(
                "Ana",
                &["Lunes 7-9", "Lunes 9-11", "Martes 7-9"],
                vec![course("Cálculo", 1, 6), course("Física", 2, 6)],
            )],
        };
        let report = search(&problem, &SearchLimits::unbounded().with_max_steps(5));
        assert_eq!(report.outcome, Outcome::Aborted(AbortReason::StepLimit(5)));
        assert_eq!(report.stats.steps, 5);

        let report = search(&problem, &SearchLimits::unbounded());
        assert_eq!(report.outcome, Outcome::Infeasible);
    }

    #[test]
    fn zero_time_limit_aborts_on_first_step() {
        let problem = Problem {
            instructors: vec![instructor("Ana", &["Lunes 7-9"], vec![course("Cálculo", 1, 2)])],
        };
        let report = search(&problem, &SearchLimits::unbounded().with_time_limit(Duration::ZERO));
        assert_eq!(
            report.outcome,
            Outcome::Aborted(AbortReason::TimeLimit(Duration::ZERO))
        );
    }

    #[test]
    fn output_status_follows_outcome() {
        let problem = Problem {
            instructors: vec![instructor("Ana", &["Lunes 11-13"], vec![course("Cálculo", 1, 2)])],
        };
        let output: SchedulingOutput = search(&problem, &SearchLimits::unbounded()).into();
        assert_eq!(output.status, Status::Infeasible);
        assert!(output.assignments.is_empty());
        assert!(output.abort_reason.is_none());

        let problem = Problem {
            instructors: vec![instructor("Ana", &["Lunes 7-9"], vec![course("Cálculo", 1, 2)])],
        };
        let output: SchedulingOutput =
            search(&problem, &SearchLimits::unbounded().with_max_steps(0)).into();
        assert_eq!(output.status, Status::Aborted);
        assert_eq!(output.abort_reason.as_deref(), Some("step limit of 0 reached"));
    }
}
