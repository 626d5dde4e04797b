//! Inclusive step range selection

use crate::error::{RunnerError, RunnerResult};

/// Inclusive range of steps to run, stored as zero-based indexes.
///
/// Built from 1-based user input; `to_step = None` means the last step.
/// An end past the last step is accepted and simply selects nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRange {
    from_index: usize,
    to_index: usize,
}

impl StepRange {
    /// Range over `total` steps from 1-based `from_step` to `to_step`
    pub fn new(from_step: usize, to_step: Option<usize>, total: usize) -> RunnerResult<Self> {
        let to_step = to_step.unwrap_or(total.max(1));
        if from_step == 0 || from_step > to_step {
            return Err(RunnerError::InvalidStepRange {
                from: from_step,
                to: to_step,
            });
        }
        Ok(Self {
            from_index: from_step - 1,
            to_index: to_step - 1,
        })
    }

    /// Every step of a `total`-step run
    pub fn all(total: usize) -> Self {
        Self {
            from_index: 0,
            to_index: total.saturating_sub(1),
        }
    }

    pub fn from_index(&self) -> usize {
        self.from_index
    }

    pub fn to_index(&self) -> usize {
        self.to_index
    }

    /// Whether the zero-based `index` is selected
    pub fn contains(&self, index: usize) -> bool {
        (self.from_index..=self.to_index).contains(&index)
    }

    /// Selected steps as `(1-based position, step)` in order
    pub fn select<'a>(&self, order: &'a [String]) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let range = *self;
        order
            .iter()
            .enumerate()
            .filter(move |(i, _)| range.contains(*i))
            .map(|(i, step)| (i + 1, step.as_str()))
    }
}
