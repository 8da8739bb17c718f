use crate::runtime::{Error, Result};

/// Finite sequence of intermediate joint angles in degrees.
///
/// Angles are computed on demand, so the sequence holds no buffer no matter
/// how many steps the motion spans. The sequence is drained once and cannot
/// be restarted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepSequence {
    origin: f64,
    direction: f64,
    step: f64,
    taken: usize,
    steps: usize,
}

impl StepSequence {
    /// Plan the motion from `current` to `target` at a constant step.
    ///
    /// The sequence holds `floor(|target - current| / step)` angles, each
    /// one step further in the direction of the signed delta. The last
    /// angle is within one step of the target.
    fn new(current: f64, target: f64, step: f64) -> Self {
        let delta = target - current;

        Self {
            origin: current,
            direction: delta.signum(),
            step,
            taken: 0,
            // Saturates on overflow.
            steps: (delta.abs() / step).floor() as usize,
        }
    }

    #[inline]
    fn angle_at(&self, k: usize) -> f64 {
        self.origin + self.direction * self.step * k as f64
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps - self.taken
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The angle the sequence ends at, `None` once drained.
    pub fn end_angle(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.angle_at(self.steps))
        }
    }
}

impl Iterator for StepSequence {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        self.taken += 1;
        Some(self.angle_at(self.taken))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for StepSequence {}

/// Plan constant rate motion with a uniform step size in degrees.
pub fn plan(current: &[f64], target: &[f64], step_size: f64) -> Result<Vec<StepSequence>> {
    plan_per_joint(current, target, &vec![step_size; current.len()])
}

/// Plan constant rate motion with a step size per joint.
pub fn plan_per_joint(
    current: &[f64],
    target: &[f64],
    step_size: &[f64],
) -> Result<Vec<StepSequence>> {
    if current.len() != target.len() {
        return Err(Error::PlanMismatch {
            current: current.len(),
            target: target.len(),
        });
    }
    if step_size.len() != current.len() {
        return Err(Error::PlanMismatch {
            current: current.len(),
            target: step_size.len(),
        });
    }

    if let Some(step) = step_size
        .iter()
        .find(|step| !(step.is_finite() && **step > 0.0))
    {
        return Err(Error::InvalidStepSize(*step));
    }
    if current.iter().chain(target).any(|angle| !angle.is_finite()) {
        return Err(Error::DegenerateInput("joint angle must be finite"));
    }

    let sequences = current
        .iter()
        .zip(target)
        .zip(step_size)
        .map(|((current, target), step)| StepSequence::new(*current, *target, *step))
        .collect::<Vec<_>>();

    for (index, sequence) in sequences.iter().enumerate() {
        log::trace!("Joint {} planned {} steps", index, sequence.len());
    }

    Ok(sequences)
}
