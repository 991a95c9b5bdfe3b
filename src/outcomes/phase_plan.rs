use crate::domain::attempt::PhaseKind;
use crate::error::SimError;
use crate::outcomes::card_pool::validate_percent;

/// Attempt indices in `(after, through]`, 1-based. Empty when `after == through`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub after: u32,
    pub through: u32,
    pub success_percent: u8,
}

impl Phase {
    pub fn len(&self) -> u32 {
        self.through - self.after
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: u32) -> bool {
        index > self.after && index <= self.through
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    total_attempts: u32,
    phases: [Phase; 3],
}

impl PhasePlan {
    pub fn plan(total_attempts: i64, baseline_success_percent: i64) -> Result<Self, SimError> {
        if total_attempts <= 0 || total_attempts > u32::MAX as i64 {
            return Err(SimError::InvalidConfiguration(format!(
                "total attempts must be positive, got {}",
                total_attempts
            )));
        }
        let baseline = validate_percent(baseline_success_percent)?;
        let total = total_attempts as u32;

        let forced_start = total / 2;
        let forced_end = forced_start + total / 4;

        Ok(Self {
            total_attempts: total,
            phases: [
                Phase {
                    kind: PhaseKind::Baseline,
                    after: 0,
                    through: forced_start,
                    success_percent: baseline,
                },
                Phase {
                    kind: PhaseKind::ForcedFailure,
                    after: forced_start,
                    through: forced_end,
                    success_percent: 0,
                },
                Phase {
                    kind: PhaseKind::Recovery,
                    after: forced_end,
                    through: total,
                    success_percent: baseline,
                },
            ],
        })
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase_of(&self, index: u32) -> Option<&Phase> {
        if index == 0 || index > self.total_attempts {
            return None;
        }
        let pos = self.phases.partition_point(|p| p.through < index);
        self.phases.get(pos)
    }

    pub fn lookup(&self, index: u32) -> Option<u8> {
        self.phase_of(index).map(|p| p.success_percent)
    }
}
