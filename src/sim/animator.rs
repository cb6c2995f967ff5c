// animator.rs - Fold sequencing
//
//   Idle --start--> Running(0) --settled + delay--> Running(1) ... --> Complete
//
// start() is accepted in any phase and always restarts from fold 0.

use log::{debug, info};

use super::fold::FoldSequence;
use crate::config::FoldingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldPhase {
    Idle,
    Running(usize),
    Complete,
}

/// What an update changed, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldEvent {
    /// Every active fold reached its target; the settle timer is armed
    Settled(usize),
    /// Fold at this index became active
    Advanced(usize),
    Completed,
}

#[derive(Debug, Clone)]
pub struct FoldAnimator {
    folds: FoldSequence,
    phase: FoldPhase,
    /// Clock time the current step first settled
    settled_at: Option<f64>,
    /// Seconds
    settle_delay: f64,
    epsilon: f32,
}

impl FoldAnimator {
    pub fn new(folds: FoldSequence, config: &FoldingConfig) -> Self {
        Self {
            folds,
            phase: FoldPhase::Idle,
            settled_at: None,
            settle_delay: config.settle_delay_ms / 1000.0,
            epsilon: config.epsilon,
        }
    }

    /// Reset every fold and begin again at step 0
    pub fn start(&mut self) {
        self.folds.reset();
        self.folds.activate(0);
        self.settled_at = None;
        self.phase = FoldPhase::Running(0);
        info!("folding started: step 1/{}", self.folds.len());
    }

    /// Advance active folds by `dt` seconds at clock time `now`
    pub fn update(&mut self, now: f64, dt: f32) -> Option<FoldEvent> {
        let FoldPhase::Running(step) = self.phase else {
            return None;
        };

        let mut all_settled = true;
        for fold in self.folds.iter_mut().filter(|f| f.active) {
            fold.advance(dt);
            if fold.is_settled(self.epsilon) {
                fold.settle();
            } else {
                all_settled = false;
            }
        }

        if !all_settled {
            if self.settled_at.take().is_some() {
                debug!("step {} left its target, settle timer disarmed", step + 1);
            }
            return None;
        }

        match self.settled_at {
            None => {
                self.settled_at = Some(now);
                debug!("step {} settled at {now:.3}s", step + 1);
                Some(FoldEvent::Settled(step))
            }
            Some(at) if now - at >= self.settle_delay => Some(self.next_step(step)),
            Some(_) => None,
        }
    }

    fn next_step(&mut self, step: usize) -> FoldEvent {
        let next = step + 1;
        self.settled_at = None;

        if self.folds.activate(next) {
            self.phase = FoldPhase::Running(next);
            info!("step {}/{}", next + 1, self.folds.len());
            FoldEvent::Advanced(next)
        } else {
            self.phase = FoldPhase::Complete;
            info!("folding complete");
            FoldEvent::Completed
        }
    }

    pub fn phase(&self) -> FoldPhase {
        self.phase
    }

    pub fn folds(&self) -> &FoldSequence {
        &self.folds
    }

    pub fn settled_at(&self) -> Option<f64> {
        self.settled_at
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, FoldPhase::Running(_))
    }

    #[cfg(test)]
    pub(crate) fn fold_mut(&mut self, i: usize) -> Option<&mut super::fold::Fold> {
        self.folds.iter_mut().nth(i)
    }
}
