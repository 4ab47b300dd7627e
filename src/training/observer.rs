//! Optional hooks invoked by the trainer.

use super::record::EpisodeSummary;
use crate::environment::GridSnapshot;

/// Observer of a training run.
///
/// Both hooks default to no-ops. Observers only receive read-only views; the
/// learning core behaves identically whether or not any are attached.
pub trait TrainingObserver {
    /// Called after every tick, once all unfinished agents have acted.
    fn on_tick(&mut self, _episode: usize, _tick: usize, _grid: &GridSnapshot<'_>) {}

    /// Called once per episode after its records were emitted.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}
