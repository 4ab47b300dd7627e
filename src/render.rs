//! Text rendering of the grid, usable as a [`TrainingObserver`].

use std::io::Write;

use tracing::warn;

use crate::environment::GridSnapshot;
use crate::grid::Cell;
use crate::training::TrainingObserver;

/// Renders one frame: `G` goal, `#` obstacle, `A` agent, `.` free cell.
///
/// Rows run along `y`, columns along `x`. An agent on the goal shows as `G`.
pub fn render_frame(grid: &GridSnapshot<'_>) -> String {
    let mut frame = String::with_capacity(grid.size * (grid.size + 1));
    for y in 0..grid.size {
        for x in 0..grid.size {
            let cell = Cell::new(x, y);
            let glyph = if cell == grid.goal {
                'G'
            } else if grid.obstacles.contains(&cell) {
                '#'
            } else if grid.agents.contains(&cell) {
                'A'
            } else {
                '.'
            };
            frame.push(glyph);
        }
        frame.push('\n');
    }
    frame
}

/// Writes frames of every `episode_interval`-th episode to `writer`.
pub struct AsciiRenderer<W: Write> {
    writer: W,
    episode_interval: usize,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(writer: W, episode_interval: usize) -> Self {
        Self {
            writer,
            episode_interval: episode_interval.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TrainingObserver for AsciiRenderer<W> {
    fn on_tick(&mut self, episode: usize, tick: usize, grid: &GridSnapshot<'_>) {
        if episode % self.episode_interval != 0 {
            return;
        }
        let frame = render_frame(grid);
        if let Err(e) = write!(self.writer, "episode {episode} tick {tick}\n{frame}\n") {
            warn!("Failed to write frame: {e}");
        }
    }
}
