use crate::{
    helpers::display_text,
    types::{RowEntry, RowOutcome, RowStatus},
};

use rand::{Rng, rngs::StdRng};

pub const TILES_PER_ROW: usize = 25;
pub const SETTLE_MS: u64 = 160;
pub const FLICKER_MS: u64 = 170;
pub const ROW_STAGGER_MS: u64 = 400;
pub const TILE_STAGGER_MS: u64 = 50;

const MIN_FLIPS: u32 = 5;
const MAX_FLIPS: u32 = 9;

pub const GLYPHS: &[char] = &[
    ' ', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.',
    ',', ':', '-', '!', '?', '@', '&',
];

pub fn pick_glyph(rng: &mut impl Rng) -> char {
    GLYPHS[rng.random_range(0..GLYPHS.len())]
}

#[derive(Clone, Copy, Debug)]
pub struct Tile {
    shown: char,
    pending: Option<(char, u64)>,
}

impl Tile {
    pub fn new(initial: char) -> Self {
        Self {
            shown: initial,
            pending: None,
        }
    }

    /// The character currently visible on both halves.
    pub fn shown(&self) -> char {
        self.shown
    }

    pub fn is_flipping(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedules `new_char` to commit once the settle window elapses.
    /// Setting the character that is already shown is a no-op.
    pub fn set_char(&mut self, new_char: char, now_ms: u64) {
        if new_char == self.shown {
            return;
        }

        self.pending = Some((new_char, now_ms + SETTLE_MS));
    }

    pub fn tick(&mut self, now_ms: u64) {
        if let Some((ch, due)) = self.pending {
            if now_ms >= due {
                self.shown = ch;
                self.pending = None;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlipPhase {
    Pending { until: u64 },
    Flickering { remaining: u32, next_at: u64 },
    Settling { at: u64 },
    Done,
}

#[derive(Clone, Copy, Debug)]
pub struct FlipRun {
    target: char,
    phase: FlipPhase,
}

impl FlipRun {
    pub fn new(target: char, delay_ms: u64) -> Self {
        Self {
            target,
            phase: FlipPhase::Pending { until: delay_ms },
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, FlipPhase::Done)
    }

    /// Ends the run without issuing the settle call. A commit already in the
    /// tile's settle window still lands.
    pub fn cancel(&mut self) {
        self.phase = FlipPhase::Done;
    }

    /// Advances the run up to `now_ms`. A large clock jump replays every
    /// intermediate step in order, committing the tile between steps so each
    /// set observes the character actually shown at that moment.
    pub fn tick(&mut self, now_ms: u64, rng: &mut impl Rng, tile: &mut Tile) {
        loop {
            match self.phase {
                FlipPhase::Pending { until } => {
                    if now_ms < until {
                        return;
                    }

                    let remaining = rng.random_range(MIN_FLIPS..=MAX_FLIPS);
                    self.phase = FlipPhase::Flickering {
                        remaining,
                        next_at: until,
                    };
                }

                FlipPhase::Flickering { remaining, next_at } => {
                    if now_ms < next_at {
                        return;
                    }

                    tile.tick(next_at);
                    tile.set_char(pick_glyph(rng), next_at);

                    let remaining = remaining - 1;
                    if remaining == 0 {
                        self.phase = FlipPhase::Settling {
                            at: next_at + FLICKER_MS,
                        };
                    } else {
                        self.phase = FlipPhase::Flickering {
                            remaining,
                            next_at: next_at + FLICKER_MS,
                        };
                    }
                }

                FlipPhase::Settling { at } => {
                    if now_ms < at {
                        return;
                    }

                    tile.tick(at);
                    tile.set_char(self.target, at);
                    self.phase = FlipPhase::Done;
                }

                FlipPhase::Done => return,
            }
        }
    }
}

pub struct BoardRow {
    id: String,
    tiles: Vec<Tile>,
    runs: Vec<FlipRun>,
}

impl BoardRow {
    /// Builds the row's tile sequence, every tile starting as space, and
    /// schedules one flip run per tile against `display`'s characters.
    fn build(id: &str, display: &str, row_index: usize) -> Self {
        let tiles = vec![Tile::new(' '); TILES_PER_ROW];
        let runs = display
            .chars()
            .enumerate()
            .map(|(i, target)| {
                let delay = row_index as u64 * ROW_STAGGER_MS + i as u64 * TILE_STAGGER_MS;
                FlipRun::new(target, delay)
            })
            .collect();

        Self {
            id: id.to_string(),
            tiles,
            runs,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

pub struct Board {
    rows: Vec<BoardRow>,
    statuses: Vec<RowStatus>,
    rng: StdRng,
}

impl Board {
    /// Builds the board for `rows` against the display surface `slots`.
    /// A row whose id names no slot is skipped and reported as such; skipped
    /// rows still consume a row index for the stagger computation.
    pub fn initialize(rows: &[RowEntry], slots: &[&str], rng: StdRng) -> Self {
        let mut built = Vec::new();
        let mut statuses = Vec::new();

        for (row_index, entry) in rows.iter().enumerate() {
            if !slots.contains(&entry.id.as_str()) {
                statuses.push(RowStatus {
                    id: entry.id.clone(),
                    outcome: RowOutcome::SkippedMissingSlot,
                });

                continue;
            }

            let display = display_text(&entry.text, TILES_PER_ROW);
            built.push(BoardRow::build(&entry.id, &display, row_index));
            statuses.push(RowStatus {
                id: entry.id.clone(),
                outcome: RowOutcome::Built,
            });
        }

        Self {
            rows: built,
            statuses,
            rng,
        }
    }

    pub fn tick(&mut self, now_ms: u64) {
        for row in &mut self.rows {
            for (run, tile) in row.runs.iter_mut().zip(row.tiles.iter_mut()) {
                run.tick(now_ms, &mut self.rng, tile);
                tile.tick(now_ms);
            }
        }
    }

    pub fn row(&self, id: &str) -> Option<&BoardRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn statuses(&self) -> &[RowStatus] {
        &self.statuses
    }

    pub fn is_settled(&self) -> bool {
        self.rows.iter().all(|row| {
            row.runs.iter().all(FlipRun::is_done) && row.tiles.iter().all(|t| !t.is_flipping())
        })
    }

    pub fn cancel_all(&mut self) {
        for row in &mut self.rows {
            for run in &mut row.runs {
                run.cancel();
            }
        }
    }
}
