//! Toy engine for the terminal host.
//!
//! There is no board here. A piece falls `FALL_STEPS - stack` rows and locks;
//! each lock adds four cells to the stack and every ten cells clear a line.
//! The stack grows faster than it clears, so a game always tops out, which
//! is enough to exercise level changes, lock cues and game over.

use tui_blockfall_core::SimulationEngine;

use crate::types::{EngineCommand, LockEvent, SurfaceEvent};

/// Rows a piece falls on an empty stack
pub const FALL_STEPS: u32 = 20;

/// Stack height that ends the game
pub const STACK_LIMIT: u32 = 16;

const CELLS_PER_PIECE: u32 = 4;
const CELLS_PER_LINE: u32 = 10;
const COLUMN_MIN: i8 = -4;
const COLUMN_MAX: i8 = 5;

#[derive(Debug, Clone, Default)]
pub struct DemoEngine {
    live: bool,
    row: u32,
    column: i8,
    rotation: u8,
    hold_used: bool,
    stack: u32,
    cells: u32,
    score: u32,
    lines: u32,
    game_over: bool,
    last_event: Option<LockEvent>,
    surface_size: Option<(u16, u16)>,
    frames: u64,
}

impl DemoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self {
            live: true,
            surface_size: self.surface_size,
            frames: self.frames,
            ..Self::default()
        };
    }

    fn floor(&self) -> u32 {
        FALL_STEPS.saturating_sub(self.stack)
    }

    fn fall(&mut self) {
        self.row += 1;
        if self.row >= self.floor() {
            self.lock();
        }
    }

    fn lock(&mut self) {
        self.stack += 1;
        self.cells += CELLS_PER_PIECE;
        let cleared = self.cells / CELLS_PER_LINE;
        self.cells %= CELLS_PER_LINE;
        self.stack = self.stack.saturating_sub(cleared);
        self.lines += cleared;
        self.score += cleared * 100;
        self.last_event = Some(LockEvent {
            lines_cleared: cleared,
        });

        self.row = 0;
        self.column = 0;
        self.rotation = 0;
        self.hold_used = false;
        if self.stack >= STACK_LIMIT {
            log::debug!("demo engine topped out at {} lines", self.lines);
            self.game_over = true;
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> i8 {
        self.column
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn stack_height(&self) -> u32 {
        self.stack
    }

    pub fn surface_size(&self) -> Option<(u16, u16)> {
        self.surface_size
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl SimulationEngine for DemoEngine {
    fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Initialize | EngineCommand::Reset => {
                self.reset();
                return;
            }
            EngineCommand::Teardown => {
                self.live = false;
                return;
            }
            _ => {}
        }
        if !self.live || self.game_over {
            return;
        }

        match command {
            EngineCommand::Advance => self.fall(),
            EngineCommand::SoftDrop => {
                self.score += 1;
                self.fall();
            }
            EngineCommand::HardDrop => {
                let floor = self.floor();
                self.score += 2 * floor.saturating_sub(self.row);
                self.row = floor;
                self.lock();
            }
            EngineCommand::Move(direction) => {
                self.column = self
                    .column
                    .saturating_add(direction.delta())
                    .clamp(COLUMN_MIN, COLUMN_MAX);
            }
            EngineCommand::RotateCw => self.rotation = (self.rotation + 1) % 4,
            EngineCommand::RotateCcw => self.rotation = (self.rotation + 3) % 4,
            EngineCommand::Hold => {
                if !self.hold_used {
                    self.hold_used = true;
                    self.row = 0;
                    self.rotation = 0;
                }
            }
            EngineCommand::Initialize | EngineCommand::Reset | EngineCommand::Teardown => {}
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn lines(&self) -> u32 {
        self.lines
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    fn surface(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Created => self.frames = 0,
            SurfaceEvent::Resized { width, height } => self.surface_size = Some((width, height)),
            SurfaceEvent::FrameRender => self.frames += 1,
        }
    }
}
