//! Level files and level progression
//!
//! A level file is JSON:
//!
//! ```json
//! { "tiles": [1, 1, 1, 0, -1, 0], "width": 3, "music": "song.ogg", "max_goo": 5 }
//! ```
//!
//! `tiles` is row-major with the first row at the bottom of the world.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::grid::{TileCode, TileGrid, TileKind};

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    /// No level with this name is known to the loader
    UnknownLevel(String),
    /// The session was started with an empty level list
    NoLevels,
    ZeroWidth { level: String },
    RaggedGrid { level: String, len: usize, width: usize },
    MissingSpawn { level: String },
    NoGoo { level: String, max_goo: i64 },
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "IO error reading {}: {}", path.display(), source)
            }
            LevelError::Parse(e) => write!(f, "Parse error: {}", e),
            LevelError::UnknownLevel(name) => write!(f, "Unknown level '{}'", name),
            LevelError::NoLevels => write!(f, "No levels configured"),
            LevelError::ZeroWidth { level } => write!(f, "Level '{}' has zero width", level),
            LevelError::RaggedGrid { level, len, width } => write!(
                f,
                "Level '{}' has {} tiles, not a multiple of width {}",
                level, len, width
            ),
            LevelError::MissingSpawn { level } => {
                write!(f, "Level '{}' has no player spawn tile", level)
            }
            LevelError::NoGoo { level, max_goo } => {
                write!(f, "Level '{}' allows {} goo, need at least 1", level, max_goo)
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// On-disk level definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub tiles: Vec<i32>,
    pub width: usize,
    pub music: String,
    pub max_goo: i64,
}

/// A validated, immutable level
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub music: String,
    pub max_goo: u32,
    grid: TileGrid,
}

impl Level {
    /// Validate a definition. Fails fast on anything the simulation cannot run.
    pub fn from_def(name: &str, def: LevelDef) -> Result<Self, LevelError> {
        let level = name.to_string();

        if def.width == 0 {
            return Err(LevelError::ZeroWidth { level });
        }
        if def.tiles.len() % def.width != 0 {
            return Err(LevelError::RaggedGrid {
                level,
                len: def.tiles.len(),
                width: def.width,
            });
        }
        if def.max_goo <= 0 {
            return Err(LevelError::NoGoo {
                level,
                max_goo: def.max_goo,
            });
        }

        let grid = TileGrid::new(def.tiles.into_iter().map(TileCode).collect(), def.width);
        let spawns = grid
            .tiles()
            .iter()
            .filter(|c| c.kind() == TileKind::Spawn)
            .count();
        match spawns {
            0 => return Err(LevelError::MissingSpawn { level }),
            1 => {}
            n => log::warn!("Level '{}' has {} spawn tiles, using the last", name, n),
        }

        Ok(Self {
            name: level,
            music: def.music,
            max_goo: def.max_goo.min(u32::MAX as i64) as u32,
            grid,
        })
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }
}

/// Source of level definitions
pub trait LevelLoader {
    fn load(&self, name: &str) -> Result<LevelDef, LevelError>;
}

/// Reads `<root>/<name>` as JSON
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl LevelLoader for DirLoader {
    fn load(&self, name: &str) -> Result<LevelDef, LevelError> {
        let path = self.root.join(name);
        let json = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => LevelError::UnknownLevel(name.to_string()),
            _ => LevelError::Io {
                path: path.clone(),
                source,
            },
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Levels held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    levels: HashMap<String, LevelDef>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, def: LevelDef) -> Self {
        self.levels.insert(name.to_string(), def);
        self
    }
}

impl LevelLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<LevelDef, LevelError> {
        self.levels
            .get(name)
            .cloned()
            .ok_or_else(|| LevelError::UnknownLevel(name.to_string()))
    }
}

/// Static tile for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileSprite {
    pub index: usize,
    pub code: TileCode,
    /// Bottom-left corner in world units
    pub pos: Vec2,
    pub frame: u32,
    frames: u32,
    frame_time: f32,
}

impl TileSprite {
    /// Lava bubbles; everything else is a single frame
    fn frame_count(code: TileCode) -> u32 {
        match code.kind() {
            TileKind::Hazard => 2,
            _ => 1,
        }
    }

    pub fn animate(&mut self, frame_secs: f32, dt: f32) {
        if self.frames <= 1 {
            return;
        }
        self.frame_time += dt;
        if self.frame_time >= frame_secs {
            self.frame_time -= frame_secs;
            self.frame = (self.frame + 1) % self.frames;
        }
    }
}

/// Result of moving to the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Loaded,
    /// No levels remain; the session is over
    Exhausted,
}

/// The current level plus where it sits in the level sequence
pub struct LevelSession {
    loader: Box<dyn LevelLoader>,
    names: Vec<String>,
    index: usize,
    level: Level,
    tiles: Vec<TileSprite>,
}

impl std::fmt::Debug for LevelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelSession")
            .field("names", &self.names)
            .field("index", &self.index)
            .field("level", &self.level.name)
            .finish()
    }
}

impl LevelSession {
    /// Load the first level of `names`
    pub fn start(loader: Box<dyn LevelLoader>, names: Vec<String>) -> Result<Self, LevelError> {
        let first = names.first().ok_or(LevelError::NoLevels)?;
        let level = Self::load_level(loader.as_ref(), first)?;
        let tiles = Self::build_tiles(&level);
        Ok(Self {
            loader,
            names,
            index: 0,
            level,
            tiles,
        })
    }

    fn load_level(loader: &dyn LevelLoader, name: &str) -> Result<Level, LevelError> {
        let level = Level::from_def(name, loader.load(name)?)?;
        log::info!(
            "Loaded level '{}' ({}x{}, {} goo, music {})",
            name,
            level.width(),
            level.height(),
            level.max_goo,
            level.music
        );
        Ok(level)
    }

    /// Presentation list: every tile except empty and spawn cells
    fn build_tiles(level: &Level) -> Vec<TileSprite> {
        let grid = level.grid();
        grid.tiles()
            .iter()
            .enumerate()
            .filter(|(_, code)| code.is_solid())
            .map(|(index, &code)| TileSprite {
                index,
                code,
                pos: grid.tile_origin(index),
                frame: 0,
                frames: TileSprite::frame_count(code),
                frame_time: 0.0,
            })
            .collect()
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.names.len()
    }

    /// Whether another level follows the current one
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.names.len()
    }

    pub fn tiles(&self) -> &[TileSprite] {
        &self.tiles
    }

    pub fn animate_tiles(&mut self, frame_secs: f32, dt: f32) {
        for tile in &mut self.tiles {
            tile.animate(frame_secs, dt);
        }
    }

    /// Re-read the current level from the loader. On failure the loaded
    /// level stays in place.
    pub fn reload(&mut self) -> Result<(), LevelError> {
        let level = Self::load_level(self.loader.as_ref(), &self.names[self.index])?;
        self.tiles = Self::build_tiles(&level);
        self.level = level;
        Ok(())
    }

    /// Load the next level in the sequence
    pub fn advance(&mut self) -> Result<Advance, LevelError> {
        if !self.has_next() {
            log::info!("Level sequence exhausted after {} levels", self.names.len());
            return Ok(Advance::Exhausted);
        }

        let level = Self::load_level(self.loader.as_ref(), &self.names[self.index + 1])?;
        self.index += 1;
        self.tiles = Self::build_tiles(&level);
        self.level = level;
        Ok(Advance::Loaded)
    }
}
