//! Line-oriented text persistence for the world grid.
//!
//! One record per line, `x,y,z,type`, no header and no end marker. Records
//! that cannot be written or read are skipped with a warning; only I/O
//! failures and a missing save abort an operation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use blockworld_common::{BlockPos, BlockType, PersistenceError, RecordError};
use glam::DVec3;
use tracing::{debug, info, warn};

use crate::grid::{Block, WorldGrid};

/// Default save file name.
pub const DEFAULT_SAVE_FILE: &str = "world.txt";

/// Field separator.
const SEPARATOR: char = ',';

/// Marker some editors put at the start of UTF-8 files.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Encoded world ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedWorld {
    /// Newline-terminated records
    pub text: String,
    /// Number of records written
    pub written: usize,
    /// Blocks that could not be encoded
    pub skipped: Vec<(Block, RecordError)>,
}

/// A line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number
    pub line_number: usize,
    /// Line content, trimmed
    pub content: String,
    /// Why the line was rejected
    pub error: RecordError,
}

/// Summary of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of blocks in the grid after loading
    pub loaded: usize,
    /// Records that overwrote an earlier record at the same position
    pub overwritten: usize,
    /// Lines that were skipped
    pub malformed: Vec<MalformedLine>,
}

/// Encodes one record, rounding each component half away from zero.
///
/// The result carries no line terminator.
pub fn encode_record(position: DVec3, block_type: &BlockType) -> Result<String, RecordError> {
    if !position.is_finite() {
        return Err(RecordError::NonFiniteCoordinate);
    }
    let pos = BlockPos::from_world(position).ok_or(RecordError::CoordinateOutOfRange)?;
    if !block_type.is_persistable() {
        return Err(RecordError::UnpersistableBlockType(block_type.to_string()));
    }
    Ok(format!("{},{},{},{}", pos.x, pos.y, pos.z, block_type))
}

/// Decodes one non-empty record.
pub fn decode_record(line: &str) -> Result<Block, RecordError> {
    let fields: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
    let &[x, y, z, ty] = fields.as_slice() else {
        return Err(RecordError::FieldCount {
            found: fields.len(),
        });
    };

    let x = parse_coordinate('x', x)?;
    let y = parse_coordinate('y', y)?;
    let z = parse_coordinate('z', z)?;
    if ty.is_empty() {
        return Err(RecordError::EmptyBlockType);
    }

    Ok(Block::new(BlockPos::new(x, y, z), ty))
}

fn parse_coordinate(axis: char, value: &str) -> Result<i32, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidCoordinate {
        axis,
        value: value.to_string(),
    })
}

/// Encodes every block of `grid`, ordered by position.
#[must_use]
pub fn save(grid: &WorldGrid) -> SavedWorld {
    let mut saved = SavedWorld::default();
    for block in grid.all() {
        match encode_record(block.pos.to_world(), &block.block_type) {
            Ok(line) => {
                saved.text.push_str(&line);
                saved.text.push('\n');
                saved.written += 1;
            },
            Err(e) => {
                warn!("Could not save block at {}, skipping: {}", block.pos, e);
                saved.skipped.push((block, e));
            },
        }
    }
    saved
}

/// Clears `grid` and fills it from `text`.
///
/// Blank lines are ignored; malformed lines are skipped and reported. A
/// leading byte-order mark is ignored. When two records share a position
/// the later one wins.
pub fn load(text: &str, grid: &mut WorldGrid) -> LoadReport {
    grid.clear();
    let mut report = LoadReport::default();
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match decode_record(line) {
            Ok(block) => {
                if grid.insert(block.pos, block.block_type).is_some() {
                    debug!("Line {} overwrites an earlier record at {}", index + 1, block.pos);
                    report.overwritten += 1;
                }
            },
            Err(e) => {
                warn!("Skipping malformed line {}: {:?} ({})", index + 1, line, e);
                report.malformed.push(MalformedLine {
                    line_number: index + 1,
                    content: line.to_string(),
                    error: e,
                });
            },
        }
    }

    report.loaded = grid.len();
    report
}

/// Saves `grid` to `path`.
///
/// The text is written to a sibling temp file and renamed into place, so the
/// previous save survives a failed write. Failures are returned, not logged;
/// the caller decides how to surface them.
pub fn save_to_path(grid: &WorldGrid, path: impl AsRef<Path>) -> Result<SavedWorld, PersistenceError> {
    let path = path.as_ref();
    let saved = save(grid);

    write_atomic(path, saved.text.as_bytes())?;
    info!(
        "World saved to {} ({} blocks, {} skipped)",
        path.display(),
        saved.written,
        saved.skipped.len()
    );
    Ok(saved)
}

/// Clears `grid` and loads the save at `path` into it.
///
/// A missing file is reported as [`PersistenceError::SourceNotFound`]; the
/// grid is left empty in that case. Failures are returned, not logged.
pub fn load_from_path(
    path: impl AsRef<Path>,
    grid: &mut WorldGrid,
) -> Result<LoadReport, PersistenceError> {
    let path = path.as_ref();
    grid.clear();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PersistenceError::SourceNotFound {
                path: path.to_path_buf(),
            });
        },
        Err(e) => return Err(e.into()),
    };

    let report = load(&text, grid);
    info!(
        "World loaded from {} ({} blocks, {} malformed lines)",
        path.display(),
        report.loaded,
        report.malformed.len()
    );
    Ok(report)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path);
    let result = write_file(&temp, contents).and_then(|()| fs::rename(&temp, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
