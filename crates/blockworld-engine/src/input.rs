//! Input events for the headless host.
//!
//! Each line of a session script is one event. Key names follow the
//! desktop bindings: digits select a palette slot, the wheel steps the
//! selection, the mouse buttons place and remove, F5 saves and F6 reloads.

use std::str::FromStr;

use blockworld_common::{BlockPos, FaceNormal};
use blockworld_world::RaycastHit;
use glam::IVec3;
use thiserror::Error;

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Digit key mapped to a palette slot
    SelectSlot(usize),
    /// Relative selection step (+1 wheel up, -1 wheel down)
    Scroll(i64),
    /// Place trigger (left mouse button)
    Place,
    /// Remove trigger (right mouse button)
    Remove,
    /// Save command (F5)
    Save,
    /// Clear-and-reload command (F6)
    Reload,
    /// Pointer moved; what the hit test now reports
    Hover(Option<RaycastHit>),
    /// End the session
    Quit,
}

/// Input line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Key name is not bound
    #[error("Unknown input: {0:?}")]
    Unknown(String),

    /// Hover arguments are not `x y z nx ny nz` or `none`
    #[error("Invalid hover target: {0:?}")]
    InvalidHover(String),
}

/// Palette slot for a digit key: `1`..`9` are slots 0..8, `0` is slot 9.
#[must_use]
pub fn digit_slot(key: char) -> Option<usize> {
    match key.to_digit(10)? {
        0 => Some(9),
        d => Some(d as usize - 1),
    }
}

impl FromStr for InputEvent {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let lower = line.to_ascii_lowercase();

        let event = match lower.as_str() {
            "scroll up" => Self::Scroll(1),
            "scroll down" => Self::Scroll(-1),
            "left mouse down" => Self::Place,
            "right mouse down" => Self::Remove,
            "f5" => Self::Save,
            "f6" => Self::Reload,
            "quit" | "escape" => Self::Quit,
            _ => {
                if let Some(args) = lower.strip_prefix("hover") {
                    return parse_hover(args).map(Self::Hover);
                }
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) => digit_slot(key).map(Self::SelectSlot),
                    _ => None,
                }
                .ok_or_else(|| InputError::Unknown(line.to_string()))?
            },
        };

        Ok(event)
    }
}

fn parse_hover(args: &str) -> Result<Option<RaycastHit>, InputError> {
    let args = args.trim();
    if args == "none" {
        return Ok(None);
    }

    let invalid = || InputError::InvalidHover(args.to_string());
    let values = args
        .split_whitespace()
        .map(str::parse::<i32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    let &[x, y, z, nx, ny, nz] = values.as_slice() else {
        return Err(invalid());
    };
    let normal = FaceNormal::new(IVec3::new(nx, ny, nz)).ok_or_else(invalid)?;

    Ok(Some(RaycastHit::new(BlockPos::new(x, y, z), normal)))
}
