#![forbid(unsafe_code)]

//! Grid placement of tokens and its inverse (pointer → insertion index).
//!
//! # Placement
//!
//! Token `i` is assigned a line and a position within the line:
//!
//! - `max_columns == 0`: every token sits on line 0 at position `i`.
//! - otherwise: line `i / max_columns`, position `i % max_columns`.
//!
//! Horizontal collections map lines to rows and positions to columns;
//! vertical collections swap them. An optional trash slot takes the next
//! cell after the last token. Column widths and row heights are the largest
//! extent found in that column/row, separated by `spacing` cells.
//!
//! Layout is a pure function of its inputs: calling it twice without
//! changing extents or the spec yields identical geometry.
//!
//! # Inverse mapping
//!
//! [`drop_index`] finds where a dropped token should be inserted. When the
//! collection wraps onto several lines, the half-gap between line 0 and
//! line 1 is used as a tolerance band and lines are scanned in order,
//! accepting the first whose trailing edge plus the band is not exceeded by
//! the pointer. A pointer beyond every line is clamped to the last line.
//! Within the chosen line the token is inserted before the first slot whose
//! midpoint the pointer has not passed. Points exactly on a midpoint or on a
//! band edge count as "before".

use serde::{Deserialize, Serialize};
use toolshelf_core::geometry::{Orientation, Position, Rect, Size};

/// Default spacing between grid cells.
pub const DEFAULT_SPACING: u16 = 1;

/// Inputs that shape a collection's grid besides the token extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub orientation: Orientation,
    /// Tokens per line; `0` means a single unbounded line.
    pub max_columns: usize,
    /// Cells between adjacent rows and columns.
    pub spacing: u16,
    /// Top-left corner of the first cell.
    pub origin: Position,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            max_columns: 0,
            spacing: DEFAULT_SPACING,
            origin: Position::default(),
        }
    }
}

/// Row/column assignment of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

/// Resolved placement of every slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridGeometry {
    /// One rect per token, in collection order.
    pub slots: Vec<Rect>,
    /// The trash slot, if present and visible.
    pub trash: Option<Rect>,
}

impl GridGeometry {
    /// Index of the token slot containing `pos`.
    #[must_use]
    pub fn slot_at(&self, pos: Position) -> Option<usize> {
        self.slots.iter().position(|r| r.contains(pos))
    }

    /// Whether `pos` lies on the trash slot.
    #[must_use]
    pub fn is_on_trash(&self, pos: Position) -> bool {
        self.trash.is_some_and(|r| r.contains(pos))
    }

    /// Bounding box of every slot.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.slots
            .iter()
            .chain(self.trash.iter())
            .fold(Rect::default(), |acc, r| acc.union(r))
    }
}

/// Cell for slot `index`.
#[must_use]
pub const fn cell_for(index: usize, orientation: Orientation, max_columns: usize) -> GridCell {
    let (line, pos) = if max_columns > 0 {
        (index / max_columns, index % max_columns)
    } else {
        (0, index)
    };
    match orientation {
        Orientation::Horizontal => GridCell {
            row: line,
            column: pos,
        },
        Orientation::Vertical => GridCell {
            row: pos,
            column: line,
        },
    }
}

/// Place `extents` (and an optional trash slot) on the grid.
#[must_use]
pub fn layout(extents: &[Size], trash: Option<Size>, spec: &GridSpec) -> GridGeometry {
    let count = extents.len() + usize::from(trash.is_some());
    let cells: Vec<GridCell> = (0..count)
        .map(|i| cell_for(i, spec.orientation, spec.max_columns))
        .collect();
    let sizes = || extents.iter().copied().chain(trash);

    let rows = cells.iter().map(|c| c.row + 1).max().unwrap_or(0);
    let columns = cells.iter().map(|c| c.column + 1).max().unwrap_or(0);
    let mut widths = vec![0u16; columns];
    let mut heights = vec![0u16; rows];
    for (cell, size) in cells.iter().zip(sizes()) {
        widths[cell.column] = widths[cell.column].max(size.width);
        heights[cell.row] = heights[cell.row].max(size.height);
    }

    let xs = offsets(spec.origin.x, &widths, spec.spacing);
    let ys = offsets(spec.origin.y, &heights, spec.spacing);

    let mut rects: Vec<Rect> = cells
        .iter()
        .zip(sizes())
        .map(|(cell, size)| {
            Rect::from_origin(Position::new(xs[cell.column], ys[cell.row]), size)
        })
        .collect();

    let trash_rect = if trash.is_some() { rects.pop() } else { None };
    GridGeometry {
        slots: rects,
        trash: trash_rect,
    }
}

fn offsets(start: u16, extents: &[u16], spacing: u16) -> Vec<u16> {
    let mut out = Vec::with_capacity(extents.len());
    let mut cursor = start;
    for &extent in extents {
        out.push(cursor);
        cursor = cursor.saturating_add(extent).saturating_add(spacing);
    }
    out
}

/// Insertion index for a drop at `pos` over `slots`.
#[must_use]
pub fn drop_index(
    slots: &[Rect],
    orientation: Orientation,
    max_columns: usize,
    pos: Position,
) -> usize {
    let n = slots.len();
    let mut start = 0;

    if max_columns > 0 && n > max_columns {
        let first = slots[0];
        let gap = ((i32::from(slots[max_columns].cross_start(orientation))
            - i32::from(first.cross_end(orientation)))
            / 2)
            .max(0);
        let pointer = i32::from(pos.cross(orientation));

        while start < n {
            if pointer > i32::from(slots[start].cross_end(orientation)) + gap {
                start += max_columns;
            } else {
                break;
            }
        }
        if start >= n {
            start = ((n - 1) / max_columns) * max_columns;
        }
    }

    let end = if max_columns > 0 {
        (start + max_columns).min(n)
    } else {
        n
    };
    let pointer = pos.main(orientation);
    let mut index = start;
    while index < end && pointer > slots[index].main_mid(orientation) {
        index += 1;
    }
    index
}
