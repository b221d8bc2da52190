use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Cell value: 0=empty/walkable, anything else is a wall material
pub type CellCode = u8;

/// Side length of one grid cell in world units, as used by the sample map
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// The 7x7 map the engine ships with
pub const SAMPLE_MAP: [[CellCode; 7]; 7] = [
    [1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 2, 1],
    [1, 0, 1, 1, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1, 0, 1],
    [1, 1, 1, 2, 1, 1, 1],
];

/// On-disk JSON form of a map
#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    #[serde(default)]
    name: Option<String>,
    cells: Vec<Vec<CellCode>>,
}

/// Grid structure for storing cell codes, addressed as (x, y) = (column, row)
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    pub rows: i32,
    pub cols: i32,
    /// Side length of a cell in world units
    pub cell_size: f32,
    cells: Vec<CellCode>,
    /// Revision number - incremented whenever grid cells change
    pub revision: u64,
}

impl GridMap {
    /// Build a grid from rows of cell codes. Rows must be non-empty and equally long.
    pub fn from_rows<R: AsRef<[CellCode]>>(rows: &[R], cell_size: f32) -> Result<Self> {
        ensure!(!rows.is_empty(), "map has no rows");
        let cols = rows[0].as_ref().len();
        ensure!(cols > 0, "map rows are empty");
        ensure!(cell_size > 0.0, "cell size must be positive, got {}", cell_size);

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            ensure!(
                row.len() == cols,
                "map is not rectangular: row {} has {} cells, expected {}",
                y,
                row.len(),
                cols
            );
            cells.extend_from_slice(row);
        }

        Ok(GridMap {
            rows: rows.len() as i32,
            cols: cols as i32,
            cell_size,
            cells,
            revision: 0,
        })
    }

    /// The built-in 7x7 map
    pub fn sample(cell_size: f32) -> Self {
        GridMap {
            rows: SAMPLE_MAP.len() as i32,
            cols: SAMPLE_MAP[0].len() as i32,
            cell_size,
            cells: SAMPLE_MAP.iter().flatten().copied().collect(),
            revision: 0,
        }
    }

    /// Parse the text format: one digit per cell, one row per line.
    /// Blank lines and `#` comments are skipped. The border must be closed.
    pub fn parse_text(text: &str, cell_size: f32) -> Result<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                match ch.to_digit(10) {
                    Some(code) => row.push(code as CellCode),
                    None => bail!("invalid cell '{}' on line {}", ch, line_no + 1),
                }
            }
            rows.push(row);
        }

        let grid = Self::from_rows(&rows, cell_size)?;
        grid.ensure_closed()?;
        Ok(grid)
    }

    /// Parse the JSON format `{"cells": [[...], ...]}`. The border must be closed.
    pub fn parse_json(json: &str, cell_size: f32) -> Result<Self> {
        let file: MapFile = serde_json::from_str(json).context("failed to parse map JSON")?;
        let grid = Self::from_rows(&file.cells, cell_size)
            .with_context(|| format!("invalid map {}", file.name.as_deref().unwrap_or("<unnamed>")))?;
        grid.ensure_closed()?;
        Ok(grid)
    }

    /// Load a map from disk; `.json` files use the JSON format, anything else the text format
    pub fn load(path: &Path, cell_size: f32) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display()))?;

        let grid = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::parse_json(&contents, cell_size)
        } else {
            Self::parse_text(&contents, cell_size)
        }
        .with_context(|| format!("failed to load map {}", path.display()))?;

        println!("Loaded {}x{} map from {}", grid.cols, grid.rows, path.display());
        Ok(grid)
    }

    /// Reject maps whose outer ring has an empty cell a ray could escape through
    pub fn ensure_closed(&self) -> Result<()> {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let on_border = x == 0 || y == 0 || x == self.cols - 1 || y == self.rows - 1;
                if on_border && self.cells[self.get_id(x, y)] == 0 {
                    bail!("map border is open at cell ({}, {})", x, y);
                }
            }
        }
        Ok(())
    }

    /// Check if grid coordinates fall inside the map
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    fn get_id(&self, x: i32, y: i32) -> usize {
        (x + y * self.cols) as usize
    }

    /// Cell code at grid coordinates, None when out of bounds
    pub fn code_at(&self, x: i32, y: i32) -> Option<CellCode> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.get_id(x, y)])
        } else {
            None
        }
    }

    /// Convert a world coordinate to a grid index.
    /// Infinities saturate and NaN maps to i32::MIN, so both land out of bounds.
    pub fn grid_index(&self, coord: f32) -> i32 {
        let index = (coord / self.cell_size).floor();
        if index.is_nan() {
            i32::MIN
        } else {
            index as i32
        }
    }

    /// Cell code under a world position, None when out of bounds
    pub fn cell_at(&self, world_x: f32, world_y: f32) -> Option<CellCode> {
        self.code_at(self.grid_index(world_x), self.grid_index(world_y))
    }

    /// Out of bounds is considered blocked
    pub fn is_blocked(&self, world_x: f32, world_y: f32) -> bool {
        !matches!(self.cell_at(world_x, world_y), Some(0))
    }

    /// Empty a cell. Out-of-bounds coordinates are ignored.
    pub fn clear_cell(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let id = self.get_id(x, y);
            if self.cells[id] != 0 {
                self.cells[id] = 0;
                self.revision += 1;
            }
        }
    }

    /// Iterate rows from top to bottom
    pub fn rows_iter(&self) -> impl Iterator<Item = &[CellCode]> {
        self.cells.chunks(self.cols as usize)
    }

    /// Render the grid in the text map format
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for row in self.rows_iter() {
            for &code in row {
                // codes above 9 cannot be written as a single digit
                let digit = char::from_digit(code.min(9) as u32, 10).unwrap_or('9');
                result.push(digit);
            }
            result.push('\n');
        }
        result
    }
}
