mod common;

use common::{fixture_path, load_fixture_map, CELL};
use gridcaster::GridMap;

#[test]
fn text_fixture_matches_builtin_map() {
    let loaded = load_fixture_map("sample.txt");
    assert_eq!(loaded, GridMap::sample(CELL));
}

#[test]
fn json_fixture_loads() {
    let grid = load_fixture_map("hall.json");

    assert_eq!((grid.cols, grid.rows), (10, 5));
    assert_eq!(grid.code_at(9, 1), Some(3));
    assert_eq!(grid.code_at(1, 4), Some(2));
    assert_eq!(grid.code_at(4, 2), Some(0));
    assert!(grid.ensure_closed().is_ok());
}

#[test]
fn open_border_is_rejected() {
    let err = GridMap::load(&fixture_path("maps").join("open_border.txt"), CELL).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("open_border.txt"), "{}", message);
    assert!(message.contains("border"), "{}", message);
}

#[test]
fn ragged_map_is_rejected() {
    let err = GridMap::load(&fixture_path("maps").join("ragged.txt"), CELL).unwrap_err();
    assert!(format!("{:#}", err).contains("not rectangular"));
}

#[test]
fn missing_map_reports_path() {
    let err = GridMap::load(&fixture_path("maps").join("missing.txt"), CELL).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.txt"));
}

#[test]
fn empty_json_map_is_rejected() {
    let err = GridMap::parse_json(r#"{"cells": []}"#, CELL).unwrap_err();
    assert!(format!("{:#}", err).contains("no rows"));
}

#[test]
fn cleared_cell_reads_empty() {
    let mut grid = GridMap::sample(CELL);

    for &(x, y) in &[(2, 2), (5, 1), (0, 0), (3, 6)] {
        grid.clear_cell(x, y);
        assert_eq!(grid.code_at(x, y), Some(0));
        let (wx, wy) = ((x as f32 + 0.5) * CELL, (y as f32 + 0.5) * CELL);
        assert_eq!(grid.cell_at(wx, wy), Some(0));
        assert!(!grid.is_blocked(wx, wy));
    }
    assert_eq!(grid.revision, 4);
}

#[test]
fn clearing_out_of_bounds_is_a_no_op() {
    let mut grid = GridMap::sample(CELL);
    let before = grid.clone();

    grid.clear_cell(-1, 3);
    grid.clear_cell(7, 0);
    grid.clear_cell(0, 100);

    assert_eq!(grid, before);
}

#[test]
fn text_export_round_trips_edits() {
    let mut grid = GridMap::sample(CELL);
    grid.clear_cell(2, 2);

    let reparsed = GridMap::parse_text(&grid.to_text(), CELL).unwrap();
    assert_eq!(reparsed.code_at(2, 2), Some(0));
    assert_eq!(reparsed.code_at(5, 1), Some(2));
}
