//! Matrix tests - locking, collision and row clears

use console_tetris::core::{Matrix, Piece};
use console_tetris::types::{ShapeKind, LOCK_CEILING, TOTAL_HEIGHT, VISIBLE_HEIGHT, WIDTH};

fn fill_row(matrix: &mut Matrix, y: i32, kind: ShapeKind) {
    for x in 0..WIDTH {
        matrix.set(x, y, Some(kind));
    }
}

#[test]
fn test_matrix_new_empty() {
    let matrix = Matrix::new();
    assert_eq!(matrix.width(), WIDTH);
    assert_eq!(matrix.height(), TOTAL_HEIGHT);
    assert_eq!(matrix.occupied_count(), 0);
    assert!(matrix.get_full_rows().is_empty());
}

#[test]
fn test_matrix_get_out_of_bounds() {
    let matrix = Matrix::new();
    assert_eq!(matrix.get(-1, 0), None);
    assert_eq!(matrix.get(0, -1), None);
    assert_eq!(matrix.get(WIDTH, 0), None);
    assert_eq!(matrix.get(0, TOTAL_HEIGHT), None);
    assert_eq!(matrix.get(0, 0), Some(None));
}

#[test]
fn test_collision_walls_floor_and_stack() {
    let mut matrix = Matrix::new();

    // Vertical I: a one-column box four rows tall.
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, 0, 10)));
    assert!(matrix.collision(&Piece::at(ShapeKind::I, 1, -1, 10)));
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, WIDTH - 1, 10)));
    assert!(matrix.collision(&Piece::at(ShapeKind::I, 1, WIDTH, 10)));
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, 0, TOTAL_HEIGHT - 4)));
    assert!(matrix.collision(&Piece::at(ShapeKind::I, 1, 0, TOTAL_HEIGHT - 3)));

    matrix.set(2, 20, Some(ShapeKind::Z));
    assert!(matrix.collision(&Piece::at(ShapeKind::I, 1, 2, 18)));
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, 2, 21)));
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, 1, 18)));
}

#[test]
fn test_cells_above_the_matrix_do_not_collide() {
    let matrix = Matrix::new();
    assert!(!matrix.collision(&Piece::at(ShapeKind::I, 1, 0, -2)));
}

#[test]
fn test_lock_below_ceiling_succeeds() {
    let mut matrix = Matrix::new();
    let piece = Piece::at(ShapeKind::O, 0, 3, TOTAL_HEIGHT - 2);
    assert!(matrix.lock(&piece));
    assert_eq!(matrix.occupied_count(), 4);
    assert_eq!(matrix.get(4, TOTAL_HEIGHT - 1), Some(Some(ShapeKind::O)));
}

#[test]
fn test_lock_at_ceiling_row_is_allowed() {
    let mut matrix = Matrix::new();
    // Horizontal I in rotation 0 sits on grid row 0 of its box.
    let piece = Piece::at(ShapeKind::I, 0, 0, LOCK_CEILING);
    assert!(matrix.lock(&piece));
}

#[test]
fn test_lock_above_ceiling_reports_top_out_but_writes_cells() {
    let mut matrix = Matrix::new();
    let piece = Piece::at(ShapeKind::O, 0, 3, LOCK_CEILING - 1);
    assert!(!matrix.lock(&piece));
    assert_eq!(matrix.occupied_count(), 4);
}

#[test]
fn test_full_rows_reported_top_to_bottom() {
    let mut matrix = Matrix::new();
    fill_row(&mut matrix, 39, ShapeKind::I);
    fill_row(&mut matrix, 35, ShapeKind::T);
    fill_row(&mut matrix, 37, ShapeKind::L);
    matrix.set(4, 37, None);

    assert_eq!(matrix.get_full_rows().as_slice(), &[35, 39]);
}

#[test]
fn test_clear_rows_shifts_everything_above() {
    let mut matrix = Matrix::new();
    fill_row(&mut matrix, 39, ShapeKind::I);
    fill_row(&mut matrix, 37, ShapeKind::I);
    matrix.set(0, 38, Some(ShapeKind::S));
    matrix.set(5, 36, Some(ShapeKind::Z));
    matrix.set(9, 30, Some(ShapeKind::J));

    matrix.clear_rows(&[39, 37]);

    assert_eq!(matrix.occupied_count(), 3);
    assert_eq!(matrix.get(0, 39), Some(Some(ShapeKind::S)));
    assert_eq!(matrix.get(5, 38), Some(Some(ShapeKind::Z)));
    assert_eq!(matrix.get(9, 32), Some(Some(ShapeKind::J)));
    assert!(matrix.get_full_rows().is_empty());
}

#[test]
fn test_clear_rows_ignores_order_and_duplicates() {
    let mut a = Matrix::new();
    fill_row(&mut a, 38, ShapeKind::O);
    fill_row(&mut a, 39, ShapeKind::O);
    a.set(3, 37, Some(ShapeKind::T));
    let mut b = a.clone();

    a.clear_rows(&[38, 39]);
    b.clear_rows(&[39, 38, 39]);
    assert_eq!(a, b);
    assert_eq!(a.get(3, 39), Some(Some(ShapeKind::T)));
}

#[test]
fn test_clear_top_row_leaves_empty_top() {
    let mut matrix = Matrix::new();
    fill_row(&mut matrix, 0, ShapeKind::I);
    matrix.clear_rows(&[0]);
    assert_eq!(matrix.occupied_count(), 0);
}

#[test]
fn test_visible_rows_skip_the_vanish_buffer() {
    let mut matrix = Matrix::new();
    matrix.set(0, 5, Some(ShapeKind::S));
    matrix.set(7, TOTAL_HEIGHT - 1, Some(ShapeKind::L));

    let rows: Vec<_> = matrix.visible_rows().collect();
    assert_eq!(rows.len(), VISIBLE_HEIGHT as usize);
    assert!(rows.iter().all(|row| row.len() == WIDTH as usize));
    assert_eq!(rows[rows.len() - 1][7], Some(ShapeKind::L));
    assert_eq!(rows.iter().flat_map(|row| row.iter()).filter(|c| c.is_some()).count(), 1);
}
