use criterion::{black_box, criterion_group, criterion_main, Criterion};
use console_tetris::core::{Match, Matrix, Piece, Player};
use console_tetris::types::{Action, ActionSet, ControllerState, ShapeKind, TOTAL_HEIGHT, WIDTH};

fn bench_update(c: &mut Criterion) {
    let mut player = Player::new(12345);
    let held: ActionSet = [Action::MoveLeft].into_iter().collect();

    c.bench_function("player_update_16ms", |b| {
        b.iter(|| {
            player.update(black_box(0.016), held);
        })
    });
}

fn bench_match_update(c: &mut Criterion) {
    let mut game = Match::new(12345);
    let controls = ControllerState::default();

    c.bench_function("match_update_16ms", |b| {
        b.iter(|| {
            game.update(black_box(0.016), &controls);
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut matrix = Matrix::new();
            for y in TOTAL_HEIGHT - 4..TOTAL_HEIGHT {
                for x in 0..WIDTH {
                    matrix.set(x, y, Some(ShapeKind::I));
                }
            }
            let rows = matrix.get_full_rows();
            matrix.clear_rows(black_box(&rows));
            matrix
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            let mut player = Player::new(12345);
            player.action(Action::HardDrop);
            player
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let matrix = Matrix::new();
    let mut piece = Piece::spawn(ShapeKind::T);
    let mut dx = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !piece.try_move(black_box(dx), 0, &matrix) {
                dx = -dx;
            }
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let matrix = Matrix::new();
    let mut piece = Piece::spawn(ShapeKind::T);

    c.bench_function("rotate", |b| {
        b.iter(|| {
            piece.rotate(black_box(true), &matrix);
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_match_update,
    bench_line_clear,
    bench_hard_drop,
    bench_try_move,
    bench_rotate
);
criterion_main!(benches);
