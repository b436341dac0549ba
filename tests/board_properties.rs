//! Board and win detection properties across board sizes

use rand::{Rng, SeedableRng, rngs::StdRng};
use xxo::{
    Error,
    tictactoe::{Board, Cell, OriginBound, Player, check_win, check_win_with},
};

fn random_cell(rng: &mut StdRng) -> Cell {
    match rng.random_range(0..3) {
        0 => Cell::Empty,
        1 => Cell::X,
        _ => Cell::O,
    }
}

#[test]
fn place_then_get_returns_the_mark() {
    let mut rng = StdRng::seed_from_u64(11);
    for (width, height) in [(3, 3), (4, 3), (3, 6), (7, 5)] {
        let mut board = Board::new(width, height).unwrap();
        for _ in 0..50 {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            let cell = random_cell(&mut rng);
            board.place(x, y, cell).unwrap();
            assert_eq!(board.get(x, y).unwrap(), cell);
        }

        assert!(matches!(
            board.get(width, 0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(
            board.place(0, height, Cell::X),
            Err(Error::OutOfRange { .. })
        ));
    }
}

#[test]
fn resize_is_monotonic_and_preserves_cells() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut board = Board::new(3, 3).unwrap();
    let mut marks = Vec::new();

    for _ in 0..20 {
        let x = rng.random_range(0..board.width());
        let y = rng.random_range(0..board.height());
        let cell = if rng.random::<bool>() { Cell::X } else { Cell::O };
        board.place(x, y, cell).unwrap();
        marks.retain(|&(mx, my, _)| (mx, my) != (x, y));
        marks.push((x, y, cell));

        let (old_width, old_height) = (board.width(), board.height());
        let width = rng.random_range(3..9);
        let height = rng.random_range(3..9);
        board.resize(width, height).unwrap();

        assert_eq!(board.width(), old_width.max(width));
        assert_eq!(board.height(), old_height.max(height));
        for &(mx, my, cell) in &marks {
            assert_eq!(board.get(mx, my).unwrap(), cell);
        }
        let marked = board.cell_count() - board.legal_moves().len();
        assert_eq!(marked, marks.len());
    }
}

#[test]
fn invalid_sizes_are_rejected() {
    assert!(matches!(
        Board::new(2, 2),
        Err(Error::InvalidSize {
            width: 2,
            height: 2
        })
    ));
    let mut board = Board::default();
    assert!(board.resize(1, 5).is_err());
    assert_eq!((board.width(), board.height()), (3, 3));
}

#[test]
fn classic_board_wins_and_draws() {
    let mut board = Board::default();
    for x in 0..3 {
        board.place(x, 0, Cell::X).unwrap();
    }
    assert_eq!(check_win(&board), Some(Player::X));
    assert_eq!(board.winner(), Some(Player::X));

    assert_eq!(check_win(&Board::default()), None);

    let mut drawn = Board::default();
    for (idx, c) in "OXOXXOXOX".chars().enumerate() {
        drawn.place(idx % 3, idx / 3, Cell::from_char(c).unwrap()).unwrap();
    }
    assert!(drawn.is_full());
    assert_eq!(check_win(&drawn), None);
}

#[test]
fn win_detection_is_deterministic_on_random_boards() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..200 {
        let width = rng.random_range(3..7);
        let height = rng.random_range(3..7);
        let mut board = Board::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                board.place(x, y, random_cell(&mut rng)).unwrap();
            }
        }

        let first = check_win(&board);
        assert_eq!(check_win(&board), first);
        assert_eq!(board.clone().winner(), first);

        // The legacy scan visits a subset of the windows
        if let Some(winner) = check_win_with(&board, OriginBound::Exclusive) {
            assert!(first.is_some());
            if width == 3 && height == 3 {
                assert_eq!(Some(winner), first);
            }
        }
    }
}

#[test]
fn line_in_bottom_right_window_is_found() {
    let mut board = Board::new(6, 5).unwrap();
    for (x, y) in [(3, 2), (4, 3), (5, 4)] {
        board.place(x, y, Cell::O).unwrap();
    }
    assert_eq!(check_win(&board), Some(Player::O));
    assert_eq!(check_win_with(&board, OriginBound::Exclusive), None);
}
