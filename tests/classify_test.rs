use futures::executor::block_on;

use cellcade::cell::{classify, Cell};
use cellcade::games::GameKind;
use cellcade::module::ModuleRegistry;
use cellcade::session::{Phase, Session, SessionProfile};

#[test]
fn every_byte_classifies_for_every_game() {
    for kind in GameKind::all() {
        for code in 0..=255 {
            let cell = classify(*kind, code);
            assert!(!cell.glyph().is_empty());
        }
        assert_eq!(classify(*kind, 0), Cell::Empty);
        assert_eq!(classify(*kind, 32), Cell::Empty);
        assert_eq!(classify(*kind, 0), classify(*kind, 32));
    }
}

#[test]
fn out_of_range_codes_are_empty() {
    for code in [-1, 256, i32::MIN, i32::MAX] {
        assert_eq!(classify(GameKind::Pacman, code), Cell::Empty);
    }
}

#[test]
fn bundled_boards_only_emit_known_codes() {
    let mut registry = ModuleRegistry::builtin();
    for kind in [GameKind::Snake, GameKind::Pacman, GameKind::FlappyBird, GameKind::TicTacToe] {
        let handle = block_on(registry.load(kind.module_name())).unwrap();
        let mut session = Session::new(handle, SessionProfile::for_game(kind, None), 0);
        session.start();
        assert_eq!(session.phase(), Phase::Running);

        let state = session.state();
        assert!(!state.board.is_empty());
        for code in state.board.iter().filter(|c| **c != 0 && **c != b' ') {
            assert_ne!(
                classify(kind, i32::from(*code)),
                Cell::Empty,
                "{:?} emitted unknown code {:?}",
                kind,
                *code as char
            );
        }
    }
}
