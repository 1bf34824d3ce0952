//! Search Tests
//!
//! Tree statistics, UCT selection and the anytime guarantees of the search
//! loop, exercised through the public library API.

use othello_mcts::rules;
use othello_mcts::search::{self, MctsSearch, SearchParams, SearchPhase};
use othello_mcts::tree::GameTree;
use othello_mcts::uct::{self, DEFAULT_EXPLORATION};
use othello_mcts::{Board, Color, Coord, Deadline, StopReason};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn generous() -> Deadline {
    Deadline::after(Duration::from_secs(60))
}

fn capped(iterations: u64) -> SearchParams {
    SearchParams {
        max_iterations: Some(iterations),
        ..SearchParams::default()
    }
}

/// Black to move with exactly one legal move: (0, 2)
fn single_move_board() -> Board {
    let mut board = Board::empty(4).unwrap();
    board.set(Coord::new(0, 0), Color::Black).unwrap();
    board.set(Coord::new(0, 1), Color::White).unwrap();
    board
}

#[test]
fn test_backup_changes_root_by_alternating_sign_per_depth() {
    let mut tree = GameTree::new(Board::initial(8).unwrap(), Color::Black);
    let mut node = tree.root();
    let mut path = vec![node];
    for _ in 0..5 {
        node = tree.expand(node).unwrap()[0];
        path.push(node);
    }

    for (depth, &id) in path.iter().enumerate().skip(1) {
        for utility in [1.0, -1.0] {
            let before = tree.get(tree.root()).total_value();
            tree.backup(id, utility);
            let after = tree.get(tree.root()).total_value();
            let expected = utility * if depth % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(after - before, expected, "depth {}", depth);
        }
    }
}

#[test]
fn test_unvisited_child_beats_any_visited_sibling() {
    let mut tree = GameTree::new(Board::initial(8).unwrap(), Color::Black);
    let kids = tree.expand(tree.root()).unwrap();
    for _ in 0..50 {
        tree.backup(kids[0], 1.0);
        tree.backup(kids[1], 1.0);
        tree.backup(kids[2], 1.0);
    }

    for c in [0.0, DEFAULT_EXPLORATION, 10.0] {
        assert_eq!(uct::best_child(&tree, tree.root(), c), Some(kids[3]));
    }
}

#[test]
fn test_uct_is_monotone_in_mean_value() {
    let mut tree = GameTree::new(Board::initial(8).unwrap(), Color::Black);
    let kids = tree.expand(tree.root()).unwrap();
    // Both children get 4 visits; kids[0] wins 3, kids[1] wins 1
    for utility in [1.0, 1.0, 1.0, -1.0] {
        tree.backup(kids[0], utility);
    }
    for utility in [1.0, -1.0, -1.0, -1.0] {
        tree.backup(kids[1], utility);
    }

    let parent_visits = tree.get(tree.root()).visit_count();
    for c in [0.0, 0.7, DEFAULT_EXPLORATION, 5.0] {
        assert!(
            uct::uct_score(tree.get(kids[0]), parent_visits, c)
                >= uct::uct_score(tree.get(kids[1]), parent_visits, c)
        );
    }
}

#[test]
fn test_interrupting_after_any_iteration_count_gives_full_legal_list() {
    let board = Board::initial(8).unwrap();
    let legal = rules::legal_moves(&board, Color::Black);

    for (i, iterations) in [0u64, 1, 5, 40, 150].into_iter().enumerate() {
        let report = search::search(
            board.clone(),
            Color::Black,
            capped(iterations),
            &generous(),
            rng(i as u64),
        )
        .unwrap();

        assert_eq!(report.stop_reason, StopReason::IterationLimit);
        assert_eq!(report.candidates.len(), legal.len());
        let mut moves = report.moves();
        moves.sort();
        assert_eq!(moves, legal);
        assert!(report.candidates.iter().all(|c| c.visits >= 1));
    }
}

#[test]
fn test_wall_clock_deadline_stops_the_search() {
    let board = Board::initial(8).unwrap();
    let deadline = Deadline::after(Duration::from_millis(150));
    let start = Instant::now();

    let report = search::search(board, Color::White, SearchParams::default(), &deadline, rng(9)).unwrap();

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert_eq!(report.candidates.len(), 4);
    assert!(report.root_visits >= 4);
    // One iteration of slack at most; an 8x8 iteration is far below a second
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_candidates_are_sorted_by_mean_value() {
    let report = search::search(
        Board::initial(6).unwrap(),
        Color::Black,
        capped(300),
        &generous(),
        rng(5),
    )
    .unwrap();

    for pair in report.candidates.windows(2) {
        assert!(pair[0].mean_value >= pair[1].mean_value);
    }
    assert_eq!(report.best_move(), Some(report.candidates[0].coord));
}

#[test]
fn test_single_legal_move_is_ranked_first_after_seeding() {
    let mut mcts = MctsSearch::new(single_move_board(), Color::Black, SearchParams::default(), rng(2));
    assert_eq!(mcts.seed(&generous()).unwrap(), None);
    assert_eq!(mcts.phase(), SearchPhase::Iterating);
    let (coord, id) = mcts.candidate_set()[0];
    assert_eq!(coord, Coord::new(0, 2));
    assert_eq!(mcts.tree().get(id).visit_count(), 1);

    let report = search::search(single_move_board(), Color::Black, capped(0), &generous(), rng(2)).unwrap();
    assert_eq!(report.moves(), vec![Coord::new(0, 2)]);
    assert!(report.candidates[0].visits >= 1);
}

#[test]
fn test_full_board_reports_no_legal_move() {
    let rows: Vec<Vec<i8>> = (0..8)
        .map(|r| (0..8).map(|c| if r < 4 && c < 4 { 1 } else { -1 }).collect())
        .collect();
    let board = Board::from_rows(8, &rows).unwrap();

    for color in [Color::Black, Color::White] {
        let report = search::search(board.clone(), color, SearchParams::default(), &generous(), rng(0)).unwrap();
        assert_eq!(report.stop_reason, StopReason::NoLegalMove);
        assert!(report.is_pass());
    }
}

#[test]
fn test_small_board_search_runs_to_terminal_leaves() {
    // On 4x4 the tree reaches finished games quickly; terminal leaves are
    // scored in place instead of growing endless pass chains
    let report = search::search(
        Board::initial(4).unwrap(),
        Color::Black,
        capped(3000),
        &generous(),
        rng(8),
    )
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::IterationLimit);
    assert_eq!(report.candidates.len(), 4);
    assert!(report.tree_size < 3000 * 16);
}

#[test]
fn test_search_statistics_are_consistent() {
    let report = search::search(
        Board::initial(8).unwrap(),
        Color::White,
        capped(100),
        &generous(),
        rng(6),
    )
    .unwrap();

    assert_eq!(report.iterations, 100);
    assert_eq!(report.simulations, report.root_visits as u64);
    assert!(report.tree_size as u64 > report.iterations);
}

#[test]
fn test_run_after_manual_seeding_ranks_seeded_moves() {
    let mut mcts = MctsSearch::new(Board::initial(8).unwrap(), Color::Black, SearchParams::default(), rng(4));
    assert_eq!(mcts.seed(&generous()).unwrap(), None);

    let report = mcts.run(&Deadline::after(Duration::ZERO)).unwrap();

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert_eq!(report.iterations, 0);
    assert_eq!(report.candidates.len(), 4);
    assert!(report.candidates.iter().all(|c| c.visits == 1));
}
