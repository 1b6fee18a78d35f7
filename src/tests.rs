#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use itertools::Itertools;

    use crate::board::Board;
    use crate::builder::{BoardBuilder, BuilderInvalidReason};
    use crate::driver::Autoplayer;
    use crate::error::{IllegalMove, MalformedReason, PuzzleError};
    use crate::game::{Game, Origin, SolveStatus};
    use crate::location::{line, Location};
    use crate::solver::{SolverConfig, SolverFailure, Strategy};

    const CORNERS: &str = "4
1,1,2
1,4,2
4,1,2
4,4,2
";

    const SAMPLE: &str = "5
1,3,2
1,4,1
4,5,1
5,2,1
4,1,1
";

    fn corners() -> Board {
        BoardBuilder::with_size(NonZero::new(4).unwrap())
            .add_black(Location(0, 0))
            .add_black(Location(0, 3))
            .add_black(Location(3, 0))
            .add_black(Location(3, 3))
            .build()
            .unwrap()
    }

    fn perimeter(board: &mut Board) {
        let n = board.size();
        let ring = (0..n).map(|c| Location(0, c))
            .chain((1..n).map(|r| Location(r, n - 1)))
            .chain((0..n - 1).rev().map(|c| Location(n - 1, c)))
            .chain((1..n - 1).rev().map(|r| Location(r, 0)))
            .collect_vec();

        for (a, b) in ring.iter().circular_tuple_windows() {
            board.add_edge(*a, *b).unwrap();
        }
    }

    fn strategies() -> [SolverConfig; 2] {
        [
            SolverConfig::default(),
            SolverConfig { strategy: Strategy::Sat, ..Default::default() },
        ]
    }

    #[test]
    fn builder_rejects_bad_pearls() {
        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_white(Location(3, 0));
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::FeatureOutOfBounds]);

        let mut builder = BoardBuilder::with_size(NonZero::new(3).unwrap());
        builder.add_white(Location(1, 1)).add_black(Location(1, 1));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::DuplicatePearl]));
    }

    #[test]
    fn remove_pearl() {
        let board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_white(Location(0, 1))
            .add_black(Location(2, 2))
            .remove_pearl(Location(0, 1))
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "...
...
..B
");
        assert_eq!(board.pearls(), &[Location(2, 2)]);
    }

    #[test]
    fn parse_definition() {
        let board: Board = CORNERS.parse().unwrap();
        assert_eq!(format!("{}", board), "B..B
....
....
B..B
");

        // blank lines anywhere are skipped
        let spaced: Board = "\n4\n\n1,1,2\n1,4,2\n\n4,1,2\n4,4,2\n\n".parse().unwrap();
        assert_eq!(format!("{}", spaced), format!("{}", board));
    }

    #[test]
    fn parse_malformed() {
        let cases = [
            ("", 1, MalformedReason::MissingDimension),
            ("0\n", 1, MalformedReason::BadDimension),
            ("five\n", 1, MalformedReason::BadDimension),
            ("1025\n1,1,1\n", 1, MalformedReason::BadDimension),
            ("10000000000\n1,1,1\n", 1, MalformedReason::BadDimension),
            ("99999999999999999999999\n", 1, MalformedReason::BadDimension),
            ("3\n1,2\n", 2, MalformedReason::WrongArity),
            ("3\n1,2,1,1\n", 2, MalformedReason::WrongArity),
            ("3\n1,a,1\n", 2, MalformedReason::NotAnInteger),
            ("3\n-1,1,1\n", 2, MalformedReason::NotAnInteger),
            ("3\n1,1,3\n", 2, MalformedReason::UnknownColor),
            ("3\n1,1,0\n", 2, MalformedReason::UnknownColor),
            ("3\n4,1,1\n", 2, MalformedReason::OutOfRange),
            ("3\n1,0,1\n", 2, MalformedReason::OutOfRange),
            ("3\n1,1,1\n\n1,1,2\n", 4, MalformedReason::Duplicate),
        ];

        for (text, expected_line, expected_reason) in cases {
            match text.parse::<Board>() {
                Err(PuzzleError::Malformed { line, reason }) => {
                    assert_eq!((line, reason), (expected_line, expected_reason), "{:?}", text);
                }
                other => panic!("{:?} parsed to {:?}", text, other.map(|b| b.to_string())),
            }
        }
    }

    #[test]
    fn load_from_file() {
        let board = Board::load(concat!(env!("CARGO_MANIFEST_DIR"), "/puzzles/corners4.txt")).unwrap();
        assert_eq!(format!("{}", board), format!("{}", corners()));

        let missing = Board::load(concat!(env!("CARGO_MANIFEST_DIR"), "/puzzles/does-not-exist.txt"));
        assert!(matches!(missing, Err(PuzzleError::Io(_))));
    }

    #[test]
    fn edges_are_symmetric() {
        let mut board = corners();
        let before = board.cells.clone();

        assert_eq!(board.add_edge(Location(1, 1), Location(1, 2)), Ok(true));
        assert!(board[Location(1, 1)].is_adjacent_to(Location(1, 2)));
        assert!(board[Location(1, 2)].is_adjacent_to(Location(1, 1)));
        assert_eq!(board[Location(1, 1)].degree(), 1);
        assert!(board.edge_exists(Location(1, 2), Location(1, 1)));

        // drawing again or erasing nothing changes nothing
        assert_eq!(board.add_edge(Location(1, 2), Location(1, 1)), Ok(false));
        assert_eq!(board.remove_edge(Location(2, 2), Location(2, 1)), Ok(false));
        assert_eq!(board.lines(), vec![line(Location(1, 1), Location(1, 2))]);

        assert_eq!(board.remove_edge(Location(1, 2), Location(1, 1)), Ok(true));
        assert_eq!(board.cells, before);
    }

    #[test]
    fn illegal_moves_leave_board_alone() {
        let mut board = corners();

        assert_eq!(board.add_edge(Location(0, 0), Location(1, 1)), Err(IllegalMove::NotAdjacent(Location(0, 0), Location(1, 1))));
        assert_eq!(board.add_edge(Location(2, 2), Location(2, 2)), Err(IllegalMove::NotAdjacent(Location(2, 2), Location(2, 2))));
        assert_eq!(board.add_edge(Location(3, 3), Location(3, 4)), Err(IllegalMove::OutOfBounds(Location(3, 4))));
        assert_eq!(board.remove_edge(Location(4, 0), Location(3, 0)), Err(IllegalMove::OutOfBounds(Location(4, 0))));
        assert!(board.connected_nodes().is_empty());
    }

    #[test]
    fn display_lines() {
        let mut board = BoardBuilder::with_size(NonZero::new(3).unwrap()).build().unwrap();
        board.add_edge(Location(1, 0), Location(1, 1)).unwrap();
        assert_eq!(format!("{}", board), "...
##.
...
");

        board.add_edge(Location(1, 1), Location(1, 2)).unwrap();
        board.add_edge(Location(1, 1), Location(0, 1)).unwrap();
        assert_eq!(format!("{}", board), ".#.
###
...
");
        assert!(!board.all_degrees_valid());
        assert!(!board.check_win());
        assert_eq!(board.connected_nodes(), vec![Location(0, 1), Location(1, 0), Location(1, 1), Location(1, 2)]);

        board.clear_lines();
        assert!(board.lines().is_empty());
        assert!(board.all_degrees_valid());
    }

    #[test]
    fn corners_win() {
        let mut board = corners();
        perimeter(&mut board);

        assert_eq!(format!("{}", board), "B--B
|..|
|..|
B--B
");
        assert!(board.check_win());
        assert!(board.pearls().iter().all(|p| board.is_valid_black(*p)));

        // take away any one line and the loop is broken
        for l in board.lines() {
            let mut broken = board.clone();
            broken.remove_edge(l.0, l.1).unwrap();
            assert!(!broken.check_win(), "still won without {:?}", l);
        }
    }

    #[test]
    fn win_needs_a_single_loop() {
        let mut board = BoardBuilder::with_size(NonZero::new(6).unwrap())
            .add_white(Location(0, 1))
            .build()
            .unwrap();
        assert!(!board.check_win());

        // a loop through the pearl...
        for (a, b) in [(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)].into_iter().circular_tuple_windows() {
            board.add_edge(Location(a.0, a.1), Location(b.0, b.1)).unwrap();
        }
        assert!(board.check_win());

        // ...plus a second, disjoint loop
        for (a, b) in [(4, 4), (4, 5), (5, 5), (5, 4)].into_iter().circular_tuple_windows() {
            board.add_edge(Location(a.0, a.1), Location(b.0, b.1)).unwrap();
        }
        assert!(!board.check_win());
    }

    #[test]
    fn open_path_is_not_a_win() {
        let mut board = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_white(Location(0, 1))
            .build()
            .unwrap();
        board.add_edge(Location(0, 0), Location(0, 1)).unwrap();
        board.add_edge(Location(0, 1), Location(0, 2)).unwrap();
        board.add_edge(Location(0, 2), Location(1, 2)).unwrap();

        assert!(!board.check_win());
        assert!(!board.is_valid_white(Location(1, 1)));
    }

    #[test]
    fn white_rules() {
        let mut straight = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_white(Location(0, 1))
            .build()
            .unwrap();
        perimeter(&mut straight);
        assert_eq!(format!("{}", straight), "+W+
|.|
+-+
");
        assert!(straight.is_valid_white(Location(0, 1)));
        assert!(straight.check_win());

        // turning on the pearl itself
        let mut turning = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_white(Location(0, 0))
            .build()
            .unwrap();
        perimeter(&mut turning);
        assert!(!turning.is_valid_white(Location(0, 0)));
        assert!(!turning.check_win());

        // straight through, but no turn on either side
        let mut long = BoardBuilder::with_size(NonZero::new(5).unwrap())
            .add_white(Location(0, 2))
            .build()
            .unwrap();
        perimeter(&mut long);
        assert!(!long.is_valid_white(Location(0, 2)));
        assert!(!long.check_win());
    }

    #[test]
    fn black_rules() {
        let mut corner = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_black(Location(0, 0))
            .build()
            .unwrap();
        perimeter(&mut corner);
        assert!(corner.is_valid_black(Location(0, 0)));
        assert!(corner.check_win());

        // passing straight through
        let mut straight = BoardBuilder::with_size(NonZero::new(3).unwrap())
            .add_black(Location(0, 1))
            .build()
            .unwrap();
        perimeter(&mut straight);
        assert!(!straight.is_valid_black(Location(0, 1)));
        assert!(!straight.check_win());

        // turning, but one arm is only a single edge long
        let mut short = BoardBuilder::with_size(NonZero::new(4).unwrap())
            .add_black(Location(0, 0))
            .build()
            .unwrap();
        for (a, b) in [(0, 0), (0, 1), (1, 1), (2, 1), (2, 0), (1, 0)].into_iter().circular_tuple_windows() {
            short.add_edge(Location(a.0, a.1), Location(b.0, b.1)).unwrap();
        }
        assert!(!short.is_valid_black(Location(0, 0)));
        assert!(!short.check_win());
    }

    #[test]
    fn solve_corners() {
        for config in strategies() {
            let mut board = corners();
            let solution = board.solve_with(&config).unwrap();

            assert_eq!(format!("{}", board), "B--B
|..|
|..|
B--B
", "{}", config.strategy);
            assert!(board.check_win());
            assert_eq!(solution.lines().len(), 12);
            assert_eq!(solution.lines(), board.lines().as_slice());
        }
    }

    #[test]
    fn solve_sample() {
        for config in strategies() {
            let mut board: Board = SAMPLE.parse().unwrap();
            let solution = board.solve_with(&config).unwrap();
            assert!(board.check_win(), "{}", config.strategy);

            let mut fresh: Board = SAMPLE.parse().unwrap();
            solution.apply_to(&mut fresh).unwrap();
            assert!(fresh.check_win(), "{}", config.strategy);
            assert_eq!(fresh.lines(), board.lines());
        }
    }

    #[test]
    fn repeated_solves_all_validate() {
        let sample: Board = SAMPLE.parse().unwrap();

        for config in strategies() {
            for _ in 0..3 {
                let mut attempt = sample.clone();
                let solution = attempt.solve_with(&config).unwrap();

                let mut fresh: Board = SAMPLE.parse().unwrap();
                solution.apply_to(&mut fresh).unwrap();
                assert!(fresh.check_win(), "{}", config.strategy);
            }
        }

        // every solve ran on a copy
        assert!(sample.lines().is_empty());
    }

    #[test]
    fn solve_puzzle_files() {
        for name in ["corners4.txt", "sample5.txt", "loop6.txt"] {
            let path = format!("{}/puzzles/{}", env!("CARGO_MANIFEST_DIR"), name);

            for config in strategies() {
                let mut board = Board::load(&path).unwrap();
                let solution = board.solve_with(&config).unwrap();
                assert!(board.check_win(), "{} ({})", name, config.strategy);

                let mut fresh = Board::load(&path).unwrap();
                solution.apply_to(&mut fresh).unwrap();
                assert!(fresh.check_win(), "{} ({})", name, config.strategy);
            }
        }
    }

    #[test]
    fn solve_from_partial_lines() {
        let mut board = corners();
        board.add_edge(Location(0, 1), Location(0, 0)).unwrap();
        board.add_edge(Location(3, 3), Location(2, 3)).unwrap();

        board.solve().unwrap();
        assert!(board.check_win());
        assert_eq!(board.lines().len(), 12);
    }

    #[test]
    fn solve_without_pearls() {
        for config in strategies() {
            let mut board = BoardBuilder::with_size(NonZero::new(4).unwrap()).build().unwrap();
            assert_eq!(board.solve_with(&config), Err(SolverFailure::NoSolutionFound));
            assert!(board.lines().is_empty());
        }
    }

    #[test]
    fn unsolvable() {
        for config in strategies() {
            // a black pearl in the middle of a 3x3 board has no room for its arms
            let mut board = BoardBuilder::with_size(NonZero::new(3).unwrap())
                .add_black(Location(1, 1))
                .build()
                .unwrap();
            board.add_edge(Location(0, 0), Location(0, 1)).unwrap();

            assert_eq!(board.solve_with(&config), Err(SolverFailure::NoSolutionFound), "{}", config.strategy);
            assert_eq!(board.lines(), vec![line(Location(0, 0), Location(0, 1))]);
        }
    }

    #[test]
    fn step_limit_restores_board() {
        let mut board: Board = SAMPLE.parse().unwrap();
        board.add_edge(Location(4, 4), Location(3, 4)).unwrap();
        let before = board.cells.clone();

        let config = SolverConfig { step_limit: Some(1), ..Default::default() };
        assert_eq!(board.solve_with(&config), Err(SolverFailure::StepLimitReached(1)));
        assert_eq!(board.cells, before);

        let config = SolverConfig { step_limit: Some(100_000), ..Default::default() };
        board.solve_with(&config).unwrap();
        assert!(board.check_win());
    }

    #[test]
    fn solution_tour() {
        let mut board = corners();
        let solution = board.solve().unwrap();

        let tour = solution.tour();
        assert_eq!(tour.len(), 12);
        assert_eq!(tour[0], Location(0, 0));
        assert_eq!(tour.iter().unique().count(), 12);
        for (a, b) in tour.iter().circular_tuple_windows() {
            assert!(solution.lines().contains(&line(*a, *b)));
        }

        assert_eq!(solution.draw_lines().len(), 24);

        // a smaller board cannot hold the loop, and is left untouched
        let mut small = BoardBuilder::with_size(NonZero::new(3).unwrap()).build().unwrap();
        assert!(matches!(solution.apply_to(&mut small), Err(IllegalMove::OutOfBounds(_))));
        assert!(small.lines().is_empty());
    }

    #[test]
    fn strategy_names() {
        assert_eq!("sat".parse::<Strategy>(), Ok(Strategy::Sat));
        assert_eq!("backtrack".parse::<Strategy>(), Ok(Strategy::Backtrack));
        assert!("dfs".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default().to_string(), "backtrack");
    }

    #[test]
    fn game_moves() {
        let mut game = Game::new(corners());
        assert_eq!(game.size(), 4);

        assert_eq!(game.make_move(Location(1, 1), Location(1, 2)), Ok(true));
        assert_eq!(game.make_move(Location(1, 2), Location(1, 1)), Ok(false));
        assert_eq!(game.make_move(Location(1, 2), Location(2, 2)), Ok(true));
        assert!(game.make_move(Location(1, 2), Location(3, 2)).is_err());
        assert_eq!(game.history().len(), 2);

        assert_eq!(game.undo_move(Location(2, 1), Location(1, 1)), Ok(false));
        assert_eq!(game.undo_move(Location(1, 2), Location(1, 1)), Ok(true));
        assert_eq!(game.history().len(), 1);

        let last = game.undo_last().unwrap();
        assert_eq!((last.from, last.to), (Location(1, 2), Location(2, 2)));
        assert!(game.undo_last().is_none());
        assert!(game.board().lines().is_empty());
        assert!(!game.check_solved());
    }

    #[test]
    fn game_autoplay() {
        let mut game = Game::new(SAMPLE.parse().unwrap());
        game.make_move(Location(2, 2), Location(2, 3)).unwrap();

        // solving never touches the player's board
        let solution = game.solve(&SolverConfig::default()).unwrap();
        assert_eq!(game.board().lines(), vec![line(Location(2, 2), Location(2, 3))]);
        assert_eq!(game.status(), &SolveStatus::Solved(solution.clone()));

        game.reset();
        let mut player = Autoplayer::new(&solution);
        assert_eq!(player.moves().len(), solution.lines().len());

        let first = player.step(&mut game).unwrap().unwrap();
        assert!(game.board().edge_exists(first.from, first.to));
        assert_eq!(player.undo(&mut game), Some(first));
        assert!(game.board().lines().is_empty());
        assert_eq!(player.undo(&mut game), None);

        assert_eq!(player.play_all(&mut game).unwrap(), solution.lines().len());
        assert!(player.is_finished());
        assert!(game.check_solved());
        assert_eq!(game.history().len(), solution.lines().len());
        assert_eq!(player.step(&mut game).unwrap(), None);
    }

    #[test]
    fn autoplayer_undo_skips_player_lines() {
        let mut game = Game::new(corners());
        let solution = game.solve(&SolverConfig::default()).unwrap();
        let mut player = Autoplayer::new(&solution);

        let first = player.step(&mut game).unwrap().unwrap();
        let second = player.step(&mut game).unwrap().unwrap();
        assert_eq!(first.origin, Origin::Autoplayer);

        // the player erases the first autoplayed line and draws it again
        assert_eq!(game.undo_move(first.from, first.to), Ok(true));
        assert_eq!(game.make_move(first.to, first.from), Ok(true));
        assert_eq!(game.history().iter().map(|m| m.origin).collect_vec(), vec![Origin::Autoplayer, Origin::Player]);

        assert_eq!(player.undo(&mut game), Some(second));
        assert_eq!(player.undo(&mut game), None);
        assert!(game.board().edge_exists(first.from, first.to));
        assert!(!game.board().edge_exists(second.from, second.to));

        // the replay picks up from the undone line and passes over the player's
        assert_eq!(player.play_all(&mut game).unwrap(), solution.lines().len() - 1);
        assert!(game.check_solved());
    }

    #[test]
    fn game_unsolvable() {
        let mut game = Game::new("3\n2,2,2\n".parse().unwrap());
        assert_eq!(game.status(), &SolveStatus::NotAttempted);
        assert_eq!(game.solve(&SolverConfig::default()), Err(SolverFailure::NoSolutionFound));
        assert_eq!(game.status(), &SolveStatus::Unsolvable);
    }
}
