use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state, the board has no mines yet
    #[default]
    NotStarted,
    /// Board populated by the first click
    InProgress,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameState {
    /// Indicates the game has not started yet
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Represents a game from start to finish
///
/// A session never goes back to [`GameState::NotStarted`]; use [`Game::reset`]
/// or [`Game::with_difficulty`] to get a fresh one.
#[derive(Clone, Debug)]
pub struct Game<G = RandomMineGenerator> {
    board: Board,
    difficulty: Difficulty,
    options: GameOptions,
    state: GameState,
    mines_remaining: isize,
    generator: G,
}

impl Game {
    pub fn new(difficulty: Difficulty, options: GameOptions) -> Self {
        Self::with_generator(difficulty, options, RandomMineGenerator::from_entropy())
    }
}

impl<G: MineGenerator> Game<G> {
    pub fn with_generator(difficulty: Difficulty, options: GameOptions, generator: G) -> Self {
        Self {
            board: Board::new(difficulty.size()),
            difficulty,
            options,
            state: GameState::NotStarted,
            mines_remaining: difficulty.mines as isize,
            generator,
        }
    }

    /// Fresh session with the same difficulty and options.
    pub fn reset(self) -> Self {
        let difficulty = self.difficulty;
        self.with_difficulty(difficulty)
    }

    /// Fresh session on another board, keeping the options.
    pub fn with_difficulty(self, difficulty: Difficulty) -> Self {
        log::debug!("New game: {}", difficulty);
        Self::with_generator(difficulty, self.options, self.generator)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn options(&self) -> GameOptions {
        self.options
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_remaining(&self) -> isize {
        self.mines_remaining
    }

    pub fn view_state(&self, coords: Coord2) -> ViewState {
        self.board.view_state(coords)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.board.validate_coords(coords)
    }

    pub fn drain_change_feed(&mut self) -> Vec<Coord2> {
        self.board.drain_changes()
    }

    pub fn set_option(&mut self, option: GameOptions, enabled: bool) {
        let had_marks = self.options.question_marks();
        self.options.set(option, enabled);
        log::debug!("Options now {:?}", self.options);

        if had_marks && !self.options.question_marks() {
            self.board.clear_question_marks();
        }
    }

    pub fn toggle_option(&mut self, option: GameOptions) {
        self.set_option(option, !self.options.contains(option));
    }

    pub fn left_click_cell(&mut self, coords: Coord2) -> GameState {
        if self.state.is_final() {
            return self.state;
        }
        self.start(Some(coords));

        let outcome = self
            .board
            .left_click(coords, self.options.chord_on_revealed());
        self.settle(outcome)
    }

    pub fn right_click_cell(&mut self, coords: Coord2) -> GameState {
        if self.state.is_final() {
            return self.state;
        }
        self.start(None);

        let outcome = self.board.right_click(coords, self.options.question_marks());
        self.mines_remaining += outcome.budget_delta();
        self.evaluate_win();
        self.state
    }

    pub fn chord_click_cell(&mut self, coords: Coord2) -> GameState {
        if self.state != GameState::InProgress {
            return self.state;
        }

        match self.board.check_chord(coords) {
            ChordAction::Reveal => {
                let outcome = self.board.chord_reveal(coords);
                return self.settle(outcome);
            }
            ChordAction::Flag if self.options.flag_chord() => {
                let flagged = self.board.chord_flag(coords);
                self.mines_remaining -= flagged as isize;
            }
            ChordAction::Flag | ChordAction::None => {}
        }
        self.evaluate_win();
        self.state
    }

    /// Populates the board on the first accepted click.
    fn start(&mut self, first_click: Option<Coord2>) {
        if !self.state.is_initial() {
            return;
        }
        let placed = self.board.populate(
            first_click,
            self.difficulty.mines,
            self.options.avoid_first_click(),
            &mut self.generator,
        );
        if placed != self.difficulty.mines {
            log::warn!(
                "Board holds {} mines instead of {}, counting down from the placed mines",
                placed,
                self.difficulty.mines
            );
            self.mines_remaining = placed as isize;
        }
        self.state = GameState::InProgress;
        log::debug!("Game started at {:?}", first_click);
    }

    fn settle(&mut self, outcome: RevealOutcome) -> GameState {
        if outcome.is_loss() {
            self.board.reveal_all();
            self.state = GameState::Lost;
            log::debug!("Game lost");
        } else {
            self.evaluate_win();
        }
        self.state
    }

    fn evaluate_win(&mut self) {
        if self.state != GameState::InProgress {
            return;
        }
        if !self.options.auto_flag_on_win() && self.mines_remaining != 0 {
            return;
        }
        if !self.board.all_hidden_within_mine_budget(self.mines_remaining) {
            return;
        }

        if self.mines_remaining != 0 {
            let flagged = self.board.flag_all_hidden();
            log::debug!("Auto-flagged {} remaining mines", flagged);
        }
        self.mines_remaining = 0;
        self.state = GameState::Won;
        log::debug!("Game won");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_game(
        size: Coord2,
        mines: &[Coord2],
        options: GameOptions,
    ) -> Game<FixedMineGenerator> {
        let difficulty = Difficulty::new_unchecked(size.0, size.1, mines.len() as CellCount);
        let generator = FixedMineGenerator::from_mine_coords(size, mines).unwrap();
        Game::with_generator(difficulty, options, generator)
    }

    fn all_coords(size: Coord2) -> impl Iterator<Item = Coord2> {
        (0..size.0).flat_map(move |row| (0..size.1).map(move |col| (row, col)))
    }

    #[test]
    fn first_left_click_opens_mine_free_region() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::AVOID_FIRST_CLICK);
        assert_eq!(game.state(), GameState::NotStarted);
        assert!(!game.board().is_populated());

        assert_eq!(game.left_click_cell((0, 0)), GameState::InProgress);

        assert_eq!(game.view_state((0, 0)), ViewState::Revealed(0));
        assert_eq!(game.view_state((3, 3)), ViewState::Revealed(1));
        assert_eq!(game.view_state((4, 4)), ViewState::Unrevealed);
        let revealed = all_coords((5, 5))
            .filter(|&c| game.board().cell_at(c).is_revealed())
            .count();
        assert_eq!(revealed, 24);
        assert_eq!(game.mines_remaining(), 1);
        assert_eq!(game.drain_change_feed().len(), 24);
    }

    #[test]
    fn right_click_starts_game_and_flags() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::AVOID_FIRST_CLICK);

        assert_eq!(game.right_click_cell((4, 4)), GameState::InProgress);

        assert!(game.board().is_populated());
        assert_eq!(game.view_state((4, 4)), ViewState::Flagged);
        assert_eq!(game.mines_remaining(), 0);
        assert_eq!(game.drain_change_feed(), vec![(4, 4)]);
    }

    #[test]
    fn revealing_every_safe_cell_after_flagging_wins() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::AVOID_FIRST_CLICK);
        game.right_click_cell((4, 4));

        for coords in all_coords((5, 5)).filter(|&c| c != (4, 4)) {
            game.left_click_cell(coords);
        }

        assert_eq!(game.state(), GameState::Won);
        assert!(game.is_finished());
        assert_eq!(game.mines_remaining(), 0);
        assert_eq!(game.view_state((4, 4)), ViewState::Flagged);
    }

    #[test]
    fn win_waits_for_the_last_flag_without_auto_flag() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::empty());
        game.left_click_cell((0, 0));
        assert_eq!(game.state(), GameState::InProgress);

        assert_eq!(game.right_click_cell((4, 4)), GameState::Won);
    }

    #[test]
    fn clicking_a_mine_loses_and_reveals_board() {
        let mut game = fixed_game((5, 5), &[(2, 2), (0, 4)], GameOptions::empty());
        game.right_click_cell((0, 0));
        assert_eq!(game.mines_remaining(), 1);
        game.drain_change_feed();

        assert_eq!(game.left_click_cell((2, 2)), GameState::Lost);

        assert_eq!(game.view_state((2, 2)), ViewState::ExplodedMine);
        assert_eq!(game.view_state((0, 4)), ViewState::RevealedMine);
        assert_eq!(game.view_state((0, 0)), ViewState::FalseFlagged);
        assert_eq!(game.view_state((4, 0)), ViewState::Unrevealed);
        assert_eq!(game.mines_remaining(), 1);
        assert_eq!(game.drain_change_feed(), vec![(2, 2), (0, 0), (0, 4)]);
    }

    #[test]
    fn finished_game_ignores_clicks() {
        let mut game = fixed_game((5, 5), &[(2, 2)], GameOptions::empty());
        game.right_click_cell((4, 4));
        game.left_click_cell((2, 2));
        game.drain_change_feed();

        assert_eq!(game.left_click_cell((4, 0)), GameState::Lost);
        assert_eq!(game.right_click_cell((4, 1)), GameState::Lost);
        assert_eq!(game.chord_click_cell((4, 0)), GameState::Lost);
        assert_eq!(game.view_state((4, 0)), ViewState::Unrevealed);
        assert_eq!(game.view_state((4, 1)), ViewState::Unrevealed);
        assert!(game.drain_change_feed().is_empty());
    }

    #[test]
    fn disabling_question_marks_clears_them() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::QUESTION_MARKS);
        game.right_click_cell((1, 1));
        game.right_click_cell((1, 1));
        assert_eq!(game.view_state((1, 1)), ViewState::QuestionMarked);
        assert_eq!(game.mines_remaining(), 1);
        game.drain_change_feed();

        game.set_option(GameOptions::QUESTION_MARKS, false);

        assert_eq!(game.view_state((1, 1)), ViewState::Unrevealed);
        assert_eq!(game.drain_change_feed(), vec![(1, 1)]);
        assert_eq!(game.mines_remaining(), 1);
    }

    #[test]
    fn flag_cycles_keep_the_budget_balanced() {
        let mut game = fixed_game((5, 5), &[(4, 4), (0, 4)], GameOptions::QUESTION_MARKS);
        let mut seen = vec![];
        for _ in 0..3 {
            game.right_click_cell((2, 2));
            seen.push((game.view_state((2, 2)), game.mines_remaining()));
        }
        assert_eq!(
            seen,
            vec![
                (ViewState::Flagged, 1),
                (ViewState::QuestionMarked, 2),
                (ViewState::Unrevealed, 2),
            ]
        );

        game.toggle_option(GameOptions::QUESTION_MARKS);
        game.right_click_cell((2, 2));
        game.right_click_cell((2, 2));
        assert_eq!(game.view_state((2, 2)), ViewState::Unrevealed);
        assert_eq!(game.mines_remaining(), 2);
    }

    #[test]
    fn over_flagging_goes_negative() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::AUTO_FLAG_ON_WIN);
        game.right_click_cell((0, 0));
        game.right_click_cell((0, 1));
        assert_eq!(game.mines_remaining(), -1);
        assert_eq!(game.state(), GameState::InProgress);
    }

    #[test]
    fn auto_flag_wins_once_only_mines_are_hidden() {
        let mut game = fixed_game((5, 5), &[(4, 4)], GameOptions::AUTO_FLAG_ON_WIN);

        assert_eq!(game.left_click_cell((0, 0)), GameState::Won);

        assert_eq!(game.view_state((4, 4)), ViewState::Flagged);
        assert_eq!(game.mines_remaining(), 0);
        assert!(game.drain_change_feed().contains(&(4, 4)));
    }

    #[test]
    fn chord_click_needs_a_started_game() {
        let mut game = fixed_game((3, 3), &[(0, 1), (2, 1)], GameOptions::empty());
        assert_eq!(game.chord_click_cell((1, 1)), GameState::NotStarted);
        assert!(!game.board().is_populated());
    }

    #[test]
    fn chord_click_reveals_and_wins() {
        let mut game = fixed_game((3, 3), &[(0, 1), (2, 1)], GameOptions::empty());
        game.left_click_cell((1, 1));
        game.right_click_cell((0, 1));
        game.right_click_cell((2, 1));
        assert_eq!(game.mines_remaining(), 0);

        assert_eq!(game.chord_click_cell((1, 1)), GameState::Won);
        assert_eq!(game.view_state((0, 0)), ViewState::Revealed(1));
    }

    #[test]
    fn chord_click_with_wrong_flags_loses() {
        let mut game = fixed_game((3, 3), &[(0, 0), (0, 2)], GameOptions::empty());
        game.left_click_cell((1, 1));
        game.right_click_cell((1, 0));
        game.right_click_cell((1, 2));

        assert_eq!(game.chord_click_cell((1, 1)), GameState::Lost);

        assert_eq!(game.view_state((0, 0)), ViewState::ExplodedMine);
        assert_eq!(game.view_state((0, 2)), ViewState::RevealedMine);
        assert_eq!(game.view_state((1, 0)), ViewState::FalseFlagged);
    }

    #[test]
    fn flag_chord_only_when_enabled() {
        let mut game = fixed_game((4, 1), &[(0, 0), (2, 0)], GameOptions::empty());
        game.left_click_cell((1, 0));
        assert_eq!(game.chord_click_cell((1, 0)), GameState::InProgress);
        assert_eq!(game.view_state((0, 0)), ViewState::Unrevealed);
        assert_eq!(game.mines_remaining(), 2);

        let mut game = fixed_game((4, 1), &[(0, 0), (2, 0)], GameOptions::FLAG_CHORD);
        game.left_click_cell((1, 0));
        assert_eq!(game.chord_click_cell((1, 0)), GameState::InProgress);
        assert_eq!(game.view_state((0, 0)), ViewState::Flagged);
        assert_eq!(game.view_state((2, 0)), ViewState::Flagged);
        assert_eq!(game.mines_remaining(), 0);

        assert_eq!(game.left_click_cell((3, 0)), GameState::Won);
    }

    #[test]
    fn left_click_chord_option() {
        let mut game = fixed_game((3, 3), &[(0, 1), (2, 1)], GameOptions::CHORD_ON_REVEALED);
        game.left_click_cell((1, 1));
        game.right_click_cell((0, 1));
        game.right_click_cell((2, 1));

        assert_eq!(game.left_click_cell((1, 1)), GameState::Won);
    }

    #[test]
    fn first_click_is_blank_with_random_mines() {
        for seed in 0..30 {
            let generator = RandomMineGenerator::new(seed);
            let mut game =
                Game::with_generator(Difficulty::EXPERT, GameOptions::AVOID_FIRST_CLICK, generator);

            assert_eq!(game.left_click_cell((0, 29)), GameState::InProgress);
            assert_eq!(game.view_state((0, 29)), ViewState::Revealed(0));
        }
    }

    #[test]
    fn first_click_is_safe_without_neighborhood() {
        for seed in 0..30 {
            let generator = RandomMineGenerator::new(seed);
            let difficulty = Difficulty::new(9, 9, 71).unwrap();
            let mut game = Game::with_generator(difficulty, GameOptions::empty(), generator);

            assert_ne!(game.left_click_cell((4, 4)), GameState::Lost);
            assert!(game.board().cell_at((4, 4)).is_revealed());
        }
    }

    #[test]
    fn reset_starts_over() {
        let generator = RandomMineGenerator::new(3);
        let mut game =
            Game::with_generator(Difficulty::BEGINNER, GameOptions::QUESTION_MARKS, generator);
        game.left_click_cell((5, 5));
        assert!(game.board().is_populated());

        let game = game.reset();
        assert_eq!(game.state(), GameState::NotStarted);
        assert_eq!(game.difficulty(), Difficulty::BEGINNER);
        assert_eq!(game.options(), GameOptions::QUESTION_MARKS);
        assert_eq!(game.mines_remaining(), 9);
        assert!(!game.board().is_populated());

        let game = game.with_difficulty(Difficulty::EXPERT);
        assert_eq!(game.board().size(), (16, 30));
        assert_eq!(game.mines_remaining(), 99);
    }

    #[test]
    fn mine_budget_follows_placed_mines() {
        // 18 cells cannot hold 30 mines, every cell ends up mined
        let difficulty = Difficulty::new_unchecked(2, 9, 30);
        let generator = RandomMineGenerator::new(5);
        let mut game = Game::with_generator(difficulty, GameOptions::empty(), generator);
        assert_eq!(game.mines_remaining(), 30);

        assert_eq!(game.right_click_cell((0, 0)), GameState::InProgress);
        assert_eq!(game.mines_remaining(), 17);

        for coords in all_coords((2, 9)).skip(1).take(16) {
            game.right_click_cell(coords);
        }
        assert_eq!(game.mines_remaining(), 1);
        assert_eq!(game.right_click_cell((1, 8)), GameState::Won);
        assert_eq!(game.mines_remaining(), 0);
    }

    #[test]
    fn validate_coords_guards_the_board() {
        let game = Game::new(Difficulty::INTERMEDIATE, GameOptions::empty());
        assert_eq!(game.validate_coords((15, 15)), Ok((15, 15)));
        assert_eq!(game.validate_coords((16, 0)), Err(GameError::InvalidCoords));
    }
}
