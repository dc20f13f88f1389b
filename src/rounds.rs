/// The participant expected at the keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Player {
    #[strum(serialize = "player 1")]
    One,
    #[strum(serialize = "player 2")]
    Two,
}

impl Player {
    /// Zero-based index, 0 or 1
    pub fn index(self) -> u8 {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// One-based number shown to people
    pub fn number(self) -> u8 {
        self.index() + 1
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Round and player bookkeeping for one session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundCounter {
    current_cycle: u32,
    current_player: Player,
    total_cycles: u32,
}

impl RoundCounter {
    /// `total_cycles == 0` means unlimited
    pub fn new(total_cycles: u32) -> Self {
        Self {
            current_cycle: 1,
            current_player: Player::One,
            total_cycles,
        }
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn next_player(&self) -> Player {
        self.current_player.other()
    }

    pub fn total_cycles(&self) -> u32 {
        self.total_cycles
    }

    pub fn is_unlimited(&self) -> bool {
        self.total_cycles == 0
    }

    pub fn set_total_cycles(&mut self, total_cycles: u32) {
        self.total_cycles = total_cycles;
    }

    /// Hand the keyboard to the other player; a new cycle begins when
    /// player 1 is up again.
    pub fn advance(&mut self) {
        self.current_player = self.current_player.other();
        if self.current_player == Player::One {
            self.current_cycle += 1;
        }
    }

    pub fn reset(&mut self) {
        self.current_cycle = 1;
        self.current_player = Player::One;
    }

    /// Whether another turn follows the one that just ended.
    ///
    /// The last disjunct holds regardless of the cycle count, so a capped
    /// session still grants a turn after player 1 finishes at the limit.
    /// Kept as is until the intended behaviour is settled.
    pub fn has_more_rounds(&self) -> bool {
        self.total_cycles == 0
            || self.current_cycle < self.total_cycles
            || self.current_player == Player::One
    }
}

impl Default for RoundCounter {
    fn default() -> Self {
        Self::new(0)
    }
}
