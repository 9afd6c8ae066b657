use crate::HandState;
use std::collections::HashMap;

/// A memo of values keyed by hand fingerprint.
///
/// A fingerprint only identifies the hand, so a table is valid for one shoe snapshot (and one
/// dealer up card and peek state) at a time. Clear it whenever any of those change.
#[derive(Debug, Default, Clone)]
pub struct TranspositionTable<T> {
    data: HashMap<u64, T>,
}

impl<T: Copy> TranspositionTable<T> {
    pub fn new() -> TranspositionTable<T> {
        TranspositionTable {
            data: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn get(&self, hand: &HandState) -> Option<T> {
        self.data.get(&hand.fingerprint()).copied()
    }

    pub fn insert(&mut self, hand: &HandState, value: T) {
        self.data.insert(hand.fingerprint(), value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The three memo tables of one evaluation context.
#[derive(Debug, Default, Clone)]
pub struct TranspositionTables {
    /// Best value of a player hand over every option still open to it.
    pub player: TranspositionTable<f64>,
    /// Value of standing on a player hand.
    pub player_stand: TranspositionTable<f64>,
    /// Value of the dealer's turn for the player hand currently being stood on.
    pub dealer: TranspositionTable<f64>,
}

impl TranspositionTables {
    pub fn new() -> Self {
        TranspositionTables {
            player: TranspositionTable::with_capacity(1 << 12),
            player_stand: TranspositionTable::with_capacity(1 << 12),
            dealer: TranspositionTable::with_capacity(1 << 10),
        }
    }

    pub fn clear(&mut self) {
        self.player.clear();
        self.player_stand.clear();
        self.dealer.clear();
    }

    pub fn len(&self) -> usize {
        self.player.len() + self.player_stand.len() + self.dealer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
