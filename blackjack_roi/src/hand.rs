use crate::card::{ALL_RANKS, NUMBER_OF_RANKS};
use crate::{EngineError, Rank};

pub const MAX_SPLIT_LEVEL: u8 = 4;
pub const MAX_PLAYER_CARDS: usize = 20;

const FINGERPRINT_BASE: u64 = 23;
const POW_BASE: [u64; NUMBER_OF_RANKS] = get_powers_of_base();

/// `POW_BASE[i]` is the positional weight of rank `i`. Two has the most significant digit.
const fn get_powers_of_base() -> [u64; NUMBER_OF_RANKS] {
    let mut ret: [u64; NUMBER_OF_RANKS] = [0; NUMBER_OF_RANKS];
    ret[NUMBER_OF_RANKS - 1] = 1;

    let mut i = NUMBER_OF_RANKS - 1;
    while i > 0 {
        ret[i - 1] = ret[i] * FINGERPRINT_BASE;
        i -= 1;
    }

    ret
}

/// Fingerprint polynomial of the empty hand, every digit being `0 + 1`.
const EMPTY_POLYNOMIAL: u64 = {
    let mut sum = 0;
    let mut i = 0;
    while i < NUMBER_OF_RANKS {
        sum += POW_BASE[i];
        i += 1;
    }
    sum
};

/// An order-independent hand: how many cards of each rank it holds, plus the running score.
///
/// `insert` and `remove_last` are exact inverses, so a hand can be walked down a game tree
/// and back without copying. The fingerprint is a base-23 number with one digit per rank
/// (`count + 1`), scaled by `split_level + 1`. It is updated with every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandState {
    counts: [u8; NUMBER_OF_RANKS],
    polynomial: u64,
    score: u16,
    cards: u8,
    aces: u8,
    soft_aces: u8,
    split_level: u8,
    first: Option<Rank>,
}

impl Default for HandState {
    fn default() -> Self {
        Self::new()
    }
}

impl HandState {
    pub fn new() -> Self {
        HandState {
            counts: [0; NUMBER_OF_RANKS],
            polynomial: EMPTY_POLYNOMIAL,
            score: 0,
            cards: 0,
            aces: 0,
            soft_aces: 0,
            split_level: 0,
            first: None,
        }
    }

    pub fn from_ranks(ranks: &[Rank]) -> Self {
        let mut hand = Self::new();
        for &rank in ranks {
            hand.insert(rank);
        }
        hand
    }

    /// The dealer's hand, holding only the up card. Ten-valued cards are folded to `Rank::Ten`.
    pub fn dealer(up_card: Rank) -> Self {
        Self::from_ranks(&[up_card.dealer_rank()])
    }

    /// Marks this hand as the product of `split_level` splits.
    pub fn with_split_level(mut self, split_level: u8) -> Result<Self, EngineError> {
        if split_level > MAX_SPLIT_LEVEL {
            return Err(EngineError::InvalidArgument(format!(
                "split level {split_level} is above the maximum of {MAX_SPLIT_LEVEL}"
            )));
        }
        self.split_level = split_level;
        Ok(self)
    }

    pub fn insert(&mut self, rank: Rank) {
        if self.cards == 0 {
            self.first = Some(rank);
        }
        self.counts[rank.index()] += 1;
        self.polynomial += POW_BASE[rank.index()];
        self.cards += 1;
        self.score += rank.value();
        if rank.is_ace() {
            self.aces += 1;
            self.soft_aces += 1;
        }
        while self.score > 21 && self.soft_aces > 0 {
            self.score -= 10;
            self.soft_aces -= 1;
        }
    }

    /// Undoes the latest `insert(rank)`.
    pub fn remove_last(&mut self, rank: Rank) {
        debug_assert!(self.counts[rank.index()] > 0);
        self.counts[rank.index()] -= 1;
        self.polynomial -= POW_BASE[rank.index()];
        self.cards -= 1;
        if rank.is_ace() {
            self.aces -= 1;
            if self.soft_aces > 0 {
                self.soft_aces -= 1;
                self.score -= 11;
            } else {
                self.score -= 1;
            }
        } else {
            self.score -= rank.value();
        }
        // A hard ace becomes soft again once there is room for it.
        if self.score <= 11 && self.aces > self.soft_aces {
            self.score += 10;
            self.soft_aces += 1;
        }
        if self.cards == 0 {
            self.first = None;
        }
    }

    /// Splits a pair: the second card leaves the hand and the split level goes up.
    /// Returns the removed rank, to be handed back to `unsplit`.
    pub fn split(&mut self) -> Result<Rank, EngineError> {
        let (_, second) = self.pair().ok_or_else(|| {
            EngineError::InvalidState(String::from("only a two-card hand can be split"))
        })?;
        if self.split_level >= MAX_SPLIT_LEVEL {
            return Err(EngineError::InvalidState(format!(
                "a hand cannot be split more than {MAX_SPLIT_LEVEL} times"
            )));
        }
        self.remove_last(second);
        self.split_level += 1;
        Ok(second)
    }

    pub fn unsplit(&mut self, second: Rank) {
        self.split_level -= 1;
        self.insert(second);
    }

    /// The two ranks of a two-card hand, first card first.
    pub fn pair(&self) -> Option<(Rank, Rank)> {
        if self.cards != 2 {
            return None;
        }
        let first = self.first?;
        let second = if self.counts[first.index()] == 2 {
            first
        } else {
            ALL_RANKS
                .into_iter()
                .find(|&rank| rank != first && self.counts[rank.index()] > 0)?
        };
        Some((first, second))
    }

    pub fn fingerprint(&self) -> u64 {
        self.polynomial * (self.split_level as u64 + 1)
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn card_count(&self) -> u8 {
        self.cards
    }

    pub fn count(&self, rank: Rank) -> u8 {
        self.counts[rank.index()]
    }

    pub fn aces(&self) -> u8 {
        self.aces
    }

    pub fn soft_aces(&self) -> u8 {
        self.soft_aces
    }

    pub fn is_soft(&self) -> bool {
        self.soft_aces > 0
    }

    pub fn split_level(&self) -> u8 {
        self.split_level
    }

    pub fn first_rank(&self) -> Option<Rank> {
        self.first
    }

    pub fn is_bust(&self) -> bool {
        self.score > 21
    }

    /// Two cards totalling 21, whether or not the hand came from a split.
    pub fn is_blackjack(&self) -> bool {
        self.cards == 2 && self.score == 21
    }

    /// A blackjack dealt as the opening hand.
    pub fn is_natural(&self) -> bool {
        self.is_blackjack() && self.split_level == 0
    }

    /// Whether the hand is made of split aces.
    pub fn is_split_aces(&self) -> bool {
        self.split_level > 0 && self.first == Some(Rank::Ace)
    }

    pub fn is_single(&self, rank: Rank) -> bool {
        self.cards == 1 && self.counts[rank.index()] == 1
    }
}
