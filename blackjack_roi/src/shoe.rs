use crate::card::{NUMBER_OF_DEALER_RANKS, NUMBER_OF_RANKS};
use crate::{Card, EngineError, Rank};

pub const CARDS_PER_DECK: u16 = 52;

/// The unseen cards, as a count per rank.
///
/// `remove_one` and `restore_one` are the speculative pair used around recursive branches and
/// must always be matched. `deal` and `insert` are the real mutations; an evaluation that
/// depends on this shoe has to be rebuilt (or its tables cleared) after either of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    counts: [u16; NUMBER_OF_RANKS],
    total: u16,
    capacity: u16,
}

impl Shoe {
    pub fn with_number_of_decks(number_of_decks: u8) -> Result<Self, EngineError> {
        Self::with_capacity(number_of_decks as u16 * CARDS_PER_DECK)
    }

    /// A full shoe of `capacity` cards.
    pub fn with_capacity(capacity: u16) -> Result<Self, EngineError> {
        check_capacity(capacity)?;
        Ok(Shoe {
            counts: [capacity / NUMBER_OF_RANKS as u16; NUMBER_OF_RANKS],
            total: capacity,
            capacity,
        })
    }

    /// A partially dealt shoe. Every count must fit in a shoe of `capacity` cards.
    pub fn from_counts(capacity: u16, counts: [u16; NUMBER_OF_RANKS]) -> Result<Self, EngineError> {
        check_capacity(capacity)?;
        let per_rank = capacity / NUMBER_OF_RANKS as u16;
        if let Some(index) = counts.iter().position(|&count| count > per_rank) {
            return Err(EngineError::InvalidArgument(format!(
                "{} copies of {} do not fit in a shoe of {} cards",
                counts[index], Rank::try_from(index as u8)?, capacity
            )));
        }
        Ok(Shoe {
            counts,
            total: counts.iter().sum(),
            capacity,
        })
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    pub fn number_of_decks(&self) -> u16 {
        self.capacity / CARDS_PER_DECK
    }

    pub fn total(&self) -> u16 {
        self.total
    }

    pub fn remaining(&self, rank: Rank) -> u16 {
        self.counts[rank.index()]
    }

    pub fn counts(&self) -> &[u16; NUMBER_OF_RANKS] {
        &self.counts
    }

    pub fn ten_value_count(&self) -> u16 {
        self.counts[Rank::Ten.index()..=Rank::King.index()].iter().sum()
    }

    pub fn probability_ten_value(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.ten_value_count() as f64 / self.total as f64
    }

    pub fn probability_ace(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.remaining(Rank::Ace) as f64 / self.total as f64
    }

    /// Proportion of the shoe already dealt.
    pub fn penetration(&self) -> f64 {
        1.0 - self.total as f64 / self.capacity as f64
    }

    pub fn remove_one(&mut self, rank: Rank) -> Result<(), EngineError> {
        let count = &mut self.counts[rank.index()];
        if *count == 0 {
            return Err(EngineError::RankExhausted(rank));
        }
        *count -= 1;
        self.total -= 1;
        Ok(())
    }

    pub fn restore_one(&mut self, rank: Rank) {
        self.counts[rank.index()] += 1;
        self.total += 1;
        debug_assert!(self.total <= self.capacity);
    }

    /// Takes a real card out of the shoe.
    pub fn deal(&mut self, rank: Rank) -> Result<(), EngineError> {
        self.remove_one(rank)
    }

    /// Puts a real card back into the shoe.
    pub fn insert(&mut self, rank: Rank) -> Result<(), EngineError> {
        if self.remaining(rank) >= self.capacity / NUMBER_OF_RANKS as u16 {
            return Err(EngineError::RankFull(rank));
        }
        self.restore_one(rank);
        Ok(())
    }

    pub fn deal_card(&mut self, card: &Card) -> Result<(), EngineError> {
        self.deal(card.rank())
    }

    pub fn insert_card(&mut self, card: &Card) -> Result<(), EngineError> {
        self.insert(card.rank())
    }

    /// Puts every card back.
    pub fn refill(&mut self) {
        self.counts = [self.capacity / NUMBER_OF_RANKS as u16; NUMBER_OF_RANKS];
        self.total = self.capacity;
    }

    /// Snapshot of the shoe as the dealer sees it, with the ten-valued ranks merged.
    pub fn dealer_view(&self) -> DealerShoe {
        let mut counts = [0; NUMBER_OF_DEALER_RANKS];
        for (index, count) in self.counts.iter().enumerate() {
            let dealer_index = match index {
                8..=11 => 8,
                12 => 9,
                other => other,
            };
            counts[dealer_index] += count;
        }
        DealerShoe {
            counts,
            total: self.total,
        }
    }
}

fn check_capacity(capacity: u16) -> Result<(), EngineError> {
    if capacity == 0 || capacity % CARDS_PER_DECK != 0 {
        return Err(EngineError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// The shoe with ten-valued ranks folded into one bucket, used while the dealer draws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerShoe {
    counts: [u16; NUMBER_OF_DEALER_RANKS],
    total: u16,
}

impl DealerShoe {
    pub fn total(&self) -> u16 {
        self.total
    }

    pub fn remaining(&self, rank: Rank) -> u16 {
        self.counts[rank.dealer_index()]
    }

    pub fn remove_one(&mut self, rank: Rank) -> Result<(), EngineError> {
        let count = &mut self.counts[rank.dealer_index()];
        if *count == 0 {
            return Err(EngineError::RankExhausted(rank.dealer_rank()));
        }
        *count -= 1;
        self.total -= 1;
        Ok(())
    }

    pub fn restore_one(&mut self, rank: Rank) {
        self.counts[rank.dealer_index()] += 1;
        self.total += 1;
    }
}
