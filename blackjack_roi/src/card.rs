use crate::EngineError;
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumIter;

pub const NUMBER_OF_RANKS: usize = 13;
pub const NUMBER_OF_DEALER_RANKS: usize = 10;

/// Player ranks in index order. Ten, Jack, Queen and King are kept apart here, which is
/// what split-by-rank needs.
pub const ALL_RANKS: [Rank; NUMBER_OF_RANKS] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

/// The dealer's view of the ranks: every ten-valued card is represented by `Rank::Ten`.
pub const DEALER_RANKS: [Rank; NUMBER_OF_DEALER_RANKS] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Two = 0,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Blackjack value of the rank, counting an ace as 11.
    pub fn value(self) -> u16 {
        match self {
            Rank::Ace => 11,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other as u16 + 2,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    pub fn is_ten_value(self) -> bool {
        matches!(self, Rank::Ten | Rank::Jack | Rank::Queen | Rank::King)
    }

    /// Index of the rank in the 10-bucket dealer view.
    pub fn dealer_index(self) -> usize {
        match self {
            Rank::Ace => 9,
            rank if rank.is_ten_value() => 8,
            rank => rank as usize,
        }
    }

    /// The rank the dealer view uses for this card.
    pub fn dealer_rank(self) -> Rank {
        if self.is_ten_value() {
            Rank::Ten
        } else {
            self
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            rank => (b'0' + rank.value() as u8) as char,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_RANKS
            .get(value as usize)
            .copied()
            .ok_or(EngineError::InvalidRank(value))
    }
}

impl FromStr for Rank {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            other => {
                return Err(EngineError::InvalidArgument(format!(
                    "{other:?} is not a card rank"
                )))
            }
        };
        Ok(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Club = 0,
    Diamond,
    Heart,
    Spade,
}

impl TryFrom<u8> for Suit {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Suit::Club),
            1 => Ok(Suit::Diamond),
            2 => Ok(Suit::Heart),
            3 => Ok(Suit::Spade),
            _ => Err(EngineError::InvalidSuit(value)),
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Club => 'C',
            Suit::Diamond => 'D',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        };
        write!(f, "{symbol}")
    }
}

/// A physical card. Only the rank takes part in any valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn from_indices(rank: u8, suit: u8) -> Result<Self, EngineError> {
        Ok(Card {
            rank: rank.try_into()?,
            suit: suit.try_into()?,
        })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.suit as u8 * NUMBER_OF_RANKS as u8 + card.rank as u8
    }
}

impl TryFrom<u8> for Card {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 52 {
            return Err(EngineError::InvalidCard(value));
        }
        Card::from_indices(value % NUMBER_OF_RANKS as u8, value / NUMBER_OF_RANKS as u8)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}
