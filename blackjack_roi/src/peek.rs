use crate::{DealerShoe, EngineError, Rank, Shoe};

/// What the dealer's hole-card check has revealed.
///
/// Once the dealer has looked under a ten or an ace and found no blackjack, the hidden hole card
/// is known not to complete one. Every draw probability until the hole card is turned over is
/// conditioned on that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeekState {
    #[default]
    Unknown,
    /// Ten up, so the hole card is not an ace.
    ConfirmedNoBlackjackViaTen,
    /// Ace up, so the hole card is not ten-valued.
    ConfirmedNoBlackjackViaAce,
}

impl PeekState {
    /// The state after a successful check under `up_card`.
    pub fn confirm(up_card: Rank) -> Result<Self, EngineError> {
        if up_card.is_ace() {
            Ok(PeekState::ConfirmedNoBlackjackViaAce)
        } else if up_card.is_ten_value() {
            Ok(PeekState::ConfirmedNoBlackjackViaTen)
        } else {
            Err(EngineError::InvalidState(format!(
                "the dealer does not check for blackjack under a {up_card}"
            )))
        }
    }

    pub fn is_confirmed(self) -> bool {
        self != PeekState::Unknown
    }

    /// Whether this state is possible with `up_card` showing.
    pub fn is_consistent_with(self, up_card: Rank) -> bool {
        match self {
            PeekState::Unknown => true,
            PeekState::ConfirmedNoBlackjackViaTen => up_card.is_ten_value(),
            PeekState::ConfirmedNoBlackjackViaAce => up_card.is_ace(),
        }
    }

    /// Whether the hole card cannot be of `rank`.
    pub fn excludes(self, rank: Rank) -> bool {
        match self {
            PeekState::Unknown => false,
            PeekState::ConfirmedNoBlackjackViaTen => rank.is_ace(),
            PeekState::ConfirmedNoBlackjackViaAce => rank.is_ten_value(),
        }
    }

    fn excluded_in_shoe(self, shoe: &Shoe) -> u16 {
        match self {
            PeekState::Unknown => 0,
            PeekState::ConfirmedNoBlackjackViaTen => shoe.remaining(Rank::Ace),
            PeekState::ConfirmedNoBlackjackViaAce => shoe.ten_value_count(),
        }
    }

    fn excluded_in_dealer_shoe(self, shoe: &DealerShoe) -> u16 {
        match self {
            PeekState::Unknown => 0,
            PeekState::ConfirmedNoBlackjackViaTen => shoe.remaining(Rank::Ace),
            PeekState::ConfirmedNoBlackjackViaAce => shoe.remaining(Rank::Ten),
        }
    }
}

/// Probability that the dealer's next card is `rank`.
///
/// `peek` only matters for the hole card; pass `PeekState::Unknown` for later draws.
pub fn dealer_draw_probability(
    peek: PeekState,
    shoe: &DealerShoe,
    rank: Rank,
) -> Result<f64, EngineError> {
    if peek.excludes(rank) {
        return Ok(0.0);
    }
    let candidates = shoe.total() - peek.excluded_in_dealer_shoe(shoe);
    if candidates == 0 {
        return Err(EngineError::ShoeExhausted("the dealer's draw"));
    }
    Ok(shoe.remaining(rank) as f64 / candidates as f64)
}

/// Probability that the player's next card is `rank` while the hole card is still face down.
///
/// The shoe still holds the hole card. Without a confirmed peek every unseen card is equally
/// likely. With one, the hole card is one of the non-excluded cards, which shifts weight towards
/// the excluded ranks.
pub fn player_draw_probability(
    peek: PeekState,
    shoe: &Shoe,
    rank: Rank,
) -> Result<f64, EngineError> {
    let total = shoe.total();
    let target_number = shoe.remaining(rank) as f64;
    if !peek.is_confirmed() {
        if total == 0 {
            return Err(EngineError::ShoeExhausted("the player's draw"));
        }
        return Ok(target_number / total as f64);
    }

    let candidates = total - peek.excluded_in_shoe(shoe);
    if candidates == 0 || total < 2 {
        return Err(EngineError::ShoeExhausted("the player's draw"));
    }
    let p_hole_card_is_target_card = if peek.excludes(rank) {
        0.0
    } else {
        target_number / candidates as f64
    };
    Ok((target_number - p_hole_card_is_target_card) / (total - 1) as f64)
}
