//! Static catalogs
//!
//! Games and currencies known to the casino. These never change at runtime.

/// Currency all monetary amounts are normalized into
pub const SETTLEMENT_CURRENCY: &str = "EUR";

/// Currencies accepted on bet and deposit events
pub const CURRENCIES: &[&str] = &["EUR", "USD", "GBP", "NZD", "BTC"];

/// A game offered by the casino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub id: i64,
    pub title: &'static str,
}

pub const GAMES: &[Game] = &[
    Game { id: 100, title: "Rocket Dice" },
    Game { id: 101, title: "Sweet Bonanza" },
    Game { id: 102, title: "Book of Dead" },
    Game { id: 103, title: "Gates of Olympus" },
    Game { id: 104, title: "Starburst" },
    Game { id: 105, title: "Lightning Roulette" },
    Game { id: 106, title: "Wolf Gold" },
    Game { id: 107, title: "Crazy Time" },
    Game { id: 108, title: "Big Bass Bonanza" },
    Game { id: 109, title: "Blackjack Classic" },
];

/// Look up a game by id
pub fn game_by_id(id: i64) -> Option<&'static Game> {
    GAMES.iter().find(|game| game.id == id)
}

/// Check whether a currency code is accepted
pub fn is_supported_currency(code: &str) -> bool {
    CURRENCIES.contains(&code)
}
