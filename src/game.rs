use std::fmt;

use log::{debug, info};
use rand::Rng;

use crate::solver::{find_best_move, Meld};
use crate::{Color, NotFoundError, Tile, TileCollection};

/// Physical copies of each (color, number) pair in the pool.
pub const COPIES_PER_TILE: usize = 2;
/// Total tiles in a full bag: 4 colors x 13 numbers x 2 copies.
pub const POOL_SIZE: usize = 104;
/// Tiles dealt to each player at the start of a game.
pub const STARTING_HAND: usize = 14;

/// The face-down pool of tiles players draw from.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: TileCollection,
}

impl TileBag {
    /// A fresh bag holding two copies of every tile.
    pub fn full() -> Self {
        let mut tiles = TileCollection::new();
        for color in Color::ALL {
            for number in 1..=13 {
                for _ in 0..COPIES_PER_TILE {
                    tiles.insert(Tile::new(color, number));
                }
            }
        }
        TileBag { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Draw one tile uniformly at random, without replacement. `None`
    /// when the bag is empty.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Tile> {
        if self.tiles.is_empty() {
            return None;
        }
        let at = rng.random_range(0..self.tiles.len());
        Some(self.tiles.remove_at(at))
    }

    /// Draw up to `count` tiles into a fresh collection.
    pub fn draw_many(&mut self, count: usize, rng: &mut impl Rng) -> TileCollection {
        let mut drawn = TileCollection::new();
        for _ in 0..count {
            match self.draw(rng) {
                Some(tile) => drawn.insert(tile),
                None => break,
            }
        }
        drawn
    }
}

/// One seat at the table: a name and a hand of tiles.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    hand: TileCollection,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            hand: TileCollection::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &TileCollection {
        &self.hand
    }

    pub fn give(&mut self, tile: Tile) {
        self.hand.insert(tile);
    }

    pub fn give_all(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.hand.insert_all(tiles);
    }

    pub fn has_won(&self) -> bool {
        self.hand.is_empty()
    }

    /// The melds this player would lay down this turn: the
    /// count-objective decomposition of the current hand. Empty when
    /// nothing is playable.
    pub fn planned_move(&self) -> Vec<Meld> {
        find_best_move(&self.hand).by_count.melds
    }

    /// Remove the tiles of the given melds from the hand.
    pub fn lay_down(&mut self, melds: &[Meld]) -> Result<(), NotFoundError> {
        for meld in melds {
            for &tile in meld.tiles() {
                self.hand.remove(tile)?;
            }
        }
        Ok(())
    }
}

/// A self-contained game: players, the bag, and the table of laid-down
/// melds. Turns advance round-robin.
#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    bag: TileBag,
    table: Vec<Meld>,
    up: usize,
}

impl Game {
    /// Start a game: build the full bag and deal each player a starting
    /// hand.
    pub fn new<S: AsRef<str>>(names: &[S], rng: &mut impl Rng) -> Self {
        let mut bag = TileBag::full();
        let players = names
            .iter()
            .map(|name| {
                let mut player = Player::new(name.as_ref());
                player.give_all(bag.draw_many(STARTING_HAND, rng).iter().copied());
                player
            })
            .collect();
        Game {
            players,
            bag,
            table: Vec::new(),
            up: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn table(&self) -> &[Meld] {
        &self.table
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    /// The game ends when a player empties their hand or the bag runs
    /// dry.
    pub fn is_over(&self) -> bool {
        self.players.iter().any(Player::has_won) || self.bag.is_empty()
    }

    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.has_won())
    }

    /// Play one turn: the player up either commits their best
    /// decomposition to the table or draws a tile.
    pub fn play_round(&mut self, rng: &mut impl Rng) -> Result<(), NotFoundError> {
        let up = self.up;
        let player = &mut self.players[up];
        let melds = player.planned_move();

        if melds.is_empty() {
            match self.bag.draw(rng) {
                Some(tile) => {
                    debug!("{} drew {}", player.name(), tile);
                    player.give(tile);
                    info!(
                        "{} draws a tile ({} in hand)",
                        player.name(),
                        player.hand().len()
                    );
                }
                None => info!("{} passes, the bag is empty", player.name()),
            }
        } else {
            player.lay_down(&melds)?;
            for meld in &melds {
                info!("{} lays down {}", player.name(), meld);
            }
            self.table.extend(melds);
        }

        self.up = (self.up + 1) % self.players.len();
        Ok(())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, player) in self.players.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", player.name(), player.hand().len())?;
        }
        write!(f, " | bag {}", self.bag.len())?;
        if !self.table.is_empty() {
            write!(f, " | table:")?;
            for meld in &self.table {
                write!(f, " [{}]", meld)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_bag_holds_two_of_each() {
        let bag = TileBag::full();
        assert_eq!(bag.len(), POOL_SIZE);

        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = bag;
        let mut drawn = TileCollection::new();
        while let Some(tile) = bag.draw(&mut rng) {
            drawn.insert(tile);
        }

        assert_eq!(drawn.len(), POOL_SIZE);
        assert!(bag.is_empty());
        for color in Color::ALL {
            for number in 1..=13 {
                let copies = drawn
                    .iter()
                    .filter(|t| **t == Tile::new(color, number))
                    .count();
                assert_eq!(copies, COPIES_PER_TILE);
            }
        }
    }

    #[test]
    fn test_draw_from_empty_bag() {
        let mut bag = TileBag::full();
        let mut rng = StdRng::seed_from_u64(1);
        let _ = bag.draw_many(POOL_SIZE, &mut rng);
        assert!(bag.draw(&mut rng).is_none());
        assert!(bag.draw_many(3, &mut rng).is_empty());
    }

    #[test]
    fn test_new_game_deals_starting_hands() {
        let mut rng = StdRng::seed_from_u64(42);
        let game = Game::new(&["Michael", "Thomas", "Lucas", "Jian"], &mut rng);

        assert_eq!(game.players().len(), 4);
        for player in game.players() {
            assert_eq!(player.hand().len(), STARTING_HAND);
        }
        assert_eq!(game.bag().len(), POOL_SIZE - 4 * STARTING_HAND);
        assert!(game.table().is_empty());
    }

    #[test]
    fn test_player_lays_down_planned_move() {
        let mut player = Player::new("Ada");
        player.give_all("r1.r2.r3".parse::<TileCollection>().unwrap().iter().copied());

        let melds = player.planned_move();
        assert_eq!(melds.len(), 1);
        player.lay_down(&melds).unwrap();
        assert!(player.has_won());
    }

    #[test]
    fn test_lay_down_missing_tile_fails() {
        let mut player = Player::new("Ada");
        player.give(Tile::new(Color::Red, 1));

        let mut rich = Player::new("Eve");
        rich.give_all("y5.u5.k5".parse::<TileCollection>().unwrap().iter().copied());
        let melds = rich.planned_move();
        assert!(player.lay_down(&melds).is_err());
    }

    #[test]
    fn test_round_draws_when_nothing_playable() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = Game::new(&["Solo"], &mut rng);
        // Force a hand that cannot contain any meld.
        game.players[0].hand = "r1.y5.k13".parse().unwrap();

        game.play_round(&mut rng).unwrap();
        assert_eq!(game.players()[0].hand().len(), 4);
        assert_eq!(game.bag().len(), POOL_SIZE - STARTING_HAND - 1);
        assert!(game.table().is_empty());
    }

    #[test]
    fn test_round_commits_playable_melds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = Game::new(&["Solo"], &mut rng);
        game.players[0].hand = "r1.r2.r3.k13".parse().unwrap();

        game.play_round(&mut rng).unwrap();
        assert_eq!(game.players()[0].hand().to_string(), "k13");
        assert_eq!(game.table().len(), 1);
        assert_eq!(game.table()[0].to_string(), "r1.r2.r3");
    }

    #[test]
    fn test_game_over_on_empty_hand() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = Game::new(&["Solo"], &mut rng);
        game.players[0].hand = "r5.y5.u5".parse().unwrap();

        assert!(!game.is_over());
        game.play_round(&mut rng).unwrap();
        assert!(game.is_over());
        assert_eq!(game.winner().map(Player::name), Some("Solo"));
    }
}
