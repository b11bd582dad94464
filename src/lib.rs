use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod game;
pub mod report;
pub mod solver;

/// The four tile colors, in hand-notation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Black,
}

impl Color {
    /// All colors, in the order used for canonical tile ordering and
    /// run enumeration.
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Black];

    /// Position of this color in [`Color::ALL`] (0-3).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The notation letter for this color.
    pub fn letter(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Yellow => 'y',
            Color::Blue => 'u',
            Color::Black => 'k',
        }
    }

    /// Look up a color by its notation letter.
    pub fn from_letter(letter: char) -> Option<Color> {
        match letter {
            'r' => Some(Color::Red),
            'y' => Some(Color::Yellow),
            'u' => Some(Color::Blue),
            'k' => Some(Color::Black),
            _ => None,
        }
    }
}

/// Error from parsing hand notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty tile token")]
    EmptyToken,
    #[error("unrecognized color letter '{0}'")]
    UnknownColor(char),
    #[error("invalid tile number '{0}'")]
    BadNumber(String),
    #[error("tile number {0} out of range 1-13")]
    NumberOutOfRange(u8),
}

/// Removal of a tile value that is not present in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tile {0} not found in collection")]
pub struct NotFoundError(pub Tile);

/// A single tile: one of four colors and a number 1-13.
///
/// Tiles are immutable values; two tiles with equal color and number are
/// interchangeable. The physical game has two copies of each, so a
/// collection may hold duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    color: Color,
    number: u8,
}

impl Tile {
    /// Create a new tile. Panics if `number` is outside 1-13; use the
    /// notation parser for untrusted input.
    pub fn new(color: Color, number: u8) -> Self {
        assert!((1..=13).contains(&number), "Number must be 1-13");
        Tile { color, number }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    /// Canonical sort key: colors in notation order, numbers ascending
    /// within a color. Used only for ordering, never for identity.
    pub fn order_key(&self) -> u8 {
        self.color.index() * 13 + self.number
    }

    /// Parse a notation token: one color letter followed by a 1-2 digit
    /// number, e.g. `r13`, `y1`, `u7`, `k9`.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        let mut chars = token.chars();
        let letter = chars.next().ok_or(ParseError::EmptyToken)?;
        let color = Color::from_letter(letter).ok_or(ParseError::UnknownColor(letter))?;

        let digits = chars.as_str();
        let number: u8 = digits
            .parse()
            .map_err(|_| ParseError::BadNumber(digits.to_string()))?;
        if !(1..=13).contains(&number) {
            return Err(ParseError::NumberOutOfRange(number));
        }

        Ok(Tile::new(color, number))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.letter(), self.number)
    }
}

/// An ordered multiset of tiles, always sorted by [`Tile::order_key`].
///
/// Every collection owns its backing storage; filters allocate fresh
/// storage, so mutating a filtered result never touches the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCollection {
    tiles: Vec<Tile>,
}

impl TileCollection {
    /// Create a new empty collection with its own backing storage.
    pub fn new() -> Self {
        TileCollection { tiles: Vec::new() }
    }

    /// Build a collection from tiles in any order.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut collection = TileCollection::new();
        collection.insert_all(tiles);
        collection
    }

    /// Insert a tile, preserving sort order. A tile goes before the first
    /// existing tile with a strictly greater key, so insertion is stable
    /// among equal keys.
    pub fn insert(&mut self, tile: Tile) {
        let at = self
            .tiles
            .iter()
            .position(|t| tile.order_key() < t.order_key())
            .unwrap_or(self.tiles.len());
        self.tiles.insert(at, tile);
    }

    pub fn insert_all(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        for tile in tiles {
            self.insert(tile);
        }
    }

    /// Remove the first occurrence equal to `tile` by (color, number).
    /// Duplicates beyond the first are left in place.
    pub fn remove(&mut self, tile: Tile) -> Result<(), NotFoundError> {
        match self.tiles.iter().position(|t| *t == tile) {
            Some(at) => {
                self.tiles.remove(at);
                Ok(())
            }
            None => Err(NotFoundError(tile)),
        }
    }

    pub(crate) fn remove_at(&mut self, at: usize) -> Tile {
        self.tiles.remove(at)
    }

    /// Copy of this collection with one occurrence of each given tile
    /// removed, or `None` if they are not all available. Availability is
    /// multiplicity-aware: a tile value consumed by one entry of `tiles`
    /// is not available to the next.
    pub fn without_all(&self, tiles: &[Tile]) -> Option<TileCollection> {
        let mut rest = self.clone();
        for &tile in tiles {
            if rest.remove(tile).is_err() {
                return None;
            }
        }
        Some(rest)
    }

    /// New collection holding only tiles with the given number.
    pub fn filter_by_number(&self, number: u8) -> TileCollection {
        TileCollection {
            tiles: self
                .tiles
                .iter()
                .copied()
                .filter(|t| t.number() == number)
                .collect(),
        }
    }

    /// New collection holding only tiles of the given color.
    pub fn filter_by_color(&self, color: Color) -> TileCollection {
        TileCollection {
            tiles: self
                .tiles
                .iter()
                .copied()
                .filter(|t| t.color() == color)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of the numbers on all tiles.
    pub fn point_sum(&self) -> u32 {
        self.tiles.iter().map(|t| t.number() as u32).sum()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

impl<'a> IntoIterator for &'a TileCollection {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

impl FromStr for TileCollection {
    type Err = ParseError;

    /// Parse dot-separated hand notation, e.g. `r1.r2.r3.y8.k13`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut collection = TileCollection::new();
        for token in s.split('.') {
            collection.insert(Tile::from_token(token)?);
        }
        Ok(collection)
    }
}

impl fmt::Display for TileCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_from_token() {
        assert_eq!(Tile::from_token("r13").unwrap(), Tile::new(Color::Red, 13));
        assert_eq!(Tile::from_token("y1").unwrap(), Tile::new(Color::Yellow, 1));
        assert_eq!(Tile::from_token("u7").unwrap(), Tile::new(Color::Blue, 7));
        assert_eq!(Tile::from_token("k9").unwrap(), Tile::new(Color::Black, 9));

        assert_eq!(Tile::from_token(""), Err(ParseError::EmptyToken));
        assert_eq!(Tile::from_token("x5"), Err(ParseError::UnknownColor('x')));
        assert_eq!(
            Tile::from_token("r"),
            Err(ParseError::BadNumber(String::new()))
        );
        assert_eq!(
            Tile::from_token("rx"),
            Err(ParseError::BadNumber("x".to_string()))
        );
        assert_eq!(
            Tile::from_token("r14"),
            Err(ParseError::NumberOutOfRange(14))
        );
        assert_eq!(Tile::from_token("r0"), Err(ParseError::NumberOutOfRange(0)));
    }

    #[test]
    fn test_tile_display_roundtrip() {
        for color in Color::ALL {
            for number in 1..=13 {
                let tile = Tile::new(color, number);
                assert_eq!(Tile::from_token(&tile.to_string()).unwrap(), tile);
            }
        }
    }

    #[test]
    fn test_order_key_is_color_major() {
        assert!(Tile::new(Color::Red, 13).order_key() < Tile::new(Color::Yellow, 1).order_key());
        assert!(Tile::new(Color::Yellow, 5).order_key() < Tile::new(Color::Yellow, 6).order_key());
        assert!(Tile::new(Color::Blue, 13).order_key() < Tile::new(Color::Black, 1).order_key());
    }

    #[test]
    fn test_insert_keeps_sorted_order() {
        let mut collection = TileCollection::new();
        collection.insert(Tile::new(Color::Black, 2));
        collection.insert(Tile::new(Color::Red, 7));
        collection.insert(Tile::new(Color::Yellow, 1));
        collection.insert(Tile::new(Color::Red, 3));

        let keys: Vec<u8> = collection.iter().map(|t| t.order_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(collection.to_string(), "r3.r7.y1.k2");
    }

    #[test]
    fn test_insert_accepts_duplicates() {
        let mut collection = TileCollection::new();
        collection.insert(Tile::new(Color::Red, 5));
        collection.insert(Tile::new(Color::Red, 5));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_remove_takes_one_occurrence() {
        let mut collection: TileCollection = "r5.r5.y5".parse().unwrap();
        collection.remove(Tile::new(Color::Red, 5)).unwrap();
        assert_eq!(collection.to_string(), "r5.y5");
    }

    #[test]
    fn test_remove_missing_tile_fails() {
        let mut collection: TileCollection = "r1.r2".parse().unwrap();
        let missing = Tile::new(Color::Black, 13);
        assert_eq!(collection.remove(missing), Err(NotFoundError(missing)));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_without_all_respects_multiplicity() {
        let collection: TileCollection = "r5.y5.u5".parse().unwrap();
        let r5 = Tile::new(Color::Red, 5);
        let y5 = Tile::new(Color::Yellow, 5);

        let rest = collection.without_all(&[r5, y5]).unwrap();
        assert_eq!(rest.to_string(), "u5");

        // Only one r5 exists, so asking for two fails.
        assert!(collection.without_all(&[r5, r5]).is_none());
        assert_eq!(collection.to_string(), "r5.y5.u5");
    }

    #[test]
    fn test_filters_are_independent_copies() {
        let source: TileCollection = "r5.y5.y8.k5".parse().unwrap();

        let mut fives = source.filter_by_number(5);
        assert_eq!(fives.to_string(), "r5.y5.k5");
        fives.remove(Tile::new(Color::Red, 5)).unwrap();
        assert_eq!(source.len(), 4);

        let yellows = source.filter_by_color(Color::Yellow);
        assert_eq!(yellows.to_string(), "y5.y8");
    }

    #[test]
    fn test_point_sum() {
        let collection: TileCollection = "r1.y13.k7".parse().unwrap();
        assert_eq!(collection.point_sum(), 21);
        assert_eq!(TileCollection::new().point_sum(), 0);
    }

    #[test]
    fn test_parse_hand_notation() {
        let hand: TileCollection = "u2.u3.u4.y8.k13.r1".parse().unwrap();
        assert_eq!(hand.len(), 6);
        assert_eq!(hand.to_string(), "r1.y8.u2.u3.u4.k13");

        assert!("r1..r2".parse::<TileCollection>().is_err());
        assert!("r1.z2".parse::<TileCollection>().is_err());
        assert!("r1.y".parse::<TileCollection>().is_err());
    }
}
