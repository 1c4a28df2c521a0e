//! Level grid parsed from map text
//!
//! Tiles live in a flat row-major array, so lookup by coordinate is a
//! bounds check plus an index. Only the `spent` flag of a tile ever changes
//! after parsing.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::row_major_index;
use crate::{Error, Result};

/// What occupies a tile, decoded from its entity code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Empty,
    Wall,
    Goal,
    Coin,
    /// Any unrecognized code. Blocks sliding like a wall.
    Other(i32),
}

impl Entity {
    pub fn from_code(code: i32) -> Self {
        match code {
            ENTITY_EMPTY => Entity::Empty,
            ENTITY_WALL => Entity::Wall,
            ENTITY_GOAL => Entity::Goal,
            ENTITY_COIN => Entity::Coin,
            other => Entity::Other(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Entity::Empty => ENTITY_EMPTY,
            Entity::Wall => ENTITY_WALL,
            Entity::Goal => ENTITY_GOAL,
            Entity::Coin => ENTITY_COIN,
            Entity::Other(code) => code,
        }
    }
}

/// One cell of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: IVec2,
    /// Raw entity code from the map text
    pub entity: i32,
    /// Coin reward (0 for anything that isn't a coin)
    pub value: u64,
    /// Coin already credited
    pub spent: bool,
}

impl Tile {
    pub fn new(pos: IVec2, entity: i32, coin_value: u64) -> Self {
        let value = if entity == ENTITY_COIN { coin_value } else { 0 };
        Self {
            pos,
            entity,
            value,
            spent: false,
        }
    }

    pub fn kind(&self) -> Entity {
        Entity::from_code(self.entity)
    }

    /// A coin that can still be collected
    pub fn is_live_coin(&self) -> bool {
        self.entity == ENTITY_COIN && !self.spent
    }

    /// Empty space or a spent coin: the slide keeps going
    pub fn is_open(&self) -> bool {
        self.entity == ENTITY_EMPTY || (self.entity == ENTITY_COIN && self.spent)
    }

    pub fn is_goal(&self) -> bool {
        self.entity == ENTITY_GOAL
    }
}

/// The parsed level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Row-major (y * width + x)
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Parse map text using the default coin reward
    pub fn parse(map: &str) -> Result<Self> {
        Self::parse_with_coin_value(map, COIN_VALUE)
    }

    /// Parse map text: trimmed non-empty lines are rows, whitespace-separated
    /// integers are columns. Every row must be as wide as the first.
    pub fn parse_with_coin_value(map: &str, coin_value: u64) -> Result<Self> {
        let mut tiles = Vec::new();
        let mut width = 0usize;
        let mut height = 0usize;

        for (line_idx, line) in map.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let y = height as i32;
            let mut row_len = 0usize;
            for (col_idx, token) in line.split_whitespace().enumerate() {
                let entity: i32 = token.parse().map_err(|_| Error::MalformedMap {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    token: token.to_string(),
                })?;
                tiles.push(Tile::new(IVec2::new(col_idx as i32, y), entity, coin_value));
                row_len += 1;
            }

            if height == 0 {
                width = row_len;
            } else if row_len != width {
                return Err(Error::RaggedRow {
                    line: line_idx + 1,
                    expected: width,
                    found: row_len,
                });
            }
            height += 1;
        }

        if height == 0 {
            return Err(Error::EmptyMap);
        }

        log::debug!("Parsed {}x{} grid ({} tiles)", width, height, tiles.len());

        Ok(Self {
            tiles,
            width,
            height,
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn length(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) fn index(&self, pos: IVec2) -> Option<usize> {
        row_major_index(pos, self.width, self.height)
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        self.index(pos).is_some()
    }

    /// Exact-match lookup; `None` means off-grid
    pub fn lookup(&self, pos: IVec2) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    /// All tiles in parse order (row-major)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mark the tile at `idx` spent and return a copy of it
    pub(crate) fn spend(&mut self, idx: usize) -> Tile {
        let tile = &mut self.tiles[idx];
        tile.spent = true;
        *tile
    }

    /// First tile carrying `entity`, in parse order
    pub fn first_of(&self, entity: Entity) -> Option<&Tile> {
        let code = entity.code();
        self.tiles.iter().find(|t| t.entity == code)
    }

    pub fn coins_remaining(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_live_coin()).count()
    }

    /// Make every coin collectible again
    pub fn reset_spent(&mut self) {
        for tile in &mut self.tiles {
            tile.spent = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_square_map() {
        let grid = Grid::parse(
            "
                1 1 1
                1 0 1
                1 1 1
            ",
        )
        .unwrap();

        assert_eq!(grid.length(), 3);
        assert_eq!(grid.width(), 3);
        let codes: Vec<i32> = grid.tiles().iter().map(|t| t.entity).collect();
        assert_eq!(codes, vec![1, 1, 1, 1, 0, 1, 1, 1, 1]);
        assert_eq!(grid.tiles()[4].pos, IVec2::new(1, 1));
        assert_eq!(grid.tiles()[5].pos, IVec2::new(2, 1));
    }

    #[test]
    fn test_parse_oblong_map() {
        let grid = Grid::parse("1 1 1\n1 0 1\n1 0 1\n1 1 1").unwrap();
        assert_eq!(grid.length(), 4);
        assert_eq!(grid.tiles().len(), 12);
        assert_eq!(grid.lookup(IVec2::new(1, 2)).unwrap().entity, 0);
        assert_eq!(grid.tiles()[11].pos, IVec2::new(2, 3));
    }

    #[test]
    fn test_coin_value_only_on_coins() {
        let grid = Grid::parse_with_coin_value("4 0 3 7", 25).unwrap();
        let values: Vec<u64> = grid.tiles().iter().map(|t| t.value).collect();
        assert_eq!(values, vec![25, 0, 0, 0]);
        assert!(grid.tiles().iter().all(|t| !t.spent));
        assert_eq!(grid.tiles()[3].kind(), Entity::Other(7));
    }

    #[test]
    fn test_malformed_token() {
        let err = Grid::parse("1 1 1\n1 x 1\n1 1 1").unwrap_err();
        match err {
            Error::MalformedMap {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            Grid::parse("1 1.5 1"),
            Err(Error::MalformedMap { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::parse("1 1 1\n1 0\n1 1 1").unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty_map_rejected() {
        assert!(matches!(Grid::parse("   \n \n"), Err(Error::EmptyMap)));
    }

    #[test]
    fn test_lookup_out_of_bounds() {
        let grid = Grid::parse("0 0\n0 0").unwrap();
        assert!(grid.lookup(IVec2::new(-1, 0)).is_none());
        assert!(grid.lookup(IVec2::new(2, 0)).is_none());
        assert!(grid.lookup(IVec2::new(0, 2)).is_none());
        assert!(grid.lookup(IVec2::new(1, 1)).is_some());
    }

    #[test]
    fn test_spend_and_reset() {
        let mut grid = Grid::parse("4 4 0").unwrap();
        assert_eq!(grid.coins_remaining(), 2);
        let tile = grid.spend(1);
        assert!(tile.spent);
        assert!(tile.is_open());
        assert_eq!(grid.coins_remaining(), 1);
        grid.reset_spent();
        assert_eq!(grid.coins_remaining(), 2);
    }

    proptest! {
        #[test]
        fn parse_yields_rows_times_cols(
            rows in proptest::collection::vec(
                proptest::collection::vec(0i32..6, 7),
                1..8
            )
        ) {
            let text: String = rows
                .iter()
                .map(|row| {
                    let tokens: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                    format!("   {}  \n", tokens.join(" "))
                })
                .collect();

            let grid = Grid::parse(&text).unwrap();
            prop_assert_eq!(grid.length(), rows.len());
            prop_assert_eq!(grid.tiles().len(), rows.len() * 7);

            for (y, row) in rows.iter().enumerate() {
                for (x, code) in row.iter().enumerate() {
                    let tile = grid.lookup(IVec2::new(x as i32, y as i32)).unwrap();
                    prop_assert_eq!(tile.entity, *code);
                    prop_assert_eq!(tile.pos, IVec2::new(x as i32, y as i32));
                }
            }
        }
    }
}
