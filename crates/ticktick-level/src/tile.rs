use serde::{Deserialize, Serialize};

/// Solidity of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    /// Blocks from every side.
    Wall,
    /// Only blocks from above; can be jumped through from below.
    Platform,
}

/// Surface effect of a solid tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    #[default]
    Normal,
    /// Speeds up the countdown timer while stood on.
    Hot,
    /// Low friction.
    Ice,
    /// Temporarily raises top speed.
    Speed,
}

/// A tile: kind plus surface. Empty tiles always have a normal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    surface: Surface,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        kind: TileKind::Empty,
        surface: Surface::Normal,
    };

    /// Build a tile. The surface is dropped for `Empty`.
    pub const fn new(kind: TileKind, surface: Surface) -> Self {
        match kind {
            TileKind::Empty => Self::EMPTY,
            _ => Self { kind, surface },
        }
    }

    pub const fn wall(surface: Surface) -> Self {
        Self::new(TileKind::Wall, surface)
    }

    pub const fn platform(surface: Surface) -> Self {
        Self::new(TileKind::Platform, surface)
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn is_empty(&self) -> bool {
        self.kind == TileKind::Empty
    }
}

/// Enemy flame colour variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlameVariant {
    Normal,
    Blue,
    Green,
}

/// Things placed on an (empty) cell rather than built into the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    PlayerStart,
    Goal,
    WaterDrop,
    Rocket,
    Patrol,
    Sparky,
    Flame(FlameVariant),
}

/// One grid character: terrain or an entity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Tile(Tile),
    Entity(Entity),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

impl Cell {
    pub const EMPTY: Cell = Cell::Tile(Tile::EMPTY);
    pub const PLAYER: Cell = Cell::Entity(Entity::PlayerStart);
    pub const GOAL: Cell = Cell::Entity(Entity::Goal);

    /// Decode a level character. Unknown characters decode as empty.
    pub fn from_char(c: char) -> Cell {
        match c {
            '#' => Cell::Tile(Tile::wall(Surface::Normal)),
            '-' => Cell::Tile(Tile::platform(Surface::Normal)),
            'I' => Cell::Tile(Tile::wall(Surface::Ice)),
            'i' => Cell::Tile(Tile::platform(Surface::Ice)),
            'H' => Cell::Tile(Tile::wall(Surface::Hot)),
            'h' => Cell::Tile(Tile::platform(Surface::Hot)),
            'D' => Cell::Tile(Tile::wall(Surface::Speed)),
            'd' => Cell::Tile(Tile::platform(Surface::Speed)),
            '1' => Cell::PLAYER,
            'X' => Cell::GOAL,
            'W' => Cell::Entity(Entity::WaterDrop),
            'R' => Cell::Entity(Entity::Rocket),
            'T' => Cell::Entity(Entity::Patrol),
            'S' => Cell::Entity(Entity::Sparky),
            'A' => Cell::Entity(Entity::Flame(FlameVariant::Normal)),
            'B' => Cell::Entity(Entity::Flame(FlameVariant::Blue)),
            'C' => Cell::Entity(Entity::Flame(FlameVariant::Green)),
            _ => Cell::EMPTY,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Tile(tile) => match (tile.kind(), tile.surface()) {
                (TileKind::Empty, _) => '.',
                (TileKind::Wall, Surface::Normal) => '#',
                (TileKind::Wall, Surface::Ice) => 'I',
                (TileKind::Wall, Surface::Hot) => 'H',
                (TileKind::Wall, Surface::Speed) => 'D',
                (TileKind::Platform, Surface::Normal) => '-',
                (TileKind::Platform, Surface::Ice) => 'i',
                (TileKind::Platform, Surface::Hot) => 'h',
                (TileKind::Platform, Surface::Speed) => 'd',
            },
            Cell::Entity(entity) => match entity {
                Entity::PlayerStart => '1',
                Entity::Goal => 'X',
                Entity::WaterDrop => 'W',
                Entity::Rocket => 'R',
                Entity::Patrol => 'T',
                Entity::Sparky => 'S',
                Entity::Flame(FlameVariant::Normal) => 'A',
                Entity::Flame(FlameVariant::Blue) => 'B',
                Entity::Flame(FlameVariant::Green) => 'C',
            },
        }
    }

    /// Terrain under this cell. Entities stand on empty terrain.
    pub fn tile(self) -> Tile {
        match self {
            Cell::Tile(tile) => tile,
            Cell::Entity(_) => Tile::EMPTY,
        }
    }

    pub fn entity(self) -> Option<Entity> {
        match self {
            Cell::Entity(entity) => Some(entity),
            Cell::Tile(_) => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::EMPTY
    }

    /// Player start or goal: the markers a valid level holds exactly one of.
    pub fn is_unique_marker(self) -> bool {
        self == Cell::PLAYER || self == Cell::GOAL
    }
}
