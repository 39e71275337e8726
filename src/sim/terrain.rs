//! Destructible terrain grid
//!
//! The symbolic map is coarse: each cell is either empty, a wall, or a spawn
//! marker. Every wall cell expands into a 4x4 block of fine nodes so bullets
//! can chip away at brick walls a piece at a time.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Rect, rects_intersect};
use super::state::retain_unmarked;
use crate::consts::NODES_PER_CELL;

/// Fatal problems in the symbolic map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no rows")]
    EmptyGrid,
    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("did not recognize symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error("map has no player spawn marker")]
    MissingPlayerSpawn,
    #[error("map has {count} player spawn markers, expected exactly one")]
    MultiplePlayerSpawns { count: usize },
}

/// One coarse map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSymbol {
    Empty,
    Brick,
    Concrete,
    PlayerSpawn,
    EnemySpawn,
}

impl MapSymbol {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'e' => Some(MapSymbol::Empty),
            'b' => Some(MapSymbol::Brick),
            's' => Some(MapSymbol::Concrete),
            'p' => Some(MapSymbol::PlayerSpawn),
            'x' => Some(MapSymbol::EnemySpawn),
            _ => None,
        }
    }

    /// Wall material this symbol expands into, if any
    pub fn terrain_kind(self) -> Option<TerrainKind> {
        match self {
            MapSymbol::Brick => Some(TerrainKind::Brick),
            MapSymbol::Concrete => Some(TerrainKind::Concrete),
            MapSymbol::Empty | MapSymbol::PlayerSpawn | MapSymbol::EnemySpawn => None,
        }
    }
}

/// Wall material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Destroyed by any bullet impact
    Brick,
    /// Absorbs bullets without breaking
    Concrete,
}

impl TerrainKind {
    #[inline]
    pub fn is_destructible(self) -> bool {
        self == TerrainKind::Brick
    }
}

/// A single fine-grained terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainNode {
    pub kind: TerrainKind,
    /// Pixel origin (top-left)
    pub x: f32,
    pub y: f32,
    /// Fine grid indices
    pub row: usize,
    pub col: usize,
}

impl TerrainNode {
    #[inline]
    pub fn rect(&self, node_size: f32) -> Rect {
        Rect::new(self.x, self.y, node_size, node_size)
    }
}

/// The live terrain collection. Nodes are only ever removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    nodes: Vec<TerrainNode>,
    node_size: f32,
}

impl Terrain {
    pub fn new(nodes: Vec<TerrainNode>, node_size: f32) -> Self {
        Self { nodes, node_size }
    }

    pub fn nodes(&self) -> &[TerrainNode] {
        &self.nodes
    }

    pub fn node_size(&self) -> f32 {
        self.node_size
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node, in iteration order, overlapping `rect`.
    ///
    /// Only one node is reported even when the rectangle straddles several.
    pub fn find_colliding_node(&self, rect: &Rect) -> Option<(usize, &TerrainNode)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, node)| rects_intersect(rect, &node.rect(self.node_size)))
    }

    /// Whether `rect` overlaps any node
    pub fn collides(&self, rect: &Rect) -> bool {
        self.find_colliding_node(rect).is_some()
    }

    /// Drop the nodes at the given indices, keeping the order of the rest
    pub fn remove_nodes(&mut self, indices: &BTreeSet<usize>) {
        retain_unmarked(&mut self.nodes, indices);
    }
}

/// Free-function form of [`Terrain::find_colliding_node`]
pub fn find_colliding_node<'a>(rect: &Rect, terrain: &'a Terrain) -> Option<&'a TerrainNode> {
    terrain.find_colliding_node(rect).map(|(_, node)| node)
}

/// Terrain plus spawn points produced from a symbolic map
#[derive(Debug, Clone)]
pub struct TerrainLayout {
    pub terrain: Terrain,
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<Vec2>,
}

/// Parse map rows into symbols, rejecting unknown characters and ragged rows
pub fn parse_grid<S: AsRef<str>>(rows: &[S]) -> Result<Vec<Vec<MapSymbol>>, MapError> {
    let mut grid = Vec::with_capacity(rows.len());
    let mut expected = None;

    for (row, line) in rows.iter().enumerate() {
        let symbols = line
            .as_ref()
            .chars()
            .enumerate()
            .map(|(col, symbol)| {
                MapSymbol::from_char(symbol).ok_or(MapError::UnknownSymbol { symbol, row, col })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match expected {
            None => expected = Some(symbols.len()),
            Some(expected) if expected != symbols.len() => {
                return Err(MapError::RaggedRow {
                    row,
                    expected,
                    found: symbols.len(),
                });
            }
            Some(_) => {}
        }
        grid.push(symbols);
    }

    if grid.is_empty() || expected == Some(0) {
        return Err(MapError::EmptyGrid);
    }
    Ok(grid)
}

/// Expand a symbolic grid into fine terrain nodes and locate spawn markers.
///
/// `terrain_size` is the pixel size of one coarse cell. Nodes of one block
/// are emitted column by column, which fixes the tie-break order of
/// [`Terrain::find_colliding_node`].
pub fn build_terrain(grid: &[Vec<MapSymbol>], terrain_size: f32) -> Result<TerrainLayout, MapError> {
    let node_size = terrain_size / NODES_PER_CELL as f32;
    let mut nodes = Vec::new();
    let mut player_spawns = Vec::new();
    let mut enemy_spawns = Vec::new();

    for (row, cells) in grid.iter().enumerate() {
        for (col, &symbol) in cells.iter().enumerate() {
            let origin = Vec2::new(col as f32 * terrain_size, row as f32 * terrain_size);
            match symbol {
                MapSymbol::PlayerSpawn => player_spawns.push(origin),
                MapSymbol::EnemySpawn => enemy_spawns.push(origin),
                MapSymbol::Empty => {}
                MapSymbol::Brick | MapSymbol::Concrete => {
                    if let Some(kind) = symbol.terrain_kind() {
                        push_block(&mut nodes, kind, row, col, node_size);
                    }
                }
            }
        }
    }

    let player_spawn = match player_spawns.as_slice() {
        [] => return Err(MapError::MissingPlayerSpawn),
        [spawn] => *spawn,
        many => return Err(MapError::MultiplePlayerSpawns { count: many.len() }),
    };

    Ok(TerrainLayout {
        terrain: Terrain::new(nodes, node_size),
        player_spawn,
        enemy_spawns,
    })
}

fn push_block(nodes: &mut Vec<TerrainNode>, kind: TerrainKind, row: usize, col: usize, node_size: f32) {
    for sub_col in 0..NODES_PER_CELL {
        for sub_row in 0..NODES_PER_CELL {
            let fine_row = NODES_PER_CELL * row + sub_row;
            let fine_col = NODES_PER_CELL * col + sub_col;
            nodes.push(TerrainNode {
                kind,
                x: fine_col as f32 * node_size,
                y: fine_row as f32 * node_size,
                row: fine_row,
                col: fine_col,
            });
        }
    }
}
