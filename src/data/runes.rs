use std::collections::HashMap;

use bracket_geometry::prelude::Point;

use super::{RuneId, StatEffect, StatKind};

/// One footprint cell of a rune, relative to the rune's anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeCell {
    pub offset: Point,
    pub fragment: Option<String>,
    pub connected_fragment: Option<String>,
}

impl ShapeCell {
    pub fn bare(x: i32, y: i32) -> Self {
        Self {
            offset: Point::new(x, y),
            fragment: None,
            connected_fragment: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RuneDefinition {
    pub id: RuneId,
    pub name: String,
    pub description: String,
    pub shape: Vec<ShapeCell>,
    pub texture: Option<String>,
    pub stat_effect: StatEffect,
}

impl RuneDefinition {
    pub fn new(
        id: RuneId,
        name: &str,
        description: &str,
        shape: Vec<ShapeCell>,
        texture: Option<String>,
        stat_effect: StatEffect,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            shape,
            texture,
            stat_effect,
        }
    }

    pub fn offsets(&self) -> impl Iterator<Item = Point> + '_ {
        self.shape.iter().map(|cell| cell.offset)
    }

    /// Width and height of the footprint's bounding box.
    pub fn size(&self) -> Point {
        let mut offsets = self.offsets();
        let Some(first) = offsets.next() else {
            return Point::new(0, 0);
        };
        let (mut min, mut max) = (first, first);
        for offset in offsets {
            min.x = min.x.min(offset.x);
            min.y = min.y.min(offset.y);
            max.x = max.x.max(offset.x);
            max.y = max.y.max(offset.y);
        }
        Point::new(max.x - min.x + 1, max.y - min.y + 1)
    }

    pub fn fragments(&self) -> HashMap<Point, Option<String>> {
        self.shape
            .iter()
            .map(|cell| (cell.offset, cell.fragment.clone()))
            .collect()
    }

    pub fn connected_fragments(&self) -> HashMap<Point, Option<String>> {
        self.shape
            .iter()
            .map(|cell| (cell.offset, cell.connected_fragment.clone()))
            .collect()
    }
}

fn fragmented(id: u8, offsets: &[(i32, i32)]) -> Vec<ShapeCell> {
    offsets
        .iter()
        .enumerate()
        .map(|(idx, &(x, y))| ShapeCell {
            offset: Point::new(x, y),
            fragment: Some(format!("T_Rune_{id:02}_Frag_{idx}")),
            connected_fragment: Some(format!("T_Rune_{id:02}_Frag_{idx}_Lit")),
        })
        .collect()
}

fn builtin(
    id: u8,
    name: &str,
    description: &str,
    offsets: &[(i32, i32)],
    stat: StatKind,
    value: f32,
) -> RuneDefinition {
    RuneDefinition::new(
        RuneId(id),
        name,
        description,
        fragmented(id, offsets),
        Some(format!("T_Rune_{id:02}")),
        StatEffect::new(stat, value),
    )
}

/// The starter rune set, ids 1 through 8.
pub fn builtin_runes() -> Vec<RuneDefinition> {
    vec![
        builtin(1, "Vital Seed", "A single cell of stored vigor.", &[(0, 0)], StatKind::Hp, 10.0),
        builtin(
            2,
            "Edge Shard",
            "Two stacked cells of honed intent.",
            &[(0, 0), (0, 1)],
            StatKind::Atk,
            5.0,
        ),
        builtin(
            3,
            "Bulwark Bar",
            "Three cells laid flat like a shield rim.",
            &[(0, 0), (1, 0), (2, 0)],
            StatKind::Def,
            6.0,
        ),
        builtin(
            4,
            "Gale Hook",
            "An L of quickening wind.",
            &[(0, 0), (0, 1), (1, 1)],
            StatKind::Agl,
            4.0,
        ),
        builtin(
            5,
            "Tempo Block",
            "A square of measured beats.",
            &[(0, 0), (1, 0), (0, 1), (1, 1)],
            StatKind::Ats,
            3.0,
        ),
        builtin(
            6,
            "Heartroot",
            "A T of rooted vitality.",
            &[(0, 0), (1, 0), (2, 0), (1, 1)],
            StatKind::Hp,
            18.0,
        ),
        builtin(
            7,
            "Fang Step",
            "A staggered S of striking force.",
            &[(0, 0), (1, 0), (1, 1), (2, 1)],
            StatKind::Atk,
            8.0,
        ),
        builtin(
            8,
            "Warden Pillar",
            "A tall column of steadfast guard.",
            &[(0, 0), (0, 1), (0, 2)],
            StatKind::Def,
            9.0,
        ),
    ]
}
