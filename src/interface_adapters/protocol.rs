// Wire protocol DTOs and conversions for the JSON lines exchanged with the
// input source and the drawing collaborator. Domain types stay serde-free.

use crate::domain::{
    BombSnapshot, Cell, HeroSnapshot, ItemKind, ItemSnapshot, ObstacleSnapshot, ResolutionEvent,
};
use crate::use_cases::{Frame, RoundEnd, RoundState, RoundSummary};
use serde::{Deserialize, Serialize};

/// Messages published to the drawing collaborator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Snapshot of the arena for a given tick.
    Frame(FrameDto),
    // Round lifecycle transitions (running, paused, ended).
    RoundState(RoundStateDto),
    // Final result once a round has ended.
    Summary(SummaryDto),
}

/// Input lines accepted from the keyboard/controller collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Move {
        player: u8,
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
    },
    PlantBomb {
        player: u8,
    },
    TogglePause,
    Reset,
}

/// Grid coordinates as `[row, col]`.
pub type CellDto = [u16; 2];

fn cell_dto(cell: Cell) -> CellDto {
    [cell.row, cell.col]
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameDto {
    pub tick: u64,
    pub time_left: Option<u32>,
    pub clock: Option<String>,
    pub paused: bool,
    pub heroes: Vec<HeroDto>,
    pub bombs: Vec<BombDto>,
    pub items: Vec<ItemDto>,
    pub obstacles: Vec<ObstacleDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDto>,
}

impl From<Frame> for FrameDto {
    fn from(frame: Frame) -> Self {
        Self {
            tick: frame.tick,
            time_left: frame.time_left,
            clock: frame.time_left.map(crate::use_cases::types::clock_label),
            paused: frame.paused,
            heroes: frame.heroes.iter().map(HeroDto::from).collect(),
            bombs: frame.bombs.iter().map(BombDto::from).collect(),
            items: frame.items.iter().map(ItemDto::from).collect(),
            obstacles: frame.obstacles.iter().map(ObstacleDto::from).collect(),
            events: frame.events.iter().map(EventDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroDto {
    pub player: u8,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub cell: Option<CellDto>,
    pub lives: u8,
    pub shield: bool,
    pub bomb_available: bool,
    pub score: u32,
}

impl From<&HeroSnapshot> for HeroDto {
    fn from(hero: &HeroSnapshot) -> Self {
        Self {
            player: hero.player.number(),
            name: hero.name.clone(),
            x: hero.x,
            y: hero.y,
            cell: hero.cell.map(cell_dto),
            lives: hero.lives,
            shield: hero.shield,
            bomb_available: hero.bomb_available,
            score: hero.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BombDto {
    pub id: u64,
    pub owner: u8,
    pub cell: CellDto,
    pub timer: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<CellDto>,
}

impl From<&BombSnapshot> for BombDto {
    fn from(bomb: &BombSnapshot) -> Self {
        Self {
            id: bomb.id,
            owner: bomb.owner.number(),
            cell: cell_dto(bomb.cell),
            timer: bomb.timer,
            marks: bomb.marks.iter().copied().map(cell_dto).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKindDto {
    Heart,
    Shield,
}

impl From<ItemKind> for ItemKindDto {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Heart => ItemKindDto::Heart,
            ItemKind::Shield => ItemKindDto::Shield,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemDto {
    pub id: u64,
    pub cell: CellDto,
    pub kind: ItemKindDto,
}

impl From<&ItemSnapshot> for ItemDto {
    fn from(item: &ItemSnapshot) -> Self {
        Self {
            id: item.id,
            cell: cell_dto(item.cell),
            kind: item.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleDto {
    pub id: u64,
    pub cell: CellDto,
    pub variant: u8,
}

impl From<&ObstacleSnapshot> for ObstacleDto {
    fn from(obstacle: &ObstacleSnapshot) -> Self {
        Self {
            id: obstacle.id,
            cell: cell_dto(obstacle.cell),
            variant: obstacle.variant,
        }
    }
}

/// Resolver outcomes the drawing side reacts to (hearts, shield icons, markers).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventDto {
    BombPlanted { bomb_id: u64, owner: u8, cell: CellDto },
    MarksPlaced { bomb_id: u64, cells: Vec<CellDto> },
    BombDetonated { bomb_id: u64, owner: u8, cell: CellDto },
    HeroHit { victim: u8, lives_left: u8, scorer: u8, points: u32 },
    ShieldConsumed { player: u8 },
    ShieldGained { player: u8 },
    ObstacleDestroyed { obstacle_id: u64, cell: CellDto },
    ItemPicked { player: u8, item_id: u64, kind: ItemKindDto, cell: CellDto },
}

impl From<&ResolutionEvent> for EventDto {
    fn from(event: &ResolutionEvent) -> Self {
        match event {
            ResolutionEvent::BombPlanted { bomb_id, owner, cell } => EventDto::BombPlanted {
                bomb_id: *bomb_id,
                owner: owner.number(),
                cell: cell_dto(*cell),
            },
            ResolutionEvent::MarksPlaced { bomb_id, cells } => EventDto::MarksPlaced {
                bomb_id: *bomb_id,
                cells: cells.iter().copied().map(cell_dto).collect(),
            },
            ResolutionEvent::BombDetonated { bomb_id, owner, cell } => EventDto::BombDetonated {
                bomb_id: *bomb_id,
                owner: owner.number(),
                cell: cell_dto(*cell),
            },
            ResolutionEvent::HeroHit {
                victim,
                lives_left,
                scorer,
                points,
            } => EventDto::HeroHit {
                victim: victim.number(),
                lives_left: *lives_left,
                scorer: scorer.number(),
                points: *points,
            },
            ResolutionEvent::ShieldConsumed { player } => EventDto::ShieldConsumed {
                player: player.number(),
            },
            ResolutionEvent::ShieldGained { player } => EventDto::ShieldGained {
                player: player.number(),
            },
            ResolutionEvent::ObstacleDestroyed { obstacle_id, cell } => {
                EventDto::ObstacleDestroyed {
                    obstacle_id: *obstacle_id,
                    cell: cell_dto(*cell),
                }
            }
            ResolutionEvent::ItemPicked {
                player,
                item_id,
                kind,
                cell,
            } => EventDto::ItemPicked {
                player: player.number(),
                item_id: *item_id,
                kind: (*kind).into(),
                cell: cell_dto(*cell),
            },
        }
    }
}

/// Round lifecycle state for UI flow.
#[derive(Debug, Clone, Serialize)]
pub enum RoundStateDto {
    Preparing,
    Running,
    Paused,
    Ended { reason: String, loser: Option<u8> },
}

impl From<RoundState> for RoundStateDto {
    fn from(state: RoundState) -> Self {
        match state {
            RoundState::Preparing => RoundStateDto::Preparing,
            RoundState::Running => RoundStateDto::Running,
            RoundState::Paused => RoundStateDto::Paused,
            RoundState::Ended(end) => RoundStateDto::Ended {
                reason: end.headline().to_string(),
                loser: end_loser(end),
            },
        }
    }
}

fn end_loser(end: RoundEnd) -> Option<u8> {
    match end {
        RoundEnd::TimeUp => None,
        RoundEnd::PlayerDied { player } => Some(player.number()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResultDto {
    pub player: u8,
    pub name: String,
    pub points: u32,
    pub lives: u8,
}

/// End-of-round screen content.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDto {
    pub headline: String,
    pub players: Vec<PlayerResultDto>,
}

impl From<&RoundSummary> for SummaryDto {
    fn from(summary: &RoundSummary) -> Self {
        Self {
            headline: summary.end.headline().to_string(),
            players: summary
                .players
                .iter()
                .map(|p| PlayerResultDto {
                    player: p.player.number(),
                    name: p.name.clone(),
                    points: p.points,
                    lives: p.lives,
                })
                .collect(),
        }
    }
}
