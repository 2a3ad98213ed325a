use crate::domain::events::ResolutionEvent;
use crate::domain::geometry::HasCollisionRect;
use crate::domain::grid::Grid;
use crate::domain::registry::EntityRegistry;
use crate::domain::state::{Hero, ItemKind};
use tracing::info;

/// Picks up at most one overlapping item per hero, player one first.
pub fn resolve_pickups(
    grid: &mut Grid,
    registry: &mut EntityRegistry,
    heroes: &mut [Hero; 2],
    events: &mut Vec<ResolutionEvent>,
) {
    for hero in heroes.iter_mut() {
        let Some(item_id) = registry
            .items()
            .iter()
            .find(|item| hero.collides_with(*item))
            .map(|item| item.id)
        else {
            continue;
        };
        let Some(item) = registry.remove_item(item_id) else {
            continue;
        };
        grid.release(item.cell);

        match item.kind {
            ItemKind::Heart => {
                // A heart at full health is still consumed.
                hero.add_life();
            }
            ItemKind::Shield => {
                hero.activate_shield();
                events.push(ResolutionEvent::ShieldGained {
                    player: hero.player,
                });
            }
        }

        info!(
            player = hero.player.number(),
            item_id = item.id,
            kind = ?item.kind,
            lives = hero.lives(),
            shield = hero.has_shield(),
            "item picked up"
        );
        events.push(ResolutionEvent::ItemPicked {
            player: hero.player,
            item_id: item.id,
            kind: item.kind,
            cell: item.cell,
        });
    }
}
