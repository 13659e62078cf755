use std::collections::HashMap;

use crate::entities::{EntityId, Position, WorldEntity};

/// Uniform spatial hash over world entities.
///
/// Single-owner structure: mutated during the update phase, read during
/// interaction resolution. Cell membership is derived from the entity's
/// position, so movement must go through [`SpatialGrid::relocate`].
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<EntityId>>,
    entities: HashMap<EntityId, WorldEntity>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            entities: HashMap::new(),
        }
    }

    fn cell_of(&self, position: Position) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, entity: WorldEntity) {
        let cell = self.cell_of(entity.position);
        self.cells.entry(cell).or_default().push(entity.id.clone());
        self.entities.insert(entity.id.clone(), entity);
    }

    pub fn remove(&mut self, entity_id: &str) -> Option<WorldEntity> {
        let entity = self.entities.remove(entity_id)?;
        let cell = self.cell_of(entity.position);
        if let Some(ids) = self.cells.get_mut(&cell) {
            ids.retain(|id| id != entity_id);
            if ids.is_empty() {
                self.cells.remove(&cell);
            }
        }
        Some(entity)
    }

    pub fn relocate(&mut self, entity_id: &str, position: Position) -> bool {
        let Some(mut entity) = self.remove(entity_id) else {
            return false;
        };
        entity.position = position;
        self.insert(entity);
        true
    }

    pub fn get(&self, entity_id: &str) -> Option<&WorldEntity> {
        self.entities.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities within `radius` of `from`, nearest first.
    pub fn query_radius(&self, from: Position, radius: f32) -> Vec<&WorldEntity> {
        let min_cell = self.cell_of(Position::new(from.x - radius, from.y - radius));
        let max_cell = self.cell_of(Position::new(from.x + radius, from.y + radius));

        let mut found: Vec<&WorldEntity> = Vec::new();
        for cell_x in min_cell.0..=max_cell.0 {
            for cell_y in min_cell.1..=max_cell.1 {
                let Some(ids) = self.cells.get(&(cell_x, cell_y)) else {
                    continue;
                };
                for id in ids {
                    if let Some(entity) = self.entities.get(id) {
                        if entity.position.distance_to(from) <= radius {
                            found.push(entity);
                        }
                    }
                }
            }
        }
        found.sort_by(|a, b| {
            a.position
                .distance_to(from)
                .total_cmp(&b.position.distance_to(from))
        });
        found
    }

    pub fn nearest_within(&self, from: Position, radius: f32) -> Option<&WorldEntity> {
        self.query_radius(from, radius).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InteractionTarget;

    fn item(id: &str, x: f32, y: f32) -> WorldEntity {
        WorldEntity::new(
            id,
            Position::new(x, y),
            InteractionTarget::Item {
                item_id: format!("item_{id}"),
                quantity: 1,
            },
        )
    }

    #[test]
    fn query_radius_returns_nearest_first() {
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(item("far", 40.0, 0.0));
        grid.insert(item("near", 4.0, 0.0));
        grid.insert(item("mid", 12.0, 0.0));
        grid.insert(item("out_of_range", 200.0, 200.0));

        let found = grid.query_radius(Position::new(0.0, 0.0), 50.0);
        let ids: Vec<&str> = found.iter().map(|entity| entity.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);

        let nearest = grid.nearest_within(Position::new(0.0, 0.0), 50.0).unwrap();
        assert_eq!(nearest.id, "near");
    }

    #[test]
    fn query_spans_cell_boundaries() {
        let mut grid = SpatialGrid::new(8.0);
        grid.insert(item("left", -1.0, 0.0));
        grid.insert(item("right", 1.0, 0.0));

        let found = grid.query_radius(Position::new(0.0, 0.0), 4.0);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn remove_and_relocate_update_membership() {
        let mut grid = SpatialGrid::new(8.0);
        grid.insert(item("a", 0.0, 0.0));
        assert_eq!(grid.len(), 1);

        assert!(grid.relocate("a", Position::new(100.0, 100.0)));
        assert!(grid
            .query_radius(Position::new(0.0, 0.0), 10.0)
            .is_empty());
        assert_eq!(
            grid.nearest_within(Position::new(100.0, 100.0), 5.0).map(|e| e.id.as_str()),
            Some("a")
        );

        assert!(grid.remove("a").is_some());
        assert!(grid.is_empty());
        assert!(!grid.relocate("a", Position::new(0.0, 0.0)));
    }
}
