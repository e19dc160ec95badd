//! Arena map data: circular obstacle elements inside a circular arena.
//!
//! Map generation is a host concern; the core consumes the map as input data
//! for ray queries and shot-alert noise scaling.

use serde::{Deserialize, Serialize};

use crate::engine::coordinates::Vec2;

/// One circular wall element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapElement {
    pub element_id: u32,
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    /// Arena diameter; also the distance at which shot-alert noise saturates.
    pub size: f32,
    pub elements: Vec<MapElement>,
}

impl GameMap {
    /// An obstacle-free arena of the given diameter.
    pub fn open(size: f32) -> Self {
        Self { size, elements: Vec::new() }
    }

    pub fn with_elements(size: f32, elements: Vec<MapElement>) -> Self {
        Self { size, elements }
    }

    pub fn element(&self, element_id: u32) -> Option<&MapElement> {
        self.elements.iter().find(|e| e.element_id == element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coordinates::vec2;

    #[test]
    fn test_element_lookup() {
        let map = GameMap::with_elements(
            100.0,
            vec![
                MapElement { element_id: 1, position: vec2(0.0, 0.0), radius: 2.0 },
                MapElement { element_id: 4, position: vec2(5.0, 5.0), radius: 1.0 },
            ],
        );
        assert_eq!(map.element(4).unwrap().radius, 1.0);
        assert!(map.element(9).is_none());
    }

    #[test]
    fn test_map_serde_round_trip() {
        let map = GameMap::with_elements(
            80.0,
            vec![MapElement { element_id: 2, position: vec2(-3.0, 7.5), radius: 1.25 }],
        );
        let json = serde_json::to_string(&map).unwrap();
        let back: GameMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.size, map.size);
        assert_eq!(back.elements.len(), 1);
        assert_eq!(back.elements[0].element_id, 2);
    }
}
