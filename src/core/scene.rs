//! Encounter scene files
//!
//! A scene describes one encounter: the walkability layout, where the player
//! stands and which agents to spawn. Scenes load and save as RON (Rusty
//! Object Notation) or JSON.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::{AgentConfig, SimulationConfig};
use crate::ai::NavGrid;

/// One agent to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpawn {
    /// Optional name for logs
    #[serde(default)]
    pub name: Option<String>,
    /// Spawn position
    pub position: Vec3,
    /// Initial heading in degrees
    #[serde(default)]
    pub yaw: f32,
    /// Per-agent overrides; the scene's default agent config otherwise
    #[serde(default)]
    pub config: Option<AgentConfig>,
}

impl AgentSpawn {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            name: None,
            position,
            yaw: 0.0,
            config: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A serializable encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterScene {
    /// Scene name
    pub name: String,
    /// Scene version for compatibility
    pub version: u32,
    /// Cell size of the layout grid in world units
    pub cell_size: f32,
    /// World position of the layout's (0, 0) corner
    #[serde(default)]
    pub origin: Vec2,
    /// Layout rows, `#` for walls; row 0 is the lowest z
    pub layout: Vec<String>,
    /// Where the player stands
    pub player_start: Vec3,
    /// Player health
    pub player_health: i32,
    /// Agents to spawn
    #[serde(default)]
    pub agents: Vec<AgentSpawn>,
    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl EncounterScene {
    /// Create an empty scene
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            cell_size: 1.0,
            origin: Vec2::ZERO,
            layout: Vec::new(),
            player_start: Vec3::ZERO,
            player_health: 5,
            agents: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }

    /// The built-in corridor encounter used when no scene file is given
    #[must_use]
    pub fn demo() -> Self {
        let layout = [
            "....................",
            "....................",
            "..######......####..",
            "..#..............#..",
            "..#..######......#..",
            "..#.......#......#..",
            "..#.......#......#..",
            "..#####...#####..#..",
            "..........#.........",
            "..........#.........",
        ];

        let mut scene = Self::new("Corridor");
        scene.layout = layout.iter().map(|row| (*row).to_string()).collect();
        scene.player_start = Vec3::new(15.5, 0.0, 5.5);
        scene.add_agent(AgentSpawn::at(Vec3::new(1.5, 0.0, 0.5)).named("crawler"));
        scene.add_agent(
            AgentSpawn::at(Vec3::new(4.5, 0.0, 5.5))
                .named("hound")
                .with_config(AgentConfig::default().with_speed(5.0, 360.0).with_attack(0.6, 1)),
        );
        // Off the grid, so it never spawns
        scene.add_agent(AgentSpawn::at(Vec3::new(-40.0, 0.0, -40.0)).named("lost"));
        scene
    }

    /// Add an agent spawn, returning its index
    pub fn add_agent(&mut self, spawn: AgentSpawn) -> usize {
        self.agents.push(spawn);
        self.agents.len() - 1
    }

    /// Config for a spawn, falling back to the scene default
    #[must_use]
    pub fn agent_config(&self, spawn: &AgentSpawn) -> AgentConfig {
        spawn
            .config
            .clone()
            .unwrap_or_else(|| self.simulation.default_agent.clone())
    }

    /// Build the navigation grid described by the layout
    ///
    /// # Errors
    ///
    /// Returns an error if the cell size isn't a positive number
    pub fn build_grid(&self) -> Result<NavGrid, SceneError> {
        let grid = NavGrid::from_rows(&self.layout, self.cell_size).with_origin(self.origin);
        if !grid.has_valid_cell_size() {
            return Err(SceneError::InvalidGrid(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(grid)
    }

    /// Save the scene to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        ron::from_str(&content).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }

    /// Save the scene to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SceneError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a scene from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }

    /// Load a scene, picking the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error for unknown extensions or if loading fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::load_ron(path),
            Some("json") => Self::load_json(path),
            other => Err(SceneError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

impl Default for EncounterScene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur during scene operations
#[derive(Debug, Clone)]
pub enum SceneError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// File extension is neither `ron` nor `json`
    UnsupportedFormat(String),
    /// Layout can't be turned into a grid
    InvalidGrid(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported scene format: '{ext}'"),
            Self::InvalidGrid(e) => write!(f, "Invalid grid: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::NavigationService;

    #[test]
    fn test_scene_serialization_ron() {
        let scene = EncounterScene::demo();

        let ron_str =
            ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron_str.contains("hound"));

        let loaded: EncounterScene = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded.name, "Corridor");
        assert_eq!(loaded.agents.len(), 3);
        assert_eq!(loaded.layout, scene.layout);
        assert_eq!(loaded.agents[1].config, scene.agents[1].config);
    }

    #[test]
    fn test_scene_serialization_json() {
        let mut scene = EncounterScene::new("JSON Test");
        scene.layout = vec!["...".to_string(), ".#.".to_string()];
        scene.add_agent(AgentSpawn::at(Vec3::new(0.5, 0.0, 0.5)));

        let json_str = serde_json::to_string(&scene).unwrap();
        let loaded: EncounterScene = serde_json::from_str(&json_str).unwrap();

        assert_eq!(loaded.name, "JSON Test");
        assert_eq!(loaded.agents[0].position, Vec3::new(0.5, 0.0, 0.5));
        assert!(loaded.agents[0].config.is_none());
    }

    #[test]
    fn test_agent_config_fallback() {
        let mut scene = EncounterScene::new("Fallback");
        scene.simulation.default_agent = AgentConfig::default().with_health(3);

        let plain = AgentSpawn::at(Vec3::ZERO);
        let custom = AgentSpawn::at(Vec3::ZERO).with_config(AgentConfig::default().with_health(7));

        assert_eq!(scene.agent_config(&plain).health, 3);
        assert_eq!(scene.agent_config(&custom).health, 7);
    }

    #[test]
    fn test_build_grid_from_layout() {
        let scene = EncounterScene::demo();
        let grid = scene.build_grid().unwrap();

        assert_eq!(grid.width, 20);
        assert_eq!(grid.depth, 10);
        assert!(grid.is_cell_occupied(Vec3::new(2.5, 0.0, 2.5)));
        assert!(grid
            .find_path(scene.agents[0].position, scene.player_start)
            .is_some());
        assert!(grid
            .find_path(scene.agents[2].position, scene.player_start)
            .is_none());
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let mut scene = EncounterScene::demo();
        scene.cell_size = 0.0;

        let err = scene.build_grid().unwrap_err();
        assert!(matches!(err, SceneError::InvalidGrid(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EncounterScene::load("scene.toml").unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedFormat(ref ext) if ext == "toml"));
    }
}
