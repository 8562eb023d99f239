//! Project and layer model, and conversion to and from persisted records.

use crate::geometry::union_bounds;
use crate::shapes::{Shape, ShapeError, ShapeId};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use web_time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_SCALE_UNIT: &str = "ft";
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Errors from layer management and record decoding.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("cannot remove the last layer")]
    LastLayer,

    #[error("layer index {index} out of range ({count} layers)")]
    LayerIndex { index: usize, count: usize },

    #[error("invalid project record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Session-local layer identifier. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(String);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered shape container. Later shapes paint on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub shapes: Vec<Shape>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            visible: true,
            locked: false,
            shapes: Vec::new(),
        }
    }

    /// Visible and unlocked.
    pub fn is_pickable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// A sketch: layers of shapes plus drawing scale and grid settings.
///
/// Always holds at least one layer, and `active_layer_index` always names one.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Free-form fields such as site address or inspector.
    pub meta: Map<String, Value>,
    pub created_at: u64,
    pub updated_at: u64,
    /// Real-world units per world unit, used by dimensions.
    pub scale_value: f64,
    pub scale_unit: String,
    pub grid_size: f64,
    layers: Vec<Layer>,
    active_layer_index: usize,
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Project {
    /// New project with a `Background` and an active `Drawing` layer.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            meta: Map::new(),
            created_at: now,
            updated_at: now,
            scale_value: 1.0,
            scale_unit: DEFAULT_SCALE_UNIT.to_string(),
            grid_size: DEFAULT_GRID_SIZE,
            layers: vec![Layer::new("Background"), Layer::new("Drawing")],
            active_layer_index: 1,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn active_layer_index(&self) -> usize {
        self.active_layer_index
    }

    pub fn active_layer(&self) -> &Layer {
        &self.layers[self.active_layer_index]
    }

    pub fn active_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.active_layer_index]
    }

    pub fn set_active_layer(&mut self, index: usize) -> Result<(), ProjectError> {
        self.check_index(index)?;
        self.active_layer_index = index;
        Ok(())
    }

    /// Append a layer and make it active.
    pub fn add_layer(&mut self, name: impl Into<String>) -> &mut Layer {
        self.layers.push(Layer::new(name));
        self.active_layer_index = self.layers.len() - 1;
        &mut self.layers[self.active_layer_index]
    }

    /// Remove a layer. The last remaining layer cannot be removed.
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer, ProjectError> {
        self.check_index(index)?;
        if self.layers.len() <= 1 {
            return Err(ProjectError::LastLayer);
        }
        let removed = self.layers.remove(index);
        if index < self.active_layer_index {
            self.active_layer_index -= 1;
        }
        self.active_layer_index = self.active_layer_index.min(self.layers.len() - 1);
        Ok(removed)
    }

    /// Reorder a layer, keeping the same layer active.
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), ProjectError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let active = self.layers[self.active_layer_index].id.clone();
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.active_layer_index = self.layer_index(&active).unwrap_or(0);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ProjectError> {
        if index < self.layers.len() {
            Ok(())
        } else {
            Err(ProjectError::LayerIndex {
                index,
                count: self.layers.len(),
            })
        }
    }

    pub fn layer_index(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| &l.id == id)
    }

    /// Layer holding the shape, and the shape's index in it.
    pub fn locate(&self, id: &ShapeId) -> Option<(&LayerId, usize)> {
        self.layers
            .iter()
            .find_map(|layer| layer.index_of(id).map(|index| (&layer.id, index)))
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.layers.iter().find_map(|l| l.shape(id))
    }

    pub fn shape_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.layers.iter_mut().find_map(|l| l.shape_mut(id))
    }

    pub fn shape_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Union of all shape bounds on visible layers.
    pub fn bounds(&self) -> Option<Rect> {
        union_bounds(
            self.layers
                .iter()
                .filter(|l| l.visible)
                .flat_map(|l| l.shapes.iter())
                .map(Shape::bounds),
        )
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    /// Persisted form, stamped with the current time.
    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            meta: self.meta.clone(),
            created_at: self.created_at,
            updated_at: now_millis().max(self.updated_at),
            scale_value: self.scale_value,
            scale_unit: self.scale_unit.clone(),
            grid_size: self.grid_size,
            active_layer_index: self.active_layer_index,
            layers: self
                .layers
                .iter()
                .map(|layer| LayerRecord {
                    name: layer.name.clone(),
                    visible: layer.visible,
                    locked: layer.locked,
                    objects: layer.shapes.iter().map(Shape::to_record).collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a project. Objects that fail to decode are skipped and returned.
    pub fn from_record(record: ProjectRecord) -> (Self, Vec<SkippedObject>) {
        let mut skipped = Vec::new();
        let mut layers: Vec<Layer> = record
            .layers
            .into_iter()
            .enumerate()
            .map(|(layer_index, layer)| {
                let mut shapes = Vec::with_capacity(layer.objects.len());
                for (index, object) in layer.objects.into_iter().enumerate() {
                    match Shape::from_record(object) {
                        Ok(shape) => shapes.push(shape),
                        Err(error) => {
                            log::warn!("Skipping object {index} on layer {layer_index}: {error}");
                            skipped.push(SkippedObject {
                                layer: layer_index,
                                index,
                                error,
                            });
                        }
                    }
                }
                Layer {
                    id: LayerId::new(),
                    name: layer.name,
                    visible: layer.visible,
                    locked: layer.locked,
                    shapes,
                }
            })
            .collect();

        if layers.is_empty() {
            log::warn!("Project {} has no layers, adding one", record.id);
            layers.push(Layer::new("Drawing"));
        }
        let active_layer_index = if record.active_layer_index < layers.len() {
            record.active_layer_index
        } else {
            0
        };

        let project = Self {
            id: record.id,
            name: if record.name.is_empty() {
                "Untitled".to_string()
            } else {
                record.name
            },
            meta: record.meta,
            created_at: record.created_at,
            updated_at: record.updated_at,
            scale_value: positive_or(record.scale_value, 1.0),
            scale_unit: if record.scale_unit.is_empty() {
                DEFAULT_SCALE_UNIT.to_string()
            } else {
                record.scale_unit
            },
            grid_size: positive_or(record.grid_size, DEFAULT_GRID_SIZE),
            layers,
            active_layer_index,
        };
        (project, skipped)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> Result<(Self, Vec<SkippedObject>), ProjectError> {
        let record: ProjectRecord = serde_json::from_str(json)?;
        Ok(Self::from_record(record))
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// An object record dropped while loading.
#[derive(Debug)]
pub struct SkippedObject {
    pub layer: usize,
    pub index: usize,
    pub error: ShapeError,
}

/// Persisted project. Object records stay raw so unknown types survive decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
    #[serde(default = "default_scale_value")]
    pub scale_value: f64,
    #[serde(default = "default_scale_unit")]
    pub scale_unit: String,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
    #[serde(default)]
    pub active_layer_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub objects: Vec<Value>,
}

fn default_scale_value() -> f64 {
    1.0
}

fn default_scale_unit() -> String {
    DEFAULT_SCALE_UNIT.to_string()
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle};
    use kurbo::Point;
    use serde_json::json;

    #[test]
    fn test_new_project_layers() {
        let project = Project::new("Site A");
        let names: Vec<_> = project.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Background", "Drawing"]);
        assert_eq!(project.active_layer_index(), 1);
        assert_eq!(project.scale_unit, "ft");
        assert!((project.grid_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cannot_remove_last_layer() {
        let mut project = Project::new("p");
        project.remove_layer(0).unwrap();
        assert_eq!(project.active_layer_index(), 0);
        assert!(matches!(project.remove_layer(0), Err(ProjectError::LastLayer)));
        assert_eq!(project.layers().len(), 1);
    }

    #[test]
    fn test_remove_active_layer_clamps_index() {
        let mut project = Project::new("p");
        project.add_layer("Notes");
        assert_eq!(project.active_layer_index(), 2);
        project.remove_layer(2).unwrap();
        assert_eq!(project.active_layer_index(), 1);
        assert!(matches!(
            project.remove_layer(5),
            Err(ProjectError::LayerIndex { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_move_layer_keeps_active() {
        let mut project = Project::new("p");
        let drawing = project.active_layer().id.clone();
        project.move_layer(1, 0).unwrap();
        assert_eq!(project.layers()[0].name, "Drawing");
        assert_eq!(project.active_layer().id, drawing);
        assert_eq!(project.active_layer_index(), 0);
    }

    #[test]
    fn test_locate_shape() {
        let mut project = Project::new("p");
        let line = Shape::from(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        let id = line.id().clone();
        project.active_layer_mut().shapes.push(line);
        let (layer, index) = project.locate(&id).unwrap();
        assert_eq!(layer, &project.layers()[1].id);
        assert_eq!(index, 0);
        assert!(project.locate(&ShapeId::from("missing")).is_none());
    }

    #[test]
    fn test_record_roundtrip() {
        let mut project = Project::new("Basement");
        project.meta.insert("address".into(), json!("12 Elm St"));
        project.scale_value = 0.5;
        project
            .active_layer_mut()
            .shapes
            .push(Rectangle::new(Point::new(0.0, 0.0), 50.0, 50.0).into());

        let json = project.to_json().unwrap();
        let (loaded, skipped) = Project::from_json(&json).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(loaded.id, project.id);
        assert_eq!(loaded.meta, project.meta);
        assert!((loaded.scale_value - 0.5).abs() < f64::EPSILON);
        assert_eq!(loaded.active_layer_index(), 1);
        assert_eq!(loaded.layers()[1].shapes, project.layers()[1].shapes);
    }

    #[test]
    fn test_load_skips_bad_objects() {
        let record = json!({
            "id": "proj_1",
            "name": "Legacy",
            "activeLayerIndex": 7,
            "layers": [{
                "name": "Drawing",
                "objects": [
                    {"type": "line", "x1": 0, "y1": 0, "x2": 10, "y2": 0},
                    {"type": "hologram"},
                    {"type": "rect", "w": "wide"}
                ]
            }]
        });
        let (project, skipped) = Project::from_record(serde_json::from_value(record).unwrap());
        assert_eq!(project.layers()[0].len(), 1);
        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0].error, ShapeError::UnknownType(_)));
        assert_eq!(skipped[1].index, 2);
        assert_eq!(project.active_layer_index(), 0);
        assert!(project.layers()[0].visible);
        assert_eq!(project.scale_unit, "ft");
    }

    #[test]
    fn test_load_without_layers() {
        let record: ProjectRecord = serde_json::from_value(json!({"id": "x", "gridSize": 0})).unwrap();
        let (project, _) = Project::from_record(record);
        assert_eq!(project.layers().len(), 1);
        assert!((project.grid_size - DEFAULT_GRID_SIZE).abs() < f64::EPSILON);
        assert_eq!(project.name, "Untitled");
    }

    #[test]
    fn test_bounds_skip_hidden_layers() {
        let mut project = Project::new("p");
        project.layers_mut()[0]
            .shapes
            .push(Rectangle::new(Point::new(-100.0, -100.0), 10.0, 10.0).into());
        project
            .active_layer_mut()
            .shapes
            .push(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0).into());
        assert_eq!(project.bounds(), Some(Rect::new(-100.0, -100.0, 10.0, 10.0)));
        project.layers_mut()[0].visible = false;
        assert_eq!(project.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
