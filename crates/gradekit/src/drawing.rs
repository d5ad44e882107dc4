//! Access to drawing entities.
//!
//! The algorithms never talk to a CAD host directly. Everything they need
//! from a drawing goes through [`Drawing`]: read an entity's geometry or
//! text, and put an entity on a layer. [`MemoryDrawing`] is the in-process
//! implementation, filled from JSON, YAML or SVG files; a host adapter
//! implements the same trait over live objects.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, Point3, Polygon};
use crate::nearest::TextCandidate;

#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("no entity with id {0:?}")]
    UnknownEntity(String),
    #[error("entity id {0:?} is used more than once")]
    DuplicateId(String),
    #[error("failed to read drawing file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse drawing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse drawing YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported drawing format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Svg(#[from] crate::svg::SvgError),
}

/// What an entity is.
///
/// ## Rust Lesson #22: Pattern Matching on Enums with Data
///
/// Drawing files tag each entity with `type`, which serde maps straight
/// onto the variant; code then `match`es on the variant to get the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityKind {
    /// Polyline or polygon. `elevation` marks a 2D entity whose vertices
    /// all sit at that height.
    Polyline {
        vertices: Vec<Point3>,
        #[serde(default)]
        closed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        elevation: Option<f64>,
    },
    /// Annotation text with an optional insertion point.
    Text {
        text: String,
        #[serde(default)]
        anchor: Option<Point3>,
    },
    Point {
        position: Point3,
    },
}

/// A drawing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    pub fn polyline(id: impl Into<String>, vertices: Vec<Point3>, closed: bool) -> Self {
        Self {
            id: id.into(),
            layer: None,
            kind: EntityKind::Polyline { vertices, closed, elevation: None },
        }
    }

    pub fn text(id: impl Into<String>, text: impl Into<String>, anchor: Option<Point3>) -> Self {
        Self {
            id: id.into(),
            layer: None,
            kind: EntityKind::Text { text: text.into(), anchor },
        }
    }

    pub fn point(id: impl Into<String>, position: Point3) -> Self {
        Self {
            id: id.into(),
            layer: None,
            kind: EntityKind::Point { position },
        }
    }

    /// Vertices of a polyline entity, with a 2D entity's uniform elevation
    /// applied to every vertex. `None` for other kinds.
    pub fn vertices(&self) -> Option<Vec<Point3>> {
        match &self.kind {
            EntityKind::Polyline { vertices, elevation: Some(z), .. } => {
                Some(vertices.iter().map(|v| v.with_z(*z)).collect())
            }
            EntityKind::Polyline { vertices, .. } => Some(vertices.clone()),
            _ => None,
        }
    }

    /// Polyline entity as a validated [`Polygon`]. `None` for other kinds.
    pub fn polygon(&self) -> Option<Result<Polygon, GeometryError>> {
        let closed = matches!(self.kind, EntityKind::Polyline { closed: true, .. });
        self.vertices().map(|v| Polygon::new(v, closed))
    }

    /// Text entity as a nearest-lookup candidate.
    pub fn text_candidate(&self) -> Option<TextCandidate> {
        match &self.kind {
            EntityKind::Text { text, anchor } => Some(TextCandidate::new(*anchor, text.clone())),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<Point3> {
        match self.kind {
            EntityKind::Point { position } => Some(position),
            _ => None,
        }
    }
}

/// Read and classify access to a drawing.
///
/// Entities are addressed by id, so ids must be unique within a drawing.
pub trait Drawing {
    /// Entity ids in drawing order.
    fn entity_ids(&self) -> Vec<String>;

    fn entity(&self, id: &str) -> Option<&Entity>;

    /// Put an entity on a layer.
    fn assign_layer(&mut self, id: &str, layer: &str) -> Result<(), DrawingError>;

    /// All entities in drawing order.
    fn entities(&self) -> Vec<&Entity> {
        self.entity_ids()
            .iter()
            .filter_map(|id| self.entity(id))
            .collect()
    }
}

/// A drawing held in memory. Entity ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDrawing {
    pub entities: Vec<Entity>,
}

impl MemoryDrawing {
    /// Build a drawing, rejecting ids used by more than one entity.
    pub fn new(entities: Vec<Entity>) -> Result<Self, DrawingError> {
        if let Some(id) = first_duplicate_id(&entities) {
            return Err(DrawingError::DuplicateId(id));
        }
        Ok(Self { entities })
    }

    pub fn from_json(content: &str) -> Result<Self, DrawingError> {
        let drawing: Self = serde_json::from_str(content)?;
        Self::new(drawing.entities)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DrawingError> {
        let drawing: Self = serde_yaml::from_str(content)?;
        Self::new(drawing.entities)
    }

    /// Load a drawing, picking the format from the file extension
    /// (`.json`, `.yaml`/`.yml`, `.svg`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DrawingError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let content = fs::read_to_string(path)?;
        let drawing = match ext.as_str() {
            "json" => Self::from_json(&content)?,
            "yaml" | "yml" => Self::from_yaml(&content)?,
            "svg" => crate::svg::drawing_from_svg(&content)?,
            other => return Err(DrawingError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(path = %path.display(), entities = drawing.entities.len(), "loaded drawing");
        Ok(drawing)
    }

    pub fn to_json(&self) -> Result<String, DrawingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Ids of all entities on `layer`.
    pub fn on_layer(&self, layer: &str) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|e| e.layer.as_deref() == Some(layer))
            .map(|e| e.id.as_str())
            .collect()
    }
}

fn first_duplicate_id(entities: &[Entity]) -> Option<String> {
    let mut seen = HashSet::new();
    entities
        .iter()
        .find(|e| !seen.insert(e.id.as_str()))
        .map(|e| e.id.clone())
}

impl Drawing for MemoryDrawing {
    fn entity_ids(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.id.clone()).collect()
    }

    fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn assign_layer(&mut self, id: &str, layer: &str) -> Result<(), DrawingError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DrawingError::UnknownEntity(id.to_string()))?;
        entity.layer = Some(layer.to_string());
        Ok(())
    }

    fn entities(&self) -> Vec<&Entity> {
        self.entities.iter().collect()
    }
}
