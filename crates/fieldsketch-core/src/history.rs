//! Reversible commands and the bounded undo/redo history.
//!
//! Every undoable edit to a [`Project`] goes through [`History::execute`].
//! Commands reference shapes and layers by id and carry whatever they need to
//! reverse themselves, so undo never depends on state that changed since.

use crate::project::{LayerId, Project};
use crate::selection::ObjectRef;
use crate::shapes::{Property, PropertyValue, Shape, ShapeError, ShapeId};
use kurbo::Vec2;
use thiserror::Error;

/// Default undo depth.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),

    #[error("shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// An atomic, reversible edit.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Command {
    /// Append a shape to a layer. `slot` holds the shape while it is not in
    /// the layer; `index` is where undo took it from.
    AddObject {
        layer: LayerId,
        id: ShapeId,
        slot: Option<Shape>,
        index: Option<usize>,
    },
    /// Remove a shape, remembering its index for reinsertion.
    RemoveObject {
        target: ObjectRef,
        slot: Option<Shape>,
        index: Option<usize>,
    },
    Move {
        target: ShapeId,
        delta: Vec2,
    },
    ModifyProperty {
        target: ShapeId,
        property: Property,
        old: PropertyValue,
        new: PropertyValue,
    },
    /// Swap a shape's whole geometry, used for handle resizes.
    Reshape {
        target: ShapeId,
        before: Shape,
        after: Shape,
    },
    /// Sub-commands applied in order and reverted in reverse order.
    Batch(Vec<Command>),
}

impl Command {
    pub fn add_object(layer: LayerId, shape: Shape) -> Self {
        Command::AddObject {
            layer,
            id: shape.id().clone(),
            slot: Some(shape),
            index: None,
        }
    }

    pub fn remove_object(target: ObjectRef) -> Self {
        Command::RemoveObject {
            target,
            slot: None,
            index: None,
        }
    }

    pub fn move_object(target: ShapeId, delta: Vec2) -> Self {
        Command::Move { target, delta }
    }

    /// Change one property, capturing the current value for undo.
    pub fn modify_property(
        shape: &Shape,
        property: Property,
        new: PropertyValue,
    ) -> Result<Self, CommandError> {
        let old = shape
            .property(property)
            .ok_or(ShapeError::UnsupportedProperty {
                kind: shape.kind(),
                property,
            })?;
        Ok(Command::ModifyProperty {
            target: shape.id().clone(),
            property,
            old,
            new,
        })
    }

    pub fn reshape(before: Shape, after: Shape) -> Self {
        Command::Reshape {
            target: before.id().clone(),
            before,
            after,
        }
    }

    pub fn batch(commands: Vec<Command>) -> Self {
        Command::Batch(commands)
    }

    /// Short label for menus.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddObject { .. } => "Add Object",
            Command::RemoveObject { .. } => "Remove Object",
            Command::Move { .. } => "Move",
            Command::ModifyProperty { .. } => "Change Property",
            Command::Reshape { .. } => "Resize",
            Command::Batch(_) => "Batch",
        }
    }

    /// Perform the edit. On error the project is left as it was.
    pub fn apply(&mut self, project: &mut Project) -> Result<(), CommandError> {
        match self {
            Command::AddObject {
                layer,
                id,
                slot,
                index,
            } => {
                let target = project
                    .layer_mut(layer)
                    .ok_or_else(|| CommandError::LayerNotFound(layer.clone()))?;
                let shape = slot
                    .take()
                    .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))?;
                match index.take() {
                    Some(i) if i <= target.shapes.len() => target.shapes.insert(i, shape),
                    _ => target.shapes.push(shape),
                }
            }
            Command::RemoveObject {
                target,
                slot,
                index,
            } => {
                let layer = project
                    .layer_mut(&target.layer)
                    .ok_or_else(|| CommandError::LayerNotFound(target.layer.clone()))?;
                let i = layer
                    .index_of(&target.shape)
                    .ok_or_else(|| CommandError::ShapeNotFound(target.shape.clone()))?;
                *slot = Some(layer.shapes.remove(i));
                *index = Some(i);
            }
            Command::Move { target, delta } => {
                find_shape(project, target)?.translate(*delta);
            }
            Command::ModifyProperty {
                target,
                property,
                new,
                ..
            } => {
                find_shape(project, target)?.set_property(*property, new.clone())?;
            }
            Command::Reshape { target, after, .. } => {
                *find_shape(project, target)? = after.clone();
            }
            Command::Batch(commands) => {
                for i in 0..commands.len() {
                    if let Err(err) = commands[i].apply(project) {
                        for done in commands[..i].iter_mut().rev() {
                            log_rollback(done.revert(project), done);
                        }
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Reverse a previous `apply`.
    pub fn revert(&mut self, project: &mut Project) -> Result<(), CommandError> {
        match self {
            Command::AddObject {
                layer,
                id,
                slot,
                index,
            } => {
                let target = project
                    .layer_mut(layer)
                    .ok_or_else(|| CommandError::LayerNotFound(layer.clone()))?;
                let i = target
                    .index_of(id)
                    .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))?;
                *slot = Some(target.shapes.remove(i));
                *index = Some(i);
            }
            Command::RemoveObject {
                target,
                slot,
                index,
            } => {
                let layer = project
                    .layer_mut(&target.layer)
                    .ok_or_else(|| CommandError::LayerNotFound(target.layer.clone()))?;
                let shape = slot
                    .take()
                    .ok_or_else(|| CommandError::ShapeNotFound(target.shape.clone()))?;
                let i = index.unwrap_or(layer.shapes.len()).min(layer.shapes.len());
                layer.shapes.insert(i, shape);
            }
            Command::Move { target, delta } => {
                find_shape(project, target)?.translate(-*delta);
            }
            Command::ModifyProperty {
                target,
                property,
                old,
                ..
            } => {
                find_shape(project, target)?.set_property(*property, old.clone())?;
            }
            Command::Reshape { target, before, .. } => {
                *find_shape(project, target)? = before.clone();
            }
            Command::Batch(commands) => {
                for i in (0..commands.len()).rev() {
                    if let Err(err) = commands[i].revert(project) {
                        for done in commands[i + 1..].iter_mut() {
                            log_rollback(done.apply(project), done);
                        }
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }
}

fn find_shape<'a>(project: &'a mut Project, id: &ShapeId) -> Result<&'a mut Shape, CommandError> {
    project
        .shape_mut(id)
        .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))
}

fn log_rollback(result: Result<(), CommandError>, command: &Command) {
    if let Err(err) = result {
        log::warn!("Batch rollback failed on {}: {err}", command.name());
    }
}

/// History settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Oldest entries past this depth are dropped.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Undo and redo stacks.
///
/// Executing a command clears the redo stack. Past capacity the oldest undo
/// entry is discarded without notice.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl History {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: config.capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Apply and record a command. A command that fails to apply is not recorded.
    pub fn execute(&mut self, mut command: Command, project: &mut Project) -> Result<(), CommandError> {
        command.apply(project)?;
        log::debug!("Executed {}", command.name());
        self.push_undo(command);
        self.redo_stack.clear();
        Ok(())
    }

    fn push_undo(&mut self, command: Command) {
        self.undo_stack.push(command);
        while self.undo_stack.len() > self.capacity {
            let evicted = self.undo_stack.remove(0);
            log::debug!("Undo history full, dropped oldest {}", evicted.name());
        }
    }

    /// Revert the newest command. Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, project: &mut Project) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        match command.revert(project) {
            Ok(()) => {
                log::debug!("Undid {}", command.name());
                self.redo_stack.push(command);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Re-apply the newest undone command. Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, project: &mut Project) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match command.apply(project) {
            Ok(()) => {
                log::debug!("Redid {}", command.name());
                self.push_undo(command);
                Ok(true)
            }
            Err(err) => {
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the command `undo` would revert.
    pub fn undo_name(&self) -> Option<&'static str> {
        self.undo_stack.last().map(Command::name)
    }

    pub fn redo_name(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Command::name)
    }

    /// Drop both stacks. Not undoable.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
