//! Declarations tracked by the analyzer.
//!
//! Entities live in an arena and are referred to by [`EntityId`], so two
//! declarations that share a source name stay distinct all the way through
//! code generation.

use std::fmt::Display;

use crate::ast::types::Type;

use super::stdlib::Builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Variable {
        name: String,
        read_only: bool,
        ty: Type,
        builtin: Option<Builtin>,
    },
    Function {
        name: String,
        /// Always a `Type::Function`.
        ty: Type,
        is_var_args: bool,
        builtin: Option<Builtin>,
    },
}

impl Entity {
    pub fn variable(name: &str, ty: Type) -> Entity {
        Entity::Variable {
            name: String::from(name),
            read_only: false,
            ty,
            builtin: None,
        }
    }

    pub fn function(name: &str, parameters: Vec<Type>, return_type: Type) -> Entity {
        Entity::Function {
            name: String::from(name),
            ty: Type::Function(parameters, Box::new(return_type)),
            is_var_args: false,
            builtin: None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Variable { name, .. } | Entity::Function { name, .. } => name,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Entity::Variable { ty, .. } | Entity::Function { ty, .. } => ty,
        }
    }

    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            Entity::Variable { builtin, .. } | Entity::Function { builtin, .. } => *builtin,
        }
    }

    pub fn is_var_args(&self) -> bool {
        matches!(self, Entity::Function { is_var_args: true, .. })
    }

    /// Only user variables can be reassigned.
    pub fn is_writable(&self) -> bool {
        matches!(self, Entity::Variable { read_only: false, .. })
    }
}

/// Owns every entity created during one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityArena {
    entities: Vec<Entity>,
}

impl EntityArena {
    pub fn new() -> Self {
        EntityArena { entities: vec![] }
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        self.entities.push(entity);
        EntityId((self.entities.len() - 1) as u32)
    }

    /// Ids are only handed out by [`EntityArena::add`], so every id indexes this arena.
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (EntityId(index as u32), entity))
    }
}
