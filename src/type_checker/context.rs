//! Scope chain used while analyzing.
//!
//! A [`Context`] borrows its parent, so the chain only lives as long as the
//! analyzer's call stack. Nothing here survives into later stages.

use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::entities::EntityId;

#[derive(Debug, Default)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    locals: HashMap<String, EntityId>,
    in_loop: bool,
    function: Option<EntityId>,
}

impl<'a> Context<'a> {
    pub fn root() -> Context<'static> {
        Context {
            parent: None,
            locals: HashMap::new(),
            in_loop: false,
            function: None,
        }
    }

    /// A plain nested scope that inherits the loop and function state.
    pub fn child(&self) -> Context<'_> {
        Context {
            parent: Some(self),
            locals: HashMap::new(),
            in_loop: self.in_loop,
            function: self.function,
        }
    }

    /// Scope for a function body. Loops outside the function do not carry in.
    pub fn function_scope(&self, function: EntityId) -> Context<'_> {
        Context {
            parent: Some(self),
            locals: HashMap::new(),
            in_loop: false,
            function: Some(function),
        }
    }

    pub fn loop_scope(&self) -> Context<'_> {
        Context {
            parent: Some(self),
            locals: HashMap::new(),
            in_loop: true,
            function: self.function,
        }
    }

    /// Nearest binding for `name`, searching outwards.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        match self.locals.get(name) {
            Some(id) => Some(*id),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    /// Binds `name` in this scope only.
    pub fn declare(&mut self, name: &str, entity: EntityId) {
        self.locals.insert(String::from(name), entity);
    }

    /// Shadowing is not allowed anywhere in the chain, builtins included.
    pub fn must_not_already_be_declared(&self, name: &str, position: &Position) -> Result<(), Error> {
        if self.lookup(name).is_some() {
            Err(Error::new(
                ErrorImpl::AlreadyDeclared {
                    name: String::from(name),
                },
                position.clone(),
            ))
        } else {
            Ok(())
        }
    }

    pub fn in_loop(&self) -> bool {
        self.in_loop
    }

    pub fn function(&self) -> Option<EntityId> {
        self.function
    }
}
