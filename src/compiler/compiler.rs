//! Main generator module.
//!
//! Holds the [`Compiler`] state shared by statement and expression emission:
//! the naming table, the output lines and the current indentation.

use std::collections::HashMap;

use crate::type_checker::{
    entities::{EntityArena, EntityId},
    typed_ast::{TypedProgram, TypedStmt},
};

use super::stmt::gen_statement;

const INDENT: &str = "  ";

pub struct Compiler<'a> {
    /// Arena of the program being generated.
    pub entities: &'a EntityArena,
    /// Generated name of every user entity seen so far.
    pub names: HashMap<EntityId, String>,
    /// Suffix handed to the next newly named entity.
    pub counter: u32,

    pub lines: Vec<String>,
    pub indent: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(entities: &'a EntityArena) -> Self {
        Compiler {
            entities,
            names: HashMap::new(),
            counter: 0,
            lines: vec![],
            indent: 0,
        }
    }

    /// The JavaScript spelling of `id`.
    ///
    /// Builtins map to their fixed target text. Any other entity is named
    /// the first time it is seen and keeps that name for the rest of the run.
    pub fn name_of(&mut self, id: EntityId) -> String {
        let entity = self.entities.get(id);
        if let Some(builtin) = entity.builtin() {
            return String::from(builtin.target());
        }

        if let Some(name) = self.names.get(&id) {
            return name.clone();
        }

        self.counter += 1;
        let name = format!("{}_{}", entity.name(), self.counter);
        tracing::trace!(entity = %id, name = %name, "named entity");
        self.names.insert(id, name.clone());
        name
    }

    pub fn emit(&mut self, line: String) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.indent), line));
    }

    pub fn gen_block(&mut self, body: &[TypedStmt]) {
        self.indent += 1;
        for statement in body {
            gen_statement(self, statement);
        }
        self.indent -= 1;
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Renders `program` as JavaScript, one statement per line.
#[tracing::instrument(skip_all)]
pub fn generate(program: &TypedProgram) -> String {
    let mut compiler = Compiler::new(&program.entities);

    for statement in &program.statements {
        gen_statement(&mut compiler, statement);
    }

    tracing::debug!(
        lines = compiler.lines.len(),
        names = compiler.names.len(),
        "generated"
    );
    compiler.finish()
}
