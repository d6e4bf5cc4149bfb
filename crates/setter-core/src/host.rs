//! Macro host
//!
//! Finds registered attributes in a parsed unit, runs their macros and
//! splices the peers in right after the annotated declaration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    diagnostic::{Diagnostic, DiagnosticCollector, ExpansionContext, Severity},
    expansion::{PeerMacro, SetterFunctionMacro},
    syntax::{Decl, SourceFile},
};

/// Peer macros keyed by attribute name
#[derive(Default)]
pub struct MacroRegistry {
    macros: BTreeMap<&'static str, Box<dyn PeerMacro>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `@setterFunction`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SetterFunctionMacro));
        registry
    }

    pub fn register(&mut self, peer_macro: Box<dyn PeerMacro>) {
        self.macros.insert(peer_macro.name(), peer_macro);
    }

    pub fn get(&self, name: &str) -> Option<&dyn PeerMacro> {
        self.macros.get(name).map(|m| m.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.macros.keys().copied()
    }
}

/// Result of expanding a whole unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    pub file: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Expand every registered attribute in `file`. Failed declarations stay in
/// place without their attribute; other declarations are unaffected.
pub fn expand_source(file: &SourceFile, registry: &MacroRegistry) -> Expansion {
    let mut context = DiagnosticCollector::new();
    let members = expand_members(&file.members, registry, &mut context);
    let diagnostics = context.into_diagnostics();
    info!(diagnostics = diagnostics.len(), "expansion finished");

    Expansion {
        file: SourceFile {
            members,
            trailing_comments: file.trailing_comments.clone(),
        },
        diagnostics,
    }
}

fn expand_members(
    members: &[Decl],
    registry: &MacroRegistry,
    context: &mut dyn ExpansionContext,
) -> Vec<Decl> {
    let mut expanded = Vec::with_capacity(members.len());

    for member in members {
        let mut member = member.clone();
        if let Decl::Type(ty) = &mut member {
            ty.members = expand_members(&ty.members, registry, context);
        }

        // The macro sees the declaration as written, attribute included
        let original = member.clone();
        let (triggered, kept): (Vec<_>, Vec<_>) = member
            .attributes_mut()
            .drain(..)
            .partition(|attribute| registry.get(&attribute.name).is_some());
        *member.attributes_mut() = kept;

        let mut peers = Vec::new();
        for attribute in &triggered {
            let Some(peer_macro) = registry.get(&attribute.name) else {
                continue;
            };
            debug!(
                attribute = %attribute.name,
                kind = original.kind_name(),
                "expanding"
            );
            if let Ok(generated) = peer_macro.expansion(attribute, &original, context) {
                peers.extend(generated);
            }
        }

        expanded.push(member);
        expanded.extend(peers);
    }

    expanded
}
