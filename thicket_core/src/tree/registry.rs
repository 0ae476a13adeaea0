// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0

//! The widget type registry.
//!
//! Construction by type name — `new_child`, plan entries, bound-value
//! factories — goes through an explicit registry built at startup and passed
//! by reference. Tests substitute their own.

use std::collections::HashMap;

use crate::core::Widget;
use crate::tree::TreeError;

type Ctor = Box<dyn Fn() -> Box<dyn Widget>>;

/// Maps type identifiers to constructor closures.
pub struct WidgetRegistry {
    ctors: HashMap<&'static str, Ctor>,
}

impl WidgetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            ctors: HashMap::new(),
        }
    }

    /// A registry with every built-in widget type registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::widgets::register_builtins(&mut registry);
        registry
    }

    /// Registers a constructor for a default-constructible widget type.
    pub fn register<W: Widget + Default>(&mut self, ident: &'static str) {
        self.register_with(ident, || Box::new(W::default()));
    }

    /// Registers an arbitrary constructor closure.
    pub fn register_with(
        &mut self,
        ident: &'static str,
        ctor: impl Fn() -> Box<dyn Widget> + 'static,
    ) {
        self.ctors.insert(ident, Box::new(ctor));
    }

    /// Constructs a widget of the named type.
    pub fn new_widget(&self, ident: &str) -> Result<Box<dyn Widget>, TreeError> {
        let ctor = self
            .ctors
            .get(ident)
            .ok_or_else(|| TreeError::UnregisteredType(ident.to_string()))?;
        Ok(ctor())
    }

    pub fn is_registered(&self, ident: &str) -> bool {
        self.ctors.contains_key(ident)
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.ctors.keys().collect();
        names.sort();
        f.debug_struct("WidgetRegistry").field("types", &names).finish()
    }
}
