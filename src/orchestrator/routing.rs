//! Key routing table
//!
//! Keys are looked up by their winit `KeyCode` debug name, the same names
//! used in the keybinding section of the options file.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

use crate::config::{KeyAction, KeybindingOptions};
use crate::simulation::DemoKind;

/// Where a key press goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Action(KeyAction),
    SelectDemo(DemoKind),
    /// Not bound; handed to the active demo
    Forward,
}

#[derive(Debug, Clone)]
pub struct InputRouter {
    table: HashMap<String, Route>,
}

impl InputRouter {
    /// Builds the table. A key bound to both an action and a demo resolves
    /// to the action.
    pub fn new(bindings: &KeybindingOptions) -> Self {
        let mut table = HashMap::new();
        for (key, kind) in &bindings.demo_select {
            table.insert(key.clone(), Route::SelectDemo(*kind));
        }
        for (key, action) in &bindings.actions {
            if let Some(Route::SelectDemo(kind)) =
                table.insert(key.clone(), Route::Action(*action))
            {
                log::warn!("{key} is bound to both {action:?} and {kind}; using {action:?}");
            }
        }
        Self { table }
    }

    pub fn route(&self, key: KeyCode) -> Route {
        self.table
            .get(&key_name(key))
            .copied()
            .unwrap_or(Route::Forward)
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(&KeybindingOptions::default())
    }
}

/// Name used for `key` in binding tables
pub fn key_name(key: KeyCode) -> String {
    format!("{key:?}")
}
