use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Pointer tools available on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Rectangle selection, handle resizing and floating-item dragging
    #[default]
    Selection,
    /// View navigation. The scene ignores pointer input; scrolling is up to the view.
    Pan,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Selection, Tool::Pan];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Selection => "Selection",
            Tool::Pan => "Pan",
        }
    }

    /// True if canvas presses start a scene gesture
    pub fn edits_scene(&self) -> bool {
        match self {
            Tool::Selection => true,
            Tool::Pan => false,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = EditorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EditorError::InvalidParameters(format!("unknown tool: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_parse() {
        assert_eq!("selection".parse::<Tool>().unwrap(), Tool::Selection);
        assert_eq!("Pan".parse::<Tool>().unwrap(), Tool::Pan);
        assert!("brush".parse::<Tool>().is_err());
        assert!(Tool::default().edits_scene());
    }
}
