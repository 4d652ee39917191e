// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Color theme for CLI output

use crate::domain::build::ConditionStatus;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub running: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            running: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn condition_color(&self, status: ConditionStatus) -> TableColor {
        match status {
            ConditionStatus::True => self.success,
            ConditionStatus::False => self.error,
            ConditionStatus::Unknown => self.running,
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.condition_color(ConditionStatus::True), TableColor::Green);
        assert_eq!(theme.condition_color(ConditionStatus::Unknown), TableColor::Yellow);
        assert_eq!(theme.condition_color(ConditionStatus::False), TableColor::Red);
    }

    #[test]
    fn test_colored_names() {
        assert_eq!(table_color_to_colored_str(TableColor::DarkGrey), "bright black");
        assert_eq!(table_color_to_colored_str(TableColor::Magenta), "white");
    }
}
