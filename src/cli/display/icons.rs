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

//! Status icons for CLI output

use crate::domain::build::ConditionStatus;

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const ERROR: &'static str = "✗";

    /// Build still running
    pub const PENDING: &'static str = "⏳";

    pub fn for_condition(status: ConditionStatus) -> &'static str {
        match status {
            ConditionStatus::True => Self::SUCCESS,
            ConditionStatus::False => Self::ERROR,
            ConditionStatus::Unknown => Self::PENDING,
        }
    }

    /// Human readable phase for a Succeeded condition
    pub fn status_text(status: ConditionStatus) -> &'static str {
        match status {
            ConditionStatus::True => "Succeeded",
            ConditionStatus::False => "Failed",
            ConditionStatus::Unknown => "Running",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_condition() {
        assert_eq!(StatusIcon::for_condition(ConditionStatus::True), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::for_condition(ConditionStatus::False), StatusIcon::ERROR);
        assert_eq!(StatusIcon::for_condition(ConditionStatus::Unknown), StatusIcon::PENDING);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(StatusIcon::status_text(ConditionStatus::True), "Succeeded");
        assert_eq!(StatusIcon::status_text(ConditionStatus::False), "Failed");
        assert_eq!(StatusIcon::status_text(ConditionStatus::Unknown), "Running");
    }
}
