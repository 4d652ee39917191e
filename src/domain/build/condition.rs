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

//! Condition-based status shared by the build resources
//!
//! A build reports progress through a single `Succeeded` condition:
//! `Unknown` while running, `True` on success and `False` on failure.
//! Once the condition leaves `Unknown` the build is terminal.

use crate::infrastructure::constants::CONDITION_SUCCEEDED;
use crate::shared::error::{KubeError, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any value other than `True` or `False` decodes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConditionStatus::Unknown)
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error severity is the empty string on the wire and is normally omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionSeverity {
    #[serde(rename = "")]
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<ConditionSeverity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            severity: None,
            last_transition_time: None,
            reason: None,
            message: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }

    pub fn is_unknown(&self) -> bool {
        self.status == ConditionStatus::Unknown
    }
}

/// Inline status block carried by every build resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Status {
    pub fn get_condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }

    /// Status of the `Succeeded` condition. A missing condition reads as `Unknown`.
    pub fn succeeded(&self) -> ConditionStatus {
        self.get_condition(CONDITION_SUCCEEDED)
            .map(|c| c.status)
            .unwrap_or_default()
    }

    /// Replace the condition with the same type, or append it.
    ///
    /// `lastTransitionTime` only moves when the status value changes.
    pub fn set_condition(&mut self, mut condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.type_ == condition.type_)
        {
            Some(existing) => {
                if existing.status == condition.status {
                    condition.last_transition_time = existing.last_transition_time.clone();
                } else if condition.last_transition_time.is_none() {
                    condition.last_transition_time = Some(Time(chrono::Utc::now()));
                }
                *existing = condition;
            }
            None => {
                if condition.last_transition_time.is_none() {
                    condition.last_transition_time = Some(Time(chrono::Utc::now()));
                }
                self.conditions.push(condition);
            }
        }
        self.conditions.sort_by(|a, b| a.type_.cmp(&b.type_));
    }

    pub fn mark_running(&mut self, name: &str, reason: &str, message: &str) -> Result<()> {
        self.transition(name, ConditionStatus::Unknown, reason, message)
    }

    pub fn mark_succeeded(&mut self, name: &str, reason: &str, message: &str) -> Result<()> {
        self.transition(name, ConditionStatus::True, reason, message)
    }

    pub fn mark_failed(&mut self, name: &str, reason: &str, message: &str) -> Result<()> {
        self.transition(name, ConditionStatus::False, reason, message)
    }

    fn transition(
        &mut self,
        name: &str,
        target: ConditionStatus,
        reason: &str,
        message: &str,
    ) -> Result<()> {
        let current = self.succeeded();
        if current.is_terminal() && current != target {
            return Err(KubeError::TerminalState {
                name: name.to_string(),
                status: current.to_string(),
            });
        }

        let mut condition = Condition::new(CONDITION_SUCCEEDED, target);
        if !reason.is_empty() {
            condition = condition.with_reason(reason);
        }
        if !message.is_empty() {
            condition = condition.with_message(message);
        }
        self.set_condition(condition);
        Ok(())
    }
}
