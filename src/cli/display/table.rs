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

//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::build::{BuildResource, BuildpackMetadata, Condition, ConditionStatus};
use crate::infrastructure::constants::CONDITION_SUCCEEDED;
use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// One line of the build list
#[derive(Debug, Clone)]
pub struct BuildRow {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub succeeded: ConditionStatus,
    pub reason: String,
    pub created: Option<DateTime<Utc>>,
}

impl BuildRow {
    pub fn from_resource<K: BuildResource>(obj: &K) -> Self {
        let meta = obj.meta();
        let reason = obj
            .build_status()
            .and_then(|s| s.status.get_condition(CONDITION_SUCCEEDED))
            .and_then(|c| c.reason.clone())
            .unwrap_or_default();

        let image = match obj.built_image() {
            built if !built.is_empty() => built,
            _ => obj.target_image().to_string(),
        };

        Self {
            name: obj.build_ref(),
            namespace: meta.namespace.clone().unwrap_or_default(),
            image,
            succeeded: obj.succeeded(),
            reason,
            created: meta.creation_timestamp.as_ref().map(|t| t.0),
        }
    }
}

/// Everything shown by `get`
#[derive(Debug, Clone)]
pub struct BuildDetail {
    pub kind: String,
    pub row: BuildRow,
    pub target_image: String,
    pub built_image: String,
    pub pod_name: String,
    pub source: String,
    pub conditions: Vec<Condition>,
    pub buildpacks: Vec<BuildpackMetadata>,
    pub steps_completed: Vec<String>,
}

impl BuildDetail {
    pub fn from_resource<K: BuildResource>(obj: &K) -> Self {
        let status = obj.build_status();
        Self {
            kind: K::kind(&()).to_string(),
            row: BuildRow::from_resource(obj),
            target_image: obj.target_image().to_string(),
            built_image: obj.built_image(),
            pod_name: obj.pod_name(),
            source: obj
                .source_config()
                .source()
                .map(|s| s.kind())
                .unwrap_or("none")
                .to_string(),
            conditions: status.map(|s| s.status.conditions.clone()).unwrap_or_default(),
            buildpacks: status.map(|s| s.build_metadata.clone()).unwrap_or_default(),
            steps_completed: status.map(|s| s.steps_completed.clone()).unwrap_or_default(),
        }
    }
}

/// Short age like kubectl prints: 45s, 12m, 3h, 2d
pub fn format_age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "-".to_string();
    };
    let secs = (now - created).num_seconds().max(0);
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86400),
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    pub fn render_build_list(&self, kind: &str, rows: &[BuildRow]) -> String {
        if rows.is_empty() {
            return format!("No {} resources found", kind);
        }

        let now = Utc::now();
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("IMAGE").set_alignment(CellAlignment::Left),
                Cell::new("SUCCEEDED").set_alignment(CellAlignment::Center),
                Cell::new("REASON").set_alignment(CellAlignment::Left),
                Cell::new("AGE").set_alignment(CellAlignment::Right),
            ]);

        for row in rows {
            table.add_row(vec![
                Cell::new(&row.name),
                Cell::new(&row.namespace),
                Cell::new(&row.image),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::for_condition(row.succeeded),
                    StatusIcon::status_text(row.succeeded)
                ))
                .fg(self.theme.condition_color(row.succeeded)),
                Cell::new(&row.reason).fg(self.theme.muted),
                Cell::new(format_age(row.created, now)).set_alignment(CellAlignment::Right),
            ]);
        }

        let finished = rows.iter().filter(|r| r.succeeded.is_terminal()).count();
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ {} {} ─╮\n",
            kind,
            format!("[{} total, {} finished]", rows.len(), finished).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Succeeded  {} Running  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::PENDING.yellow(),
            StatusIcon::ERROR.red()
        ));

        output
    }

    pub fn render_build_detail(&self, detail: &BuildDetail) -> String {
        let row = &detail.row;
        let status_color = self.theme.condition_color(row.succeeded);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.add_row(vec![Cell::new(format!("{} {}", detail.kind, row.name))
            .set_alignment(CellAlignment::Center)]);
        table.add_row(vec![Cell::new(format!("Namespace: {}", row.namespace))]);
        table.add_row(vec![Cell::new(format!(
            "Status: {} {}",
            StatusIcon::for_condition(row.succeeded),
            StatusIcon::status_text(row.succeeded)
        ))
        .fg(status_color)]);
        table.add_row(vec![Cell::new(format!("Target image: {}", detail.target_image))]);
        if !detail.built_image.is_empty() {
            table.add_row(vec![Cell::new(format!("Built image: {}", detail.built_image))
                .fg(self.theme.success)]);
        }
        table.add_row(vec![Cell::new(format!("Source: {}", detail.source))]);
        table.add_row(vec![Cell::new(format!("Build pod: {}", detail.pod_name))]);

        if !detail.buildpacks.is_empty() {
            let buildpacks = detail
                .buildpacks
                .iter()
                .map(|bp| format!("  {}@{}", bp.id, bp.version))
                .collect::<Vec<_>>()
                .join("\n");
            table.add_row(vec![Cell::new(format!("Buildpacks:\n{}", buildpacks))
                .fg(self.theme.info)]);
        }

        if !detail.steps_completed.is_empty() {
            table.add_row(vec![Cell::new(format!(
                "Steps completed: {}",
                detail.steps_completed.join(", ")
            ))]);
        }

        let mut output = table.to_string();
        output.push('\n');

        if detail.conditions.is_empty() {
            output.push_str(&"No conditions reported".bright_black().to_string());
            output.push('\n');
            return output;
        }

        let mut conditions = Table::new();
        conditions
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["TYPE", "STATUS", "REASON", "MESSAGE", "LAST TRANSITION"]);
        for condition in &detail.conditions {
            conditions.add_row(vec![
                Cell::new(&condition.type_),
                Cell::new(condition.status.as_str())
                    .fg(self.theme.condition_color(condition.status)),
                Cell::new(condition.reason.as_deref().unwrap_or("")),
                Cell::new(condition.message.as_deref().unwrap_or("")),
                Cell::new(
                    condition
                        .last_transition_time
                        .as_ref()
                        .map(|t| t.0.to_rfc3339())
                        .unwrap_or_default(),
                ),
            ]);
        }
        output.push_str(&conditions.to_string());
        output.push('\n');
        output
    }

    /// One line per watch event
    pub fn render_event(&self, event_type: &str, row: &BuildRow) -> String {
        let color = table_color_to_colored_str(self.theme.condition_color(row.succeeded));
        format!(
            "{:<9} {}/{} {}",
            event_type,
            row.namespace,
            row.name,
            format!(
                "{} {}",
                StatusIcon::for_condition(row.succeeded),
                StatusIcon::status_text(row.succeeded)
            )
            .color(color)
        )
    }
}
