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

//! Defaulting and validation applied before a build is submitted

use super::cnb::CnbBuild;
use super::source::SourceConfig;
use super::types::Build;
use crate::infrastructure::constants::DEFAULT_SERVICE_ACCOUNT;
use crate::shared::error::{KubeError, Result};
use regex::Regex;
use std::sync::LazyLock;

const IMAGE_REFERENCE_PATTERN: &str = r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*(?::[0-9]+)?/)?[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*(?::[A-Za-z0-9_][A-Za-z0-9_.-]{0,127})?(?:@sha256:[a-f0-9]{64})?$";

static IMAGE_REFERENCE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(IMAGE_REFERENCE_PATTERN));

pub trait Defaultable {
    fn set_defaults(&mut self);
}

pub trait Validatable {
    fn validate(&self) -> Result<()>;
}

/// Collects field errors so a single validation pass reports all of them.
#[derive(Debug, Default)]
struct FieldErrors {
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl FieldErrors {
    fn require(&mut self, value: &str, path: &str) {
        if value.trim().is_empty() {
            self.missing.push(path.to_string());
        }
    }

    fn image_reference(&mut self, value: &str, path: &str) -> Result<()> {
        if !value.trim().is_empty() && !is_valid_image_reference(value)? {
            self.invalid.push(format!("invalid image reference '{}': {}", value, path));
        }
        Ok(())
    }

    fn source(&mut self, source: &SourceConfig, path: &str) {
        match source.configured_count() {
            0 => self.missing.push(format!("{}.git, {}.blob, {}.registry", path, path, path)),
            1 => {}
            _ => self
                .invalid
                .push(format!("expected exactly one source kind: {}", path)),
        }
    }

    fn into_result(self) -> Result<()> {
        let mut messages = Vec::new();
        if !self.missing.is_empty() {
            messages.push(format!("missing field(s): {}", self.missing.join(", ")));
        }
        messages.extend(self.invalid);

        if messages.is_empty() {
            Ok(())
        } else {
            Err(KubeError::ValidationError(messages.join("; ")))
        }
    }
}

pub fn is_valid_image_reference(reference: &str) -> Result<bool> {
    match &*IMAGE_REFERENCE {
        Ok(re) => Ok(re.is_match(reference)),
        Err(e) => Err(e.clone().into()),
    }
}

impl Defaultable for Build {
    fn set_defaults(&mut self) {
        if self.spec.service_account.is_empty() {
            self.spec.service_account = DEFAULT_SERVICE_ACCOUNT.to_string();
        }
    }
}

impl Validatable for Build {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        errors.require(&self.spec.tag, "spec.tag");
        errors.image_reference(&self.spec.tag, "spec.tag")?;
        errors.require(&self.spec.builder_ref, "spec.builderRef");
        errors.source(&self.spec.source, "spec.source");

        for (idx, name) in self.spec.additional_image_names.iter().enumerate() {
            let path = format!("spec.additionalImageNames[{}]", idx);
            errors.require(name, &path);
            errors.image_reference(name, &path)?;
        }

        errors.into_result()
    }
}

impl Defaultable for CnbBuild {
    fn set_defaults(&mut self) {
        if self.spec.service_account.is_empty() {
            self.spec.service_account = DEFAULT_SERVICE_ACCOUNT.to_string();
        }
    }
}

impl Validatable for CnbBuild {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::default();
        errors.require(&self.spec.image, "spec.image");
        errors.image_reference(&self.spec.image, "spec.image")?;
        errors.require(&self.spec.builder, "spec.builder");
        errors.image_reference(&self.spec.builder, "spec.builder")?;
        errors.source(&self.spec.source, "spec.source");
        errors.into_result()
    }
}
