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

//! Build resource domain

pub mod cnb;
pub mod condition;
pub mod naming;
pub mod resource;
pub mod source;
pub mod types;
pub mod validation;

pub use self::cnb::{CnbBuild, CnbBuildSpec};
pub use self::condition::{Condition, ConditionSeverity, ConditionStatus, Status};
pub use self::naming::child_name;
pub use self::resource::BuildResource;
pub use self::source::{Blob, Git, Registry, SecretReference, Source, SourceConfig};
pub use self::types::{Build, BuildSpec, BuildStatus, BuildpackMetadata, BuildpackMetadataList};
pub use self::validation::{is_valid_image_reference, Defaultable, Validatable};
