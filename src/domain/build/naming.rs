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

use crate::infrastructure::constants::{MAX_NAME_LENGTH, NAME_DIGEST_LENGTH};
use sha2::{Digest, Sha256};

/// Name for a resource owned by `parent`, kept within the 63 character limit.
///
/// Short names are plain concatenations. Long parents are cut and a digest of
/// the full parent name is spliced in, so two long parents sharing a prefix
/// still get distinct children.
pub fn child_name(parent: &str, suffix: &str) -> String {
    if parent.len() + suffix.len() <= MAX_NAME_LENGTH {
        return format!("{}{}", parent, suffix);
    }

    let digest = format!("{:x}", Sha256::digest(parent.as_bytes()));
    let mut keep = MAX_NAME_LENGTH.saturating_sub(suffix.len() + NAME_DIGEST_LENGTH);
    while !parent.is_char_boundary(keep) {
        keep -= 1;
    }

    format!("{}{}{}", &parent[..keep], &digest[..NAME_DIGEST_LENGTH], suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_concatenated() {
        assert_eq!(child_name("app-build-1", "-build-pod"), "app-build-1-build-pod");
    }

    #[test]
    fn test_exact_limit_is_concatenated() {
        let parent = "a".repeat(63 - "-build-pod".len());
        let name = child_name(&parent, "-build-pod");
        assert_eq!(name.len(), 63);
        assert_eq!(name, format!("{}-build-pod", parent));
    }

    #[test]
    fn test_long_name_is_bounded() {
        let parent = "b".repeat(100);
        let name = child_name(&parent, "-build-pod");
        assert_eq!(name.len(), 63);
        assert!(name.ends_with("-build-pod"));
        assert!(name.starts_with(&"b".repeat(63 - 10 - 32)));
    }

    #[test]
    fn test_long_names_with_shared_prefix_differ() {
        let prefix = "c".repeat(70);
        let first = child_name(&format!("{}-one", prefix), "-build-pod");
        let second = child_name(&format!("{}-two", prefix), "-build-pod");
        assert_ne!(first, second);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_multibyte_parent_keeps_suffix() {
        let parent = "é".repeat(40);
        let name = child_name(&parent, "-build-pod");
        assert!(name.len() <= 63, "{} is {} bytes", name, name.len());
        assert!(name.ends_with("-build-pod"));
        // 21 bytes of prefix room holds ten two-byte chars
        assert!(name.starts_with(&"é".repeat(10)));
        assert_eq!(name.len(), 20 + 32 + 10);
    }

    #[test]
    fn test_child_name_is_deterministic() {
        let parent = "d".repeat(80);
        assert_eq!(child_name(&parent, "-x"), child_name(&parent, "-x"));
    }
}
