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

use super::client::ResourceInterface;
use crate::domain::build::BuildResource;
use crate::domain::config::WaitConf;
use crate::shared::error::{KubeError, Result};
use backon::{BackoffBuilder, ConstantBuilder};
use kube::api::GetParams;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

// Stand-in deadline for timeouts too large to add to an Instant
const UNBOUNDED_WAIT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    fn max_polls(&self) -> usize {
        let interval = self.poll_interval.as_millis().max(1);
        usize::try_from(self.timeout.as_millis() / interval)
            .unwrap_or(usize::MAX)
            .max(1)
    }
}

impl From<&WaitConf> for WaitConfig {
    fn from(conf: &WaitConf) -> Self {
        Self::new(conf.timeout(), conf.poll_interval())
    }
}

/// Poll a build until its Succeeded condition becomes True or False.
///
/// `config.timeout` is a wall-clock deadline covering both the requests and
/// the sleeps between them. A build that fails is still returned as `Ok`;
/// callers inspect `is_failure()`.
pub async fn wait_for_completion<K>(
    client: &dyn ResourceInterface<K>,
    name: &str,
    config: &WaitConfig,
) -> Result<K>
where
    K: BuildResource,
{
    let now = Instant::now();
    let deadline = now
        .checked_add(config.timeout)
        .unwrap_or_else(|| now + UNBOUNDED_WAIT);
    let timed_out = || {
        KubeError::Timeout(format!(
            "{} '{}' did not finish within {:?}",
            K::kind(&()),
            name,
            config.timeout
        ))
    };

    let mut delays = ConstantBuilder::default()
        .with_delay(config.poll_interval)
        .with_max_times(config.max_polls())
        .build();

    loop {
        if Instant::now() >= deadline {
            return Err(timed_out());
        }

        let obj = tokio::time::timeout_at(deadline, client.get(name, &GetParams::default()))
            .await
            .map_err(|_| timed_out())??;
        if obj.finished() {
            info!(
                name,
                namespace = client.namespace(),
                status = %obj.succeeded(),
                "build finished"
            );
            return Ok(obj);
        }

        let Some(delay) = delays.next() else {
            return Err(timed_out());
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        debug!(name, ?delay, ?remaining, "build still running");
        tokio::time::sleep(delay.min(remaining)).await;
    }
}
