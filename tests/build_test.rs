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

#[cfg(test)]
mod tests {
    use build_service_kube::domain::build::{child_name, Defaultable, Validatable};
    use build_service_kube::*;
    use kube::api::{DeleteParams, GetParams};
    use std::time::Duration;

    const MANIFEST: &str = r#"
apiVersion: build.pivotal.io/v1alpha1
kind: Build
metadata:
  name: petclinic-build-1
  namespace: apps
  labels:
    image.build.pivotal.io/image: petclinic
spec:
  tag: registry.example.com/apps/petclinic:latest
  builderRef: default-builder
  additionalImageNames:
    - registry.example.com/apps/petclinic:1.0.0
  source:
    registry:
      image: registry.example.com/sources/petclinic@sha256:0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef
      imagePullSecrets:
        - name: source-creds
status:
  observedGeneration: 1
  conditions:
    - type: Succeeded
      status: "False"
      reason: BuildFailed
      message: step build exited 1
  stepsCompleted:
    - prepare
"#;

    fn parse() -> Build {
        serde_yaml::from_str(MANIFEST).expect("manifest parses")
    }

    #[test]
    fn test_manifest_to_finished_build() {
        let build = parse();
        assert_eq!(build.namespace(), "apps");
        assert_eq!(build.tag(), "registry.example.com/apps/petclinic:latest");
        assert!(build.finished());
        assert!(build.is_failure());
        assert_eq!(build.built_image(), "");
        assert_eq!(
            build.build_status().unwrap().steps_completed,
            vec!["prepare".to_string()]
        );
    }

    #[test]
    fn test_manifest_defaults_and_validates() {
        let mut build = parse();
        assert_eq!(build.service_account(), "");
        build.set_defaults();
        assert_eq!(build.service_account(), "default");
        assert!(build.validate().is_ok());
    }

    #[test]
    fn test_registry_source_wiring() {
        let build = parse();
        let env = build.build_env_vars().unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env[0].name, "REGISTRY_IMAGE");

        let volume = build.image_pull_secrets_volume().unwrap();
        assert_eq!(volume.name, "image-pull-secrets-dir");
        assert_eq!(
            volume.secret.and_then(|s| s.secret_name).as_deref(),
            Some("source-creds")
        );
    }

    #[test]
    fn test_terminal_build_cannot_restart() {
        let mut build = parse();
        let err = build
            .build_status_mut()
            .status
            .mark_running("petclinic-build-1", "", "")
            .unwrap_err();
        assert!(matches!(err, KubeError::TerminalState { .. }));
        assert!(build.is_failure());
    }

    #[test]
    fn test_long_names_stay_within_limit() {
        let name = "petclinic-".repeat(8);
        let mut build = parse();
        build.metadata.name = Some(name.clone());
        let pod = build.pod_name();
        assert!(pod.len() <= 63);
        assert!(pod.ends_with("-build-pod"));
        assert_eq!(pod, child_name(&name, "-build-pod"));
    }

    #[tokio::test]
    #[ignore] // Requires Kubernetes cluster with the Build CRD installed
    async fn test_create_get_delete_roundtrip() {
        let clientset = BuildV1alpha1Client::new()
            .await
            .expect("Failed to create client");
        let builds = clientset.builds("default");

        let mut build = parse();
        build.metadata.namespace = Some("default".to_string());
        build.metadata.name = Some("build-kube-it".to_string());
        build.status = None;
        build.set_defaults();

        let created = builds.create(&build).await.expect("create");
        assert!(created.metadata.uid.is_some());

        let fetched = builds
            .get("build-kube-it", &GetParams::default())
            .await
            .expect("get");
        assert!(fetched.is_running());

        builds
            .delete("build-kube-it", &DeleteParams::default())
            .await
            .expect("delete");
    }

    #[tokio::test]
    #[ignore] // Requires Kubernetes cluster with a running build controller
    async fn test_wait_for_real_build() {
        let clientset = BuildV1alpha1Client::new()
            .await
            .expect("Failed to create client");
        let builds = clientset.cnb_builds("default");
        let config = infrastructure::kubernetes::WaitConfig::new(
            Duration::from_secs(600),
            Duration::from_secs(5),
        );

        let build = infrastructure::kubernetes::wait_for_completion(&*builds, "petclinic", &config)
            .await
            .expect("build finishes");
        assert!(build.finished());
    }
}
