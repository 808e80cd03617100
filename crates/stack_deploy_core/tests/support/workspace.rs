#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use stack_deploy_core::contract::{DeployConfig, WaitPolicy};
use tempfile::TempDir;

pub const TEMPLATE: &str = "AWSTemplateFormatVersion: '2010-09-09'\nResources: {}\n";

/// A scratch project directory with a function source tree and template.
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("Lambda_Function");
        fs::create_dir_all(&source).expect("create source dir");
        for (relative, contents) in files {
            let path = source.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent dir");
            }
            fs::write(path, contents).expect("write source file");
        }
        fs::write(dir.path().join("template.yaml"), TEMPLATE).expect("write template");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        fs::write(self.root().join(relative), contents).expect("write workspace file");
    }

    pub fn config(&self) -> DeployConfig {
        let root = self.root();
        DeployConfig {
            source_dir: root.join("Lambda_Function"),
            artifact_path: root.join("lambda_artifact.zip"),
            template_path: root.join("template.yaml"),
            wait_policy: WaitPolicy {
                delay: Duration::from_millis(1),
                max_attempts: 5,
            },
            ..DeployConfig::default()
        }
    }
}
