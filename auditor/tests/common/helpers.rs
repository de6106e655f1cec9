//! Test helpers and builder patterns for auditor tests

#![allow(dead_code)]

use std::path::Path;

use advisor::AdvisorError;
use auditor::core::AuditConfig;
use auditor::{Auditor, Augmenter, FileSystem, MockAugmenter, MockFileSystem};
use shared::{AuditReport, SessionId};

use super::fixtures::TestFixtures;

/// Builder for test auditors with mocked services
pub struct AuditorBuilder {
    config: AuditConfig,
    file_system: MockFileSystem,
    augmenter: Option<MockAugmenter>,
}

impl AuditorBuilder {
    /// Auditor without augmentation whose file system serves `input`
    pub fn new(input: &str) -> Self {
        Self::with_bytes(input.as_bytes().to_vec())
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        let mut file_system = MockFileSystem::new();
        file_system
            .expect_read_input()
            .returning(move |_| Ok(bytes.clone()))
            .times(0..);
        file_system
            .expect_write_report()
            .returning(|_, _| Ok(()))
            .times(0..);

        Self {
            config: AuditConfig::default(),
            file_system,
            augmenter: None,
        }
    }

    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure an augmenter mock with a setup function
    pub fn with_augmenter<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockAugmenter),
    {
        let mut augmenter = MockAugmenter::new();
        setup(&mut augmenter);
        self.augmenter = Some(augmenter);
        self
    }

    pub fn build(self) -> Auditor<MockFileSystem, MockAugmenter> {
        let session = SessionId::from_string(TestFixtures::SESSION).unwrap();
        Auditor::new(session, self.config, self.file_system, self.augmenter)
    }
}

/// Common operations shared by the test suites
pub struct TestHelpers;

impl TestHelpers {
    /// Run an audit of `input` with augmentation disabled
    pub async fn audit(input: &str) -> AuditReport {
        Self::run(&AuditorBuilder::new(input).build()).await
    }

    pub async fn run<F, A>(auditor: &Auditor<F, A>) -> AuditReport
    where
        F: FileSystem,
        A: Augmenter,
    {
        auditor
            .run(Path::new(TestFixtures::INPUT_PATH), TestFixtures::as_of())
            .await
            .expect("audit should not fail with a readable input")
    }

    /// Augmenter mock that fails every call with the given error
    pub fn failing_augmenter(error: fn() -> AdvisorError) -> impl FnOnce(&mut MockAugmenter) {
        move |augmenter: &mut MockAugmenter| {
            augmenter.expect_augment().times(1).returning(move |_| Err(error()));
        }
    }
}
