//! Scalar domains: one record per section, replaced whole under optimistic locking.

use super::{check_versions_equal, ConfigRepository};
use crate::concurrency::SnapshotCell;
use crate::config::{
    AdvancedConfig, SmtpConfig, StorageConfig, TransactionConfig, UserInterfaceConfig,
    UserRecordingConfig,
};
use crate::error::ConfigError;
use crate::types::section;
use crate::version::version_of;
use serde::Serialize;
use std::sync::Arc;

impl ConfigRepository {
    pub fn transaction_config(&self) -> Arc<TransactionConfig> {
        self.transaction.load()
    }

    pub fn user_recording_config(&self) -> Arc<UserRecordingConfig> {
        self.user_recording.load()
    }

    pub fn advanced_config(&self) -> Arc<AdvancedConfig> {
        self.advanced.load()
    }

    pub fn user_interface_config(&self) -> Arc<UserInterfaceConfig> {
        self.ui.load()
    }

    pub fn storage_config(&self) -> Arc<StorageConfig> {
        self.storage.load()
    }

    pub fn smtp_config(&self) -> Arc<SmtpConfig> {
        self.smtp.load()
    }

    pub fn update_transaction_config(
        &self,
        updated: TransactionConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::TRANSACTIONS, &self.transaction, updated, prior_version)
    }

    pub fn update_user_recording_config(
        &self,
        updated: UserRecordingConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::USER_RECORDING, &self.user_recording, updated, prior_version)
    }

    pub fn update_advanced_config(
        &self,
        updated: AdvancedConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::ADVANCED, &self.advanced, updated, prior_version)
    }

    pub fn update_user_interface_config(
        &self,
        updated: UserInterfaceConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::UI, &self.ui, updated, prior_version)
    }

    /// Storage lists are not repaired here; a short list written by a caller is kept
    /// until the next startup.
    pub fn update_storage_config(
        &self,
        updated: StorageConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::STORAGE, &self.storage, updated, prior_version)
    }

    pub fn update_smtp_config(
        &self,
        updated: SmtpConfig,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        self.update_scalar(section::SMTP, &self.smtp, updated, prior_version)
    }

    fn update_scalar<T: Serialize>(
        &self,
        name: &str,
        cell: &SnapshotCell<T>,
        updated: T,
        prior_version: &str,
    ) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock();
        check_versions_equal(&version_of(&*cell.load())?, prior_version)?;
        self.commit(name, cell, updated)?;
        self.config_listeners.notify();
        Ok(())
    }
}
