//! Location collaborator answered from configuration instead of a device.

use async_trait::async_trait;
use coleta_core::{Coordinate, LocationPort, Permission, PortError};

use crate::config::{LocationConfig, PermissionSetting};

pub(crate) struct ConfiguredLocation {
    permission: Permission,
    fix: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub(crate) fn from_config(config: &LocationConfig) -> Self {
        let permission = match config.permission {
            PermissionSetting::Grant => Permission::Granted,
            PermissionSetting::Deny => Permission::Denied,
        };
        Self {
            permission,
            fix: config.fix(),
        }
    }
}

#[async_trait]
impl LocationPort for ConfiguredLocation {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn current_position(&self) -> Result<Coordinate, PortError> {
        self.fix.ok_or_else(|| {
            PortError::LocationUnavailable("no latitude/longitude configured".to_owned())
        })
    }
}
