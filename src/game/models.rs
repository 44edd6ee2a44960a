//! Best-effort loading of the optional per-role models.
//!
//! A missing or malformed file is never fatal: the role simply keeps its
//! scripted behaviour.

use std::path::{ Path, PathBuf };
use thiserror::Error;
use tracing::{ debug, warn };
use super::{ classifier::RoleModel, state::Role };

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unable to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed model {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Optional model per role. Absence means "use the scripted rule".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleModels([Option<RoleModel>; Role::COUNT]);

impl RoleModels {
    pub fn get(&self, role: Role) -> Option<&RoleModel> {
        self.0[role as usize].as_ref()
    }

    pub fn insert(&mut self, role: Role, model: RoleModel) {
        self.0[role as usize] = Some(model);
    }

    pub fn loaded(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.get(*r).is_some())
    }
}

pub fn model_path(dir: &Path, role: Role) -> PathBuf {
    dir.join(format!("{}.json", role.name()))
}

fn parse(path: &Path, bytes: &[u8]) -> Result<RoleModel, ModelError> {
    serde_json::from_slice(bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_model(path: &Path) -> Result<RoleModel, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &bytes)
}

pub async fn load_model_async(path: &Path) -> Result<RoleModel, ModelError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &bytes)
}

/// Loads `<dir>/<role>.json` for every role, skipping anything unusable.
pub fn load_models(dir: &Path) -> RoleModels {
    let mut models = RoleModels::default();
    for role in Role::ALL {
        match load_model(&model_path(dir, role)) {
            Ok(model) => {
                debug!(%role, ?model, "loaded role model");
                models.insert(role, model);
            }
            Err(ModelError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!(%role, "no model, using scripted behaviour");
            }
            Err(e) => warn!(%role, error = %e, "ignoring role model"),
        }
    }
    models
}
