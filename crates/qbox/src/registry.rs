use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;
use tokio::fs;

use crate::{
    definition::BoxDefinition,
    error::{Error, Result},
    image::scalar_string,
    machine::QemuBox,
};

pub const DEFAULT_QEMUFILE: &str = "Qemufile";

// Box names are any scalar key, so `1:` names the box "1".
#[derive(Deserialize, PartialEq, Eq, Hash)]
struct BoxName(#[serde(deserialize_with = "scalar_string")] String);

/// Every box from one qemufile, in file order.
#[derive(Clone, Debug, Default)]
pub struct BoxRegistry {
    boxes: Vec<QemuBox>,
}

impl BoxRegistry {
    /// Loads the qemufile at `path`. A missing file is an empty registry.
    pub async fn load(path: &Path) -> Result<BoxRegistry> {
        if !fs::try_exists(path).await? {
            return Ok(BoxRegistry::default());
        }
        let content = fs::read_to_string(path).await?;
        BoxRegistry::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<BoxRegistry> {
        let malformed = |source| Error::MalformedConfiguration {
            path: PathBuf::from(path),
            source,
        };

        let document: Value = serde_yaml::from_str(content).map_err(malformed)?;
        if document.is_null() {
            return Ok(BoxRegistry::default());
        }

        let definitions: IndexMap<BoxName, Option<BoxDefinition>> =
            serde_yaml::from_value(document).map_err(malformed)?;
        let boxes = definitions
            .into_iter()
            .map(|(name, definition)| QemuBox::new(name.0, definition.unwrap_or_default()))
            .collect();
        Ok(BoxRegistry { boxes })
    }

    pub fn boxes(&self) -> &[QemuBox] {
        &self.boxes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boxes.iter().map(|x| x.name.as_str())
    }

    pub fn find(&self, name: &str) -> Result<&QemuBox> {
        self.boxes
            .iter()
            .find(|x| x.name == name)
            .ok_or_else(|| Error::BoxNotFound(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }
}
