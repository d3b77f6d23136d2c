use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::image::{optional_scalar_string, scalar_string};

pub const DEFAULT_ARCHITECTURE: &str = "x86_64";

/// A box definition as written in the qemufile. Every key is optional and
/// unknown keys are ignored.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BoxDefinition {
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Value>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub architecture: Option<String>,
    #[serde(default)]
    pub args: Option<BoxArgs>,
}

/// Extra emulator arguments. The string form is split on single spaces with
/// no quoting or escaping, so `"-m  512"` yields an empty argument between
/// `-m` and `512`. Use the list form for arguments containing spaces.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum BoxArgs {
    List(#[serde(deserialize_with = "scalar_list")] Vec<String>),
    Line(#[serde(deserialize_with = "scalar_string")] String),
}

impl BoxArgs {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            BoxArgs::Line(line) => line.split(' ').map(|x| x.to_string()).collect(),
            BoxArgs::List(list) => list.clone(),
        }
    }
}

impl BoxDefinition {
    pub fn architecture(&self) -> &str {
        self.architecture.as_deref().unwrap_or(DEFAULT_ARCHITECTURE)
    }

    pub fn args(&self) -> Vec<String> {
        self.args.as_ref().map(BoxArgs::to_vec).unwrap_or_default()
    }
}

// Keeps `image: ~` distinguishable from a missing key: the field default only
// applies when the key is absent, so any present value arrives here wrapped.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Scalar(#[serde(deserialize_with = "scalar_string")] String);

    let items = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(items.into_iter().map(|x| x.0).collect())
}
