use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{Error, Result};

pub const DEFAULT_IMAGE_FORMAT: &str = "qcow2";
pub const DEFAULT_IMAGE_SIZE: &str = "512M";

/// Canonical disk image parameters handed to `qemu-img create`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageSpec {
    #[serde(deserialize_with = "scalar_string")]
    pub file: String,
    #[serde(rename = "type", deserialize_with = "scalar_string")]
    pub format: String,
    #[serde(deserialize_with = "scalar_string")]
    pub size: String,
}

impl ImageSpec {
    pub fn with_defaults(file: impl Into<String>) -> ImageSpec {
        ImageSpec {
            file: file.into(),
            format: DEFAULT_IMAGE_FORMAT.to_string(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

/// The shape of the `image` key of a box definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageDefinition {
    /// No `image` key at all: the box boots without a disk.
    #[default]
    Absent,
    /// `image: disk.qcow2`
    Path(String),
    /// `image:` with an empty or falsy value, which selects `<name>.img`.
    Empty,
    /// `image: {file, type, size}`
    Full(ImageSpec),
}

impl ImageDefinition {
    pub fn classify(name: &str, value: Option<&Value>) -> Result<ImageDefinition> {
        let Some(value) = value else {
            return Ok(ImageDefinition::Absent);
        };

        if is_falsy(value) {
            return Ok(ImageDefinition::Empty);
        }

        match value {
            Value::String(path) => Ok(ImageDefinition::Path(path.clone())),
            Value::Mapping(_) => serde_yaml::from_value::<ImageSpec>(value.clone())
                .map(ImageDefinition::Full)
                .map_err(|error| Error::InvalidImage {
                    name: name.to_string(),
                    reason: error.to_string(),
                }),
            other => Err(Error::InvalidImage {
                name: name.to_string(),
                reason: format!(
                    "expected a file path or a mapping with file, type and size, found {}",
                    value_kind(other)
                ),
            }),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<ImageSpec> {
        match self {
            ImageDefinition::Absent => None,
            ImageDefinition::Path(path) => Some(ImageSpec::with_defaults(path.clone())),
            ImageDefinition::Empty => Some(ImageSpec::with_defaults(format!("{}.img", name))),
            ImageDefinition::Full(spec) => Some(spec.clone()),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(_) => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

pub(crate) fn optional_scalar_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_text(value).map(Some).map_err(D::Error::custom),
    }
}

fn scalar_text(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, found {}", value_kind(&other))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_absent_image_resolves_to_none() {
        let image = ImageDefinition::classify("web", None).unwrap();
        assert_eq!(image, ImageDefinition::Absent);
        assert_eq!(image.resolve("web"), None);
    }

    #[test]
    fn test_string_image_is_a_file_path() {
        let image = ImageDefinition::classify("web", Some(&yaml("disk.qcow2"))).unwrap();
        assert_eq!(
            image.resolve("web"),
            Some(ImageSpec {
                file: "disk.qcow2".to_string(),
                format: "qcow2".to_string(),
                size: "512M".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_values_default_to_box_name() {
        for text in ["~", "''", "{}", "[]", "false", "0"] {
            let image = ImageDefinition::classify("web", Some(&yaml(text))).unwrap();
            assert_eq!(image, ImageDefinition::Empty, "value {}", text);
            assert_eq!(
                image.resolve("web"),
                Some(ImageSpec::with_defaults("web.img")),
                "value {}",
                text
            );
        }
    }

    #[test]
    fn test_full_mapping_is_used_verbatim() {
        let value = yaml("{file: big.raw, type: raw, size: 20G}");
        let image = ImageDefinition::classify("db", Some(&value)).unwrap();
        assert_eq!(
            image.resolve("db"),
            Some(ImageSpec {
                file: "big.raw".to_string(),
                format: "raw".to_string(),
                size: "20G".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_size_is_accepted() {
        let value = yaml("{file: small.img, type: raw, size: 1024}");
        let image = ImageDefinition::classify("db", Some(&value)).unwrap();
        assert_eq!(image.resolve("db").unwrap().size, "1024");
    }

    #[test]
    fn test_partial_mapping_is_rejected() {
        let value = yaml("{file: big.raw}");
        match ImageDefinition::classify("db", Some(&value)) {
            Err(Error::InvalidImage { name, reason }) => {
                assert_eq!(name, "db");
                assert!(reason.contains("missing field"), "{}", reason);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truthy_scalar_is_rejected() {
        for text in ["true", "42", "[a.img]"] {
            let result = ImageDefinition::classify("db", Some(&yaml(text)));
            assert!(
                matches!(result, Err(Error::InvalidImage { .. })),
                "value {}",
                text
            );
        }
    }

    #[test]
    fn test_image_spec_serializes_format_as_type() {
        let encoded = serde_yaml::to_string(&ImageSpec::with_defaults("a.img")).unwrap();
        assert!(encoded.contains("type: qcow2"), "{}", encoded);
    }
}
