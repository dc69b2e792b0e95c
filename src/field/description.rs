//! Static field descriptions in the WPILib AprilTag layout JSON format.
use serde::Deserialize;

use crate::{geometry::{PoseSpec, Quaternion}, util::math::Vec3};

use super::{FieldLayoutError, Tag};

/// A field description that ships with the crate
#[derive(Debug)]
pub struct BuiltinField {
    pub name: &'static str,
    /// Largest tag id on this field
    pub capacity: usize,
    json: &'static str,
}

impl BuiltinField {
    pub fn description(&self) -> Result<FieldDescription, FieldLayoutError> {
        FieldDescription::from_json(self.json)
    }
}

const BUILTIN_FIELDS: &[BuiltinField] = &[
    BuiltinField {
        name: "2023-chargedup",
        capacity: super::CHARGED_UP_CAPACITY,
        json: include_str!("layouts/2023-chargedup.json"),
    },
];

/// Look up a built-in field description by its `year-gamename` name
pub fn builtin(name: &str) -> Option<&'static BuiltinField> {
    BUILTIN_FIELDS.iter().find(|field| field.name == name)
}

/// Names of all built-in field descriptions
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN_FIELDS.iter().map(|field| field.name)
}

#[derive(Clone, Debug, Deserialize)]
pub struct FieldDescription {
    tags: Vec<TagEntry>,
    field: FieldDimensions,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct FieldDimensions {
    length: f64,
    width: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct TagEntry {
    #[serde(rename = "ID")]
    id: u32,
    pose: PoseEntry,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct PoseEntry {
    translation: TranslationEntry,
    rotation: RotationEntry,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct TranslationEntry {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct RotationEntry {
    quaternion: QuaternionEntry,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct QuaternionEntry {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl FieldDescription {
    pub fn from_json(json: &str) -> Result<Self, FieldLayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, FieldLayoutError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Field length in meters
    pub const fn length(&self) -> f64 {
        self.field.length
    }

    /// Field width in meters
    pub const fn width(&self) -> f64 {
        self.field.width
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Build tags, in the order they are listed
    pub fn tags(&self) -> Result<Vec<Tag>, FieldLayoutError> {
        self.tags
            .iter()
            .map(|entry| {
                let q = entry.pose.rotation.quaternion;
                let rotation = Quaternion::new(q.w, q.x, q.y, q.z)
                    .normalized()
                    .ok_or(FieldLayoutError::InvalidQuaternion { id: entry.id })?;
                let t = entry.pose.translation;
                Ok(Tag::new(entry.id, PoseSpec::Quaternion {
                    translation: Vec3::of(t.x, t.y, t.z),
                    rotation,
                }))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{builtin, names, FieldDescription};
    use crate::field::FieldLayoutError;

    #[test]
    fn chargedup_parses() {
        let field = builtin("2023-chargedup").unwrap();
        let desc = field.description().unwrap();
        assert_eq!(desc.len(), 8);
        assert_eq!(desc.length(), 16.54175);
        assert_eq!(desc.width(), 8.0137);

        let tags = desc.tags().unwrap();
        let ids = tags.iter().map(|tag| tag.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        // Red-side tags face the blue wall
        assert!((tags[0].pose().euler().yaw.abs() - std::f64::consts::PI).abs() < 1e-9);
        assert_eq!(tags[7].pose().euler().yaw, 0.);
    }

    #[test]
    fn unknown_builtin() {
        assert!(builtin("1999-nonexistent").is_none());
        assert!(names().any(|name| name == "2023-chargedup"));
    }

    #[test]
    fn malformed_json() {
        let err = FieldDescription::from_json(r#"{"tags": [{"ID": 1}], "field": {"length": 1, "width": 1}}"#).unwrap_err();
        assert!(matches!(err, FieldLayoutError::Parse(_)));

        let err = FieldDescription::from_json("not json").unwrap_err();
        assert!(matches!(err, FieldLayoutError::Parse(_)));
    }

    #[test]
    fn degenerate_quaternion() {
        let json = r#"{
            "tags": [{"ID": 2, "pose": {
                "translation": {"x": 0, "y": 0, "z": 0},
                "rotation": {"quaternion": {"W": 0, "X": 0, "Y": 0, "Z": 0}}
            }}],
            "field": {"length": 5, "width": 5}
        }"#;
        let desc = FieldDescription::from_json(json).unwrap();
        assert!(matches!(desc.tags(), Err(FieldLayoutError::InvalidQuaternion { id: 2 })));
    }
}
