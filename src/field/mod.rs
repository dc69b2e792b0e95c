//! Known tag poses for a competition field, and the alliance-dependent origin
//! they are reported relative to.
mod description;
mod error;
mod tag;

use std::{fmt::Display, path::Path, str::FromStr};

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::{geometry::{Pose3, Rotation3}, util::math::Vec3};

pub use description::{builtin, names as builtin_names, BuiltinField, FieldDescription};
pub use error::FieldLayoutError;
pub use tag::Tag;

/// Largest field capacity supported
pub const MAX_CAPACITY: usize = 30;
/// Capacity of the 2023 (Charged Up) field
pub const CHARGED_UP_CAPACITY: usize = 8;

/// Slot `i` holds tag id `i`, so one more than the largest id
const SLOTS: usize = MAX_CAPACITY + 1;

/// Which alliance wall the field frame is anchored to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Field-native frame: origin at the right corner of the blue alliance wall
    BlueAllianceWallRightSide,
    /// Origin at the right corner of the red alliance wall, facing the blue wall
    RedAllianceWallRightSide,
}

impl Origin {
    pub const fn for_alliance(is_red: bool) -> Self {
        if is_red {
            Self::RedAllianceWallRightSide
        } else {
            Self::BlueAllianceWallRightSide
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::BlueAllianceWallRightSide => "BlueWall",
            Self::RedAllianceWallRightSide => "RedWall",
        }
    }
}

impl FromStr for Origin {
    type Err = FieldLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BlueWall" => Ok(Self::BlueAllianceWallRightSide),
            "RedWall" => Ok(Self::RedAllianceWallRightSide),
            other => Err(FieldLayoutError::InvalidOrigin(other.into())),
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalogue of tag poses on a field
///
/// Tag poses are stored in the field-native (blue wall) frame. Queries through
/// [tag_pose](Self::tag_pose) are expressed relative to the current [Origin].
#[derive(Clone, Debug)]
pub struct FieldLayout {
    /// Indexed by tag id
    tags: ArrayVec<Option<Tag>, SLOTS>,
    capacity: usize,
    length: f64,
    width: f64,
    origin: Origin,
    origin_pose: Pose3,
}

impl FieldLayout {
    /// Build a layout from a set of tags
    ///
    /// `capacity` is the largest tag id the field can hold (8 or 30 for
    /// current fields).
    pub fn new(tags: impl IntoIterator<Item = Tag>, field_length: f64, field_width: f64, capacity: usize, origin: Origin) -> Result<Self, FieldLayoutError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(FieldLayoutError::InvalidCapacity { actual: capacity, maximum: MAX_CAPACITY });
        }
        if !(field_length.is_finite() && field_width.is_finite() && field_length > 0. && field_width > 0.) {
            return Err(FieldLayoutError::InvalidFieldDimensions { length: field_length, width: field_width });
        }

        let tags = tags.into_iter().collect::<Vec<_>>();
        if tags.len() > capacity {
            return Err(FieldLayoutError::TooManyTags { actual: tags.len(), capacity });
        }

        debug!(length = field_length, width = field_width, capacity, "Building field layout");

        let mut slots = (0..=capacity).map(|_| None).collect::<ArrayVec<Option<Tag>, SLOTS>>();
        for tag in tags {
            let id = tag.id();
            // Slot 0 is reserved for the sentinel
            let slot = slots
                .get_mut(id as usize)
                .filter(|_| id != 0)
                .ok_or(FieldLayoutError::TagIdOutOfRange { id, capacity })?;
            if slot.is_some() {
                return Err(FieldLayoutError::DuplicateTagId(id));
            }
            debug!(id, pose = ?tag.pose(), "Registered tag");
            *slot = Some(tag);
        }

        let mut layout = Self {
            tags: slots,
            capacity,
            length: field_length,
            width: field_width,
            origin,
            origin_pose: Pose3::identity(),
        };
        layout.set_origin(origin);
        Ok(layout)
    }

    /// Build a layout, choosing the origin from the alliance color
    pub fn for_alliance(tags: impl IntoIterator<Item = Tag>, field_length: f64, field_width: f64, capacity: usize, is_red_alliance: bool) -> Result<Self, FieldLayoutError> {
        Self::new(tags, field_length, field_width, capacity, Origin::for_alliance(is_red_alliance))
    }

    /// Load one of the built-in field descriptions by name (e.g. `"2023-chargedup"`)
    pub fn load(name: &str, is_red_alliance: bool) -> Result<Self, FieldLayoutError> {
        let field = builtin(name)
            .ok_or_else(|| FieldLayoutError::NotFound(name.into()))?;
        let description = field.description()?;
        Self::from_description(&description, field.capacity, Origin::for_alliance(is_red_alliance))
    }

    pub fn from_description(description: &FieldDescription, capacity: usize, origin: Origin) -> Result<Self, FieldLayoutError> {
        Self::new(description.tags()?, description.length(), description.width(), capacity, origin)
    }

    pub fn from_json(json: &str, capacity: usize, origin: Origin) -> Result<Self, FieldLayoutError> {
        Self::from_description(&FieldDescription::from_json(json)?, capacity, origin)
    }

    /// Load a field description from a JSON file
    pub fn from_path(path: impl AsRef<Path>, capacity: usize, origin: Origin) -> Result<Self, FieldLayoutError> {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FieldLayoutError::NotFound(path.display().to_string()));
            },
            Err(e) => return Err(FieldLayoutError::Io(e)),
        };
        let description = FieldDescription::from_reader(std::io::BufReader::new(file))?;
        Self::from_description(&description, capacity, origin)
    }

    /// Change the frame that [tag_pose](Self::tag_pose) reports in
    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
        self.origin_pose = match origin {
            Origin::BlueAllianceWallRightSide => Pose3::identity(),
            Origin::RedAllianceWallRightSide => Pose3::new(
                Vec3::of(self.length, self.width, 0.),
                Rotation3::about_z(std::f64::consts::PI),
            ),
        };
        info!(%origin, "Field origin set");
    }

    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Pose of the current origin in the field-native frame
    pub const fn origin_pose(&self) -> &Pose3 {
        &self.origin_pose
    }

    /// Pose of tag `id` relative to the current origin
    ///
    /// Returns the identity pose if there is no such tag. Callers must treat
    /// the identity pose as "unknown", not as a tag at the origin.
    pub fn tag_pose(&self, id: u32) -> Pose3 {
        match self.tag(id) {
            Some(tag) => tag.pose().relative_to(&self.origin_pose),
            None => Pose3::identity(),
        }
    }

    pub fn tag(&self, id: u32) -> Option<&Tag> {
        self.tags
            .get(id as usize)
            .and_then(Option::as_ref)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.tag(id).is_some()
    }

    /// Raw backing array in the field-native frame, indexed by id
    ///
    /// Unpopulated slots hold the identity pose.
    pub fn all_tags(&self) -> Vec<Pose3> {
        self.tags
            .iter()
            .map(|slot| slot.map(|tag| *tag.pose()).unwrap_or_default())
            .collect()
    }

    /// Configured tags, in id order
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().flatten()
    }

    /// Number of configured tags
    pub fn len(&self) -> usize {
        self.tags().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Field length in meters
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Field width in meters
    pub const fn width(&self) -> f64 {
        self.width
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use float_cmp::approx_eq;

    use crate::{geometry::{Pose3, PoseSpec}, util::math::{angle_modulus, Vec3}};
    use super::{FieldLayout, FieldLayoutError, Origin, Tag, CHARGED_UP_CAPACITY};

    fn tag_at(id: u32, x: f64, y: f64, yaw: f64) -> Tag {
        Tag::new(id, PoseSpec::Components { x, y, z: 0., roll: 0., pitch: 0., yaw })
    }

    #[test]
    fn too_many_tags() {
        let tags = (1..=9).map(|id| tag_at(id, 1., 1., 0.));
        let err = FieldLayout::new(tags, 10., 15., CHARGED_UP_CAPACITY, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::TooManyTags { actual: 9, capacity: 8 }));
        assert!(err.is_configuration());
    }

    #[test]
    fn bad_capacity() {
        for capacity in [0, 31, 100] {
            let err = FieldLayout::new(Vec::<Tag>::new(), 10., 15., capacity, Origin::BlueAllianceWallRightSide).unwrap_err();
            assert!(matches!(err, FieldLayoutError::InvalidCapacity { .. }));
        }
    }

    #[test]
    fn bad_ids() {
        let err = FieldLayout::new([tag_at(9, 0., 0., 0.)], 10., 15., 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::TagIdOutOfRange { id: 9, capacity: 8 }));

        let err = FieldLayout::new([tag_at(0, 1., 1., 0.)], 10., 15., 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::TagIdOutOfRange { id: 0, capacity: 8 }));

        let err = FieldLayout::new([tag_at(2, 0., 0., 0.), tag_at(2, 1., 0., 0.)], 10., 15., 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::DuplicateTagId(2)));
    }

    #[test]
    fn bad_dimensions() {
        let err = FieldLayout::new(Vec::<Tag>::new(), f64::NAN, 15., 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::InvalidFieldDimensions { .. }));
        let err = FieldLayout::new(Vec::<Tag>::new(), 10., -1., 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::InvalidFieldDimensions { .. }));
    }

    #[test]
    fn red_origin_flips_tag() {
        let mut layout = FieldLayout::for_alliance([tag_at(1, 1., 1., 0.)], 10., 15., 8, false).unwrap();
        let blue = layout.tag_pose(1);
        assert!(approx_eq!(Vec3, blue.translation, Vec3::of(1., 1., 0.), epsilon = 1e-12));

        layout.set_origin(Origin::RedAllianceWallRightSide);
        let red = layout.tag_pose(1);
        assert!(approx_eq!(Vec3, red.translation, Vec3::of(9., 14., 0.), epsilon = 1e-9));

        let dyaw = angle_modulus(red.euler().yaw - blue.euler().yaw);
        assert!((dyaw.abs() - PI).abs() < 1e-9);
        assert!(red.euler().roll.abs() < 1e-9);
        assert!(red.euler().pitch.abs() < 1e-9);
    }

    #[test]
    fn origin_only_affects_queries() {
        let mut layout = FieldLayout::for_alliance([tag_at(3, 2., 5., 0.5)], 10., 15., 8, true).unwrap();
        assert_eq!(layout.origin(), Origin::RedAllianceWallRightSide);
        let raw_red = layout.all_tags();
        layout.set_origin(Origin::BlueAllianceWallRightSide);
        assert_eq!(layout.all_tags(), raw_red);
        assert_eq!(raw_red[3], *layout.tag(3).unwrap().pose());
    }

    #[test]
    fn unknown_ids_are_identity() {
        let mut layout = FieldLayout::for_alliance([tag_at(1, 1., 1., 0.)], 10., 15., 8, false).unwrap();
        for origin in [Origin::BlueAllianceWallRightSide, Origin::RedAllianceWallRightSide] {
            layout.set_origin(origin);
            for id in [0, 2, 8, 9, 30, 1000, u32::MAX] {
                assert!(layout.tag_pose(id).is_identity(), "id {id} with {origin}");
            }
        }
    }

    #[test]
    fn backing_array_has_sentinels() {
        let layout = FieldLayout::for_alliance([tag_at(2, 1., 1., 0.)], 10., 15., 8, false).unwrap();
        let all = layout.all_tags();
        assert_eq!(all.len(), 9);
        assert!(all[0].is_identity());
        assert!(!all[2].is_identity());
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.tags().map(|tag| tag.id()).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn load_builtin() {
        let layout = FieldLayout::load("2023-chargedup", false).unwrap();
        assert_eq!(layout.len(), 8);
        assert_eq!(layout.capacity(), 8);
        assert_eq!(layout.tag_pose(8).translation, Vec3::of(1.02743, 1.071626, 0.462788));

        let red = FieldLayout::load("2023-chargedup", true).unwrap();
        // Tag 1 is in front of the red wall, facing the blue wall
        let pose = red.tag_pose(1);
        assert!((pose.x() - (16.54175 - 15.513558)).abs() < 1e-9);
        assert!((pose.y() - (8.0137 - 1.071626)).abs() < 1e-9);
        assert!(angle_modulus(pose.euler().yaw).abs() < 1e-9);
    }

    #[test]
    fn load_missing() {
        assert!(matches!(FieldLayout::load("2019-deepspace", false), Err(FieldLayoutError::NotFound(_))));
        assert!(matches!(
            FieldLayout::from_path("/nonexistent/field.json", 8, Origin::BlueAllianceWallRightSide),
            Err(FieldLayoutError::NotFound(_))
        ));
    }

    #[test]
    fn load_malformed() {
        let err = FieldLayout::from_json(r#"{"tags": "nope"}"#, 8, Origin::BlueAllianceWallRightSide).unwrap_err();
        assert!(matches!(err, FieldLayoutError::Parse(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn parse_origin() {
        assert_eq!("BlueWall".parse::<Origin>().unwrap(), Origin::BlueAllianceWallRightSide);
        assert_eq!("RedWall".parse::<Origin>().unwrap(), Origin::RedAllianceWallRightSide);
        assert!(matches!("GreenWall".parse::<Origin>(), Err(FieldLayoutError::InvalidOrigin(_))));
        assert_eq!(Origin::RedAllianceWallRightSide.to_string(), "RedWall");
    }

    #[test]
    fn pose_identity_default() {
        assert_eq!(Pose3::default(), Pose3::identity());
    }
}
