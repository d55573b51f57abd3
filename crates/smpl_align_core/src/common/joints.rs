use enum_map::Enum;
use std::fmt;
use strum::EnumCount;
use strum_macros::{EnumCount, EnumIter};

pub const NUM_BODY_JOINTS: usize = 21;
pub const NUM_HAND_JOINTS: usize = 15;
/// Root plus body plus both hands. This is the layout of `rotation_vector`
/// in the parameter records.
pub const NUM_JOINTS: usize = 1 + NUM_BODY_JOINTS + 2 * NUM_HAND_JOINTS;

/// Names as they appear on the SMPL-X skeleton asset
pub const JOINT_NAMES: [&str; NUM_JOINTS] = [
    "pelvis",
    "left_hip",
    "right_hip",
    "spine1",
    "left_knee",
    "right_knee",
    "spine2",
    "left_ankle",
    "right_ankle",
    "spine3",
    "left_foot",
    "right_foot",
    "neck",
    "left_collar",
    "right_collar",
    "head",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_index1",
    "left_index2",
    "left_index3",
    "left_middle1",
    "left_middle2",
    "left_middle3",
    "left_pinky1",
    "left_pinky2",
    "left_pinky3",
    "left_ring1",
    "left_ring2",
    "left_ring3",
    "left_thumb1",
    "left_thumb2",
    "left_thumb3",
    "right_index1",
    "right_index2",
    "right_index3",
    "right_middle1",
    "right_middle2",
    "right_middle3",
    "right_pinky1",
    "right_pinky2",
    "right_pinky3",
    "right_ring1",
    "right_ring2",
    "right_ring3",
    "right_thumb1",
    "right_thumb2",
    "right_thumb3",
];

/// Joint topology shared between the parameter producer and the body model.
/// Variant order is the order of the per-joint rotation vectors.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug, Enum, EnumIter, EnumCount)]
pub enum SmplXJoint {
    Pelvis,
    LeftHip,
    RightHip,
    Spine1,
    LeftKnee,
    RightKnee,
    Spine2,
    LeftAnkle,
    RightAnkle,
    Spine3,
    LeftFoot,
    RightFoot,
    Neck,
    LeftCollar,
    RightCollar,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftIndex1,
    LeftIndex2,
    LeftIndex3,
    LeftMiddle1,
    LeftMiddle2,
    LeftMiddle3,
    LeftPinky1,
    LeftPinky2,
    LeftPinky3,
    LeftRing1,
    LeftRing2,
    LeftRing3,
    LeftThumb1,
    LeftThumb2,
    LeftThumb3,
    RightIndex1,
    RightIndex2,
    RightIndex3,
    RightMiddle1,
    RightMiddle2,
    RightMiddle3,
    RightPinky1,
    RightPinky2,
    RightPinky3,
    RightRing1,
    RightRing2,
    RightRing3,
    RightThumb1,
    RightThumb2,
    RightThumb3,
}

// the name table and the enum have to describe the same skeleton
const _: () = assert!(SmplXJoint::COUNT == NUM_JOINTS);

impl SmplXJoint {
    /// The root joint carries the global orientation of the body
    pub const ROOT: Self = Self::Pelvis;

    pub fn index(self) -> usize {
        self.into_usize()
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        (idx < NUM_JOINTS).then(|| Self::from_usize(idx))
    }

    pub fn name(self) -> &'static str {
        JOINT_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        JOINT_NAMES.iter().position(|n| *n == name).and_then(Self::from_index)
    }
}

impl fmt::Display for SmplXJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
