//! MediaPipe Face Mesh indices used by the pipeline (468+ total)

/// Minimum mesh size for geometry-based analysis
pub const FACE_MESH_POINTS: usize = 468;

pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;
pub const MOUTH_LEFT: usize = 61;
pub const MOUTH_RIGHT: usize = 291;

pub const LEFT_EYEBROW: usize = 70;
pub const RIGHT_EYEBROW: usize = 300;

pub const LEFT_UPPER_EYELID: usize = 159;
pub const LEFT_LOWER_EYELID: usize = 145;
pub const RIGHT_UPPER_EYELID: usize = 386;
pub const RIGHT_LOWER_EYELID: usize = 374;

/// (upper, lower) eyelid pairs for both eyes
pub const EYELIDS: [(usize, usize); 2] = [
    (LEFT_UPPER_EYELID, LEFT_LOWER_EYELID),
    (RIGHT_UPPER_EYELID, RIGHT_LOWER_EYELID),
];

/// Face contour points sampled for identity descriptors
pub const DESCRIPTOR_POINTS: [usize; 20] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323,
    162, 127, 234, 93, 132, 58, 172, 136, 150, 176,
];
