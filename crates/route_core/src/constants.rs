/// Edge weight type
pub type Weight = f64;
/// Type which represents an external node ID, e.g. an OpenStreetMap ID (<https://wiki.openstreetmap.org/wiki/Node>)
pub type OsmId = usize;
/// Two distances closer than this are considered equal.
pub const EPSILON: Weight = 1e-15;
