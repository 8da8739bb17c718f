/// Pose of a single link as seen by a renderer.
#[derive(Clone, Debug, PartialEq, serde_derive::Serialize)]
pub struct LinkSnapshot {
    pub start: [f64; 2],
    pub end: [f64; 2],
    /// Local angle in degrees, normalized to (-180, 180].
    pub local_angle: f64,
    /// World angle in degrees, normalized to (-180, 180].
    pub world_angle: f64,
}

/// Read-only copy of the chain pose.
///
/// This is everything a renderer or tracer consumes from the chain.
#[derive(Clone, Debug, PartialEq, serde_derive::Serialize)]
pub struct ChainSnapshot {
    pub joints: Vec<[f64; 2]>,
    pub links: Vec<LinkSnapshot>,
    pub tip: Option<[f64; 2]>,
}
