//! Kinematic chain of alternating joints and links.
//!
//! The chain owns every joint and link in two arenas. Cross references
//! between them are plain indices, so the structure is a single owner tree
//! even though joints and links point at each other in both directions:
//!
//! ```text
//! (Joint 0) -> [Link 0] -> (Joint 1) -> [Link 1] -> ... -> (End effector)
//! ```
//!
//! Every angle is stored in degrees. A link stores the angle commanded by
//! its start joint (`local_angle`) and its derived orientation in the world
//! frame (`world_angle`), which is the sum of local angles from the root
//! link up to and including this link.

use crate::core::{ChainSnapshot, LinkSnapshot};
use crate::math::{self, Point};
use crate::runtime::{Error, Result};

pub use self::builder::ChainBuilder;

mod builder;

/// Handle to a joint in the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointId(usize);

impl JointId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to a link in the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(usize);

impl LinkId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointKind {
    /// A rotary joint that drives its outgoing link.
    Actuated,
    /// The end effector. Marks the tip of the chain and cannot rotate.
    Terminal,
}

#[derive(Clone, Debug)]
pub struct Joint {
    kind: JointKind,
    position: Point,
    incoming: Option<LinkId>,
    outgoing: Option<LinkId>,
}

impl Joint {
    fn new(kind: JointKind, position: Point, incoming: Option<LinkId>) -> Self {
        Self {
            kind,
            position,
            incoming,
            outgoing: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// The link feeding into this joint, `None` for the base joint.
    #[inline]
    pub fn incoming(&self) -> Option<LinkId> {
        self.incoming
    }

    /// The link driven by this joint, `None` for a free tip or the end effector.
    #[inline]
    pub fn outgoing(&self) -> Option<LinkId> {
        self.outgoing
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind == JointKind::Terminal
    }
}

#[derive(Clone, Debug)]
pub struct Link {
    length: f64,
    local_angle: f64,
    world_angle: f64,
    start_point: Point,
    endpoint: Point,
    start_joint: JointId,
    end_joint: Option<JointId>,
}

impl Link {
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Angle commanded by the start joint, relative to the parent link.
    #[inline]
    pub fn local_angle(&self) -> f64 {
        self.local_angle
    }

    /// Orientation of the link in the world frame.
    #[inline]
    pub fn world_angle(&self) -> f64 {
        self.world_angle
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.start_point
    }

    #[inline]
    pub fn endpoint(&self) -> Point {
        self.endpoint
    }

    #[inline]
    pub fn start_joint(&self) -> JointId {
        self.start_joint
    }

    #[inline]
    pub fn end_joint(&self) -> Option<JointId> {
        self.end_joint
    }
}

/// Serial manipulator model.
#[derive(Clone, Default)]
pub struct Chain {
    joints: Vec<Joint>,
    links: Vec<Link>,
    end_effector: Option<JointId>,
}

impl Chain {
    /// Construct an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the base joint at `point`.
    pub fn attach_base(&mut self, point: Point) -> Result<JointId> {
        if !self.joints.is_empty() {
            return Err(Error::InvalidState("base already attached"));
        }

        self.joints.push(Joint::new(JointKind::Actuated, point, None));

        log::trace!("Attached base at ({:.2}, {:.2})", point.x, point.y);

        Ok(JointId(0))
    }

    /// Append a link to the free joint at the tip of the chain.
    ///
    /// The local angle is relative to the parent link, if any.
    pub fn append_link(&mut self, length: f64, local_angle: f64) -> Result<LinkId> {
        if !(length.is_finite() && length > 0.0) {
            return Err(Error::DegenerateInput("link length must be positive"));
        }
        if !local_angle.is_finite() {
            return Err(Error::DegenerateInput("link angle must be finite"));
        }
        if self.end_effector.is_some() {
            return Err(Error::Structural("chain is closed by an end effector"));
        }

        let tip_id = match self.joints.len() {
            0 => return Err(Error::Structural("no joints available")),
            len => JointId(len - 1),
        };

        let tip = &self.joints[tip_id.0];
        if tip.outgoing.is_some() {
            return Err(Error::Structural("no free joint"));
        }

        let world_angle = match tip.incoming {
            Some(parent) => self.links[parent.0].world_angle + local_angle,
            None => local_angle,
        };

        let start_point = tip.position;
        let link_id = LinkId(self.links.len());

        self.links.push(Link {
            length,
            local_angle,
            world_angle,
            start_point,
            endpoint: math::polar(&start_point, length, world_angle),
            start_joint: tip_id,
            end_joint: None,
        });
        self.joints[tip_id.0].outgoing = Some(link_id);

        log::trace!(
            "Appended link {} with length {:.2} at {:.2}°",
            link_id.0,
            length,
            local_angle
        );

        Ok(link_id)
    }

    /// Append an actuated joint at the endpoint of the tip link.
    pub fn append_joint(&mut self) -> Result<JointId> {
        self.append_joint_kind(JointKind::Actuated)
    }

    /// Close the chain with the end effector.
    ///
    /// No links can be appended after this call.
    pub fn append_end_effector(&mut self) -> Result<JointId> {
        let joint_id = self.append_joint_kind(JointKind::Terminal)?;
        self.end_effector = Some(joint_id);
        Ok(joint_id)
    }

    fn append_joint_kind(&mut self, kind: JointKind) -> Result<JointId> {
        let link_id = match self.links.len() {
            0 => return Err(Error::Structural("no free link")),
            len => LinkId(len - 1),
        };

        let link = &self.links[link_id.0];
        if link.end_joint.is_some() {
            return Err(Error::Structural("no free link"));
        }

        let joint_id = JointId(self.joints.len());

        self.joints.push(Joint::new(kind, link.endpoint, Some(link_id)));
        self.links[link_id.0].end_joint = Some(joint_id);

        Ok(joint_id)
    }

    /// Command the joint at `index` to the local angle in degrees.
    ///
    /// Every link and joint distal to this joint is updated. Rotating a
    /// joint without an outgoing link has no effect.
    pub fn rotate_joint(&mut self, index: usize, local_angle: f64) -> Result {
        let joint = self
            .joints
            .get(index)
            .ok_or(Error::JointOutOfRange(index))?;

        if !local_angle.is_finite() {
            return Err(Error::DegenerateInput("joint angle must be finite"));
        }

        let link_id = match (joint.kind, joint.outgoing) {
            (JointKind::Actuated, Some(link_id)) => link_id,
            _ => return Ok(()),
        };

        self.links[link_id.0].local_angle = local_angle;
        self.propagate(link_id);

        Ok(())
    }

    /// Relocate the base joint and carry the entire chain along.
    ///
    /// Local angles are left untouched.
    pub fn move_base(&mut self, point: Point) -> Result {
        if self.joints.is_empty() {
            return Err(Error::InvalidState("no base attached"));
        }

        self.move_joint(JointId(0), point);

        Ok(())
    }

    fn move_joint(&mut self, joint_id: JointId, point: Point) {
        self.joints[joint_id.0].position = point;

        if let Some(link_id) = self.joints[joint_id.0].outgoing {
            self.links[link_id.0].start_point = point;
            self.propagate(link_id);
        }
    }

    /// Recompute the link and walk outward until the first joint without
    /// an outgoing link.
    fn propagate(&mut self, mut link_id: LinkId) {
        loop {
            let parent_world_angle = self.joints[self.links[link_id.0].start_joint.0]
                .incoming
                .map(|parent| self.links[parent.0].world_angle);

            let link = &mut self.links[link_id.0];
            link.world_angle = parent_world_angle.unwrap_or(0.0) + link.local_angle;
            link.endpoint = math::polar(&link.start_point, link.length, link.world_angle);

            let endpoint = link.endpoint;
            let Some(joint_id) = link.end_joint else {
                break;
            };

            let joint = &mut self.joints[joint_id.0];
            joint.position = endpoint;

            match joint.outgoing {
                Some(next) => {
                    self.links[next.0].start_point = endpoint;
                    link_id = next;
                }
                None => break,
            }
        }
    }

    #[inline]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[inline]
    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    #[inline]
    pub fn link(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    /// Link feeding the start joint of `link_id`, if any.
    pub fn parent_link(&self, link_id: LinkId) -> Option<&Link> {
        let link = self.links.get(link_id.0)?;

        self.joints[link.start_joint.0]
            .incoming
            .map(|parent| &self.links[parent.0])
    }

    pub fn base_point(&self) -> Option<Point> {
        self.joints.first().map(|joint| joint.position)
    }

    /// Outermost point of the chain.
    ///
    /// This is the endpoint of the last link, or the base when no link
    /// has been appended yet.
    pub fn tip_point(&self) -> Option<Point> {
        self.links
            .last()
            .map(|link| link.endpoint)
            .or_else(|| self.base_point())
    }

    pub fn end_effector(&self) -> Option<&Joint> {
        self.end_effector.map(|joint_id| &self.joints[joint_id.0])
    }

    pub fn end_effector_point(&self) -> Option<Point> {
        self.end_effector().map(|joint| joint.position)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.end_effector.is_some()
    }

    /// Local angles of all links in chain order.
    pub fn local_angles(&self) -> Vec<f64> {
        self.links.iter().map(|link| link.local_angle).collect()
    }

    /// World angles of all links in chain order.
    pub fn world_angles(&self) -> Vec<f64> {
        self.links.iter().map(|link| link.world_angle).collect()
    }

    pub fn link_lengths(&self) -> Vec<f64> {
        self.links.iter().map(|link| link.length).collect()
    }

    /// Capture the current pose for rendering or tracing.
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            joints: self
                .joints
                .iter()
                .map(|joint| [joint.position.x, joint.position.y])
                .collect(),
            links: self
                .links
                .iter()
                .map(|link| LinkSnapshot {
                    start: [link.start_point.x, link.start_point.y],
                    end: [link.endpoint.x, link.endpoint.y],
                    local_angle: math::normalize_angle(link.local_angle),
                    world_angle: math::normalize_angle(link.world_angle),
                })
                .collect(),
            tip: self.tip_point().map(|point| [point.x, point.y]),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.tip_point() {
            Some(point) => write!(f, "[{:.2}, {:.2}]", point.x, point.y),
            None => write!(f, "[]"),
        }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();

        for (index, link) in self.links.iter().enumerate() {
            s.push_str(&format!(
                "link{}={:5.2}°/{:5.2}° ",
                index,
                math::normalize_angle(link.local_angle),
                math::normalize_angle(link.world_angle),
            ));
        }

        write!(f, "{s}Endpoint {}", self)
    }
}
