//! Time-derived rotation of registered scene nodes.
//!
//! Every frame the [`SpinScheduler`] recomputes the rotation of each enabled
//! registration from the absolute time since start. Nothing is accumulated:
//! ticking twice with the same timestamp yields the same pose, and a paused
//! render loop jumps ahead when it resumes.

use serde::Deserialize;

use crate::data_structures::scene_graph::{NodeId, SceneGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn factor(self) -> f32 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

/// Rotation rate of a single axis in radians per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRate {
    pub coefficient: f32,
    /// Whether the registration's sign applies to this axis.
    pub signed: bool,
}

impl AxisRate {
    pub fn signed(coefficient: f32) -> Self {
        Self {
            coefficient,
            signed: true,
        }
    }

    pub fn unsigned(coefficient: f32) -> Self {
        Self {
            coefficient,
            signed: false,
        }
    }

    fn angle(&self, sign: Sign, now: f32) -> f32 {
        let angle = now * self.coefficient;
        if self.signed { sign.factor() * angle } else { angle }
    }
}

/// Which axes a registration drives. `None` axes are never written.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SpinProfile {
    pub x: Option<AxisRate>,
    pub y: Option<AxisRate>,
    pub z: Option<AxisRate>,
}

impl SpinProfile {
    /// `x = ±t·0.5`, `z = t·0.51`, y untouched.
    pub fn platonic() -> Self {
        Self {
            x: Some(AxisRate::signed(0.5)),
            y: None,
            z: Some(AxisRate::unsigned(0.51)),
        }
    }

    /// Signed rotation about y only.
    pub fn about_y(coefficient: f32) -> Self {
        Self {
            y: Some(AxisRate::signed(coefficient)),
            ..Self::default()
        }
    }

    pub fn axes(&self, sign: Sign, now: f32) -> [Option<f32>; 3] {
        [self.x, self.y, self.z].map(|rate| rate.map(|rate| rate.angle(sign, now)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpinRegistration {
    pub node: NodeId,
    pub sign: Sign,
    pub enabled: bool,
    pub profile: SpinProfile,
}

#[derive(Debug, Default)]
pub struct SpinScheduler {
    registrations: Vec<SpinRegistration>,
}

impl SpinScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node`; the index returned can be used to toggle it later.
    pub fn register(&mut self, node: NodeId, sign: Sign, profile: SpinProfile) -> usize {
        self.registrations.push(SpinRegistration {
            node,
            sign,
            enabled: true,
            profile,
        });
        self.registrations.len() - 1
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.registrations.get_mut(index) {
            Some(registration) => {
                registration.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn registrations(&self) -> &[SpinRegistration] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Applies the rotation for `now` (seconds since start) to every enabled node.
    ///
    /// Nodes that were removed from the scene are skipped.
    pub fn tick(&self, scene: &mut SceneGraph, now: f32) {
        for registration in self.registrations.iter().filter(|r| r.enabled) {
            let axes = registration.profile.axes(registration.sign, now);
            if scene.rotate(registration.node, axes).is_err() {
                log::trace!("spin target {:?} is gone", registration.node);
            }
        }
    }
}
