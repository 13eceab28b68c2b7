//! Looping clip playback.
//!
//! An [`AnimationClip`] is immutable once a model has loaded. Each
//! [`AnimationPlayer`] binds one clip and owns the playback position; the
//! [`AnimationMixer`] holds all players and advances them with the real time
//! elapsed between frames.

use std::{sync::Arc, time::Duration};

use cgmath::{InnerSpace, Quaternion, VectorSpace};
use slotmap::{SlotMap, new_key_type};

pub use crate::resources::animation::{Interpolation, Keyframes};
use crate::data_structures::scene_graph::{NodeId, SceneGraph};

#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub target: NodeId,
    pub timestamps: Vec<f32>,
    pub keyframes: Keyframes,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    duration: f32,
    channels: Vec<Channel>,
}

impl AnimationClip {
    /// The duration is the last timestamp over all channels.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let name = name.into();
        for channel in &channels {
            let frames = channel.keyframes.len();
            let sampled = !matches!(channel.keyframes, Keyframes::Other);
            if sampled && frames != channel.timestamps.len() {
                log::warn!(
                    "clip `{name}`: {} timestamps but {frames} keyframes on {:?}",
                    channel.timestamps.len(),
                    channel.target
                );
            }
        }
        let duration = channels
            .iter()
            .filter_map(|channel| channel.timestamps.last().copied())
            .fold(0.0, f32::max);
        Self {
            name,
            duration,
            channels,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Writes the pose at `time` into the target nodes.
    pub fn apply(&self, scene: &mut SceneGraph, time: f32) {
        for channel in &self.channels {
            let Some(node) = scene.get_mut(channel.target) else {
                continue;
            };
            let Some((prev, next, factor)) = frame_at(&channel.timestamps, time) else {
                continue;
            };
            let factor = match channel.interpolation {
                Interpolation::Step => 0.0,
                Interpolation::Linear => factor,
            };
            let transform = &mut node.transform;
            // Channels with fewer keyframes than timestamps are left alone.
            match &channel.keyframes {
                Keyframes::Translation(frames) => {
                    if let Some((from, to)) = pair(frames, prev, next) {
                        transform.position = from.lerp(to, factor);
                    }
                }
                Keyframes::Scale(frames) => {
                    if let Some((from, to)) = pair(frames, prev, next) {
                        transform.scale = from.lerp(to, factor);
                    }
                }
                Keyframes::Rotation(frames) => {
                    if let Some((from, to)) = pair(frames, prev, next) {
                        transform.set_quaternion(slerp(from, to, factor));
                    }
                }
                Keyframes::Other => (),
            }
        }
    }
}

fn pair<T: Copy>(frames: &[T], prev: usize, next: usize) -> Option<(T, T)> {
    Some((*frames.get(prev)?, *frames.get(next)?))
}

/// Keyframe indices around `time` and the blend factor between them.
fn frame_at(timestamps: &[f32], time: f32) -> Option<(usize, usize, f32)> {
    let last = timestamps.len().checked_sub(1)?;
    let next = timestamps.partition_point(|&t| t <= time);
    if next == 0 {
        return Some((0, 0, 0.0));
    }
    if next > last {
        return Some((last, last, 0.0));
    }
    let prev = next - 1;
    let span = timestamps[next] - timestamps[prev];
    let factor = if span > 0.0 {
        (time - timestamps[prev]) / span
    } else {
        0.0
    };
    Some((prev, next, factor))
}

/// Spherical interpolation along the shorter arc.
fn slerp(from: Quaternion<f32>, to: Quaternion<f32>, factor: f32) -> Quaternion<f32> {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, factor).normalize()
}

new_key_type! {
    pub struct PlayerHandle;
}

#[derive(Clone, Debug)]
pub struct AnimationPlayer {
    pub node: NodeId,
    clip: Arc<AnimationClip>,
    position: f32,
}

impl AnimationPlayer {
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Playback position in seconds, always in `[0, duration)`.
    pub fn position(&self) -> f32 {
        self.position
    }

    fn advance(&mut self, dt: Duration, scene: &mut SceneGraph) {
        if dt.is_zero() {
            return;
        }
        let duration = self.clip.duration();
        self.position = if duration > 0.0 {
            (self.position + dt.as_secs_f32()) % duration
        } else {
            0.0
        };
        self.clip.apply(scene, self.position);
    }
}

#[derive(Debug, Default)]
pub struct AnimationMixer {
    players: SlotMap<PlayerHandle, AnimationPlayer>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts looping `clip` from its beginning. `node` is the model the clip
    /// belongs to; the channels carry their own targets.
    pub fn bind(&mut self, node: NodeId, clip: Arc<AnimationClip>) -> PlayerHandle {
        log::info!("playing `{}` ({}s) on {node:?}", clip.name, clip.duration());
        self.players.insert(AnimationPlayer {
            node,
            clip,
            position: 0.0,
        })
    }

    /// Returns `false` for an unknown handle.
    pub fn advance(&mut self, handle: PlayerHandle, dt: Duration, scene: &mut SceneGraph) -> bool {
        match self.players.get_mut(handle) {
            Some(player) => {
                player.advance(dt, scene);
                true
            }
            None => false,
        }
    }

    pub fn advance_all(&mut self, dt: Duration, scene: &mut SceneGraph) {
        for player in self.players.values_mut() {
            player.advance(dt, scene);
        }
    }

    pub fn player(&self, handle: PlayerHandle) -> Option<&AnimationPlayer> {
        self.players.get(handle)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
