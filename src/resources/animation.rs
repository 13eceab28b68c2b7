use anyhow::{Context, bail};
use cgmath::{Quaternion, Vector3};
use gltf::animation::util::ReadOutputs;

#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
    Translation(Vec<Vector3<f32>>),
    Rotation(Vec<Quaternion<f32>>),
    Scale(Vec<Vector3<f32>>),
    Other,
}

impl Keyframes {
    pub fn len(&self) -> usize {
        match self {
            Keyframes::Translation(frames) | Keyframes::Scale(frames) => frames.len(),
            Keyframes::Rotation(frames) => frames.len(),
            Keyframes::Other => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

/// A channel as read from the file. `target` indexes the asset's node list.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelData {
    pub target: usize,
    pub timestamps: Vec<f32>,
    pub keyframes: Keyframes,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipData {
    pub name: String,
    pub channels: Vec<ChannelData>,
}

/// Reads every animation of a glTF document.
///
/// Cubic spline channels are sampled linearly through their key values; morph
/// target weights are kept as [`Keyframes::Other`] and ignored at playback.
pub fn read_clips(document: &gltf::Document, buffers: &[Vec<u8>]) -> anyhow::Result<Vec<ClipData>> {
    let mut clips = Vec::new();
    for animation in document.animations() {
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation {}", animation.index()));
        let mut channels = Vec::new();
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(inputs) = reader.read_inputs() else {
                log::warn!("channel {} of `{name}` has no timestamps", channel.index());
                continue;
            };
            let timestamps: Vec<f32> = inputs.collect();
            let cubic = channel.sampler().interpolation() == gltf::animation::Interpolation::CubicSpline;
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => Interpolation::Step,
                _ => Interpolation::Linear,
            };
            let outputs = reader
                .read_outputs()
                .with_context(|| format!("channel {} of `{name}` has no keyframes", channel.index()))?;
            let keyframes = match outputs {
                ReadOutputs::Translations(translations) => {
                    Keyframes::Translation(key_values(translations.map(Vector3::from), cubic))
                }
                ReadOutputs::Rotations(rotations) => Keyframes::Rotation(key_values(
                    rotations.into_f32().map(|[x, y, z, w]| Quaternion::new(w, x, y, z)),
                    cubic,
                )),
                ReadOutputs::Scales(scales) => {
                    Keyframes::Scale(key_values(scales.map(Vector3::from), cubic))
                }
                ReadOutputs::MorphTargetWeights(_) => Keyframes::Other,
            };
            if keyframes != Keyframes::Other && keyframes.len() != timestamps.len() {
                bail!(
                    "channel {} of `{name}` has {} timestamps but {} keyframes",
                    channel.index(),
                    timestamps.len(),
                    keyframes.len()
                );
            }
            channels.push(ChannelData {
                target: channel.target().node().index(),
                timestamps,
                keyframes,
                interpolation,
            });
        }
        clips.push(ClipData { name, channels });
    }
    Ok(clips)
}

/// Cubic spline outputs come as (in-tangent, value, out-tangent) triples.
fn key_values<T>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    }
}
