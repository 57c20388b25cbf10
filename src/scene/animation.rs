//! Keyframe animation data as the serializer sees it.

use smallvec::SmallVec;
use uuid::Uuid;

use crate::scene::NodeHandle;
use crate::scene::scene::Scene;
use crate::serialize::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationValueType {
    Float,
    Vector3,
    Quaternion,
    Color3,
}

impl AnimationValueType {
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            AnimationValueType::Float => 0,
            AnimationValueType::Vector3 => 1,
            AnimationValueType::Quaternion => 2,
            AnimationValueType::Color3 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Relative,
    #[default]
    Cycle,
    Constant,
}

impl LoopMode {
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            LoopMode::Relative => 0,
            LoopMode::Cycle => 1,
            LoopMode::Constant => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationKey {
    pub frame: f32,
    pub values: SmallVec<[f32; 4]>,
}

impl AnimationKey {
    #[must_use]
    pub fn new(frame: f32, values: &[f32]) -> Self {
        Self {
            frame,
            values: SmallVec::from_slice(values),
        }
    }
}

/// One animated property track.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    /// Dotted property path on the target, e.g. `"position"` or `"material.alpha"`.
    pub property: String,
    pub frames_per_second: f32,
    pub value_type: AnimationValueType,
    pub loop_mode: LoopMode,
    pub keys: Vec<AnimationKey>,
}

impl Animation {
    #[must_use]
    pub fn new(name: &str, property: &str, frames_per_second: f32, value_type: AnimationValueType) -> Self {
        Self {
            name: name.to_string(),
            property: property.to_string(),
            frames_per_second,
            value_type,
            loop_mode: LoopMode::default(),
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, frame: f32, values: &[f32]) -> Self {
        self.keys.push(AnimationKey::new(frame, values));
        self
    }

    #[must_use]
    pub fn serialize(&self) -> Value {
        let keys = self
            .keys
            .iter()
            .map(|key| {
                Value::object()
                    .with("frame", key.frame)
                    .with("values", key.values.as_slice())
            })
            .collect::<Vec<_>>();

        Value::object()
            .with("name", self.name.as_str())
            .with("property", self.property.as_str())
            .with("framePerSecond", self.frames_per_second)
            .with("dataType", self.value_type.code())
            .with("loopBehavior", self.loop_mode.code())
            .with("keys", keys)
    }
}

#[derive(Debug, Clone)]
pub struct TargetedAnimation {
    pub target: NodeHandle,
    pub animation: Animation,
}

/// A named set of animations played together.
#[derive(Debug, Clone)]
pub struct AnimationGroup {
    pub uuid: Uuid,
    pub name: String,
    pub from: f32,
    pub to: f32,
    pub looping: bool,
    pub speed_ratio: f32,
    pub targeted_animations: Vec<TargetedAnimation>,
    pub do_not_serialize: bool,
}

impl AnimationGroup {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            from: 0.0,
            to: 0.0,
            looping: false,
            speed_ratio: 1.0,
            targeted_animations: Vec::new(),
            do_not_serialize: false,
        }
    }

    /// Adds a track and widens the group's frame range to cover it.
    pub fn add_targeted_animation(&mut self, target: NodeHandle, animation: Animation) {
        for key in &animation.keys {
            self.from = self.from.min(key.frame);
            self.to = self.to.max(key.frame);
        }
        self.targeted_animations.push(TargetedAnimation { target, animation });
    }

    /// Tracks whose target is gone or opted out are dropped from the record.
    #[must_use]
    pub fn serialize(&self, scene: &Scene) -> Value {
        let targeted = self
            .targeted_animations
            .iter()
            .filter_map(|ta| {
                let target = scene.get_node(ta.target)?;
                if target.do_not_serialize {
                    return None;
                }
                Some(
                    Value::object()
                        .with("animation", ta.animation.serialize())
                        .with("targetId", target.uuid),
                )
            })
            .collect::<Vec<_>>();

        Value::object()
            .with("name", self.name.as_str())
            .with("id", self.uuid)
            .with("from", self.from)
            .with("to", self.to)
            .with("loopAnimation", self.looping)
            .with("speedRatio", self.speed_ratio)
            .with("targetedAnimations", targeted)
    }
}
