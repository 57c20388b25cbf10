//! Scene-level interaction rules.
//!
//! An [`ActionManager`] maps triggers to action chains. The document form is
//! a three-level tree: the manager (`type` 3), one node per trigger
//! (`type` 0) and the actions under it (`type` 1), with follow-up actions
//! nested as children.

use serde_json::Value as Json;

use crate::scene::NodeHandle;
use crate::scene::scene::Scene;
use crate::serialize::Value;

const MANAGER_NODE: u32 = 3;
const TRIGGER_NODE: u32 = 0;
const ACTION_NODE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    OnPick,
    OnDoublePick,
    OnPointerOver,
    OnPointerOut,
    OnEveryFrame,
    OnKeyDown,
    OnKeyUp,
}

impl Trigger {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Trigger::OnPick => "OnPickTrigger",
            Trigger::OnDoublePick => "OnDoublePickTrigger",
            Trigger::OnPointerOver => "OnPointerOverTrigger",
            Trigger::OnPointerOut => "OnPointerOutTrigger",
            Trigger::OnEveryFrame => "OnEveryFrameTrigger",
            Trigger::OnKeyDown => "OnKeyDownTrigger",
            Trigger::OnKeyUp => "OnKeyUpTrigger",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ActionKind {
    SetValue { property: String, value: Json },
    PlayAnimation { from: f32, to: f32, looping: bool },
    Log { message: String },
}

impl ActionKind {
    fn name(&self) -> &'static str {
        match self {
            ActionKind::SetValue { .. } => "SetValueAction",
            ActionKind::PlayAnimation { .. } => "PlayAnimationAction",
            ActionKind::Log { .. } => "LogAction",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub kind: ActionKind,
    /// Node the action operates on; the scene itself when `None`.
    pub target: Option<NodeHandle>,
    /// Runs after this one completes.
    pub then: Vec<Action>,
}

impl Action {
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target: None,
            then: Vec::new(),
        }
    }

    #[must_use]
    pub fn on(mut self, target: NodeHandle) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn then(mut self, next: Action) -> Self {
        self.then.push(next);
        self
    }

    fn serialize(&self, scene: &Scene) -> Value {
        let mut properties = Vec::new();
        let target = self.target.and_then(|h| scene.get_node(h));
        properties.push(property(
            "target",
            target.map_or_else(|| "Scene".to_owned(), |n| n.name.clone()),
        ));

        match &self.kind {
            ActionKind::SetValue { property: path, value } => {
                properties.push(property("propertyPath", path.as_str()));
                properties.push(property("value", value.clone()));
            }
            ActionKind::PlayAnimation { from, to, looping } => {
                properties.push(property("from", *from));
                properties.push(property("to", *to));
                properties.push(property("loop", *looping));
            }
            ActionKind::Log { message } => {
                properties.push(property("message", message.as_str()));
            }
        }

        Value::object()
            .with("type", ACTION_NODE)
            .with("name", self.kind.name())
            .with("properties", properties)
            .with(
                "children",
                Value::Array(self.then.iter().map(|a| a.serialize(scene)).collect()),
            )
    }
}

fn property(name: &str, value: impl Into<Value>) -> Value {
    Value::object().with("name", name).with("value", value)
}

#[derive(Debug, Clone, Default)]
pub struct ActionManager {
    pub actions: Vec<(Trigger, Action)>,
}

impl ActionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, trigger: Trigger, action: Action) {
        self.actions.push((trigger, action));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action tree rooted at a manager node named `name`.
    #[must_use]
    pub fn serialize(&self, name: &str, scene: &Scene) -> Value {
        let triggers = self
            .actions
            .iter()
            .map(|(trigger, action)| {
                Value::object()
                    .with("type", TRIGGER_NODE)
                    .with("name", trigger.name())
                    .with("properties", Value::array())
                    .with("children", vec![action.serialize(scene)])
            })
            .collect::<Vec<_>>();

        Value::object()
            .with("name", name)
            .with("type", MANAGER_NODE)
            .with("properties", Value::array())
            .with("children", triggers)
    }
}
