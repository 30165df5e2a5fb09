use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle transitions reported by the workload monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Create,
    Start,
    Update,
    Pause,
    Unpause,
    Stop,
    Destroy,
    Resync,
}

/// Controller call mapped from a lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnforcementAction {
    Enforce,
    UnEnforce,
}

impl LifecycleEvent {
    /// Controller call for this event; `None` means the event is ignored
    pub fn action(self) -> Option<EnforcementAction> {
        match self {
            LifecycleEvent::Start | LifecycleEvent::Unpause => Some(EnforcementAction::Enforce),
            LifecycleEvent::Pause | LifecycleEvent::Stop => Some(EnforcementAction::UnEnforce),
            LifecycleEvent::Create
            | LifecycleEvent::Update
            | LifecycleEvent::Destroy
            | LifecycleEvent::Resync => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::Create => "create",
            LifecycleEvent::Start => "start",
            LifecycleEvent::Update => "update",
            LifecycleEvent::Pause => "pause",
            LifecycleEvent::Unpause => "unpause",
            LifecycleEvent::Stop => "stop",
            LifecycleEvent::Destroy => "destroy",
            LifecycleEvent::Resync => "resync",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(LifecycleEvent::Create),
            "start" => Ok(LifecycleEvent::Start),
            "update" => Ok(LifecycleEvent::Update),
            "pause" => Ok(LifecycleEvent::Pause),
            "unpause" => Ok(LifecycleEvent::Unpause),
            "stop" => Ok(LifecycleEvent::Stop),
            "destroy" => Ok(LifecycleEvent::Destroy),
            "resync" => Ok(LifecycleEvent::Resync),
            other => Err(format!("unknown lifecycle event: {}", other)),
        }
    }
}

impl fmt::Display for EnforcementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnforcementAction::Enforce => write!(f, "enforce"),
            EnforcementAction::UnEnforce => write!(f, "unenforce"),
        }
    }
}
