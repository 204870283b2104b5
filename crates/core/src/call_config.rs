//! Lifecycle capability analysis for methods and bare calls

use crate::arc56::{Actions, Method};
use serde::Serialize;

/// On-completion action tags recognised in `actions.create` / `actions.call`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OnCompletionAction {
    NoOp,
    OptIn,
    CloseOut,
    UpdateApplication,
    DeleteApplication,
}

impl OnCompletionAction {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NoOp" => Some(Self::NoOp),
            "OptIn" => Some(Self::OptIn),
            "CloseOut" => Some(Self::CloseOut),
            "UpdateApplication" => Some(Self::UpdateApplication),
            "DeleteApplication" => Some(Self::DeleteApplication),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::NoOp => "NoOp",
            Self::OptIn => "OptIn",
            Self::CloseOut => "CloseOut",
            Self::UpdateApplication => "UpdateApplication",
            Self::DeleteApplication => "DeleteApplication",
        }
    }
}

/// Capabilities derived from one pair of action lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BareCallConfig {
    pub can_create: bool,
    pub can_call: bool,
    pub can_opt_in: bool,
    pub can_close_out: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl BareCallConfig {
    /// Whether any bare action at all is allowed
    pub fn any(&self) -> bool {
        self.can_create
            || self.can_call
            || self.can_opt_in
            || self.can_close_out
            || self.can_update
            || self.can_delete
    }

    /// On-completion actions reachable through a plain call, in a fixed order
    pub fn call_actions(&self) -> Vec<OnCompletionAction> {
        [
            (self.can_call, OnCompletionAction::NoOp),
            (self.can_opt_in, OnCompletionAction::OptIn),
            (self.can_close_out, OnCompletionAction::CloseOut),
            (self.can_update, OnCompletionAction::UpdateApplication),
            (self.can_delete, OnCompletionAction::DeleteApplication),
        ]
        .into_iter()
        .filter_map(|(enabled, action)| enabled.then_some(action))
        .collect()
    }
}

/// Capabilities of an ABI method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallConfig {
    #[serde(flatten)]
    pub actions: BareCallConfig,
    pub is_readonly: bool,
}

impl std::ops::Deref for CallConfig {
    type Target = BareCallConfig;

    fn deref(&self) -> &Self::Target {
        &self.actions
    }
}

/// Derive a method's capabilities. Unknown tags are ignored.
pub fn analyze_method(create: &[String], call: &[String], is_readonly: bool) -> CallConfig {
    CallConfig {
        actions: analyze_bare(create, call),
        is_readonly,
    }
}

/// Derive the contract-level bare-call capabilities
pub fn analyze_bare(create: &[String], call: &[String]) -> BareCallConfig {
    let mut config = BareCallConfig::default();

    for action in create.iter().filter_map(|t| OnCompletionAction::from_tag(t)) {
        match action {
            OnCompletionAction::NoOp => config.can_create = true,
            // Creating through opt-in also opts the creator in
            OnCompletionAction::OptIn => {
                config.can_create = true;
                config.can_opt_in = true;
            }
            _ => {}
        }
    }

    for action in call.iter().filter_map(|t| OnCompletionAction::from_tag(t)) {
        match action {
            OnCompletionAction::NoOp => config.can_call = true,
            OnCompletionAction::OptIn => config.can_opt_in = true,
            OnCompletionAction::CloseOut => config.can_close_out = true,
            OnCompletionAction::UpdateApplication => config.can_update = true,
            OnCompletionAction::DeleteApplication => config.can_delete = true,
        }
    }

    config
}

/// Convenience over [`analyze_method`] for a parsed method
pub fn analyze(method: &Method) -> CallConfig {
    analyze_method(&method.actions.create, &method.actions.call, method.readonly)
}

/// Convenience over [`analyze_bare`] for the contract's bare actions
pub fn analyze_bare_actions(actions: &Actions) -> BareCallConfig {
    analyze_bare(&actions.create, &actions.call)
}

/// Whether any method of the contract can create the application
pub fn has_create_method(methods: &[Method]) -> bool {
    methods.iter().any(|m| analyze(m).can_create)
}
