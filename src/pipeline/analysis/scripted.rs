use std::collections::HashMap;
use std::sync::Mutex;

use super::types::{AnalysisCapability, CapabilityResponse, RoleConfig};
use super::CapabilityError;

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub role: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

/// Offline capability that answers per role and records every call.
///
/// Roles without a script receive the default reply.
pub struct ScriptedCapability {
    default_reply: String,
    scripts: HashMap<String, Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedCapability {
    pub fn new(default_reply: &str) -> Self {
        Self {
            default_reply: default_reply.to_string(),
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, role_name: &str, reply: &str) -> Self {
        self.scripts
            .insert(role_name.to_string(), Scripted::Reply(reply.to_string()));
        self
    }

    pub fn with_failure(mut self, role_name: &str, message: &str) -> Self {
        self.scripts
            .insert(role_name.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl AnalysisCapability for ScriptedCapability {
    fn invoke(
        &self,
        prompt: &str,
        role: &RoleConfig,
    ) -> Result<CapabilityResponse, CapabilityError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                role: role.name.to_string(),
                prompt: prompt.to_string(),
            });
        }

        match self.scripts.get(role.name) {
            Some(Scripted::Reply(text)) => Ok(CapabilityResponse::new(text.clone())),
            Some(Scripted::Fail(message)) => Err(CapabilityError::Backend(message.clone())),
            None => Ok(CapabilityResponse::new(self.default_reply.clone())),
        }
    }
}
