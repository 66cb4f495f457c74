//! Voice notifier implementations.

use skirmish_core::enums::VoiceTrigger;
use skirmish_core::oracles::VoiceNotifier;
use skirmish_core::types::AgentId;

/// Drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentVoice;

impl VoiceNotifier for SilentVoice {
    fn say(&self, _agent: AgentId, _trigger: VoiceTrigger) {}
}

/// Logs every request at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingVoice;

impl VoiceNotifier for TracingVoice {
    fn say(&self, agent: AgentId, trigger: VoiceTrigger) {
        tracing::trace!(%agent, ?trigger, "voice");
    }
}
