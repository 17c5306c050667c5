//! Probe that replays a fixed outcome sequence per host.

use futures_util::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::probe::{Probe, ProbeError, ProbeResult};

/// Replays scripted outcomes, one per call and host.
///
/// `true` answers reachable, `false` fails with a `scripted failure`
/// reason. Once a host's script is exhausted (or for hosts without a
/// script) every call fails as [`ProbeError::Unreachable`].
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    scripts: Mutex<HashMap<String, VecDeque<bool>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`ScriptedProbe::script`].
    pub fn with_script(self, host: &str, outcomes: &[bool]) -> Self {
        self.script(host, outcomes);
        self
    }

    /// Append outcomes to a host's script.
    pub fn script(&self, host: &str, outcomes: &[bool]) {
        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        scripts
            .entry(host.to_string())
            .or_default()
            .extend(outcomes.iter().copied());
    }

    /// Number of probes issued against `host` so far.
    pub fn calls(&self, host: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(host).copied().unwrap_or(0)
    }

    fn next(&self, host: &str) -> ProbeResult {
        {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            *calls.entry(host.to_string()).or_default() += 1;
        }

        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
        match scripts.get_mut(host).and_then(VecDeque::pop_front) {
            Some(true) => Ok(()),
            Some(false) => Err(ProbeError::Request("scripted failure".into())),
            None => Err(ProbeError::Unreachable),
        }
    }
}

impl Probe for ScriptedProbe {
    fn probe<'a>(&'a self, host: &'a str) -> BoxFuture<'a, ProbeResult> {
        let outcome = self.next(host);
        Box::pin(async move { outcome })
    }
}
