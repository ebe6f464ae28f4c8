use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::time::{ClockError, UnixTimeMs};

/// Asks the shell for the current instant. The core never reads the host
/// clock on its own while a shell is attached.
#[derive(Capability)]
pub struct Clock<Ev> {
    context: CapabilityContext<ClockOperation, Ev>,
}

impl<Ev> Clock<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ClockOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn now<F>(&self, callback: F)
    where
        F: FnOnce(ClockResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(ClockOperation::Now).await;
            context.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClockOperation {
    Now,
}

impl Operation for ClockOperation {
    type Output = ClockResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockOutput {
    pub now: UnixTimeMs,
}

pub type ClockResult = Result<ClockOutput, ClockError>;
