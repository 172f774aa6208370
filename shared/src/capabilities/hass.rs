use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::edit::{BatteryChangeCommand, SERVICE_DOMAIN, SERVICE_SET_CHANGED_DATE};

/// A host service call, e.g. `battery_tracker.set_battery_changed_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: BatteryChangeCommand,
}

impl From<BatteryChangeCommand> for ServiceCall {
    fn from(command: BatteryChangeCommand) -> Self {
        Self {
            domain: SERVICE_DOMAIN.to_owned(),
            service: SERVICE_SET_CHANGED_DATE.to_owned(),
            data: command,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum HassOperation {
    CallService(ServiceCall),
}

// Fire-and-forget: the shell reports nothing back.
impl Operation for HassOperation {
    type Output = ();
}

pub struct Hass<Ev> {
    context: CapabilityContext<HassOperation, Ev>,
}

impl<Ev> Clone for Hass<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Hass<Ev> {
    type Operation = HassOperation;
    type MappedSelf<MappedEv> = Hass<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Hass::new(self.context.map_event(f))
    }
}

impl<Ev> Hass<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<HassOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn call_service(&self, call: impl Into<ServiceCall>) {
        let ctx = self.context.clone();
        let operation = HassOperation::CallService(call.into());
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
