//! The pages of the client, one reducer each.

pub mod create_project;
pub mod dashboard;
pub mod login;
pub mod project_detail;
pub mod projects;
pub mod register;

use crate::alert::{AlertKind, AlertSlot};
use crate::environment::ViewEnvironment;
use loadforecast_core::effect::Effect;

/// Show an alert and schedule its dismissal.
pub(crate) fn show_alert<A>(
    slot: &mut AlertSlot,
    kind: AlertKind,
    message: impl Into<String>,
    env: &ViewEnvironment,
    dismiss: impl FnOnce(u64) -> A,
) -> Effect<A> {
    let id = slot.raise(kind, message);
    Effect::delay(env.alert_dismiss_after, dismiss(id))
}
