use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::MissedTickBehavior};

use super::Event;

/// Spawn the reclamation tick task.
///
/// Posts [`Event::Sweep`] into the core's event channel every `every`. The
/// scan itself happens on the core's task, so the sweeper never touches lease
/// state and never fails; it exits once the core's receiver is gone.
pub(crate) fn spawn(events: mpsc::UnboundedSender<Event>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // a fresh interval fires immediately; nothing can be expired yet
        ticks.tick().await;

        loop {
            ticks.tick().await;
            if events.send(Event::Sweep).is_err() {
                break;
            }
        }
    })
}
