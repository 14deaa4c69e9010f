//! Location and prayer schedule refresh, and the timer tick

use crate::model::TickAction;
use super::AppController;

impl AppController {
    /// Re-resolve the location, then fetch and schedule today's timings for it.
    pub async fn refresh_location(&self) {
        let location = self.locator.resolve().await;
        self.model.lock().await.set_location(location);
        self.refresh_schedule().await;
    }

    /// Fetch today's timings for the current location and re-arm every event.
    pub async fn refresh_schedule(&self) {
        let (ticket, location) = {
            let mut model = self.model.lock().await;
            (model.scheduler.begin_refresh(), model.location())
        };
        let today = self.clock.now().date();

        let result = self
            .prayer_times
            .fetch_timings(today, location)
            .await
            .map_err(anyhow::Error::from);

        let now = self.clock.now();
        let mut model = self.model.lock().await;
        model.scheduler.apply_refresh(ticket, result, now);
    }

    pub fn spawn_refresh_location(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.refresh_location().await;
        });
    }

    pub fn spawn_refresh_schedule(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.refresh_schedule().await;
        });
    }

    /// Called from the UI loop: audio completion, due events, notification expiry.
    pub async fn tick(&self) {
        let now = self.clock.now();
        let actions = {
            let mut model = self.model.lock().await;
            model.auto_clear_old_notifications();
            model.tick(now)
        };
        for action in actions {
            match action {
                TickAction::RefreshSchedule => {
                    tracing::info!("Midnight reached, refreshing prayer schedule");
                    self.spawn_refresh_schedule();
                }
            }
        }
    }
}
