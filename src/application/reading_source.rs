// Source trait for mill feed-rate data
use crate::domain::reading::Reading;
use crate::domain::window::TimeWindow;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// List every mill id the source has data for
    async fn list_mill_ids(&self) -> anyhow::Result<Vec<String>>;

    /// Fetch all raw feed-rate readings for a mill over the trailing window
    async fn fetch_readings(
        &self,
        mill_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<Vec<Reading>>;

    /// Most recent feed rate, if the mill reported one recently
    async fn fetch_live_rate(&self, mill_id: &str) -> anyhow::Result<Option<f64>>;
}
