// Analysis window selection
use crate::domain::error::ReliabilityError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u32")]
pub enum TimeWindow {
    Days7,
    Days14,
    #[default]
    Days30,
    Days60,
    Days90,
}

impl TimeWindow {
    pub const SUPPORTED: [TimeWindow; 5] = [
        TimeWindow::Days7,
        TimeWindow::Days14,
        TimeWindow::Days30,
        TimeWindow::Days60,
        TimeWindow::Days90,
    ];

    pub fn from_days(days: u32) -> Result<Self, ReliabilityError> {
        Self::SUPPORTED
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or(ReliabilityError::InvalidWindow(days))
    }

    pub fn days(self) -> u32 {
        match self {
            TimeWindow::Days7 => 7,
            TimeWindow::Days14 => 14,
            TimeWindow::Days30 => 30,
            TimeWindow::Days60 => 60,
            TimeWindow::Days90 => 90,
        }
    }

    pub fn window_minutes(self) -> i64 {
        i64::from(self.days()) * 24 * 60
    }
}

impl From<TimeWindow> for u32 {
    fn from(window: TimeWindow) -> Self {
        window.days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_days() {
        assert_eq!(TimeWindow::from_days(7).unwrap(), TimeWindow::Days7);
        assert_eq!(TimeWindow::from_days(90).unwrap(), TimeWindow::Days90);
        assert!(matches!(
            TimeWindow::from_days(45),
            Err(ReliabilityError::InvalidWindow(45))
        ));
    }

    #[test]
    fn test_window_minutes() {
        assert_eq!(TimeWindow::Days7.window_minutes(), 10_080);
        assert_eq!(TimeWindow::default().window_minutes(), 43_200);
    }
}
