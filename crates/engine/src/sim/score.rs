use crate::app::TextSink;

/// Non-decreasing capture score, mirrored to an optional text sink.
pub struct ScoreTracker {
    value: u32,
    sink: Option<Box<dyn TextSink>>,
}

impl ScoreTracker {
    pub fn new(sink: Option<Box<dyn TextSink>>) -> Self {
        let mut tracker = Self { value: 0, sink };
        tracker.publish();
        tracker
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn award(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
        self.publish();
    }

    fn publish(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(&self.value.to_string());
        }
    }
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("value", &self.value)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SharedText;

    #[test]
    fn construction_publishes_zero() {
        let text = SharedText::default();
        let _tracker = ScoreTracker::new(Some(Box::new(text.clone())));
        assert_eq!(text.get(), "0");
    }

    #[test]
    fn award_accumulates_and_updates_sink() {
        let text = SharedText::default();
        let mut tracker = ScoreTracker::new(Some(Box::new(text.clone())));
        tracker.award(15);
        tracker.award(15);
        assert_eq!(tracker.value(), 30);
        assert_eq!(text.get(), "30");
    }

    #[test]
    fn award_saturates_instead_of_wrapping() {
        let mut tracker = ScoreTracker::new(None);
        tracker.award(u32::MAX);
        tracker.award(7);
        assert_eq!(tracker.value(), u32::MAX);
    }
}
