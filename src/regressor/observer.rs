use log::debug;

/// One answered prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionEvent {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
}

/// Sink for prediction diagnostics. Called after the model has answered;
/// implementations cannot fail the prediction and should not block.
pub trait PredictionObserver: Send + Sync {
    fn on_prediction(&self, event: &PredictionEvent);
}

/// Writes each prediction to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PredictionObserver for LogObserver {
    fn on_prediction(&self, event: &PredictionEvent) {
        debug!(
            "predicted magnitude {} for ({}, {})",
            event.magnitude, event.latitude, event.longitude
        );
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PredictionObserver for NoopObserver {
    fn on_prediction(&self, _event: &PredictionEvent) {}
}

impl<F> PredictionObserver for F
where
    F: Fn(&PredictionEvent) + Send + Sync,
{
    fn on_prediction(&self, event: &PredictionEvent) {
        self(event)
    }
}
