use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

lazy_static::lazy_static! {
    pub static ref SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hearth_searches_total", "Radius searches", &["outcome"]
    ).unwrap();
    pub static ref RECOMMENDATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hearth_recommendations_total", "Recommendation requests", &["scope"]
    ).unwrap();
    pub static ref PREDICTIONS_TOTAL: IntCounter = register_int_counter!(
        "hearth_predictions_total", "Price predictions"
    ).unwrap();
    pub static ref OPERATION_DURATION: HistogramVec = register_histogram_vec!(
        "hearth_operation_duration_seconds", "Operation duration", &["operation"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).unwrap();
    pub static ref ACTIVE_SESSIONS: IntGauge = register_int_gauge!(
        "hearth_active_sessions", "Live search sessions"
    ).unwrap();
    pub static ref SESSIONS_EVICTED_TOTAL: IntCounter = register_int_counter!(
        "hearth_sessions_evicted_total", "Sessions evicted for inactivity"
    ).unwrap();
}

pub fn init() {
    lazy_static::initialize(&SEARCHES_TOTAL);
    lazy_static::initialize(&RECOMMENDATIONS_TOTAL);
    lazy_static::initialize(&PREDICTIONS_TOTAL);
    lazy_static::initialize(&OPERATION_DURATION);
    lazy_static::initialize(&ACTIVE_SESSIONS);
    lazy_static::initialize(&SESSIONS_EVICTED_TOTAL);
}

/// Observes the elapsed time into `OPERATION_DURATION` when dropped.
pub struct OperationTimer(prometheus::HistogramTimer);

impl OperationTimer {
    pub fn start(operation: &str) -> Self {
        OperationTimer(
            OPERATION_DURATION
                .with_label_values(&[operation])
                .start_timer(),
        )
    }

    /// Record now instead of at drop.
    pub fn observe(self) {
        self.0.observe_duration();
    }
}
