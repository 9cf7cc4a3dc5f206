use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Process metrics. Cheap to clone; all handles share one registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    plan_requests: IntCounterVec,
    plan_failures: IntCounterVec,
    plan_duration: Histogram,
    geocode_lookups: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let plan_requests = IntCounterVec::new(
            Opts::new("plan_requests_total", "Plan runs started, by mode"),
            &["mode"],
        )?;
        let plan_failures = IntCounterVec::new(
            Opts::new("plan_failures_total", "Plan runs that failed, by mode"),
            &["mode"],
        )?;
        let plan_duration = Histogram::with_opts(
            HistogramOpts::new("plan_duration_seconds", "Wall time of one workflow run")
                .buckets(vec![1.0, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0, 300.0]),
        )?;
        let geocode_lookups = IntCounterVec::new(
            Opts::new("geocode_lookups_total", "Place resolutions, by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(plan_requests.clone()))?;
        registry.register(Box::new(plan_failures.clone()))?;
        registry.register(Box::new(plan_duration.clone()))?;
        registry.register(Box::new(geocode_lookups.clone()))?;

        Ok(Self {
            registry,
            plan_requests,
            plan_failures,
            plan_duration,
            geocode_lookups,
        })
    }

    pub fn plan_started(&self, mode: &str) {
        self.plan_requests.with_label_values(&[mode]).inc();
    }

    pub fn plan_failed(&self, mode: &str) {
        self.plan_failures.with_label_values(&[mode]).inc();
    }

    pub fn observe_plan_duration(&self, seconds: f64) {
        self.plan_duration.observe(seconds);
    }

    pub fn geocode_outcome(&self, outcome: &str) {
        self.geocode_lookups.with_label_values(&[outcome]).inc();
    }

    #[cfg(test)]
    pub fn geocode_count(&self, outcome: &str) -> u64 {
        self.geocode_lookups.with_label_values(&[outcome]).get()
    }

    /// Text exposition format for `/metrics`.
    pub fn render(&self) -> Result<(Vec<u8>, String), prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
