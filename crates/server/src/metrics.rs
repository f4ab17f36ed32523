use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static JOBS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fractal_api_jobs_created_total",
        "Total fractal jobs registered"
    )
    .expect("register jobs_created_total")
});

pub static RESULTS_PUBLISHED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fractal_api_results_published_total",
        "Total fractal results stored"
    )
    .expect("register results_published_total")
});

pub static REJECTED_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fractal_api_rejected_requests_total",
        "Total requests answered with an error, by reason",
        &["reason"]
    )
    .expect("register rejected_requests_total")
});

/// Text exposition of every metric in the default registry.
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

pub fn reject(reason: &str) {
    REJECTED_REQUESTS_TOTAL.with_label_values(&[reason]).inc();
}
