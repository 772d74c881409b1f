use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::QueueSample;

use super::utils::{f64_field, u64_field, write_record_batch};

/// Writes one row per queue sample: `time`, `nurse_queue`, `doctor_queue`.
pub fn write_queue_samples_parquet<P: AsRef<Path>>(
    path: P,
    samples: &[QueueSample],
) -> Result<(), Box<dyn Error>> {
    let mut time = Vec::with_capacity(samples.len());
    let mut nurse_queue = Vec::with_capacity(samples.len());
    let mut doctor_queue = Vec::with_capacity(samples.len());

    for sample in samples {
        time.push(sample.time);
        nurse_queue.push(sample.nurse_queue_len as u64);
        doctor_queue.push(sample.doctor_queue_len as u64);
    }

    let schema = Schema::new(vec![
        f64_field("time"),
        u64_field("nurse_queue"),
        u64_field("doctor_queue"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(time)),
        Arc::new(UInt64Array::from(nurse_queue)),
        Arc::new(UInt64Array::from(doctor_queue)),
    ];

    write_record_batch(path, schema, arrays)
}
