use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::SimTelemetry;

use super::utils::{bool_field, f64_field, nullable_f64_field, u64_field, write_record_batch};

/// Writes one row per finished patient. Doctor columns are null for patients
/// who were not referred.
pub fn write_patient_records_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &SimTelemetry,
) -> Result<(), Box<dyn Error>> {
    let records = &telemetry.completed_patients;
    let mut patient_id = Vec::with_capacity(records.len());
    let mut arrival_time = Vec::with_capacity(records.len());
    let mut nurse_start = Vec::with_capacity(records.len());
    let mut nurse_done = Vec::with_capacity(records.len());
    let mut referred = Vec::with_capacity(records.len());
    let mut doctor_queued_at = Vec::with_capacity(records.len());
    let mut doctor_start = Vec::with_capacity(records.len());
    let mut doctor_done = Vec::with_capacity(records.len());

    for record in records {
        patient_id.push(record.patient_id);
        arrival_time.push(record.arrival_time);
        nurse_start.push(record.nurse_start);
        nurse_done.push(record.nurse_done);
        referred.push(record.referred);
        doctor_queued_at.push(record.doctor_queued_at);
        doctor_start.push(record.doctor_start);
        doctor_done.push(record.doctor_done);
    }

    let schema = Schema::new(vec![
        u64_field("patient_id"),
        f64_field("arrival_time"),
        f64_field("nurse_start"),
        f64_field("nurse_done"),
        bool_field("referred"),
        nullable_f64_field("doctor_queued_at"),
        nullable_f64_field("doctor_start"),
        nullable_f64_field("doctor_done"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(patient_id)),
        Arc::new(Float64Array::from(arrival_time)),
        Arc::new(Float64Array::from(nurse_start)),
        Arc::new(Float64Array::from(nurse_done)),
        Arc::new(BooleanArray::from(referred)),
        Arc::new(Float64Array::from(doctor_queued_at)),
        Arc::new(Float64Array::from(doctor_start)),
        Arc::new(Float64Array::from(doctor_done)),
    ];

    write_record_batch(path, schema, arrays)
}
