use crate::telemetry::PatientRecord;

/// Validates that timestamps in a patient record follow the visit order:
/// arrival_time ≤ nurse_start ≤ nurse_done, then for referred patients
/// nurse_done ≤ doctor_queued_at ≤ doctor_start ≤ doctor_done.
/// Returns an error message if validation fails, None if valid.
pub fn validate_patient_timestamp_ordering(record: &PatientRecord) -> Option<String> {
    if record.arrival_time > record.nurse_start {
        return Some(format!(
            "Patient {}: arrival_time ({}) > nurse_start ({})",
            record.patient_id, record.arrival_time, record.nurse_start
        ));
    }
    if record.nurse_start > record.nurse_done {
        return Some(format!(
            "Patient {}: nurse_start ({}) > nurse_done ({})",
            record.patient_id, record.nurse_start, record.nurse_done
        ));
    }

    if !record.referred {
        if record.doctor_queued_at.is_some()
            || record.doctor_start.is_some()
            || record.doctor_done.is_some()
        {
            return Some(format!(
                "Patient {} (not referred): doctor timestamps should be None",
                record.patient_id
            ));
        }
        return None;
    }

    let (Some(queued), Some(start), Some(done)) =
        (record.doctor_queued_at, record.doctor_start, record.doctor_done)
    else {
        return Some(format!(
            "Patient {} (referred): missing doctor timestamps",
            record.patient_id
        ));
    };
    if record.nurse_done > queued {
        return Some(format!(
            "Patient {}: nurse_done ({}) > doctor_queued_at ({})",
            record.patient_id, record.nurse_done, queued
        ));
    }
    if queued > start {
        return Some(format!(
            "Patient {}: doctor_queued_at ({}) > doctor_start ({})",
            record.patient_id, queued, start
        ));
    }
    if start > done {
        return Some(format!(
            "Patient {}: doctor_start ({}) > doctor_done ({})",
            record.patient_id, start, done
        ));
    }
    None
}
