//! Canned Netpalm response envelopes

use serde_json::{Value, json};

/// Envelope accepting a job submission
pub fn submitted(task_id: &str) -> Value {
    json!({
        "status": "success",
        "data": {
            "task_id": task_id,
            "created_on": "2024-01-01 10:00:00.000000",
            "task_queue": "192.168.0.1",
            "task_meta": {
                "enqueued_at": "2024-01-01 10:00:00.000000",
                "started_at": null,
                "ended_at": null,
                "enqueued_elapsed_seconds": null,
                "total_elapsed_seconds": null
            },
            "task_status": "queued",
            "task_result": null,
            "task_errors": []
        }
    })
}

/// Envelope for a task that is still in the queue
pub fn pending(task_id: &str, status: &str) -> Value {
    json!({
        "status": "success",
        "data": {
            "task_id": task_id,
            "task_status": status,
            "task_result": null,
            "task_errors": []
        }
    })
}

/// Envelope for a finished task with output for `command`
pub fn finished(task_id: &str, command: &str, output: Value) -> Value {
    json!({
        "status": "success",
        "data": {
            "task_id": task_id,
            "task_status": "finished",
            "task_result": {command: output},
            "task_errors": []
        }
    })
}

/// Envelope for a task that failed on the device side
pub fn failed(task_id: &str, errors: Value) -> Value {
    json!({
        "status": "success",
        "data": {
            "task_id": task_id,
            "task_status": "failed",
            "task_result": null,
            "task_errors": errors
        }
    })
}
