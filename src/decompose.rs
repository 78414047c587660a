//! Rule-based task decomposition.
//!
//! Maps a task description to an ordered, non-empty list of subtask
//! descriptions. Keyword matching is case-insensitive; anything unrecognized
//! falls through to three generic subtasks carrying the original description
//! verbatim.

/// Subtasks for descriptions mentioning authentication.
const AUTH_SUBTASKS: [&str; 4] = [
    "Design user database schema",
    "Implement JWT token generation",
    "Create login/logout endpoints",
    "Add password hashing with bcrypt",
];

/// Subtasks for descriptions mentioning an API.
const API_SUBTASKS: [&str; 4] = [
    "Define API endpoints and routes",
    "Implement request validation",
    "Add error handling middleware",
    "Write API documentation",
];

/// Break a task description into an ordered list of subtask descriptions.
///
/// Pure and deterministic: the same input always yields the same sequence,
/// the sequence is never empty, and no entry is empty or whitespace-only.
/// This function does not fail; unmatched input takes the generic branch.
pub fn decompose(description: &str) -> Vec<String> {
    let lowered = description.to_lowercase();

    if lowered.contains("authentication") {
        AUTH_SUBTASKS.iter().map(|s| (*s).to_string()).collect()
    } else if lowered.contains("api") {
        API_SUBTASKS.iter().map(|s| (*s).to_string()).collect()
    } else {
        vec![
            format!("Research requirements for: {}", description),
            format!("Implement core logic for: {}", description),
            format!("Test and validate: {}", description),
        ]
    }
}
