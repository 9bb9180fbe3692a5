use std::collections::HashSet;
use std::sync::Mutex;
use lazy_static::lazy_static;
use log::error;

lazy_static! {
    /// Descriptions of every invariant that has been asserted and held.
    static ref CHECKED_INVARIANTS: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// Asserts that a launcher invariant holds.
///
/// A violation is logged; in debug and test builds it also panics so it is
/// caught early; release builds log and carry on.
/// A held invariant is recorded so [`contract_test`] can prove it was checked.
///
/// # Arguments
/// * `condition` - The boolean result of the check.
/// * `description` - Human-readable statement, e.g. "Exactly one page is visible".
/// * `component` - Optional component tag (e.g., "Pages", "Registry").
pub fn assert_invariant(condition: bool, description: &str, component: Option<&str>) {
    if !condition {
        let msg = format!(
            "INVARIANT VIOLATION [{}]: {}",
            component.unwrap_or("General"),
            description
        );
        error!("{}", msg);

        if cfg!(debug_assertions) || cfg!(test) {
            panic!("{}", msg);
        }
    } else if let Ok(mut set) = CHECKED_INVARIANTS.lock() {
        set.insert(description.to_string());
    }
}

/// Verifies that the listed invariants were actually asserted at least once.
///
/// # Arguments
/// * `context` - Name of the test context.
/// * `required_invariants` - Descriptions that MUST have been asserted.
#[cfg(test)]
pub fn contract_test(context: &str, required_invariants: &[&str]) {
    let checked = CHECKED_INVARIANTS.lock().unwrap();
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|req| !checked.contains(*req))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Contract Test Failed for '{}'. The following invariants were NOT checked:\n{:#?}",
            context, missing
        );
    }
}
