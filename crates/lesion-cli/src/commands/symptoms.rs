//! Symptoms command - print the checklist.

use lesion_core::Symptom;

/// Prints each symptom as `<slug>  <name>`, in checklist order.
pub fn run() {
    let width = Symptom::ALL
        .iter()
        .map(|s| s.slug().len())
        .max()
        .unwrap_or(0);

    for symptom in Symptom::ALL {
        println!("{:<width$}  {}", symptom.slug(), symptom.name());
    }
}
