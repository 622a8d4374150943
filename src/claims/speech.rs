//! Spoken rendering of claim labels.

/// Render labels as a spoken list.
///
/// Every label is followed by `",\n"`, and `" and "` is appended right after
/// the second-to-last label's terminator, so `["A", "B", "C"]` renders as
/// `"A,\nB,\n and C,\n"`.
pub fn to_speech<S: AsRef<str>>(labels: &[S]) -> String {
    let mut speech = String::new();
    let count = labels.len();

    for (i, label) in labels.iter().enumerate() {
        speech.push_str(label.as_ref());
        speech.push_str(",\n");
        if count > 1 && i == count - 2 {
            speech.push_str(" and ");
        }
    }

    speech
}
