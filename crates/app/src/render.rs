//! Plain text view of a bucket.

use engine::Bucket;

/// Indented tree of `bucket`: one line per parent, children below it with
/// their position.
pub fn render_bucket(bucket: &Bucket) -> String {
    let mut out = format!("{}\n", bucket.name());
    for parent in bucket.parents() {
        out.push_str(&format!("  {} ({}) {}\n", parent.name, parent.color, parent.id));
        if parent.children.is_empty() {
            out.push_str("    (empty)\n");
        }
        for (index, child) in parent.children.iter().enumerate() {
            out.push_str(&format!("    {}. {} {}", index + 1, child.name, child.id));
            if let Some(description) = &child.description {
                out.push_str(&format!(" - {description}"));
            }
            out.push('\n');
        }
    }
    out
}
