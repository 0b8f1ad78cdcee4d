/*!
 * Path based categorisation of input files
 */

use crate::types::Category;

/// Assign a path to a category.
///
/// Matching is case-insensitive and only looks at directory segments; the
/// file name itself never decides the category. `test`/`tests` wins over
/// `editor` when both appear.
pub fn classify(path: &str) -> Category {
    let normalized = path.replace('\\', "/").to_lowercase();
    let mut segments: Vec<&str> = normalized.split('/').collect();
    // Drop the file name
    segments.pop();

    if segments.iter().any(|s| *s == "test" || *s == "tests") {
        Category::Test
    } else if segments.iter().any(|s| *s == "editor") {
        Category::Editor
    } else {
        Category::Main
    }
}
