/*!
 * Size bounded per-category accumulation of source files
 */

use tracing::debug;

use crate::error::Result;
use crate::types::{Category, FlushedPart, SourceFile};

/// Default maximum number of accumulated lines per part
pub const MAX_LINES_PER_PART: usize = 12_000;

const RULE: &str = "// ───────────────────────────────────────────────────────────────";

/// Receives parts as the bucket writer completes them
pub trait PartSink {
    /// Persist a completed part
    fn flush(&mut self, part: FlushedPart) -> Result<()>;
}

/// Collects parts in memory
impl PartSink for Vec<FlushedPart> {
    fn flush(&mut self, part: FlushedPart) -> Result<()> {
        self.push(part);
        Ok(())
    }
}

/// Output file name of a part: `<folder>-<category>[-<part>].<ext>`
pub fn part_file_name(folder: &str, category: Category, part: usize, extension: &str) -> String {
    if part > 1 {
        format!("{}-{}-{}.{}", folder, category, part, extension)
    } else {
        format!("{}-{}.{}", folder, category, extension)
    }
}

/// Accumulator for one category
#[derive(Debug)]
struct Bucket {
    buffer: String,
    lines: usize,
    part: usize,
    includes: Vec<String>,
}

impl Bucket {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            lines: 0,
            part: 1,
            includes: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn push_block(&mut self, path: &str, content: &str, lines: usize, fingerprint: &str) {
        let buf = &mut self.buffer;
        buf.push_str(RULE);
        buf.push('\n');
        buf.push_str(&format!("//  FILE : {}\n", path));
        buf.push_str(&format!("//  LINES: {}    MD5: {}\n", lines, fingerprint));
        buf.push_str(RULE);
        buf.push('\n');
        buf.push_str(content);
        buf.push('\n');
        buf.push('\n');

        self.includes.push(path.to_string());
        self.lines += lines;
    }

    /// Take the current contents, leaving the bucket empty at the next part
    fn rotate(&mut self) -> (String, usize, usize, Vec<String>) {
        let taken = (
            std::mem::take(&mut self.buffer),
            self.lines,
            self.part,
            std::mem::take(&mut self.includes),
        );
        self.lines = 0;
        self.part += 1;
        taken
    }
}

/// Appends files to per-category buckets and flushes full parts to a sink
pub struct BucketWriter<S: PartSink> {
    folder: String,
    extension: String,
    max_lines: usize,
    buckets: [Bucket; 3],
    sink: S,
}

impl<S: PartSink> BucketWriter<S> {
    /// Create a writer naming parts after `folder` with the given extension
    pub fn new(folder: &str, extension: &str, max_lines: usize, sink: S) -> Self {
        Self {
            folder: folder.to_string(),
            extension: extension.to_string(),
            max_lines,
            buckets: [Bucket::new(), Bucket::new(), Bucket::new()],
            sink,
        }
    }

    /// Append a source file to its category's bucket
    pub fn append_file(&mut self, file: &SourceFile) -> Result<()> {
        self.append_block(file.category, &file.path, &file.content, file.lines, &file.fingerprint)
    }

    /// Append raw content, deriving line count and fingerprint
    pub fn append(&mut self, category: Category, path: &str, content: &str) -> Result<()> {
        let lines = crate::utils::count_lines(content);
        let fingerprint = crate::utils::fingerprint(content);
        self.append_block(category, path, content, lines, &fingerprint)
    }

    fn append_block(
        &mut self,
        category: Category,
        path: &str,
        content: &str,
        lines: usize,
        fingerprint: &str,
    ) -> Result<()> {
        let bucket = &self.buckets[category.index()];
        if bucket.lines + lines > self.max_lines && bucket.lines > 0 {
            debug!(
                category = %category,
                part = bucket.part,
                lines = bucket.lines,
                incoming = lines,
                "Rotating part"
            );
            self.flush_bucket(category)?;
        }

        self.buckets[category.index()].push_block(path, content, lines, fingerprint);
        debug!(category = %category, path, lines, "Appended file");

        Ok(())
    }

    /// Lines accumulated in the current, unflushed part of a category
    pub fn pending_lines(&self, category: Category) -> usize {
        self.buckets[category.index()].lines
    }

    /// Current part number of a category
    pub fn current_part(&self, category: Category) -> usize {
        self.buckets[category.index()].part
    }

    /// Flush every non-empty bucket and hand back the sink
    pub fn finish(mut self) -> Result<S> {
        for category in Category::ALL {
            if !self.buckets[category.index()].is_empty() {
                self.flush_bucket(category)?;
            }
        }
        Ok(self.sink)
    }

    fn flush_bucket(&mut self, category: Category) -> Result<()> {
        let (contents, lines, part, includes) = self.buckets[category.index()].rotate();
        let file_name = part_file_name(&self.folder, category, part, &self.extension);

        self.sink.flush(FlushedPart {
            category,
            part,
            file_name,
            contents,
            lines,
            includes,
        })
    }
}
